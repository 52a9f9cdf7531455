use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use actix_web::web;
use async_trait::async_trait;
use database::{JsonRow, QueryExecutor, SqlValue};
use serde_json::Value;

use crate::image_store::ImageStore;

type Scripted = Result<Vec<JsonRow>, sqlx::Error>;

/// Executor that replays canned results and records every statement it receives.
pub(crate) struct ScriptedExecutor {
    responses: Mutex<VecDeque<Scripted>>,
    statements: Mutex<Vec<(String, Vec<SqlValue>)>>,
}

impl ScriptedExecutor {
    pub(crate) fn new(responses: Vec<Scripted>) -> Arc<Self> {
        Arc::new(Self {
            responses: Mutex::new(responses.into()),
            statements: Mutex::new(Vec::new()),
        })
    }

    pub(crate) fn statements(&self) -> Vec<(String, Vec<SqlValue>)> {
        self.statements.lock().unwrap().clone()
    }

    pub(crate) fn sql(&self) -> Vec<String> {
        self.statements().into_iter().map(|(sql, _)| sql).collect()
    }
}

#[async_trait]
impl QueryExecutor for ScriptedExecutor {
    async fn execute(
        &self,
        statement: &str,
        params: &[SqlValue],
    ) -> Result<Vec<JsonRow>, sqlx::Error> {
        self.statements
            .lock()
            .unwrap()
            .push((statement.to_string(), params.to_vec()));

        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| panic!("unexpected statement: {}", statement))
    }
}

pub(crate) fn rows(values: Vec<Value>) -> Scripted {
    Ok(values
        .into_iter()
        .map(|value| match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        })
        .collect())
}

pub(crate) fn no_rows() -> Scripted {
    Ok(Vec::new())
}

pub(crate) fn executor_data(executor: &Arc<ScriptedExecutor>) -> web::Data<dyn QueryExecutor> {
    web::Data::from(executor.clone() as Arc<dyn QueryExecutor>)
}

pub(crate) fn image_store_data(directory: &std::path::Path) -> web::Data<ImageStore> {
    web::Data::new(ImageStore::new(directory))
}
