use database::SqlValue;

use crate::types::UpdateUserRequest;

/// User columns that may be changed through a partial update
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserColumn {
    /// `users.username`
    Username,
    /// `users.email`
    Email,
    /// `users.role`
    Role,
}

impl UserColumn {
    /// Column name in the `users` table
    pub fn as_str(self) -> &'static str {
        match self {
            UserColumn::Username => "username",
            UserColumn::Email => "email",
            UserColumn::Role => "role",
        }
    }
}

/// A sparse set of user field changes
#[derive(Debug, Default, Clone, PartialEq)]
pub struct UserPatch {
    changes: Vec<(UserColumn, String)>,
}

/// A statement together with its positional parameters
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    /// SQL text with `$n` placeholders
    pub sql: String,
    /// Values for the placeholders, in order
    pub params: Vec<SqlValue>,
}

impl UserPatch {
    /// Creates an empty patch.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `column` to `value`, replacing an earlier change to the same column.
    pub fn set(mut self, column: UserColumn, value: impl Into<String>) -> Self {
        self.changes.retain(|(existing, _)| *existing != column);
        self.changes.push((column, value.into()));
        self
    }

    /// Builds `UPDATE users ... RETURNING id` for `user_id`, or `None` for an empty patch.
    pub fn into_statement(self, user_id: i64) -> Option<Statement> {
        if self.changes.is_empty() {
            return None;
        }

        let mut assignments = Vec::with_capacity(self.changes.len() + 1);
        let mut params = Vec::with_capacity(self.changes.len() + 1);

        for (column, value) in self.changes {
            params.push(SqlValue::Text(value));
            assignments.push(format!("{} = ${}", column.as_str(), params.len()));
        }
        assignments.push("updated_at = NOW()".to_string());

        params.push(SqlValue::Int(user_id));
        let sql = format!(
            "UPDATE users SET {} WHERE id = ${} RETURNING id",
            assignments.join(", "),
            params.len()
        );

        Some(Statement { sql, params })
    }
}

impl From<UpdateUserRequest> for UserPatch {
    fn from(request: UpdateUserRequest) -> Self {
        [
            (UserColumn::Username, request.username),
            (UserColumn::Email, request.email),
            (UserColumn::Role, request.role),
        ]
        .into_iter()
        .fold(UserPatch::new(), |patch, (column, value)| match value {
            Some(value) if !value.is_empty() => patch.set(column, value),
            _ => patch,
        })
    }
}
