use actix_web::{HttpResponse, Result, web};
use database::{QueryExecutor, SqlValue, decode_row};
use validator::Validate;

use crate::error::{ApiError, required};
use crate::types::*;
use crate::user_patch::UserPatch;

/// Welcome text served at the root path
pub async fn welcome() -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/plain; charset=utf-8")
        .body("Welcome to the camping spot booking API")
}

/// Looks up a user's public information by email address.
pub async fn get_user_by_email(
    db: web::Data<dyn QueryExecutor>,
    query: web::Query<UserEmailQuery>,
) -> Result<HttpResponse, ApiError> {
    let query = query.into_inner();
    query.validate()?;
    let email = required(query.email, "email")?;

    let rows = db
        .execute(
            "SELECT username, email, role FROM users WHERE email = $1",
            &[SqlValue::Text(email)],
        )
        .await?;

    let row = rows
        .into_iter()
        .next()
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;
    let user: UserSummary = decode_row(row)?;

    Ok(HttpResponse::Ok().json(user))
}

/// Handles user login by comparing the supplied password with the stored one.
/// Unknown email and wrong password produce the same 401 response.
pub async fn login(
    db: web::Data<dyn QueryExecutor>,
    request: web::Json<LoginRequest>,
) -> Result<HttpResponse, ApiError> {
    let request = request.into_inner();
    request.validate()?;
    let email = required(request.email, "email")?;
    let password = required(request.password, "password")?;

    let rows = db
        .execute(
            "SELECT id, username, email, role, password FROM users WHERE email = $1",
            &[SqlValue::Text(email)],
        )
        .await?;

    let row = rows
        .into_iter()
        .next()
        .ok_or(ApiError::InvalidCredentials)?;
    let user: UserCredentials = decode_row(row)?;

    // TODO: replace plaintext storage with a salted hash once existing rows are migrated
    if user.password != password {
        return Err(ApiError::InvalidCredentials);
    }

    Ok(HttpResponse::Ok().json(UserProfile::from(user)))
}

/// Registers a new user after checking that the email is not taken.
/// Returns a 201 Created response with the new user's id.
pub async fn register(
    db: web::Data<dyn QueryExecutor>,
    request: web::Json<RegisterRequest>,
) -> Result<HttpResponse, ApiError> {
    let request = request.into_inner();
    request.validate()?;
    let username = required(request.username, "username")?;
    let email = required(request.email, "email")?;
    let password = required(request.password, "password")?;
    let role = required(request.role, "role")?;

    let existing = db
        .execute(
            "SELECT id FROM users WHERE email = $1",
            &[SqlValue::Text(email.clone())],
        )
        .await?;

    if !existing.is_empty() {
        return Err(ApiError::EmailExists);
    }

    let rows = db
        .execute(
            r#"
            INSERT INTO users (username, email, password, role, created_at, updated_at)
            VALUES ($1, $2, $3, $4, NOW(), NOW())
            RETURNING id
            "#,
            &[
                SqlValue::Text(username),
                SqlValue::Text(email),
                SqlValue::Text(password),
                SqlValue::Text(role),
            ],
        )
        .await
        .map_err(ApiError::email_conflict)?;

    let row = rows
        .into_iter()
        .next()
        .ok_or(ApiError::Database(sqlx::Error::RowNotFound))?;
    let created: IdRow = decode_row(row)?;

    log::info!("👤 Registered user {}", created.id);

    Ok(HttpResponse::Created().json(CreatedResponse {
        message: "User registered successfully".to_string(),
        id: created.id,
    }))
}

/// Updates only the user fields present in the request body.
pub async fn update_user(
    db: web::Data<dyn QueryExecutor>,
    path: web::Path<i64>,
    request: web::Json<UpdateUserRequest>,
) -> Result<HttpResponse, ApiError> {
    let user_id = path.into_inner();

    let statement = UserPatch::from(request.into_inner())
        .into_statement(user_id)
        .ok_or_else(|| {
            ApiError::Validation(
                "At least one of username, email or role is required".to_string(),
            )
        })?;

    let rows = db
        .execute(&statement.sql, &statement.params)
        .await
        .map_err(ApiError::email_conflict)?;

    if rows.is_empty() {
        return Err(ApiError::NotFound("User not found".to_string()));
    }

    Ok(HttpResponse::Ok().json(MessageResponse {
        message: "User updated successfully".to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use actix_web::http::StatusCode;
    use actix_web::{App, test};
    use serde_json::{Value, json};

    use crate::routes::configure_routes;
    use crate::test_support::*;

    macro_rules! app {
        ($executor:expr) => {{
            let dir = tempfile::tempdir().unwrap();
            test::init_service(
                App::new()
                    .app_data(executor_data(&$executor))
                    .app_data(image_store_data(dir.path()))
                    .configure(configure_routes),
            )
            .await
        }};
    }

    #[actix_web::test]
    async fn test_welcome() {
        let executor = ScriptedExecutor::new(vec![]);
        let app = app!(executor);

        let resp = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body = test::read_body(resp).await;
        assert!(String::from_utf8_lossy(&body).contains("Welcome"));
    }

    #[actix_web::test]
    async fn test_register_then_lookup_returns_same_user() {
        let executor = ScriptedExecutor::new(vec![
            no_rows(),
            rows(vec![json!({ "id": 1 })]),
            rows(vec![json!({ "username": "alice", "email": "a@x.com", "role": "camper" })]),
        ]);
        let app = app!(executor);

        let req = test::TestRequest::post()
            .uri("/api/register")
            .set_json(json!({
                "username": "alice",
                "email": "a@x.com",
                "password": "pw",
                "role": "camper"
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);

        let req = test::TestRequest::get()
            .uri("/api/users?email=a@x.com")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(
            body,
            json!({ "username": "alice", "email": "a@x.com", "role": "camper" })
        );

        let statements = executor.statements();
        assert!(statements[1].0.contains("INSERT INTO users"));
        assert_eq!(statements[2].1, vec![database::SqlValue::Text("a@x.com".into())]);
    }

    #[actix_web::test]
    async fn test_register_with_existing_email_is_rejected_without_insert() {
        let executor = ScriptedExecutor::new(vec![rows(vec![json!({ "id": 9 })])]);
        let app = app!(executor);

        let req = test::TestRequest::post()
            .uri("/api/register")
            .set_json(json!({
                "username": "alice",
                "email": "a@x.com",
                "password": "pw",
                "role": "camper"
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(executor.sql().len(), 1);
    }

    #[actix_web::test]
    async fn test_register_missing_fields_runs_no_statement() {
        let executor = ScriptedExecutor::new(vec![]);
        let app = app!(executor);

        let req = test::TestRequest::post()
            .uri("/api/register")
            .set_json(json!({ "username": "alice", "role": "camper" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["message"], "Missing required fields: email, password");
        assert!(executor.sql().is_empty());
    }

    #[actix_web::test]
    async fn test_lookup_without_email_is_bad_request() {
        let executor = ScriptedExecutor::new(vec![]);
        let app = app!(executor);

        let resp =
            test::call_service(&app, test::TestRequest::get().uri("/api/users").to_request())
                .await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_lookup_unknown_email_is_not_found() {
        let executor = ScriptedExecutor::new(vec![no_rows()]);
        let app = app!(executor);

        let req = test::TestRequest::get()
            .uri("/api/users?email=nobody@x.com")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn test_login_success_returns_profile_without_password() {
        let executor = ScriptedExecutor::new(vec![rows(vec![json!({
            "id": 5,
            "username": "alice",
            "email": "a@x.com",
            "role": "owner",
            "password": "pw"
        })])]);
        let app = app!(executor);

        let req = test::TestRequest::post()
            .uri("/api/login")
            .set_json(json!({ "email": "a@x.com", "password": "pw" }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(
            body,
            json!({ "id": 5, "username": "alice", "email": "a@x.com", "role": "owner" })
        );
    }

    #[actix_web::test]
    async fn test_login_wrong_password_is_unauthorized() {
        let executor = ScriptedExecutor::new(vec![rows(vec![json!({
            "id": 5,
            "username": "alice",
            "email": "a@x.com",
            "role": "owner",
            "password": "pw"
        })])]);
        let app = app!(executor);

        let req = test::TestRequest::post()
            .uri("/api/login")
            .set_json(json!({ "email": "a@x.com", "password": "PW" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["message"], "Invalid email or password");
    }

    #[actix_web::test]
    async fn test_login_unknown_email_is_unauthorized() {
        let executor = ScriptedExecutor::new(vec![no_rows()]);
        let app = app!(executor);

        let req = test::TestRequest::post()
            .uri("/api/login")
            .set_json(json!({ "email": "nobody@x.com", "password": "pw" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn test_update_single_field() {
        let executor = ScriptedExecutor::new(vec![rows(vec![json!({ "id": 3 })])]);
        let app = app!(executor);

        let req = test::TestRequest::put()
            .uri("/api/users/3")
            .set_json(json!({ "role": "owner" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let sql = executor.sql();
        assert!(sql[0].contains("SET role = $1, updated_at = NOW()"));
        assert!(!sql[0].contains("username"));
    }

    #[actix_web::test]
    async fn test_update_unknown_user_is_not_found() {
        let executor = ScriptedExecutor::new(vec![no_rows()]);
        let app = app!(executor);

        let req = test::TestRequest::put()
            .uri("/api/users/404")
            .set_json(json!({ "username": "ghost" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn test_update_without_fields_is_bad_request() {
        let executor = ScriptedExecutor::new(vec![]);
        let app = app!(executor);

        let req = test::TestRequest::put()
            .uri("/api/users/3")
            .set_json(json!({}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert!(executor.sql().is_empty());
    }

    #[actix_web::test]
    async fn test_database_failure_is_internal_error() {
        let executor = ScriptedExecutor::new(vec![Err(sqlx::Error::PoolTimedOut)]);
        let app = app!(executor);

        let req = test::TestRequest::get()
            .uri("/api/users?email=a@x.com")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
