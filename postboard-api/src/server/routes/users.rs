use crate::server::{
    Result, ServerError, ServerRouter,
    auth::AuthenticatedUser,
    json::{Created, Json},
};
use axum::extract::State;
use axum_extra::routing::{RouterExt, TypedPath};
use postboard_common::model::{
    auth::{PasswordHash, TokenKeys},
    user::{CreateUser, Credentials, User},
};
use postboard_db::client::{DbClient, DbError};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info};

pub fn routes() -> ServerRouter {
    ServerRouter::new()
        .typed_post(register)
        .typed_post(login)
        .typed_get(dashboard)
}

#[derive(TypedPath, Deserialize)]
#[typed_path("/register", rejection(ServerError))]
struct RegisterPath();

#[derive(Clone, Eq, PartialEq, Debug, Hash, Serialize)]
struct Registration {
    message: &'static str,
    user: User,
}

async fn register(
    RegisterPath(): RegisterPath,
    State(db): State<Arc<DbClient>>,
    Json(user): Json<CreateUser>,
) -> Result<Created<Registration>> {
    debug!(email = %user.email, role = ?user.role, "Registering user");

    if db.fetch_user_credentials(&user.email).is_some() {
        return Err(DbError::EmailTaken(user.email).into());
    }

    let password_hash = PasswordHash::generate(&user.password)?;
    let user = db.create_user(&user, password_hash)?;
    info!(id = %user.id, "Registered user");

    Ok(Created(Registration {
        message: "Usuário registrado com sucesso",
        user,
    }))
}

#[derive(TypedPath, Deserialize)]
#[typed_path("/login", rejection(ServerError))]
struct LoginPath();

#[derive(Clone, Eq, PartialEq, Debug, Hash, Serialize)]
struct LoginResponse {
    token: String,
    expires_at: i64,
}

async fn login(
    LoginPath(): LoginPath,
    State(db): State<Arc<DbClient>>,
    State(token_keys): State<Arc<TokenKeys>>,
    Json(credentials): Json<Credentials>,
) -> Result<Json<LoginResponse>> {
    let stored = db
        .fetch_user_credentials(&credentials.email)
        .ok_or_else(|| ServerError::UserByEmailNotFound(credentials.email.clone()))?;

    if !stored.password_hash.verify(&credentials.password)? {
        return Err(ServerError::WrongPassword);
    }

    let token = token_keys
        .issue(stored.user.id, stored.user.role)
        .map_err(ServerError::TokenIssue)?;
    info!(id = %stored.user.id, "User logged in");

    Ok(Json(LoginResponse {
        token: token.token,
        expires_at: token.expires_at.unix_timestamp(),
    }))
}

#[derive(TypedPath, Deserialize)]
#[typed_path("/dashboard", rejection(ServerError))]
struct DashboardPath();

async fn dashboard(
    DashboardPath(): DashboardPath,
    State(db): State<Arc<DbClient>>,
    user: AuthenticatedUser,
) -> Result<String> {
    let user = db
        .fetch_user(user.user_id())
        .ok_or(ServerError::TokenUserNotFound(user.user_id()))?;

    Ok(format!("Bem-vindo ao Dashboard, {}!", user.email))
}
