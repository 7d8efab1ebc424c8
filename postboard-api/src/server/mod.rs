use axum::{
    Router,
    extract::{
        FromRef, Request,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::{Method, StatusCode, Uri},
    response::{IntoResponse, Response},
};
use axum_extra::typed_header::TypedHeaderRejection;
use json::Json;
use postboard_common::model::{
    Id,
    auth::{PasswordHashError, TokenError, TokenKeys},
    post::{EmptySearchError, PostMarker},
    user::{Email, UserMarker},
};
use postboard_db::client::{DbClient, DbError};
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;
use tower_http::cors::{Any, CorsLayer};
use tracing::error;

mod auth;
mod json;
mod query;
mod routes;

pub type ServerRouter = Router<ServerState>;

#[derive(Clone, Debug, FromRef)]
pub struct ServerState {
    pub db_client: Arc<DbClient>,
    pub token_keys: Arc<TokenKeys>,
    pub post_access: PostAccess,
}

/// Who may list posts.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Default, Hash)]
pub struct PostAccess {
    pub listing_requires_auth: bool,
}

pub fn routes() -> ServerRouter {
    routes::routes()
        .fallback(fallback)
        .method_not_allowed_fallback(method_not_allowed)
        .layer(cors())
}

/// Browsers may call the API from any origin.
fn cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
}

pub async fn fallback(request: Request) -> ServerError {
    ServerError::UnknownRoute(request.into_parts().0.uri)
}

pub async fn method_not_allowed(method: Method, uri: Uri) -> ServerError {
    ServerError::MethodNotAllowed(method, uri)
}

pub type Result<T, E = ServerError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Rota desconhecida: {0}")]
    UnknownRoute(Uri),
    #[error("Método {0} não permitido em {1}")]
    MethodNotAllowed(Method, Uri),
    #[error("Caminho rejeitado: {0}")]
    PathRejection(#[from] PathRejection),
    #[error("JSON recebido rejeitado: {0}")]
    JsonRejection(#[from] JsonRejection),
    #[error("Parâmetros de busca rejeitados: {0}")]
    QueryRejection(#[from] QueryRejection),
    #[error("Não foi possível serializar a resposta JSON: {0}")]
    JsonResponse(#[from] serde_json::Error),
    #[error("Token não fornecido ou mal formatado: {0}")]
    InvalidAuthorizationHeader(TypedHeaderRejection),
    #[error(transparent)]
    InvalidToken(#[from] TokenError),
    #[error("Usuário {0} do token não encontrado")]
    TokenUserNotFound(Id<UserMarker>),
    #[error("Autenticação necessária")]
    AuthenticationRequired,
    #[error("Senha incorreta")]
    WrongPassword,
    #[error("Erro ao emitir token: {0}")]
    TokenIssue(TokenError),
    #[error(transparent)]
    PasswordHash(#[from] PasswordHashError),
    #[error(transparent)]
    Database(#[from] DbError),
    #[error("Post {0} não encontrado")]
    PostByIdNotFound(Id<PostMarker>),
    #[error(transparent)]
    NoSearchTerms(#[from] EmptySearchError),
    #[error("Nenhum post encontrado com os critérios fornecidos")]
    NoPostsMatched,
    #[error("Usuário com e-mail {0} não encontrado")]
    UserByEmailNotFound(Email),
}

impl ServerError {
    pub fn status(&self) -> StatusCode {
        match self {
            ServerError::UnknownRoute(_)
            | ServerError::PathRejection(_)
            | ServerError::PostByIdNotFound(_)
            | ServerError::NoPostsMatched
            | ServerError::UserByEmailNotFound(_) => StatusCode::NOT_FOUND,
            ServerError::InvalidAuthorizationHeader(_)
            | ServerError::InvalidToken(_)
            | ServerError::TokenUserNotFound(_)
            | ServerError::AuthenticationRequired
            | ServerError::WrongPassword => StatusCode::UNAUTHORIZED,
            ServerError::JsonRejection(_)
            | ServerError::QueryRejection(_)
            | ServerError::NoSearchTerms(_)
            | ServerError::Database(DbError::EmailTaken(_)) => StatusCode::BAD_REQUEST,
            ServerError::MethodNotAllowed(..) => StatusCode::METHOD_NOT_ALLOWED,
            ServerError::JsonResponse(_)
            | ServerError::TokenIssue(_)
            | ServerError::PasswordHash(_)
            | ServerError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize)]
struct ErrorResponse {
    error: String,
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();

        error!(error = %self, %status, "Replying with error");

        let error = if status.is_server_error() {
            "Erro interno do servidor".to_owned()
        } else {
            self.to_string()
        };
        (status, Json(ErrorResponse { error })).into_response()
    }
}
