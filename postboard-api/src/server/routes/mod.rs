use crate::server::ServerRouter;
use axum::routing::get;

mod posts;
mod users;

pub const HEALTH_MESSAGE: &str = "API está funcionando!";

pub fn routes() -> ServerRouter {
    ServerRouter::new()
        .route("/", get(|| async { HEALTH_MESSAGE }))
        .merge(posts::routes())
        .merge(users::routes())
}
