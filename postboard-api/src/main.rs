use postboard_common::{
    model::auth::{DEFAULT_TOKEN_LIFETIME, TokenKeys},
    util::{NonPositiveDurationError, PositiveDuration},
};
use postboard_db::client::{DbClient, DbError};
use serde::Deserialize;
use server::{PostAccess, ServerState};
use std::{
    net::{IpAddr, SocketAddr},
    sync::Arc,
};
use thiserror::Error;
use time::{Duration, UtcDateTime};
use tokio_util::sync::CancellationToken;
use tower_http::trace::TraceLayer;
use tracing::{debug, error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod server;

#[derive(Debug, Error)]
enum InitError {
    #[error("Error parsing .env file: {0}")]
    Dotenv(#[from] dotenvy::Error),
    #[error("Error parsing environment: {0}")]
    Envy(#[from] envy::Error),
    #[error("Invalid token lifetime: {0}")]
    TokenLifetime(#[from] NonPositiveDurationError),
    #[error("Token lifetime is too long to compute an expiry: {0}")]
    TokenLifetimeOutOfRange(Duration),
    #[error("Error seeding the post store: {0}")]
    Seed(#[from] DbError),
    #[error("Error binding tcp listener: {0}")]
    TcpBind(std::io::Error),
    #[error("Error serving server: {0}")]
    TcpServe(std::io::Error),
}

fn default_token_lifetime_seconds() -> i64 {
    DEFAULT_TOKEN_LIFETIME.whole_seconds()
}

#[derive(Clone, Eq, PartialEq, Debug, Hash, Deserialize)]
struct Env {
    server_address: IpAddr,
    server_port: u16,
    jwt_secret: String,
    #[serde(default = "default_token_lifetime_seconds")]
    token_lifetime_seconds: i64,
    #[serde(default)]
    posts_require_auth: bool,
}

fn install_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "postboard_api=debug,postboard_db=debug,\
                tower_http=debug,axum::rejection=trace"
                    .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn get_env() -> Result<Env, InitError> {
    if let Err(e) = dotenvy::dotenv() {
        if e.not_found() {
            debug!("No .dotenv file found");
        } else {
            return Err(e.into());
        }
    }

    envy::from_env().map_err(InitError::from)
}

async fn cancel_on_ctrl_c(shutdown: CancellationToken) {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!(%err, "Could not listen for Ctrl-C");
        return;
    }

    info!("Received Ctrl-C, shutting down");
    shutdown.cancel();
}

#[tokio::main]
async fn main() -> Result<(), InitError> {
    install_tracing();
    let env = get_env()?;

    let token_lifetime = PositiveDuration::try_from(Duration::seconds(env.token_lifetime_seconds))?;
    if UtcDateTime::now().checked_add(token_lifetime.get()).is_none() {
        return Err(InitError::TokenLifetimeOutOfRange(token_lifetime.get()));
    }

    let state = ServerState {
        db_client: Arc::new(DbClient::seeded()?),
        token_keys: Arc::new(TokenKeys::new(env.jwt_secret.as_bytes(), token_lifetime)),
        post_access: PostAccess {
            listing_requires_auth: env.posts_require_auth,
        },
    };

    let tracing_layer = TraceLayer::new_for_http();
    let app = server::routes().layer(tracing_layer).with_state(state);

    let server_address = SocketAddr::new(env.server_address, env.server_port);
    let listener = tokio::net::TcpListener::bind(server_address)
        .await
        .map_err(InitError::TcpBind)?;
    info!(%server_address, "Listening");

    let shutdown = CancellationToken::new();
    tokio::spawn(cancel_on_ctrl_c(shutdown.clone()));

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown.cancelled_owned())
        .await
        .map_err(InitError::TcpServe)?;

    Ok(())
}
