mod auth;
mod errors;
mod handlers;
mod http;
mod setup;
mod user;

#[cfg(feature = "mysql")]
mod impls {
    pub type UserRepo = crate::user::mysql_repository::MySqlUserRepository;
}

#[cfg(not(feature = "mysql"))]
mod impls {
    pub type UserRepo = crate::user::memory_repository::InMemoryUserRepository;
}

use crate::{
    auth::handlers::AuthHandlers,
    http::AppData,
    impls::*,
    setup::{env_param, JsonPanicHandler},
    user::handlers::UserHandlers,
};
use axum::{routing, Router, Server};
use jsonwebtoken::{Algorithm, EncodingKey};
use std::{error::Error, net::SocketAddr};
use tower_http::{catch_panic::CatchPanicLayer, normalize_path::NormalizePathLayer};
use tracing_subscriber::EnvFilter;

#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

pub type BoxedError = Box<dyn Error + Send + Sync>;

pub const ENCODING_FAILED_BODY: &[u8] =
    br#"{"message":"Failed to encode the response body","error_code":50000}"#;

async fn body() -> Result<(), BoxedError> {
    #[cfg(feature = "dotenv")]
    dotenvy::dotenv().map_err(|_| crate::setup::VarError::DotenvFileNotFound)?;

    #[cfg(feature = "json-log")]
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()?;

    #[cfg(not(feature = "json-log"))]
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .try_init()?;

    let port = env_param("APP_PORT").unwrap_or(8080_u16);

    let mut app = Router::new();

    app = app
        .route("/user", routing::get(handlers::get_users::<UserRepo>))
        .route("/user", routing::post(handlers::post_user::<UserRepo>))
        .route(
            "/user/:user_id",
            routing::get(handlers::get_user_id::<UserRepo>),
        )
        .route(
            "/user/:user_id",
            routing::put(handlers::put_user_id::<UserRepo>),
        )
        .route(
            "/user/:user_id",
            routing::delete(handlers::delete_user_id::<UserRepo>),
        )
        .route(
            "/auth/login",
            routing::post(handlers::post_auth_login::<UserRepo>),
        );

    #[cfg(feature = "mysql")]
    let user_repo = {
        use crate::user::mysql_repository::MySqlUserRepository;
        use sqlx::mysql::MySqlPoolOptions;

        let url = env_param::<String>("DATABASE_URL")?;
        let pool_size = env_param("DATABASE_POOL_SIZE").unwrap_or(10_u32);

        let pool = MySqlPoolOptions::new()
            .max_connections(pool_size)
            .connect(&url)
            .await?;

        tracing::info!(pool_size, "Connected to the database");

        MySqlUserRepository::new(pool)
    };

    #[cfg(not(feature = "mysql"))]
    let user_repo = crate::user::memory_repository::InMemoryUserRepository::new();

    let jwt_duration = env_param("APP_JWT_DURATION").unwrap_or(3600_usize);
    let jwt_key = env_param::<String>("APP_JWT_KEY")?;
    let bcrypt_cost = env_param("APP_BCRYPT_COST").unwrap_or(bcrypt::DEFAULT_COST);

    let user_handlers = UserHandlers::new(user_repo.clone(), bcrypt_cost);
    let auth_handlers = AuthHandlers::new(
        user_repo,
        Algorithm::HS512,
        EncodingKey::from_base64_secret(&jwt_key)?,
        jwt_duration,
    );

    app = app
        .layer(AppData::extension(user_handlers))
        .layer(AppData::extension(auth_handlers))
        .layer(NormalizePathLayer::trim_trailing_slash())
        .layer(CatchPanicLayer::custom(JsonPanicHandler));

    #[cfg(feature = "http-trace")]
    {
        app = app.layer(tower_http::trace::TraceLayer::new_for_http());
    }
    #[cfg(feature = "http-cors")]
    {
        use crate::setup::setup_app_cors;
        app = setup_app_cors(app);
    }

    let server = Server::try_bind(&SocketAddr::from(([0, 0, 0, 0], port)))?;
    tracing::info!(port, "Server listenning");

    server
        .serve(app.into_make_service_with_connect_info::<SocketAddr>())
        .await?;
    Ok(())
}

fn main() -> Result<(), BoxedError> {
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .expect("Failed building the Runtime")
        .block_on(body())
}
