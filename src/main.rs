mod api;
mod config;
mod database;
mod middleware;
mod models;
mod services;
mod state;
mod utils;
mod views;

#[cfg(test)]
mod test_support;

use actix_web::{middleware::Compress, middleware::Logger, web, App, HttpServer};
use dotenv::dotenv;
use std::io;
use std::sync::Arc;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::config::Config;
use crate::database::{InMemoryUserStore, MongoDB, MongoUserStore, UnconfiguredUserStore, UserStore};
use crate::services::identity_service::CognitoIdentityProvider;
use crate::services::session_service::SessionCodec;
use crate::state::AppState;

const MEMORY_STORE_URL: &str = "memory://";

async fn build_user_store(config: &Config) -> io::Result<Arc<dyn UserStore>> {
    let url = match config.database_url.as_deref() {
        Some(url) => url,
        None => {
            log::warn!("⚠️  DATABASE_URL not set, user records are disabled");
            return Ok(Arc::new(UnconfiguredUserStore));
        }
    };

    if url == MEMORY_STORE_URL {
        log::info!("🧠 Using in-memory user store");
        return Ok(Arc::new(InMemoryUserStore::new()));
    }

    let db = MongoDB::new(url)
        .await
        .map_err(|e| io::Error::new(io::ErrorKind::Other, format!("Failed to connect to MongoDB: {}", e)))?;
    log::info!("✅ MongoDB connected successfully");

    let store = MongoUserStore::open(&db, &config.users_collection)
        .await
        .map_err(|e| io::Error::new(io::ErrorKind::Other, format!("Failed to prepare user store: {}", e)))?;
    Ok(Arc::new(store))
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv().ok();

    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            log::error!("❌ {}", e);
            return Err(io::Error::new(io::ErrorKind::InvalidInput, e.to_string()));
        }
    };

    log::info!("🚀 Starting Task Manager Pro...");
    log::info!("🔒 Secure cookies: {}", config.production);

    let sessions = SessionCodec::new(&config.session_secret, config.production)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e.to_string()))?;

    if !config.cognito.is_configured() {
        log::warn!(
            "⚠️  Identity provider not configured (missing: {:?}); auth forms will report errors",
            config.cognito.missing_variables()
        );
    }
    let identity = CognitoIdentityProvider::new(config.cognito.clone());
    let users = build_user_store(&config).await?;

    let state = AppState::new(Arc::new(sessions), Arc::new(identity), users);
    let state_data = web::Data::new(state.clone());

    let bind = (config.host.clone(), config.port);
    log::info!("🌐 Server starting on {}:{}", bind.0, bind.1);
    log::info!("📚 Swagger UI available at: http://{}:{}/swagger-ui/", bind.0, bind.1);
    log::info!("📄 OpenAPI spec at: http://{}:{}/api-docs/openapi.json", bind.0, bind.1);

    HttpServer::new(move || {
        let openapi = api::swagger::ApiDoc::openapi();

        App::new()
            .app_data(state_data.clone())
            .wrap(middleware::RouteGuard::new(state.sessions.clone()))
            .wrap(middleware::SecurityHeaders)
            .wrap(Compress::default())
            .wrap(Logger::default())
            .service(SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", openapi))
            .configure(api::configure)
    })
    .bind(bind)?
    .run()
    .await
}
