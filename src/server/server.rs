//! HTTP server core implementation
//!
//! Assembles the actix-web application, registers the OpenAI-compatible
//! route table and runs the stale-session eviction sweep alongside the
//! server.

use crate::config::Config;
use crate::core::backend::AdapterService;
use crate::server::routes;
use crate::server::state::AppState;
use crate::utils::error::{GatewayError, Result};
use actix_cors::Cors;
use actix_web::{web, App, HttpServer as ActixHttpServer};
use std::time::Duration;
use tracing::info;
use tracing_actix_web::TracingLogger;

/// HTTP server
pub struct HttpServer {
    state: AppState,
}

impl HttpServer {
    /// Create a new HTTP server from configuration
    pub fn new(config: Config) -> Result<Self> {
        info!("Creating HTTP server");
        let adapters = AdapterService::from_config(&config)?;
        let state = AppState::new(config, adapters);
        Ok(Self { state })
    }

    /// Create the actix-web application
    fn create_app(
        state: web::Data<AppState>,
    ) -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse<impl actix_web::body::MessageBody>,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        // The original surface allowed any origin; kept.
        let cors = Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allow_any_header();

        App::new()
            .app_data(state)
            .wrap(cors)
            .wrap(TracingLogger::default())
            .route("/health", web::get().to(routes::health))
            .service(
                web::scope("/v1")
                    .route("/chat/completions", web::post().to(routes::chat_completions))
                    .route(
                        "/images/generations",
                        web::post().to(routes::images_generations),
                    )
                    .route("/audio/speech", web::post().to(routes::audio_speech))
                    .route("/audio/speech", web::get().to(routes::audio_speech_get))
                    .route(
                        "/audio/transcriptions",
                        web::post().to(routes::audio_transcriptions),
                    )
                    .route(
                        "/audio/transcriptions/ws",
                        web::get().to(routes::audio_transcriptions_ws),
                    )
                    .route("/models", web::get().to(routes::models)),
            )
    }

    /// Start the HTTP server and the session eviction sweep
    pub async fn start(self) -> Result<()> {
        let server_config = self.state.config.server.clone();
        let bind_addr = format!("{}:{}", server_config.host, server_config.port);

        info!("Starting HTTP server on {}", bind_addr);

        let state = web::Data::new(self.state);

        // Orphaned sessions (connection dropped before the finishing frame)
        // are leaked unless swept; the sweep logs counts and never fails.
        let sweep_sessions = state.sessions.clone();
        let max_age = Duration::from_secs(server_config.session_max_age_secs);
        let sweep_interval = Duration::from_secs(server_config.session_sweep_interval_secs);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(sweep_interval);
            ticker.tick().await; // the first tick fires immediately
            loop {
                ticker.tick().await;
                sweep_sessions.evict_stale(max_age);
            }
        });

        let server = ActixHttpServer::new(move || Self::create_app(state.clone()))
            .bind(&bind_addr)
            .map_err(|e| {
                GatewayError::internal(format!("Failed to bind {}: {}", bind_addr, e))
            })?
            .run();

        info!("HTTP server listening on {}", bind_addr);

        server
            .await
            .map_err(|e| GatewayError::internal(format!("Server error: {}", e)))?;

        info!("HTTP server stopped");
        Ok(())
    }
}

/// Load configuration from `config_path` and run the server to completion.
pub async fn run_server(config_path: &str) -> Result<()> {
    info!("Loading configuration file: {}", config_path);
    let config = Config::from_file(config_path).await?;

    let server = HttpServer::new(config)?;
    server.start().await
}
