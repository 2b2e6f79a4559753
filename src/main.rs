use actix_cors::Cors;
use actix_web::{web, App, HttpServer, middleware};
use plan_match::config::{LoggingSettings, Settings};
use plan_match::core::Matcher;
use plan_match::models::WeightVector;
use plan_match::routes::{self, AppState};
use plan_match::services::{Catalog, Explainer, Recommender, TemplateExplainer, TextGenExplainer};
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

fn init_tracing(logging: &LoggingSettings) {
    let log_level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| logging.level.clone());
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| logging.format.clone());

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true);

    if log_format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.json().init();
    }
}

fn build_explainer(settings: &Settings) -> Arc<dyn Explainer> {
    let Some(config) = settings.explainer.text_gen_config() else {
        info!("Text generation disabled, using template explanations");
        return Arc::new(TemplateExplainer);
    };

    let endpoint = config.endpoint.clone();
    match TextGenExplainer::new(config) {
        Ok(explainer) => {
            info!("Text generation enabled via {}", endpoint);
            Arc::new(explainer)
        }
        Err(e) => {
            warn!("Failed to build text generation client ({}), using template explanations", e);
            Arc::new(TemplateExplainer)
        }
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    let settings = match std::env::var("PLANMATCH_CONFIG") {
        Ok(path) => Settings::load_from(path),
        Err(_) => Settings::load(),
    };
    let logging = settings
        .as_ref()
        .map(|s| s.logging.clone())
        .unwrap_or_default();
    init_tracing(&logging);

    info!("Starting plan matching service...");

    let settings = settings.map_err(|e| {
        error!("Failed to load configuration: {}", e);
        std::io::Error::new(std::io::ErrorKind::InvalidInput, format!("Configuration error: {}", e))
    })?;

    info!("Configuration loaded successfully");

    let catalog = match &settings.catalog.path {
        Some(path) => Catalog::from_json_file(path).map_err(|e| {
            error!("Failed to load catalog from {}: {}", path, e);
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })?,
        None => {
            info!("No catalog file configured, using built-in catalog");
            Catalog::seed()
        }
    };

    info!("Catalog ready with {} plans", catalog.len());

    let weights = WeightVector::from(&settings.scoring.weights);
    let matcher = Matcher::new(weights).with_max_results(settings.matching.max_results);

    info!("Matcher initialized with weights: {:?}", weights);

    let app_state = AppState {
        recommender: Recommender::new(catalog, matcher, build_explainer(&settings)),
    };

    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(routes::configure_routes)
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}
