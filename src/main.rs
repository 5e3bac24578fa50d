use actix_web::{App, HttpServer, middleware, web};
use std::sync::Arc;

use ielts_evaluate::api::{AppState, build_cors, configure_routes};
use ielts_evaluate::banner;
use ielts_evaluate::config::AppConfig;
use ielts_evaluate::criteria::BandDescriptors;
use ielts_evaluate::providers::build_provider;
use ielts_evaluate::runner::Evaluator;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    banner::print_banner();

    if let Err(e) = dotenvy::dotenv() {
        eprintln!("⚠️  Could not load .env file: {}", e);
    }

    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = AppConfig::load().map_err(|e| {
        log::error!("❌ {}", e);
        std::io::Error::other(e.to_string())
    })?;

    let descriptors = BandDescriptors::load_or_embedded(config.criteria_path.as_deref())
        .map_err(|e| std::io::Error::other(e.to_string()))?;
    let provider = build_provider(&config.llm).map_err(|e| std::io::Error::other(e.to_string()))?;

    let state = AppState::new(Evaluator::new(provider, Arc::new(descriptors)));
    let server = config.server.clone();

    log::info!("🚀 Server running at http://{}:{}", server.host, server.port);

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(state.clone()))
            .wrap(build_cors(&server))
            .wrap(middleware::Logger::default())
            .configure(configure_routes)
    })
    .bind((config.server.host.as_str(), config.server.port))?
    .run()
    .await
}
