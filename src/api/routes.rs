// src/api/routes.rs
use actix_cors::Cors;
use actix_web::{HttpResponse, error, web};

use super::handlers;
use crate::config::ServerConfig;
use crate::models::{ApiError, EvaluateResponse};

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    let json_config = web::JsonConfig::default().error_handler(|err, _req| {
        let body = EvaluateResponse::Failed {
            evaluation: ApiError {
                error: err.to_string(),
            },
        };
        error::InternalError::from_response(err, HttpResponse::BadRequest().json(body)).into()
    });

    cfg.app_data(json_config)
        .route("/health", web::get().to(handlers::health_check))
        .route("/evaluate", web::post().to(handlers::evaluate));
}

/// Restricts cross-origin calls to the configured origins. An empty list or
/// a `*` entry allows any origin.
pub fn build_cors(server: &ServerConfig) -> Cors {
    if allows_any_origin(server) {
        return Cors::permissive();
    }

    server
        .cors_origins
        .iter()
        .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
        .allow_any_method()
        .allow_any_header()
        .supports_credentials()
}

fn allows_any_origin(server: &ServerConfig) -> bool {
    server.cors_origins.is_empty() || server.cors_origins.iter().any(|o| o == "*")
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{App, http::header, test};

    async fn allowed_origin_header(server: &ServerConfig, origin: &str) -> Option<String> {
        let app = test::init_service(
            App::new()
                .wrap(build_cors(server))
                .configure(configure_routes),
        )
        .await;
        let req = test::TestRequest::get()
            .uri("/health")
            .insert_header((header::ORIGIN, origin))
            .to_request();
        let resp = test::call_service(&app, req).await;
        resp.headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    }

    #[actix_rt::test]
    async fn wildcard_origin_allows_any_origin() {
        let mut server = ServerConfig::default();
        server.cors_origins = vec!["*".to_string()];
        assert!(allows_any_origin(&server));

        let allowed = allowed_origin_header(&server, "https://anywhere.example").await;
        assert_eq!(allowed.as_deref(), Some("https://anywhere.example"));
    }

    #[actix_rt::test]
    async fn listed_origins_are_echoed() {
        let server = ServerConfig::default();
        assert!(!allows_any_origin(&server));

        let allowed = allowed_origin_header(&server, "http://localhost:3000").await;
        assert_eq!(allowed.as_deref(), Some("http://localhost:3000"));
    }
}
