use actix_web::{web, App, HttpServer};
use dotenv::dotenv;
use std::env;
use std::sync::Arc;
use std::time::Duration;

use catalog_api::app_state::AppState;
use catalog_api::cache::{TtlCache, DEFAULT_TTL};
use catalog_api::datasource::DataSource;
use catalog_api::handlers::{
    get_website, get_website_favicon, get_website_logo, heartbeat, list_websites, tech_categories,
    tech_stack_summary,
};
use catalog_api::logging;
use catalog_api::middleware::{Cors, CorsConfig, SecurityConfig, SecurityHeaders};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    logging::setup_logger();

    let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port = env::var("PORT").unwrap_or_else(|_| "8080".to_string());
    let bind_address = format!("{host}:{port}");

    let data_dir = env::var("DATA_DIR").unwrap_or_else(|_| "data".to_string());
    let ttl = env::var("CACHE_TTL_SECS")
        .ok()
        .and_then(|v| v.parse().ok())
        .map(Duration::from_secs)
        .unwrap_or(DEFAULT_TTL);

    // Process-wide cache, shared across workers for the process lifetime
    let cache = Arc::new(TtlCache::new(ttl));
    let data_source = DataSource::new(&data_dir, cache);

    let cors_config = CorsConfig::from_env();
    let security_config = SecurityConfig::default();

    log::info!("Serving catalog data from {data_dir} (cache TTL {ttl:?})");
    log::info!("Starting server at http://{bind_address}");

    HttpServer::new(move || {
        App::new()
            // wrap() order is reversed at runtime: Logger outermost, then
            // Security, then CORS, so preflight short-circuits skip the
            // handlers but still pick up the security headers
            .wrap(Cors::new(cors_config.clone()))
            .wrap(SecurityHeaders::new(security_config.clone()))
            .wrap(logging::Logger::default())
            .app_data(web::Data::new(AppState {
                data_source: data_source.clone(),
            }))
            // HEALTH
            .service(heartbeat)
            // WEBSITE CATALOG
            .service(list_websites)
            .service(get_website)
            .service(get_website_favicon)
            .service(get_website_logo)
            // AGGREGATION
            .service(tech_stack_summary)
            .service(tech_categories)
    })
    .bind(&bind_address)?
    .run()
    .await
}
