use actix_web::http::header;
use actix_web::{get, web, HttpResponse, Responder};
use serde_json::json;

use crate::app_state::AppState;
use crate::services::CatalogService;
use crate::techstack::{calculate_tech_categories, calculate_tech_stack_summary};

/// Attached to every success response.
pub const CACHE_CONTROL_VALUE: &str = "public, max-age=3600";

fn missing_id() -> HttpResponse {
    HttpResponse::BadRequest().json(json!({
        "message": "Website id is required",
        "code": "MISSING_ID",
    }))
}

#[get("/api/health")]
pub async fn heartbeat(data: web::Data<AppState>) -> impl Responder {
    match data.data_source.load_websites().await {
        Ok(websites) => {
            HttpResponse::Ok().body(format!("OK - serving {} websites", websites.len()))
        }
        Err(e) => {
            log::error!("Data source unavailable: {e}");
            HttpResponse::InternalServerError().body("Data source unavailable")
        }
    }
}

#[get("/api/websites")]
pub async fn list_websites(data: web::Data<AppState>) -> impl Responder {
    match CatalogService::load(&data.data_source).await {
        Ok(service) => HttpResponse::Ok()
            .insert_header((header::CACHE_CONTROL, CACHE_CONTROL_VALUE))
            .json(service.all_websites()),
        Err(e) => {
            log::error!("Failed to fetch websites: {e}");
            HttpResponse::InternalServerError().json(json!({
                "message": "Failed to fetch websites",
                "code": "FETCH_WEBSITES_ERROR",
                "details": e.to_string(),
            }))
        }
    }
}

#[get("/api/websites/{id}")]
pub async fn get_website(path: web::Path<String>, data: web::Data<AppState>) -> impl Responder {
    let id = path.into_inner();
    if id.trim().is_empty() {
        return missing_id();
    }

    match CatalogService::load(&data.data_source).await {
        Ok(service) => match service.website_by_id(&id) {
            Some(website) => HttpResponse::Ok()
                .insert_header((header::CACHE_CONTROL, CACHE_CONTROL_VALUE))
                .json(website),
            None => HttpResponse::NotFound().json(json!({
                "message": format!("Website '{id}' not found"),
                "code": "WEBSITE_NOT_FOUND",
            })),
        },
        Err(e) => {
            log::error!("Failed to fetch website '{id}': {e}");
            HttpResponse::InternalServerError().json(json!({
                "message": "Failed to fetch website",
                "code": "FETCH_WEBSITE_ERROR",
                "details": e.to_string(),
            }))
        }
    }
}

#[get("/api/websites/{id}/favicon")]
pub async fn get_website_favicon(
    path: web::Path<String>,
    data: web::Data<AppState>,
) -> impl Responder {
    let id = path.into_inner();
    if id.trim().is_empty() {
        return missing_id();
    }

    match CatalogService::load(&data.data_source).await {
        Ok(service) => match service.website_favicon(&id) {
            Some(bytes) => HttpResponse::Ok()
                .content_type("image/x-icon")
                .insert_header((header::CACHE_CONTROL, CACHE_CONTROL_VALUE))
                .body(bytes),
            None => HttpResponse::NotFound().json(json!({
                "message": format!("No favicon registered for website '{id}'"),
                "code": "FAVICON_NOT_FOUND",
            })),
        },
        Err(e) => {
            log::error!("Failed to fetch favicon for '{id}': {e}");
            HttpResponse::InternalServerError().json(json!({
                "message": "Failed to fetch favicon",
                "code": "FETCH_FAVICON_ERROR",
                "details": e.to_string(),
            }))
        }
    }
}

#[get("/api/websites/{id}/logo")]
pub async fn get_website_logo(
    path: web::Path<String>,
    data: web::Data<AppState>,
) -> impl Responder {
    let id = path.into_inner();
    if id.trim().is_empty() {
        return missing_id();
    }

    match CatalogService::load(&data.data_source).await {
        Ok(service) => match service.website_logo(&id) {
            Some(bytes) => HttpResponse::Ok()
                .content_type("image/svg+xml")
                .insert_header((header::CACHE_CONTROL, CACHE_CONTROL_VALUE))
                .body(bytes),
            None => HttpResponse::NotFound().json(json!({
                "message": format!("No logo registered for website '{id}'"),
                "code": "LOGO_NOT_FOUND",
            })),
        },
        Err(e) => {
            log::error!("Failed to fetch logo for '{id}': {e}");
            HttpResponse::InternalServerError().json(json!({
                "message": "Failed to fetch logo",
                "code": "FETCH_LOGO_ERROR",
                "details": e.to_string(),
            }))
        }
    }
}

#[get("/api/tech-stack")]
pub async fn tech_stack_summary(data: web::Data<AppState>) -> impl Responder {
    match CatalogService::load(&data.data_source).await {
        Ok(service) => {
            let summary = calculate_tech_stack_summary(service.all_websites());
            HttpResponse::Ok()
                .insert_header((header::CACHE_CONTROL, CACHE_CONTROL_VALUE))
                .json(summary)
        }
        Err(e) => {
            log::error!("Failed to build tech stack summary: {e}");
            HttpResponse::InternalServerError().json(json!({
                "error": "TechStackSummaryError",
                "message": "Failed to build tech stack summary",
                "details": e.to_string(),
            }))
        }
    }
}

#[get("/api/tech-stack/categories")]
pub async fn tech_categories(data: web::Data<AppState>) -> impl Responder {
    match CatalogService::load(&data.data_source).await {
        Ok(service) => {
            let categories = calculate_tech_categories(service.all_websites());
            HttpResponse::Ok()
                .insert_header((header::CACHE_CONTROL, CACHE_CONTROL_VALUE))
                .json(categories)
        }
        Err(e) => {
            log::error!("Failed to build tech categories: {e}");
            HttpResponse::InternalServerError().json(json!({
                "error": "TechCategoriesError",
                "message": "Failed to build tech categories",
                "details": e.to_string(),
            }))
        }
    }
}
