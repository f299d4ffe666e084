pub mod app_state;
pub mod assets;
pub mod cache;
pub mod datasource;
pub mod errors;
pub mod handlers;
pub mod logging;
pub mod middleware;
pub mod models;
pub mod services;
pub mod techstack;
