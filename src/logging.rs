use env_logger::Env;

pub use actix_web::middleware::Logger;

pub fn setup_logger() {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
}
