// Route exports
pub mod errors;
pub mod recommendations;

use actix_web::web;

pub use recommendations::AppState;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .app_data(errors::json_config())
            .app_data(errors::query_config())
            .configure(recommendations::configure),
    );
}
