use actix_web::web;

use crate::App;

pub mod controllers;
pub mod error;
pub mod util;

pub use error::{Error, StoreResultExt};

/// Registers the application state, the JSON body settings and every
/// consent route of the service.
pub fn configure(app: App) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg| {
        let resource = app.config.resource.clone();
        let json = web::JsonConfig::default()
            .limit(app.config.body_limit)
            .error_handler(util::json_error_handler);

        cfg.app_data(web::Data::new(app)).app_data(json);
        controllers::configure(cfg, &resource);
    }
}
