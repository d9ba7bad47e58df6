use actix_web::web;

pub mod consent;

/// Registers the consent routes under `/{resource}`.
pub fn configure(cfg: &mut web::ServiceConfig, resource: &str) {
    cfg.service(
        web::scope(&format!("/{resource}"))
            .route("/get_consent/{phone_no}", web::get().to(consent::get_consent))
            .route("/add/employee", web::post().to(consent::add_employee))
            .route(
                "/add_many/employee",
                web::post().to(consent::add_many_employees),
            ),
    );
}
