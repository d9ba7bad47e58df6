use actix_web::{
    web::{self, Json},
    HttpResponse,
};
use serde_json::Value;

use crate::{http::Error, services::consent, types::ConsentView, App};

#[tracing::instrument(skip_all, fields(phone_no = "<hidden>"))]
pub async fn get_consent(
    app: web::Data<App>,
    phone_no: web::Path<String>,
) -> Result<HttpResponse, Error> {
    let record = consent::Lookup {
        phone_no: &phone_no,
    }
    .perform(&app)
    .await?;

    Ok(HttpResponse::Ok().json(ConsentView {
        consent: record.employee.consent,
    }))
}

#[tracing::instrument(skip_all)]
pub async fn add_employee(app: web::Data<App>, body: Json<Value>) -> Result<HttpResponse, Error> {
    let view = consent::Upsert { body: &body }.perform(&app).await?;
    Ok(HttpResponse::Ok().json(view))
}

#[tracing::instrument(skip_all)]
pub async fn add_many_employees(
    app: web::Data<App>,
    body: Json<Value>,
) -> Result<HttpResponse, Error> {
    let report = consent::UpsertMany { body: &body }.perform(&app).await?;
    Ok(HttpResponse::Ok().json(report))
}
