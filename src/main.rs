use actix_web::{web, HttpServer};
use askhr::{config, http, telemetry, App};
use error_stack::{Result, ResultExt};
use std::process;
use thiserror::Error;
use tracing_actix_web::TracingLogger;

#[derive(Debug, Error)]
#[error("Failed to start askhr server")]
struct StartServerError;

fn main() {
    if let Err(error) = run() {
        eprintln!("{error:?}");
        process::exit(1);
    }
}

fn run() -> Result<(), StartServerError> {
    let config = config::Server::load().change_context(StartServerError)?;
    telemetry::init(&config.logging).change_context(StartServerError)?;

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .worker_threads(config.workers.get())
        .build()
        .change_context(StartServerError)
        .attach_printable("could not build tokio runtime")?
        .block_on(serve(config))
}

async fn serve(config: config::Server) -> Result<(), StartServerError> {
    let address = (config.ip, config.port);
    let workers = config.workers.get();

    let app = App::new(config).await.change_context(StartServerError)?;
    tracing::info!(?address, workers, "Starting askhr server");

    HttpServer::new(move || {
        actix_web::App::new()
            .wrap(TracingLogger::<http::util::QuieterRootSpanBuilder>::new())
            .configure(http::configure(app.clone()))
            .default_service(web::to(http::util::not_found))
    })
    .workers(workers)
    .bind(address)
    .change_context(StartServerError)
    .attach_printable_lazy(|| format!("could not bind to {}:{}", address.0, address.1))?
    .run()
    .await
    .change_context(StartServerError)
}
