#![allow(clippy::unwrap_used)]

use async_trait::async_trait;
use error_stack::Report;
use std::time::Duration;

use crate::config;
use crate::store::{self, Backend, MemoryStore, Store};
use crate::types::{ConsentRecord, Employee};
use crate::App;

/// Builds an actix test service around the given [`App`] with the same
/// routes and fallbacks the server uses.
macro_rules! init_service {
    ($app:expr) => {
        actix_web::test::init_service(
            actix_web::App::new()
                .configure($crate::http::configure($app))
                .default_service(actix_web::web::to($crate::http::util::not_found)),
        )
        .await
    };
}
pub(crate) use init_service;

pub fn build_app_with(backend: impl Backend + 'static) -> App {
    crate::telemetry::init_for_tests();
    App::with_store(
        config::Server::default(),
        Store::new(backend, Duration::from_millis(500)),
    )
}

pub fn build_test_app() -> App {
    build_app_with(MemoryStore::default())
}

pub fn build_failing_app() -> App {
    build_app_with(FailingBackend)
}

pub fn employee(phone_no: &str, consent: &str) -> Employee {
    Employee {
        name: "A".into(),
        nickname: "a".into(),
        facility: "F".into(),
        emp_num: "E1".into(),
        phone_no: phone_no.into(),
        consent: consent.into(),
    }
}

pub async fn insert_record(app: &App, phone_no: &str, consent: &str) -> ConsentRecord {
    let record = ConsentRecord::new(employee(phone_no, consent));
    assert!(app.store.insert(&record).await.unwrap());
    record
}

/// Backend whose every call fails.
#[derive(Debug)]
pub struct FailingBackend;

#[async_trait]
impl Backend for FailingBackend {
    async fn get(&self, _phone_no: &str) -> store::Result<Option<ConsentRecord>> {
        Err(Report::new(store::Error::UnhealthyPool))
    }

    async fn insert(&self, _record: &ConsentRecord) -> store::Result<bool> {
        Err(Report::new(store::Error::UnhealthyPool))
    }

    async fn put(&self, _record: &ConsentRecord) -> store::Result<()> {
        Err(Report::new(store::Error::UnhealthyPool))
    }

    async fn update(&self, _employee: &Employee) -> store::Result<bool> {
        Err(Report::new(store::Error::UnhealthyPool))
    }
}

/// Backend that never replies.
#[derive(Debug)]
pub struct StalledBackend;

#[async_trait]
impl Backend for StalledBackend {
    async fn get(&self, _phone_no: &str) -> store::Result<Option<ConsentRecord>> {
        std::future::pending().await
    }

    async fn insert(&self, _record: &ConsentRecord) -> store::Result<bool> {
        std::future::pending().await
    }

    async fn put(&self, _record: &ConsentRecord) -> store::Result<()> {
        std::future::pending().await
    }

    async fn update(&self, _employee: &Employee) -> store::Result<bool> {
        std::future::pending().await
    }
}

/// Backend where every key looks taken on insert but is gone by the
/// time it is updated.
#[derive(Debug)]
pub struct VanishingBackend;

#[async_trait]
impl Backend for VanishingBackend {
    async fn get(&self, _phone_no: &str) -> store::Result<Option<ConsentRecord>> {
        Ok(None)
    }

    async fn insert(&self, _record: &ConsentRecord) -> store::Result<bool> {
        Ok(false)
    }

    async fn put(&self, _record: &ConsentRecord) -> store::Result<()> {
        Ok(())
    }

    async fn update(&self, _employee: &Employee) -> store::Result<bool> {
        Ok(false)
    }
}
