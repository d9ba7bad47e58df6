use async_trait::async_trait;
use error_stack::ResultExt;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions, PgSslMode};
use sqlx::FromRow;
use std::str::FromStr;
use std::time::Duration;

use super::{Backend, Error, ErrorExt, Result};
use crate::config;
use crate::types::{ConsentRecord, Employee, RecordId};

/// Consent store backed by a single Postgres table keyed by `phone_no`.
#[derive(Debug, Clone)]
pub struct PostgresStore {
    pool: sqlx::PgPool,
    table: String,
}

#[derive(Debug, FromRow)]
struct Row {
    id: RecordId,
    name: String,
    nickname: String,
    facility: String,
    emp_num: String,
    phone_no: String,
    consent: String,
}

impl From<Row> for ConsentRecord {
    fn from(row: Row) -> Self {
        Self {
            id: row.id,
            employee: Employee {
                name: row.name,
                nickname: row.nickname,
                facility: row.facility,
                emp_num: row.emp_num,
                phone_no: row.phone_no,
                consent: row.consent,
            },
        }
    }
}

impl PostgresStore {
    pub(crate) async fn connect(cfg: &config::Postgres, timeout: Duration) -> Result<Self> {
        let mut pool_opts = PgPoolOptions::new()
            .acquire_timeout(timeout)
            .max_connections(cfg.pool_size.get());

        if let Some(min_idle) = cfg.min_idle {
            pool_opts = pool_opts.min_connections(min_idle.get());
        }

        let mut connect_opts =
            PgConnectOptions::from_str(cfg.url.as_ref().as_str()).change_context(Error::InvalidUrl)?;

        if cfg.enforce_tls {
            connect_opts = connect_opts.ssl_mode(PgSslMode::Prefer);
        }

        let store = Self {
            pool: pool_opts.connect_lazy_with(connect_opts),
            table: cfg.table.clone(),
        };
        store.ensure_table().await?;

        Ok(store)
    }

    #[tracing::instrument(skip(self), fields(table = %self.table))]
    async fn ensure_table(&self) -> Result<()> {
        let query = format!(
            r#"CREATE TABLE IF NOT EXISTS "{}" (
                phone_no TEXT PRIMARY KEY,
                id UUID NOT NULL,
                name TEXT NOT NULL,
                nickname TEXT NOT NULL,
                facility TEXT NOT NULL,
                emp_num TEXT NOT NULL,
                consent TEXT NOT NULL
            )"#,
            self.table
        );

        sqlx::query(&query)
            .execute(&self.pool)
            .await
            .into_store_error()?;

        Ok(())
    }
}

#[async_trait]
impl Backend for PostgresStore {
    async fn get(&self, phone_no: &str) -> Result<Option<ConsentRecord>> {
        let query = format!(
            r#"SELECT id, name, nickname, facility, emp_num, phone_no, consent
               FROM "{}" WHERE phone_no = $1"#,
            self.table
        );

        let row = sqlx::query_as::<_, Row>(&query)
            .bind(phone_no)
            .fetch_optional(&self.pool)
            .await
            .into_store_error()?;

        Ok(row.map(ConsentRecord::from))
    }

    async fn insert(&self, record: &ConsentRecord) -> Result<bool> {
        let query = format!(
            r#"INSERT INTO "{}" (phone_no, id, name, nickname, facility, emp_num, consent)
               VALUES ($1, $2, $3, $4, $5, $6, $7)
               ON CONFLICT (phone_no) DO NOTHING"#,
            self.table
        );

        let result = bind_record(sqlx::query(&query), record)
            .execute(&self.pool)
            .await
            .into_store_error()?;

        Ok(result.rows_affected() == 1)
    }

    async fn put(&self, record: &ConsentRecord) -> Result<()> {
        let query = format!(
            r#"INSERT INTO "{}" (phone_no, id, name, nickname, facility, emp_num, consent)
               VALUES ($1, $2, $3, $4, $5, $6, $7)
               ON CONFLICT (phone_no) DO UPDATE SET
                 id = EXCLUDED.id,
                 name = EXCLUDED.name,
                 nickname = EXCLUDED.nickname,
                 facility = EXCLUDED.facility,
                 emp_num = EXCLUDED.emp_num,
                 consent = EXCLUDED.consent"#,
            self.table
        );

        bind_record(sqlx::query(&query), record)
            .execute(&self.pool)
            .await
            .into_store_error()?;

        Ok(())
    }

    async fn update(&self, employee: &Employee) -> Result<bool> {
        let query = format!(
            r#"UPDATE "{}"
               SET name = $2, nickname = $3, facility = $4, emp_num = $5, consent = $6
               WHERE phone_no = $1"#,
            self.table
        );

        let result = sqlx::query(&query)
            .bind(&employee.phone_no)
            .bind(&employee.name)
            .bind(&employee.nickname)
            .bind(&employee.facility)
            .bind(&employee.emp_num)
            .bind(&employee.consent)
            .execute(&self.pool)
            .await
            .into_store_error()?;

        Ok(result.rows_affected() > 0)
    }
}

type Query<'q> = sqlx::query::Query<'q, sqlx::Postgres, sqlx::postgres::PgArguments>;

fn bind_record<'q>(query: Query<'q>, record: &'q ConsentRecord) -> Query<'q> {
    query
        .bind(record.phone_no())
        .bind(record.id)
        .bind(&record.employee.name)
        .bind(&record.employee.nickname)
        .bind(&record.employee.facility)
        .bind(&record.employee.emp_num)
        .bind(&record.employee.consent)
}
