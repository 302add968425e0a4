use sqlx::{Pool, Postgres};
use std::collections::HashMap;
use tracing::debug;

use crate::db::models::JobRow;
use crate::db::update::{self, SchemaColumn, UpdateError};

const COLUMNS: &str = "id, type, data, state, status, created_at, updated_at";

/// Repository for job rows
pub struct JobRepository;

impl JobRepository {
    /// Insert a job and return its assigned id.
    /// `data_json`/`state_json` are already-serialized mappings.
    pub async fn create(
        pool: &Pool<Postgres>,
        type_id: i32,
        data_json: &str,
        state_json: &str,
        status: &str,
    ) -> Result<i32, sqlx::Error> {
        debug!("Creating job: type={}, status={}", type_id, status);

        let id: i32 = sqlx::query_scalar(
            "INSERT INTO jobs (type, data, state, status) VALUES ($1, $2, $3, $4) RETURNING id",
        )
        .bind(type_id)
        .bind(data_json)
        .bind(state_json)
        .bind(status)
        .fetch_one(pool)
        .await?;

        debug!("Job created with id={}", id);
        Ok(id)
    }

    pub async fn find(pool: &Pool<Postgres>, id: i32) -> Result<Option<JobRow>, sqlx::Error> {
        sqlx::query_as(&format!("SELECT {} FROM jobs WHERE id = $1", COLUMNS))
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List jobs, restricted to an exact status match when a filter is
    /// supplied.
    pub async fn list(
        pool: &Pool<Postgres>,
        status: Option<&str>,
    ) -> Result<Vec<JobRow>, sqlx::Error> {
        match status {
            Some(status) => {
                sqlx::query_as(&format!(
                    "SELECT {} FROM jobs WHERE status = $1 ORDER BY id",
                    COLUMNS
                ))
                .bind(status)
                .fetch_all(pool)
                .await
            }
            None => {
                sqlx::query_as(&format!("SELECT {} FROM jobs ORDER BY id", COLUMNS))
                    .fetch_all(pool)
                    .await
            }
        }
    }

    /// Apply a partial update verbatim. No schema column here: a
    /// `fields` key in the partial is bound like any other column and
    /// fails at the database, it is never re-serialized.
    pub async fn update(
        pool: &Pool<Postgres>,
        id: i32,
        partial: HashMap<String, String>,
    ) -> Result<(), UpdateError> {
        update::apply_partial(pool, "jobs", id, partial, SchemaColumn::None).await
    }

    /// Delete is unconditional: a missing id still reports success.
    pub async fn delete(pool: &Pool<Postgres>, id: i32) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM jobs WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(())
    }
}
