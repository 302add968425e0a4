use sqlx::{Pool, Postgres};
use std::collections::HashMap;
use tracing::debug;

use crate::db::models::JobTypeRow;
use crate::db::update::{self, SchemaColumn, UpdateError};

const COLUMNS: &str = "id, name, fields, created_at, updated_at";

/// Repository for job type rows
pub struct TypeRepository;

impl TypeRepository {
    /// Insert a job type and return its assigned id.
    /// `fields_json` is the schema already encoded as a JSON array.
    pub async fn create(
        pool: &Pool<Postgres>,
        name: &str,
        fields_json: &str,
    ) -> Result<i32, sqlx::Error> {
        debug!("Creating job type: name={}", name);

        let id: i32 =
            sqlx::query_scalar("INSERT INTO job_types (name, fields) VALUES ($1, $2) RETURNING id")
                .bind(name)
                .bind(fields_json)
                .fetch_one(pool)
                .await?;

        debug!("Job type created with id={}", id);
        Ok(id)
    }

    pub async fn find(pool: &Pool<Postgres>, id: i32) -> Result<Option<JobTypeRow>, sqlx::Error> {
        sqlx::query_as(&format!("SELECT {} FROM job_types WHERE id = $1", COLUMNS))
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn list(pool: &Pool<Postgres>) -> Result<Vec<JobTypeRow>, sqlx::Error> {
        sqlx::query_as(&format!("SELECT {} FROM job_types ORDER BY id", COLUMNS))
            .fetch_all(pool)
            .await
    }

    /// Apply a partial update; `fields`, when present and non-empty, is
    /// re-parsed into its stored JSON-array form.
    pub async fn update(
        pool: &Pool<Postgres>,
        id: i32,
        partial: HashMap<String, String>,
    ) -> Result<(), UpdateError> {
        update::apply_partial(pool, "job_types", id, partial, SchemaColumn::Fields).await
    }

    /// Delete is unconditional: a missing id still reports success and
    /// referencing jobs are left orphaned.
    pub async fn delete(pool: &Pool<Postgres>, id: i32) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM job_types WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(())
    }
}
