use sqlx::{Pool, Postgres};
use std::collections::HashMap;
use tracing::info;

use crate::api::error::{codes, ApiError};
use crate::db::type_repository::TypeRepository;
use crate::db::update::UpdateError;
use crate::schema;

use super::dto::JobTypeRecord;

/// Validate creation input and parse the field schema
///
/// Check order is part of the API contract: name undefined, name empty,
/// fields undefined, fields empty. The first failing check wins.
fn check_create_input(
    name: Option<String>,
    raw_fields: Option<String>,
) -> Result<(String, Vec<String>), ApiError> {
    let name = name.ok_or_else(|| ApiError::validation(codes::TYPE_NAME_MISSING, "name missing"))?;
    if name.is_empty() {
        return Err(ApiError::validation(codes::TYPE_NAME_EMPTY, "name empty"));
    }
    let raw_fields = raw_fields
        .ok_or_else(|| ApiError::validation(codes::TYPE_FIELDS_MISSING, "fields missing"))?;
    if raw_fields.is_empty() {
        return Err(ApiError::validation(codes::TYPE_FIELDS_EMPTY, "fields empty"));
    }
    let fields = schema::parse_fields(&raw_fields)
        .map_err(|e| ApiError::validation(codes::TYPE_FIELDS_EMPTY, e.to_string()))?;
    Ok((name, fields))
}

/// Service owning job type records and their field schemas
pub struct JobTypeService {
    pool: Pool<Postgres>,
}

impl JobTypeService {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        name: Option<String>,
        raw_fields: Option<String>,
    ) -> Result<i32, ApiError> {
        let (name, fields) = check_create_input(name, raw_fields)?;

        let id = TypeRepository::create(&self.pool, &name, &schema::encode_fields(&fields))
            .await
            .map_err(|e| ApiError::db(codes::TYPE_CREATE_DB, e))?;

        info!("Created job type id={} name={} ({} fields)", id, name, fields.len());
        Ok(id)
    }

    pub async fn list(&self) -> Result<Vec<JobTypeRecord>, ApiError> {
        let rows = TypeRepository::list(&self.pool)
            .await
            .map_err(|e| ApiError::db(codes::LIST_DB, e))?;
        Ok(rows.into_iter().map(JobTypeRecord::from).collect())
    }

    pub async fn get(&self, id: i32) -> Result<JobTypeRecord, ApiError> {
        let row = TypeRepository::find(&self.pool, id)
            .await
            .map_err(|e| ApiError::db(codes::TYPE_GET_DB, e))?
            .ok_or_else(|| {
                ApiError::not_found(codes::TYPE_NOT_FOUND, format!("job type {} not found", id))
            })?;
        Ok(JobTypeRecord::from(row))
    }

    /// Apply a partial update. There is no existence pre-check; a
    /// missing row makes the write a no-op that still reports success.
    pub async fn update(
        &self,
        id: i32,
        partial: HashMap<String, String>,
    ) -> Result<(), ApiError> {
        TypeRepository::update(&self.pool, id, partial)
            .await
            .map_err(|e| match e {
                UpdateError::InvalidKey(key) => ApiError::validation(
                    codes::TYPE_UPDATE_DB,
                    format!("invalid column name: {}", key),
                ),
                UpdateError::InvalidFields(_) => {
                    ApiError::validation(codes::TYPE_UPDATE_DB, "fields empty")
                }
                UpdateError::Db(e) => ApiError::db(codes::TYPE_UPDATE_DB, e),
            })?;

        info!("Updated job type id={}", id);
        Ok(())
    }

    /// Unconditional delete; succeeds whether or not the id exists and
    /// never cascades to jobs referencing the type.
    pub async fn delete(&self, id: i32) -> Result<(), ApiError> {
        TypeRepository::delete(&self.pool, id)
            .await
            .map_err(|e| ApiError::db(codes::TYPE_DELETE_DB, e))?;

        info!("Deleted job type id={}", id);
        Ok(())
    }
}
