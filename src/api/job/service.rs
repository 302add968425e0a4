use serde_json::{Map, Value};
use sqlx::{Pool, Postgres};
use std::collections::HashMap;
use tracing::info;

use crate::api::error::{codes, ApiError};
use crate::db::job_repository::JobRepository;
use crate::db::models::decode_fields;
use crate::db::type_repository::TypeRepository;
use crate::db::update::UpdateError;
use crate::schema;

use super::dto::JobRecord;
use super::models::JobStatus;

/// Presence checks for job creation, ordered: type undefined, type
/// empty, data undefined, data empty. The first failing check wins.
fn check_create_input(
    job_type: Option<String>,
    raw_data: Option<String>,
) -> Result<(String, String), ApiError> {
    let job_type = job_type
        .ok_or_else(|| ApiError::validation(codes::JOB_TYPE_PARAM_MISSING, "type missing"))?;
    if job_type.is_empty() {
        return Err(ApiError::validation(codes::JOB_TYPE_PARAM_EMPTY, "type empty"));
    }
    let raw_data =
        raw_data.ok_or_else(|| ApiError::validation(codes::JOB_DATA_MISSING, "data missing"))?;
    if raw_data.is_empty() {
        return Err(ApiError::validation(codes::JOB_DATA_EMPTY, "data empty"));
    }
    Ok((job_type, raw_data))
}

/// Decode the submitted `data` form value into a mapping. Anything that
/// is not a JSON object is rejected as malformed rather than being
/// allowed to blow up later in the pipeline.
fn decode_data(raw: &str) -> Result<Map<String, Value>, ApiError> {
    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(map)) => Ok(map),
        _ => Err(ApiError::validation(codes::JOB_DATA_MALFORMED, "data malformed")),
    }
}

/// Service owning job records; enforces schema conformance at creation
pub struct JobService {
    pool: Pool<Postgres>,
}

impl JobService {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Create a job against a job type
    ///
    /// Pipeline: presence checks, data decode, type lookup, schema
    /// validation, insert. Validation failures happen before any write;
    /// the required-field set is the type's schema as it exists right
    /// now (later schema edits never re-validate existing jobs).
    pub async fn create(
        &self,
        job_type: Option<String>,
        raw_data: Option<String>,
        paused: bool,
    ) -> Result<i32, ApiError> {
        let (job_type, raw_data) = check_create_input(job_type, raw_data)?;

        let data = decode_data(&raw_data)?;

        let type_id: i32 = job_type.parse().map_err(|_| {
            ApiError::not_found(
                codes::JOB_TYPE_NOT_FOUND,
                format!("job type {} not found", job_type),
            )
        })?;

        let type_row = TypeRepository::find(&self.pool, type_id)
            .await
            .map_err(|e| ApiError::db(codes::JOB_TYPE_LOOKUP_DB, e))?
            .ok_or_else(|| {
                ApiError::not_found(
                    codes::JOB_TYPE_NOT_FOUND,
                    format!("job type {} not found", type_id),
                )
            })?;

        let fields = decode_fields(&type_row.fields);
        schema::validate_data(&fields, &data)
            .map_err(|e| ApiError::validation(codes::JOB_MISSING_FIELD, e.to_string()))?;

        let status = if paused { JobStatus::Paused } else { JobStatus::Waiting };

        let id = JobRepository::create(
            &self.pool,
            type_id,
            &Value::Object(data).to_string(),
            "{}",
            status.as_str(),
        )
        .await
        .map_err(|e| ApiError::db(codes::JOB_CREATE_DB, e))?;

        info!("Created job id={} type={} status={}", id, type_id, status.as_str());
        Ok(id)
    }

    /// List jobs, restricted to an exact status match when the filter
    /// is present and non-empty
    pub async fn list(&self, status: Option<String>) -> Result<Vec<JobRecord>, ApiError> {
        let filter = status.filter(|s| !s.is_empty());
        let rows = JobRepository::list(&self.pool, filter.as_deref())
            .await
            .map_err(|e| ApiError::db(codes::LIST_DB, e))?;
        Ok(rows.into_iter().map(JobRecord::from).collect())
    }

    pub async fn get(&self, id: i32) -> Result<JobRecord, ApiError> {
        let row = JobRepository::find(&self.pool, id)
            .await
            .map_err(|e| ApiError::db(codes::JOB_GET_DB, e))?
            .ok_or_else(|| {
                ApiError::not_found(codes::JOB_NOT_FOUND, format!("job {} not found", id))
            })?;
        Ok(JobRecord::from(row))
    }

    /// Administrative update: the partial is applied verbatim with no
    /// status-transition check, so an operator with write capability
    /// can overwrite `status` freely. The lifecycle table in
    /// [`JobStatus`] binds the future worker, not this path.
    pub async fn update(
        &self,
        id: i32,
        partial: HashMap<String, String>,
    ) -> Result<(), ApiError> {
        JobRepository::update(&self.pool, id, partial)
            .await
            .map_err(|e| match e {
                UpdateError::InvalidKey(key) => ApiError::validation(
                    codes::JOB_UPDATE_DB,
                    format!("invalid column name: {}", key),
                ),
                // Job partials have no schema column, so this arm never
                // fires; kept total for the shared error type.
                UpdateError::InvalidFields(_) => {
                    ApiError::validation(codes::JOB_UPDATE_DB, "fields empty")
                }
                UpdateError::Db(e) => ApiError::db(codes::JOB_UPDATE_DB, e),
            })?;

        info!("Updated job id={}", id);
        Ok(())
    }

    /// Unconditional delete; succeeds whether or not the id exists.
    pub async fn delete(&self, id: i32) -> Result<(), ApiError> {
        JobRepository::delete(&self.pool, id)
            .await
            .map_err(|e| ApiError::db(codes::JOB_DELETE_DB, e))?;

        info!("Deleted job id={}", id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_type_reported_first() {
        let err = check_create_input(None, None).unwrap_err();
        assert_eq!(err.code(), codes::JOB_TYPE_PARAM_MISSING);
    }

    #[test]
    fn empty_type_reported_before_missing_data() {
        let err = check_create_input(Some(String::new()), None).unwrap_err();
        assert_eq!(err.code(), codes::JOB_TYPE_PARAM_EMPTY);
    }

    #[test]
    fn missing_data_reported_after_valid_type() {
        let err = check_create_input(Some("3".to_string()), None).unwrap_err();
        assert_eq!(err.code(), codes::JOB_DATA_MISSING);
    }

    #[test]
    fn empty_data_reported_last() {
        let err = check_create_input(Some("3".to_string()), Some(String::new())).unwrap_err();
        assert_eq!(err.code(), codes::JOB_DATA_EMPTY);
    }

    #[test]
    fn malformed_data_is_a_validation_error_not_a_crash() {
        let err = decode_data("{not json").unwrap_err();
        assert_eq!(err.code(), codes::JOB_DATA_MALFORMED);
    }

    #[test]
    fn non_object_data_is_rejected() {
        for raw in ["\"text\"", "[1,2]", "42", "null"] {
            let err = decode_data(raw).unwrap_err();
            assert_eq!(err.code(), codes::JOB_DATA_MALFORMED, "data={}", raw);
        }
    }

    #[test]
    fn object_data_decodes_with_extra_keys_preserved() {
        let map = decode_data(r#"{"to":"a@b","extra":1}"#).unwrap();
        assert!(map.contains_key("to"));
        assert!(map.contains_key("extra"));
    }
}
