pub mod error;
pub mod guard;
pub mod health;
pub mod job;
pub mod job_type;
pub mod responses;

use error::ApiError;

/// Parse a path id segment, deferring the error shape to the endpoint
/// (a bad id is a not-found on reads and a validation error on writes).
pub(crate) fn parse_id(raw: &str, err: impl FnOnce() -> ApiError) -> Result<i32, ApiError> {
    raw.parse().map_err(|_| err())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::error::codes;

    #[test]
    fn numeric_ids_parse() {
        let id = parse_id("42", || ApiError::validation(codes::JOB_DELETE_DB, "invalid job id"));
        assert_eq!(id.unwrap(), 42);
    }

    #[test]
    fn bad_ids_produce_the_endpoint_error() {
        let err = parse_id("abc", || {
            ApiError::not_found(codes::JOB_NOT_FOUND, "job abc not found")
        })
        .unwrap_err();
        assert_eq!(err.code(), codes::JOB_NOT_FOUND);
    }
}
