use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde_json::{json, Value};
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{error, warn};

/// Numeric error codes, kept stable for API compatibility.
///
/// Codes are reported as strings in the error envelope. Validation codes
/// follow the documented check order: undefined before empty, name before
/// fields, type before data.
pub mod codes {
    pub const TYPE_NAME_MISSING: &str = "10001";
    pub const TYPE_NAME_EMPTY: &str = "10002";
    pub const TYPE_FIELDS_MISSING: &str = "10003";
    pub const TYPE_FIELDS_EMPTY: &str = "10004";
    pub const TYPE_CREATE_DB: &str = "10005";
    pub const LIST_DB: &str = "10006";
    pub const TYPE_DELETE_DB: &str = "10007";
    pub const TYPE_GET_DB: &str = "10008";
    pub const TYPE_NOT_FOUND: &str = "10009";
    pub const JOB_TYPE_LOOKUP_DB: &str = "10010";
    pub const JOB_TYPE_NOT_FOUND: &str = "10011";
    pub const JOB_MISSING_FIELD: &str = "10012";
    pub const JOB_CREATE_DB: &str = "10013";
    pub const JOB_GET_DB: &str = "10014";
    pub const JOB_NOT_FOUND: &str = "10015";
    pub const TYPE_DELETE_BAD_ID: &str = "10016";
    pub const UNAUTHENTICATED: &str = "10017";
    pub const JOB_DELETE_DB: &str = "10018";
    pub const JOB_TYPE_PARAM_MISSING: &str = "10019";
    pub const JOB_TYPE_PARAM_EMPTY: &str = "10020";
    pub const JOB_DATA_MISSING: &str = "10021";
    pub const JOB_DATA_EMPTY: &str = "10022";
    pub const JOB_DATA_MALFORMED: &str = "10023";
    pub const JOB_UPDATE_DB: &str = "10026";
    pub const WRITE_CAPABILITY_REQUIRED: &str = "10028";
    pub const TYPE_UPDATE_DB: &str = "10029";
}

/// Whether error responses carry the `details`/`debug` diagnostic keys
static VERBOSE_ERRORS: AtomicBool = AtomicBool::new(false);

pub fn set_verbose_errors(enabled: bool) {
    VERBOSE_ERRORS.store(enabled, Ordering::Relaxed);
}

fn verbose_errors() -> bool {
    VERBOSE_ERRORS.load(Ordering::Relaxed)
}

/// API-level errors
///
/// Every failure surfaces to the caller as the uniform envelope
/// `{status: false, error, errorCode}` plus `details`/`debug` when
/// verbose diagnostics are enabled. Each kind maps to its own HTTP
/// status; the numeric codes carry the fine-grained taxonomy.
#[derive(Debug)]
pub enum ApiError {
    /// Missing or empty required input; no underlying cause
    Validation { code: &'static str, message: String },

    /// A referenced id does not exist
    NotFound { code: &'static str, message: String },

    /// No authenticated session on a mutating call
    Unauthenticated,

    /// Authenticated but lacking the write capability
    Forbidden,

    /// Underlying storage call failed; cause attached as `details`
    Persistence { code: &'static str, source: sqlx::Error },
}

impl ApiError {
    pub fn validation(code: &'static str, message: impl Into<String>) -> Self {
        ApiError::Validation { code, message: message.into() }
    }

    pub fn not_found(code: &'static str, message: impl Into<String>) -> Self {
        ApiError::NotFound { code, message: message.into() }
    }

    pub fn db(code: &'static str, source: sqlx::Error) -> Self {
        ApiError::Persistence { code, source }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ApiError::Validation { code, .. } => code,
            ApiError::NotFound { code, .. } => code,
            ApiError::Unauthenticated => codes::UNAUTHENTICATED,
            ApiError::Forbidden => codes::WRITE_CAPABILITY_REQUIRED,
            ApiError::Persistence { code, .. } => code,
        }
    }

    fn message(&self) -> String {
        match self {
            ApiError::Validation { message, .. } => message.clone(),
            ApiError::NotFound { message, .. } => message.clone(),
            ApiError::Unauthenticated => "authentication required".to_string(),
            ApiError::Forbidden => "write capability required".to_string(),
            ApiError::Persistence { .. } => "database error".to_string(),
        }
    }

    /// Build the uniform error envelope
    pub fn envelope(&self, verbose: bool) -> Value {
        let mut body = json!({
            "status": false,
            "error": self.message(),
            "errorCode": self.code(),
        });
        if verbose {
            let details = match self {
                ApiError::Persistence { source, .. } => json!(source.to_string()),
                _ => Value::Null,
            };
            body["details"] = details;
            body["debug"] = json!(1);
        }
        body
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Validation { code, message } => {
                write!(f, "validation error [{}]: {}", code, message)
            }
            ApiError::NotFound { code, message } => {
                write!(f, "not found [{}]: {}", code, message)
            }
            ApiError::Unauthenticated => write!(f, "authentication required"),
            ApiError::Forbidden => write!(f, "write capability required"),
            ApiError::Persistence { code, source } => {
                write!(f, "database error [{}]: {}", code, source)
            }
        }
    }
}

impl std::error::Error for ApiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ApiError::Persistence { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation { .. } => StatusCode::BAD_REQUEST,
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::Unauthenticated => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden => StatusCode::FORBIDDEN,
            ApiError::Persistence { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            ApiError::Persistence { code, source } => {
                error!("Database error [{}]: {}", code, source);
            }
            other => {
                warn!("{}", other);
            }
        }
        HttpResponse::build(self.status_code()).json(self.envelope(verbose_errors()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terse_envelope_has_no_diagnostic_keys() {
        let err = ApiError::validation(codes::TYPE_NAME_EMPTY, "name empty");
        let body = err.envelope(false);
        assert_eq!(body["status"], json!(false));
        assert_eq!(body["error"], json!("name empty"));
        assert_eq!(body["errorCode"], json!("10002"));
        assert!(body.get("details").is_none());
        assert!(body.get("debug").is_none());
    }

    #[test]
    fn verbose_envelope_attaches_cause_for_persistence() {
        let err = ApiError::db(codes::JOB_CREATE_DB, sqlx::Error::RowNotFound);
        let body = err.envelope(true);
        assert_eq!(body["errorCode"], json!("10013"));
        assert_eq!(body["debug"], json!(1));
        assert!(body["details"].as_str().is_some());
    }

    #[test]
    fn verbose_envelope_has_null_details_for_validation() {
        let err = ApiError::validation(codes::JOB_DATA_EMPTY, "data empty");
        let body = err.envelope(true);
        assert_eq!(body["details"], Value::Null);
        assert_eq!(body["debug"], json!(1));
    }

    #[test]
    fn kinds_map_to_distinct_status_codes() {
        let v = ApiError::validation(codes::TYPE_NAME_MISSING, "name missing");
        let n = ApiError::not_found(codes::TYPE_NOT_FOUND, "job type 1 not found");
        let p = ApiError::db(codes::LIST_DB, sqlx::Error::PoolClosed);
        assert_eq!(v.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(n.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(ApiError::Unauthenticated.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::Forbidden.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(p.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
