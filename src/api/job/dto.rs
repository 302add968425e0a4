use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::db::models::{decode_value, JobRow};

/// Form payload for job creation
///
/// `data` arrives as a JSON string inside the form (the client
/// serializes the field values before posting). Optional fields let the
/// service distinguish absent keys from empty values.
#[derive(Debug, Deserialize)]
pub struct CreateJobForm {
    #[serde(rename = "type")]
    pub job_type: Option<String>,
    pub data: Option<String>,
    pub paused: Option<String>,
}

impl CreateJobForm {
    /// The pause flag is a plain form value; "1" and "true" set it.
    pub fn paused(&self) -> bool {
        matches!(self.paused.as_deref(), Some("1") | Some("true"))
    }
}

#[derive(Debug, Deserialize)]
pub struct ListJobsQuery {
    pub status: Option<String>,
}

/// A job as returned by the API
///
/// `status` stays a plain string: the administrative update path may
/// have written a value outside the lifecycle enum, and reads must not
/// reject such rows.
#[derive(Debug, Serialize)]
pub struct JobRecord {
    pub id: i32,
    #[serde(rename = "type")]
    pub type_id: i32,
    pub data: Value,
    pub state: Value,
    pub status: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<JobRow> for JobRecord {
    fn from(row: JobRow) -> Self {
        JobRecord {
            id: row.id,
            type_id: row.type_id,
            data: decode_value(&row.data),
            state: decode_value(&row.state),
            status: row.status,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_key_maps_to_the_reserved_word_field() {
        let form: CreateJobForm =
            serde_json::from_str(r#"{"type": "3", "data": "{}"}"#).unwrap();
        assert_eq!(form.job_type.as_deref(), Some("3"));
        assert_eq!(form.data.as_deref(), Some("{}"));
        assert!(!form.paused());
    }

    #[test]
    fn paused_flag_accepts_truthy_form_values() {
        for (raw, expected) in [("1", true), ("true", true), ("0", false), ("yes", false)] {
            let form = CreateJobForm {
                job_type: None,
                data: None,
                paused: Some(raw.to_string()),
            };
            assert_eq!(form.paused(), expected, "paused={}", raw);
        }
    }
}
