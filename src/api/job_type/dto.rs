use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::db::models::{decode_fields, JobTypeRow};

/// Form payload for job type creation
///
/// Both fields are optional so the service can distinguish an absent
/// key from an empty value; the check order is part of the API
/// contract.
#[derive(Debug, Deserialize)]
pub struct CreateJobTypeForm {
    pub name: Option<String>,
    pub fields: Option<String>,
}

/// A job type as returned by the API, with the field schema decoded
/// from its stored form
#[derive(Debug, Serialize)]
pub struct JobTypeRecord {
    pub id: i32,
    pub name: String,
    pub fields: Vec<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<JobTypeRow> for JobTypeRecord {
    fn from(row: JobTypeRow) -> Self {
        let fields = decode_fields(&row.fields);
        JobTypeRecord {
            id: row.id,
            name: row.name,
            fields,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}
