use sqlx::{Pool, Postgres};
use std::collections::HashMap;
use std::fmt;
use tracing::debug;

use crate::schema;

/// Which column of the target table, if any, holds a serialized field
/// schema. Job types re-parse a submitted comma-separated `fields`
/// value into its stored JSON-array form; jobs carry no schema column,
/// so their partial updates are applied verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaColumn {
    None,
    Fields,
}

#[derive(Debug)]
pub enum UpdateError {
    /// Key cannot be used as a quoted SQL identifier
    InvalidKey(String),

    /// A non-empty `fields` value yielded no usable field names
    InvalidFields(String),

    Db(sqlx::Error),
}

impl fmt::Display for UpdateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UpdateError::InvalidKey(key) => write!(f, "invalid column name: {}", key),
            UpdateError::InvalidFields(raw) => write!(f, "unparsable fields value: {}", raw),
            UpdateError::Db(e) => write!(f, "update failed: {}", e),
        }
    }
}

impl std::error::Error for UpdateError {}

/// Strip the immutable `id` key and apply the schema-column transform.
///
/// Kept separate from the database write so the preparation rules are
/// testable on their own. Every other key passes through untouched; in
/// particular a `status` write on a job is bound verbatim with no
/// transition check, which is what makes the generic update an
/// administrative override.
fn prepare_partial(
    mut partial: HashMap<String, String>,
    schema_column: SchemaColumn,
) -> Result<HashMap<String, String>, UpdateError> {
    partial.remove("id");

    if schema_column == SchemaColumn::Fields {
        if let Some(raw) = partial.get("fields") {
            if !raw.is_empty() {
                let parsed = schema::parse_fields(raw)
                    .map_err(|_| UpdateError::InvalidFields(raw.clone()))?;
                partial.insert("fields".to_string(), schema::encode_fields(&parsed));
            }
        }
    }

    Ok(partial)
}

/// Apply a partial update to a single row
///
/// Shared by both repositories so the field-schema handling lives in one
/// place. Prepared keys are applied verbatim as quoted column
/// identifiers with bound values. An unknown column fails at the
/// database, there is no existence or shape pre-check. An empty partial
/// is a no-op success.
pub async fn apply_partial(
    pool: &Pool<Postgres>,
    table: &str,
    id: i32,
    partial: HashMap<String, String>,
    schema_column: SchemaColumn,
) -> Result<(), UpdateError> {
    let partial = prepare_partial(partial, schema_column)?;

    if partial.is_empty() {
        debug!("Partial update on {} id={} had no applicable keys", table, id);
        return Ok(());
    }

    // HashMap iteration order is arbitrary; sort for deterministic SQL
    let mut keys: Vec<String> = partial.keys().cloned().collect();
    keys.sort();

    for key in &keys {
        if key.contains('"') {
            return Err(UpdateError::InvalidKey(key.clone()));
        }
    }

    let sql = build_update_sql(table, &keys);
    debug!("Applying partial update: {}", sql);

    let mut query = sqlx::query(&sql);
    for key in &keys {
        query = query.bind(partial[key].clone());
    }
    query = query.bind(id);

    query.execute(pool).await.map_err(UpdateError::Db)?;
    Ok(())
}

fn build_update_sql(table: &str, keys: &[String]) -> String {
    let mut sql = format!("UPDATE {} SET ", table);
    for (i, key) in keys.iter().enumerate() {
        if i > 0 {
            sql.push_str(", ");
        }
        sql.push_str(&format!("\"{}\" = ${}", key, i + 1));
    }
    sql.push_str(&format!(", updated_at = NOW() WHERE id = ${}", keys.len() + 1));
    sql
}

#[cfg(test)]
mod tests {
    use super::*;

    fn partial(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn sql_quotes_columns_and_numbers_binds() {
        let keys = vec!["name".to_string(), "status".to_string()];
        assert_eq!(
            build_update_sql("jobs", &keys),
            r#"UPDATE jobs SET "name" = $1, "status" = $2, updated_at = NOW() WHERE id = $3"#
        );
    }

    #[test]
    fn sql_single_column() {
        let keys = vec!["fields".to_string()];
        assert_eq!(
            build_update_sql("job_types", &keys),
            r#"UPDATE job_types SET "fields" = $1, updated_at = NOW() WHERE id = $2"#
        );
    }

    #[test]
    fn prepare_strips_the_id_key() {
        let prepared =
            prepare_partial(partial(&[("id", "9"), ("name", "Email")]), SchemaColumn::None)
                .unwrap();
        assert!(!prepared.contains_key("id"));
        assert_eq!(prepared.get("name").map(String::as_str), Some("Email"));
    }

    #[test]
    fn prepare_reencodes_fields_for_schema_tables() {
        let prepared =
            prepare_partial(partial(&[("fields", "to,subject")]), SchemaColumn::Fields).unwrap();
        assert_eq!(
            prepared.get("fields").map(String::as_str),
            Some(r#"["to","subject"]"#)
        );
    }

    #[test]
    fn prepare_rejects_unparsable_fields() {
        let err =
            prepare_partial(partial(&[("fields", ",,")]), SchemaColumn::Fields).unwrap_err();
        assert!(matches!(err, UpdateError::InvalidFields(raw) if raw == ",,"));
    }

    #[test]
    fn prepare_keeps_empty_fields_value_verbatim() {
        let prepared =
            prepare_partial(partial(&[("fields", "")]), SchemaColumn::Fields).unwrap();
        assert_eq!(prepared.get("fields").map(String::as_str), Some(""));
    }

    // Pins the administrative-override policy: a status overwrite on a
    // job reaches the database unchanged, whatever the current status.
    #[test]
    fn status_overwrite_is_not_transition_checked() {
        let prepared =
            prepare_partial(partial(&[("status", "FINISHED")]), SchemaColumn::None).unwrap();
        assert_eq!(prepared.get("status").map(String::as_str), Some("FINISHED"));

        let keys = vec!["status".to_string()];
        assert_eq!(
            build_update_sql("jobs", &keys),
            r#"UPDATE jobs SET "status" = $1, updated_at = NOW() WHERE id = $2"#
        );
    }

    #[test]
    fn job_partials_never_get_the_fields_transform() {
        let prepared =
            prepare_partial(partial(&[("fields", "to,subject")]), SchemaColumn::None).unwrap();
        assert_eq!(prepared.get("fields").map(String::as_str), Some("to,subject"));
    }
}
