use chrono::NaiveDateTime;
use serde::Serialize;
use serde_json::Value;
use sqlx::FromRow;

/// Database representation of a job type
///
/// `fields` holds the schema serialized as a JSON array of strings;
/// decoding back to a field list happens through [`decode_fields`]
/// before rows leave the storage layer.
#[derive(Debug, FromRow, Serialize)]
pub struct JobTypeRow {
    pub id: i32,
    pub name: String,
    pub fields: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Database representation of a job
///
/// `data` and `state` are serialized JSON text columns; [`decode_value`]
/// is the boundary that turns them back into structured values.
#[derive(Debug, FromRow, Serialize)]
pub struct JobRow {
    pub id: i32,
    #[sqlx(rename = "type")]
    pub type_id: i32,
    pub data: String,
    pub state: String,
    pub status: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Decode a stored `fields` column back into the ordered field list
///
/// Unparseable text yields an empty schema rather than an error; the
/// column is only ever written through the encode path, so this covers
/// hand-edited rows.
pub fn decode_fields(text: &str) -> Vec<String> {
    serde_json::from_str(text).unwrap_or_default()
}

/// Decode a stored `data`/`state` column into a structured value
///
/// Text starting with an object-opening brace is parsed as JSON; any
/// other text (legacy rows written before the columns were serialized
/// mappings) is surfaced as a JSON string value. Callers therefore
/// always receive a structured value, never raw column text.
pub fn decode_value(text: &str) -> Value {
    if text.starts_with('{') {
        serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_owned()))
    } else {
        Value::String(text.to_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn fields_decode_preserves_order() {
        assert_eq!(
            decode_fields(r#"["to","subject","body"]"#),
            vec!["to".to_string(), "subject".to_string(), "body".to_string()]
        );
    }

    #[test]
    fn corrupt_fields_decode_to_empty_schema() {
        assert!(decode_fields("not json").is_empty());
    }

    #[test]
    fn object_text_decodes_to_a_mapping() {
        let value = decode_value(r#"{"to":"a@b","subject":"hi"}"#);
        assert_eq!(value, json!({"to": "a@b", "subject": "hi"}));
    }

    #[test]
    fn legacy_text_surfaces_as_a_string_value() {
        assert_eq!(decode_value("plain note"), json!("plain note"));
        assert_eq!(decode_value("[1,2]"), json!("[1,2]"));
    }

    #[test]
    fn broken_object_text_falls_back_to_string() {
        assert_eq!(decode_value("{oops"), json!("{oops"));
    }
}
