use serde_json::{Map, Value};
use std::fmt;

/// Errors produced by the schema model
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    /// The raw field list contained no usable field names
    EmptyFields,

    /// A required field was absent from the submitted data.
    /// Carries the name of the first missing field, in schema order.
    MissingField(String),
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchemaError::EmptyFields => write!(f, "fields empty"),
            SchemaError::MissingField(name) => write!(f, "missing field: {}", name),
        }
    }
}

impl std::error::Error for SchemaError {}

/// Parse a comma-separated field list into an ordered field-name sequence
///
/// Order is preserved as submitted. Empty tokens (from leading, trailing
/// or doubled commas) are skipped; whitespace inside tokens is kept, the
/// client is expected to strip it before submitting.
///
/// # Returns
/// - `Ok(Vec<String>)` - at least one usable field name
/// - `Err(SchemaError::EmptyFields)` - no usable field names in the input
pub fn parse_fields(raw: &str) -> Result<Vec<String>, SchemaError> {
    let fields: Vec<String> = raw
        .split(',')
        .filter(|token| !token.is_empty())
        .map(str::to_owned)
        .collect();

    if fields.is_empty() {
        return Err(SchemaError::EmptyFields);
    }

    Ok(fields)
}

/// Serialize a parsed field list into its stored column form (a JSON array)
pub fn encode_fields(fields: &[String]) -> String {
    Value::Array(fields.iter().cloned().map(Value::String).collect()).to_string()
}

/// Check a submitted data mapping against a job type's field schema
///
/// The check is ordered and fail-fast: fields are visited in schema order
/// and the first one without a key in `data` aborts the walk. Membership
/// only, positions and values are never inspected; extra keys in `data`
/// are allowed.
pub fn validate_data(fields: &[String], data: &Map<String, Value>) -> Result<(), SchemaError> {
    for name in fields {
        if !data.contains_key(name) {
            return Err(SchemaError::MissingField(name.clone()));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fields(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    fn data(keys: &[&str]) -> Map<String, Value> {
        keys.iter().map(|k| (k.to_string(), json!("x"))).collect()
    }

    #[test]
    fn parse_preserves_order_and_count() {
        let parsed = parse_fields("to,subject,body").unwrap();
        assert_eq!(parsed, fields(&["to", "subject", "body"]));
    }

    #[test]
    fn parse_single_field() {
        assert_eq!(parse_fields("payload").unwrap(), fields(&["payload"]));
    }

    #[test]
    fn parse_skips_empty_tokens() {
        assert_eq!(parse_fields("a,,b,").unwrap(), fields(&["a", "b"]));
    }

    #[test]
    fn parse_rejects_empty_input() {
        assert_eq!(parse_fields(""), Err(SchemaError::EmptyFields));
        assert_eq!(parse_fields(",,"), Err(SchemaError::EmptyFields));
    }

    #[test]
    fn parse_keeps_internal_whitespace() {
        assert_eq!(parse_fields("first name,age").unwrap(), fields(&["first name", "age"]));
    }

    #[test]
    fn encode_round_trips_through_json() {
        let encoded = encode_fields(&fields(&["to", "subject"]));
        let decoded: Vec<String> = serde_json::from_str(&encoded).unwrap();
        assert_eq!(decoded, fields(&["to", "subject"]));
    }

    #[test]
    fn validate_accepts_complete_data() {
        let schema = fields(&["to", "subject", "body"]);
        assert!(validate_data(&schema, &data(&["to", "subject", "body"])).is_ok());
    }

    #[test]
    fn validate_allows_extra_keys() {
        let schema = fields(&["to"]);
        assert!(validate_data(&schema, &data(&["to", "cc", "bcc"])).is_ok());
    }

    #[test]
    fn validate_reports_first_missing_field_in_schema_order() {
        let schema = fields(&["to", "subject", "body"]);
        let err = validate_data(&schema, &data(&["body"])).unwrap_err();
        assert_eq!(err, SchemaError::MissingField("to".to_string()));
    }

    #[test]
    fn validate_reports_later_missing_field() {
        let schema = fields(&["to", "subject", "body"]);
        let err = validate_data(&schema, &data(&["to", "subject"])).unwrap_err();
        assert_eq!(err, SchemaError::MissingField("body".to_string()));
    }

    #[test]
    fn validate_accepts_empty_schema() {
        assert!(validate_data(&[], &data(&[])).is_ok());
    }
}
