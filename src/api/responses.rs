use serde::Serialize;

/// Success envelope for list endpoints: `{success: true, results: [...]}`
#[derive(Serialize)]
pub struct ResultsResponse<T> {
    pub success: bool,
    pub results: Vec<T>,
}

impl<T> ResultsResponse<T> {
    pub fn new(results: Vec<T>) -> Self {
        Self { success: true, results }
    }
}

/// Success envelope for single-record endpoints: `{success: true, result: {...}}`
#[derive(Serialize)]
pub struct ResultResponse<T> {
    pub success: bool,
    pub result: T,
}

impl<T> ResultResponse<T> {
    pub fn new(result: T) -> Self {
        Self { success: true, result }
    }
}

/// Success envelope for create endpoints: `{success: true, id}`
#[derive(Serialize)]
pub struct CreatedResponse {
    pub success: bool,
    pub id: i32,
}

impl CreatedResponse {
    pub fn new(id: i32) -> Self {
        Self { success: true, id }
    }
}

/// Bare success envelope for update/delete endpoints: `{success: true}`
#[derive(Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

impl SuccessResponse {
    pub fn new() -> Self {
        Self { success: true }
    }
}

impl Default for SuccessResponse {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn envelopes_serialize_to_documented_shapes() {
        let listed = serde_json::to_value(ResultsResponse::new(vec![1, 2])).unwrap();
        assert_eq!(listed, json!({"success": true, "results": [1, 2]}));

        let fetched = serde_json::to_value(ResultResponse::new("row")).unwrap();
        assert_eq!(fetched, json!({"success": true, "result": "row"}));

        let created = serde_json::to_value(CreatedResponse::new(7)).unwrap();
        assert_eq!(created, json!({"success": true, "id": 7}));

        let plain = serde_json::to_value(SuccessResponse::new()).unwrap();
        assert_eq!(plain, json!({"success": true}));
    }
}
