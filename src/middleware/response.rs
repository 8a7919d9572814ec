use axum::response::{IntoResponse, Json, Response};
use serde_json::{Map, Value};

use crate::error::ApiError;

/// Builder for the uniform success envelope: `{"status": "success"}` plus
/// whatever payload fields the handler adds.
#[derive(Debug)]
pub struct ApiResponse {
    body: Map<String, Value>,
}

impl ApiResponse {
    pub fn success() -> Self {
        let mut body = Map::new();
        body.insert("status".into(), Value::String("success".into()));
        Self { body }
    }

    pub fn message(text: impl Into<String>) -> Self {
        Self::success().field("message", Value::String(text.into()))
    }

    pub fn field(mut self, key: impl Into<String>, value: Value) -> Self {
        self.body.insert(key.into(), value);
        self
    }
}

impl IntoResponse for ApiResponse {
    fn into_response(self) -> Response {
        Json(Value::Object(self.body)).into_response()
    }
}

pub type ApiResult = Result<ApiResponse, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn envelope_carries_status_and_payload() {
        let response = ApiResponse::message("done").field("newsId", json!("abc"));
        let body = Value::Object(response.body);
        assert_eq!(body["status"], "success");
        assert_eq!(body["message"], "done");
        assert_eq!(body["newsId"], "abc");
    }
}
