//! Request Types
//!
//! Options for individual REST calls.

use serde_json::Value;

/// Per-call options merged into the outgoing REST request.
#[derive(Clone, Debug, Default)]
pub struct RequestOptions {
    /// JSON request body.
    pub body: Option<Value>,
    /// Query parameters appended to the resolved URL.
    pub query: Vec<(String, String)>,
}

impl RequestOptions {
    /// Set the JSON body.
    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Append a query parameter.
    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_options_builders() {
        let options = RequestOptions::default()
            .with_body(json!({"name": "Jane"}))
            .with_query("fields", "id,name")
            .with_query("count", "10");

        assert!(options.body.is_some());
        assert_eq!(options.query.len(), 2);
        assert_eq!(options.query[0].0, "fields");
    }
}
