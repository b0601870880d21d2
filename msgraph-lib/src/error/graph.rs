//! Graph error envelope

use std::collections::HashMap;

use serde_json::Value;

/// Detailed error information from a Graph or identity platform error body.
///
/// Graph answers with `{"error": {"code", "message", "innerError"}}`; the token
/// endpoint answers with `{"error": "<code>", "error_description": "<message>"}`.
/// Both shapes are decoded into this type.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphErrorDetail {
    /// The error code (e.g., "Request_ResourceNotFound").
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Nested inner error, if any.
    pub inner_error: Option<Box<GraphErrorDetail>>,
    /// Remaining fields (request-id, date, ...).
    pub additional_info: HashMap<String, Value>,
}

impl GraphErrorDetail {
    /// Creates a new error detail with the given code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            inner_error: None,
            additional_info: HashMap::new(),
        }
    }

    /// Decodes an error body. Returns `None` when it has no `error` member.
    pub fn from_json(body: &Value) -> Option<Self> {
        match body.get("error")? {
            Value::Object(object) => Some(Self::from_object(object)),
            Value::String(code) => {
                let message = body
                    .get("error_description")
                    .and_then(Value::as_str)
                    .unwrap_or_default();
                Some(Self::new(code.clone(), message))
            }
            _ => None,
        }
    }

    fn from_object(object: &serde_json::Map<String, Value>) -> Self {
        let mut detail = Self::new(
            object.get("code").and_then(Value::as_str).unwrap_or_default(),
            object.get("message").and_then(Value::as_str).unwrap_or_default(),
        );

        for (key, value) in object {
            match (key.as_str(), value) {
                ("code" | "message", _) => {}
                ("innerError" | "innererror", Value::Object(inner)) => {
                    detail.inner_error = Some(Box::new(Self::from_object(inner)));
                }
                _ => {
                    detail.additional_info.insert(key.clone(), value.clone());
                }
            }
        }

        detail
    }

    /// Returns the innermost error in the chain.
    pub fn innermost(&self) -> &GraphErrorDetail {
        let mut current = self;
        while let Some(inner) = &current.inner_error {
            current = inner;
        }
        current
    }

    /// Checks if this error or any inner error has the given code.
    pub fn has_code(&self, code: &str) -> bool {
        if self.code == code {
            return true;
        }
        if let Some(inner) = &self.inner_error {
            return inner.has_code(code);
        }
        false
    }
}

impl std::fmt::Display for GraphErrorDetail {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}
