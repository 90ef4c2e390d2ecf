//! GraphQL multipart request encoding.
//!
//! Layout: an `operations` part holding the request with every file
//! variable set to `null`, a `map` part pointing each numbered file part at
//! its variable path, then the files as parts `0`, `1`, ...

use lago_domain::{GraphqlRequest, LagoError, Result};
use reqwest::multipart::{Form, Part};
use serde_json::{json, Map, Value};

/// A file attached to an operation variable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Upload {
    /// Top-level variable name, e.g. `file`.
    pub variable: String,
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl Upload {
    pub fn new(
        variable: impl Into<String>,
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        Self {
            variable: variable.into(),
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }
}

/// `operations` and `map` payloads for `uploads`.
pub fn operations_and_map(request: &GraphqlRequest, uploads: &[Upload]) -> Result<(Value, Value)> {
    let mut operations = serde_json::to_value(request)
        .map_err(|e| LagoError::InvalidInput(format!("cannot encode operation: {e}")))?;

    let variables = operations
        .get_mut("variables")
        .and_then(Value::as_object_mut)
        .ok_or_else(|| LagoError::InvalidInput("uploads require object variables".into()))?;

    let mut map = Map::new();
    for (index, upload) in uploads.iter().enumerate() {
        variables.insert(upload.variable.clone(), Value::Null);
        map.insert(index.to_string(), json!([format!("variables.{}", upload.variable)]));
    }

    Ok((operations, Value::Object(map)))
}

/// Build the multipart form.
pub fn encode(request: &GraphqlRequest, uploads: Vec<Upload>) -> Result<Form> {
    let (operations, map) = operations_and_map(request, &uploads)?;

    let mut form = Form::new().text("operations", operations.to_string()).text("map", map.to_string());
    for (index, upload) in uploads.into_iter().enumerate() {
        let part = Part::bytes(upload.bytes)
            .file_name(upload.file_name)
            .mime_str(&upload.content_type)
            .map_err(|e| LagoError::InvalidInput(format!("invalid content type: {e}")))?;
        form = form.part(index.to_string(), part);
    }

    Ok(form)
}
