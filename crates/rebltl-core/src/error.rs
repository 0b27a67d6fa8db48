//! Error types for reading property-specification documents.

use serde_json::error::Category;

/// A structural problem in an input document.
///
/// Reading aborts on the first error; no partial document is returned.
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid document at {path}: {source}")]
    Invalid {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("missing required field `{field}` at {path}")]
    MissingField { field: &'static str, path: String },
}

impl DocumentError {
    /// The JSON path of the offending value, when the error has one.
    pub fn path(&self) -> Option<&str> {
        match self {
            DocumentError::Json(_) => None,
            DocumentError::Invalid { path, .. } | DocumentError::MissingField { path, .. } => {
                Some(path)
            }
        }
    }
}

impl From<serde_path_to_error::Error<serde_json::Error>> for DocumentError {
    fn from(err: serde_path_to_error::Error<serde_json::Error>) -> Self {
        let path = json_path(&err.path().to_string());
        let source = err.into_inner();
        match source.classify() {
            Category::Data => DocumentError::Invalid { path, source },
            Category::Io | Category::Syntax | Category::Eof => DocumentError::Json(source),
        }
    }
}

/// Render a serde path (`definitions[0].name`, `.` for the root) as `$.definitions[0].name`.
fn json_path(path: &str) -> String {
    if path == "." {
        "$".to_string()
    } else if path.starts_with('[') {
        format!("${path}")
    } else {
        format!("$.{path}")
    }
}
