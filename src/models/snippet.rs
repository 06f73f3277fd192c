use serde::{Deserialize, Serialize};

/// The pasteable payload: the same link in structured and plain form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RichSnippet {
    pub html: String,
    pub text: String,
}
