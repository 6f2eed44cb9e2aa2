use serde::{Deserialize, Serialize};

/// A named set of custom pronunciation rules (PLS document contents).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Lexicon {
    pub name: String,
    #[serde(default)]
    pub contents: String,
}

/// Selector for [`crate::SpeechCloudFacade::get_lexicon`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GetLexiconRequest {
    pub name: Option<String>,
}

impl GetLexiconRequest {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
        }
    }

    /// Request body in the service's wire shape.
    pub fn to_body(&self) -> serde_json::Value {
        match &self.name {
            Some(name) => serde_json::json!({ "Lexicon": { "Name": name } }),
            None => serde_json::json!({ "Lexicon": {} }),
        }
    }
}
