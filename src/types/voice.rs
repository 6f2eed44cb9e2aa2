use serde::{Deserialize, Serialize};

/// Voice gender as reported by the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    Female,
    Male,
}

/// A synthesis voice.
///
/// Only the name is required when submitting speech; listings also carry the
/// language and gender.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Voice {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<Gender>,
}

impl Voice {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            language: None,
            gender: None,
        }
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    pub fn with_gender(mut self, gender: Gender) -> Self {
        self.gender = Some(gender);
        self
    }
}

/// Voice attributes used to narrow a listing. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct VoiceFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<Gender>,
}

impl VoiceFilter {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.language.is_none() && self.gender.is_none()
    }
}

/// Selector for [`crate::SpeechCloudFacade::list_voices`].
///
/// The default value is the empty selector and lists every voice.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ListVoicesRequest {
    #[serde(rename = "Voice", skip_serializing_if = "VoiceFilter::is_empty")]
    pub voice: VoiceFilter,
}

impl ListVoicesRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.voice.name = Some(name.into());
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.voice.language = Some(language.into());
        self
    }

    pub fn with_gender(mut self, gender: Gender) -> Self {
        self.voice.gender = Some(gender);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_selector_serializes_to_empty_object() {
        let body = serde_json::to_value(ListVoicesRequest::default()).unwrap();
        assert_eq!(body, serde_json::json!({}));
    }

    #[test]
    fn filter_uses_wire_names() {
        let req = ListVoicesRequest::new()
            .with_language("en-US")
            .with_gender(Gender::Female);
        let body = serde_json::to_value(req).unwrap();
        assert_eq!(
            body,
            serde_json::json!({"Voice": {"Language": "en-US", "Gender": "Female"}})
        );
    }

    #[test]
    fn voice_deserializes_from_listing_entry() {
        let v: Voice =
            serde_json::from_str(r#"{"Name":"Salli","Language":"en-US","Gender":"Female"}"#)
                .unwrap();
        assert_eq!(
            v,
            Voice::new("Salli")
                .with_language("en-US")
                .with_gender(Gender::Female)
        );
    }
}
