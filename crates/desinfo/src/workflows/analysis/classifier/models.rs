use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;
use tracing::warn;

/// Opaque model identifier. The service sends numbers or strings; both are
/// kept as text and echoed back unchanged in the `modelID` query parameter.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ModelId(String);

impl ModelId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ModelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ModelId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl<'de> Deserialize<'de> for ModelId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Number(i64),
            Text(String),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Number(number) => Self(number.to_string()),
            RawId::Text(text) => Self(text),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelDescriptor {
    #[serde(rename = "modelID")]
    pub id: ModelId,
    #[serde(rename = "modelName")]
    pub name: String,
    #[serde(default)]
    pub provider: String,
    #[serde(default)]
    pub valid: bool,
}

impl ModelDescriptor {
    /// Label shown in model pickers, e.g. `gpt-4o (OpenAI)`.
    pub fn display_label(&self) -> String {
        if self.provider.is_empty() {
            self.name.clone()
        } else {
            format!("{} ({})", self.name, self.provider)
        }
    }
}

/// Keeps the valid models from a listing payload, either `{"models": [...]}`
/// or a bare array. Entries that do not parse are skipped with a warning
/// rather than failing the whole listing.
pub(super) fn decode_model_listing(payload: Value) -> Option<Vec<ModelDescriptor>> {
    let items = match payload {
        Value::Array(items) => items,
        Value::Object(mut object) => match object.remove("models") {
            Some(Value::Array(items)) => items,
            _ => return None,
        },
        _ => return None,
    };

    let models = items
        .into_iter()
        .enumerate()
        .filter_map(
            |(index, item)| match serde_json::from_value::<ModelDescriptor>(item) {
                Ok(model) => Some(model),
                Err(err) => {
                    warn!(index, error = %err, "skipping malformed model entry");
                    None
                }
            },
        )
        .filter(|model| model.valid)
        .collect();

    Some(models)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn model_ids_accept_numbers_and_strings() {
        let numeric: ModelId = serde_json::from_value(json!(7)).expect("number");
        let text: ModelId = serde_json::from_value(json!("gpt-4o")).expect("string");
        assert_eq!(numeric.as_str(), "7");
        assert_eq!(text.as_str(), "gpt-4o");
    }

    #[test]
    fn listing_keeps_valid_entries_only() {
        let payload = json!({"models": [
            {"modelID": 1, "modelName": "alpha", "provider": "OpenAI", "valid": true},
            {"modelID": 2, "modelName": "beta", "provider": "Mistral", "valid": false},
            {"modelName": "broken"},
            {"modelID": "c", "modelName": "gamma", "valid": true}
        ]});
        let models = decode_model_listing(payload).expect("array payload");
        assert_eq!(models.len(), 2);
        assert_eq!(models[0].display_label(), "alpha (OpenAI)");
        assert_eq!(models[1].display_label(), "gamma");
    }

    #[test]
    fn listing_accepts_bare_arrays_and_rejects_other_shapes() {
        let bare = json!([{"modelID": 3, "modelName": "delta", "valid": true}]);
        assert_eq!(decode_model_listing(bare).expect("array").len(), 1);
        assert!(decode_model_listing(json!({"items": []})).is_none());
        assert!(decode_model_listing(json!("models")).is_none());
    }
}
