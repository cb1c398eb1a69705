//! Catalog of known chat models.

use serde::Serialize;

/// A model shown in model pickers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ModelInfo {
    /// Human-readable name, e.g. "Mistral Medium".
    pub name: &'static str,
    /// API model identifier.
    pub id: &'static str,
    pub family: Option<&'static str>,
    /// Size or variant within the family.
    pub specifier: Option<&'static str>,
}

const fn model(
    name: &'static str,
    id: &'static str,
    family: Option<&'static str>,
    specifier: Option<&'static str>,
) -> ModelInfo {
    ModelInfo {
        name,
        id,
        family,
        specifier,
    }
}

/// Known models in picker order.
pub const MODELS: &[ModelInfo] = &[
    model("Mistral Medium", "mistral-medium-latest", Some("Mistral"), Some("Medium")),
    model("Magistral Medium", "magistral-medium-latest", Some("Magistral"), Some("Medium")),
    model("Mistral Small", "mistral-small-latest", Some("Mistral"), Some("Small")),
    model("Magistral Small", "magistral-small-latest", Some("Magistral"), Some("Small")),
    model("Mistral Large", "mistral-large-latest", Some("Mistral"), Some("Large")),
    model("Codestral", "codestral-latest", None, None),
    model("Mistral NeMo", "open-mistral-nemo", Some("Mistral"), Some("NeMo")),
    model("Mistral 7B", "open-mistral-7b", Some("Mistral"), Some("7B")),
    model("Mixtral 8x7B", "open-mixtral-8x7b", Some("Mixtral"), Some("8x7B")),
    model("Mixtral 8x22B", "open-mixtral-8x22b", Some("Mixtral"), Some("8x22B")),
    model("Ministral 8B", "ministral-8b-latest", Some("Ministral"), Some("8B")),
    model("Ministral 3B", "ministral-3b-latest", Some("Ministral"), Some("3B")),
];

/// Look up a model by its API identifier.
pub fn find(id: &str) -> Option<&'static ModelInfo> {
    MODELS.iter().find(|m| m.id == id)
}

/// Display name for `id`; unknown models show their identifier.
pub fn display_name(id: &str) -> &str {
    find(id).map_or(id, |m| m.name)
}

/// Models belonging to `family`, in catalog order.
pub fn family(family: &str) -> impl Iterator<Item = &'static ModelInfo> + '_ {
    MODELS.iter().filter(move |m| m.family == Some(family))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DEFAULT_GREETING_MODEL, DEFAULT_MODEL, DEFAULT_TITLE_MODEL};

    #[test]
    fn defaults_are_in_the_catalog() {
        for id in [DEFAULT_MODEL, DEFAULT_TITLE_MODEL, DEFAULT_GREETING_MODEL] {
            assert!(find(id).is_some(), "{id} missing");
        }
    }

    #[test]
    fn unknown_models_fall_back_to_their_id() {
        assert_eq!(display_name("open-mixtral-8x22b"), "Mixtral 8x22B");
        assert_eq!(display_name("my-finetune"), "my-finetune");
        assert!(find("my-finetune").is_none());
    }

    #[test]
    fn family_filter_keeps_order() {
        let ids: Vec<_> = family("Ministral").map(|m| m.id).collect();
        assert_eq!(ids, vec!["ministral-8b-latest", "ministral-3b-latest"]);
        assert!(MODELS.iter().all(|m| m.id != m.name));
    }
}
