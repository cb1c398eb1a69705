//! Generation settings.

use bon::Builder;
use serde::{Deserialize, Serialize};

/// Optional sampling settings forwarded with every request of a session.
#[derive(Debug, Clone, Builder, Serialize, Deserialize, Default, PartialEq)]
pub struct GenerationSettings {
    pub max_tokens: Option<u32>,
    pub temperature: Option<f64>,
    pub top_p: Option<f64>,
    pub seed: Option<u64>,
    pub user: Option<String>,
}
