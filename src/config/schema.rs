use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::query::CacheSettings;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Config {
    /// parse cache eviction thresholds
    #[serde(default)]
    pub cache: CacheSettings,
    /// extra aliases registered after the built-in ones, alias -> query key
    #[serde(default)]
    pub aliases: BTreeMap<String, String>,
    /// seed for RANDOM queries; unseeded when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub random_seed: Option<u64>,
}
