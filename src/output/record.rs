//! Stable output records

use crate::infer::Module;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// One module as it appears in exported results
///
/// Field names are part of the output contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModuleRecord {
    pub module: String,
    #[serde(rename = "Description")]
    pub description: String,
    #[serde(rename = "Submodules")]
    pub submodules: IndexMap<String, String>,
    pub confidence: f64,
}

/// Clamps to `[0, 1]` and rounds to three decimals
pub fn round_confidence(confidence: f64) -> f64 {
    (confidence.clamp(0.0, 1.0) * 1000.0).round() / 1000.0
}

impl From<&Module> for ModuleRecord {
    fn from(module: &Module) -> Self {
        Self {
            module: module.name.clone(),
            description: module.description.clone(),
            submodules: module.submodules.clone(),
            confidence: round_confidence(module.confidence),
        }
    }
}

/// Projects inferred modules into output records, preserving order
pub fn to_output_list(modules: &[Module]) -> Vec<ModuleRecord> {
    modules.iter().map(ModuleRecord::from).collect()
}
