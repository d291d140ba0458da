use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SlotSummary {
    pub index: usize,
    pub occupied: bool,
    pub name: String,
    pub level: u32,
}

/// One flag's current state. `value` is `None` when the ID addresses a byte
/// past the blob, so a listing can show the miss without aborting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FlagState {
    pub flag_id: u64,
    pub value: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FlagBatchOutcome {
    pub requested: usize,
    pub applied: usize,
    pub skipped: Vec<u64>,
}

impl FlagBatchOutcome {
    pub fn all_applied(&self) -> bool {
        self.skipped.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BackupEntry {
    pub timestamp: u128,
    pub description: String,
    pub operation: String,
    pub source_path: String,
    pub original_len: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FlagCatalogEntry {
    pub flag_id: u64,
    pub category: String,
    pub subcategory: Option<String>,
    pub name: String,
}
