//! Digest maintenance for the container's protected regions: one 128-bit
//! digest per slot (over that slot's data window) plus a header digest over
//! the slot table. Recalculation is destructive and idempotent; validation
//! only reports.

use serde::{Deserialize, Serialize};

use super::types::{
    CHECKSUM_LEN, HEADER_DIGEST_OFFSET, HEADER_DIGEST_WINDOW, SLOT_COUNT, SLOT_DATA_LEN,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProtectedRegion {
    Header,
    Slot(u8),
}

impl ProtectedRegion {
    pub fn label(&self) -> String {
        match *self {
            Self::Header => "header".to_string(),
            Self::Slot(index) => format!("slot {index}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegionStatus {
    pub region: ProtectedRegion,
    pub stored: String,
    pub computed: String,
    pub matches: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ValidationReport {
    pub regions: Vec<RegionStatus>,
}

impl ValidationReport {
    pub fn all_match(&self) -> bool {
        self.regions.iter().all(|r| r.matches)
    }

    pub fn mismatches(&self) -> impl Iterator<Item = &RegionStatus> {
        self.regions.iter().filter(|r| !r.matches)
    }
}

fn slot_data_digest(raw: &[u8], slot_offset: usize) -> [u8; 16] {
    let data_start = slot_offset + CHECKSUM_LEN;
    md5::compute(&raw[data_start..data_start + SLOT_DATA_LEN]).0
}

fn header_digest(raw: &[u8]) -> [u8; 16] {
    md5::compute(&raw[HEADER_DIGEST_WINDOW]).0
}

/// Recompute every protected region's digest and write it into its header
/// field. Slot digests land first; the header digest covers only the slot
/// table, so the order is for consistency, not correctness.
pub fn recalculate(raw: &mut [u8], slot_offsets: &[usize; SLOT_COUNT]) {
    for &slot_offset in slot_offsets {
        let digest = slot_data_digest(raw, slot_offset);
        raw[slot_offset..slot_offset + CHECKSUM_LEN].copy_from_slice(&digest);
    }
    let digest = header_digest(raw);
    raw[HEADER_DIGEST_OFFSET..HEADER_DIGEST_OFFSET + CHECKSUM_LEN].copy_from_slice(&digest);
}

/// Recompute without writing and report, per region, whether the stored
/// digest matches the bytes it protects.
pub fn validate(raw: &[u8], slot_offsets: &[usize; SLOT_COUNT]) -> ValidationReport {
    let mut regions = Vec::with_capacity(SLOT_COUNT + 1);

    let stored = &raw[HEADER_DIGEST_OFFSET..HEADER_DIGEST_OFFSET + CHECKSUM_LEN];
    let computed = header_digest(raw);
    regions.push(RegionStatus {
        region: ProtectedRegion::Header,
        stored: hex::encode(stored),
        computed: hex::encode(computed),
        matches: stored == computed.as_slice(),
    });

    for (index, &slot_offset) in slot_offsets.iter().enumerate() {
        let stored = &raw[slot_offset..slot_offset + CHECKSUM_LEN];
        let computed = slot_data_digest(raw, slot_offset);
        regions.push(RegionStatus {
            region: ProtectedRegion::Slot(index as u8),
            stored: hex::encode(stored),
            computed: hex::encode(computed),
            matches: stored == computed.as_slice(),
        });
    }

    ValidationReport { regions }
}
