//! Bit-addressed access to a slot's packed event-flag blob.
//!
//! Every flag ID maps to a fixed (byte, bit) address inside the blob:
//! `byte = id / 8`, `bit = id % 8`, lowest bit first. The mapping is total
//! over the ID space; only addresses inside the blob's actual length are
//! valid, and everything else is a checked error.

use std::error::Error;
use std::fmt;

/// A flag ID whose byte address falls outside the blob.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlagOutOfRange {
    pub flag_id: u64,
    pub byte_offset: usize,
    pub blob_len: usize,
}

impl fmt::Display for FlagOutOfRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "flag {} addresses byte {} but the flag blob is {} bytes",
            self.flag_id, self.byte_offset, self.blob_len
        )
    }
}

impl Error for FlagOutOfRange {}

/// One requested flag edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlagChange {
    pub flag_id: u64,
    pub value: bool,
}

/// Result of applying a batch of flag edits in one pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchOutcome {
    pub applied: usize,
    pub skipped: Vec<FlagOutOfRange>,
}

impl BatchOutcome {
    pub fn all_applied(&self) -> bool {
        self.skipped.is_empty()
    }
}

pub fn address(flag_id: u64) -> (usize, u8) {
    ((flag_id / 8) as usize, (flag_id % 8) as u8)
}

pub fn get_flag(blob: &[u8], flag_id: u64) -> Result<bool, FlagOutOfRange> {
    let (byte_offset, bit_index) = address(flag_id);
    let byte = blob.get(byte_offset).ok_or(FlagOutOfRange {
        flag_id,
        byte_offset,
        blob_len: blob.len(),
    })?;
    Ok(byte & (1 << bit_index) != 0)
}

pub fn set_flag(blob: &mut [u8], flag_id: u64, value: bool) -> Result<(), FlagOutOfRange> {
    let (byte_offset, bit_index) = address(flag_id);
    let blob_len = blob.len();
    let byte = blob.get_mut(byte_offset).ok_or(FlagOutOfRange {
        flag_id,
        byte_offset,
        blob_len,
    })?;
    if value {
        *byte |= 1 << bit_index;
    } else {
        *byte &= !(1 << bit_index);
    }
    Ok(())
}

/// Apply a batch of edits in a single pass. An out-of-range ID is recorded
/// and skipped; the remaining edits still apply.
pub fn apply(blob: &mut [u8], changes: &[FlagChange]) -> BatchOutcome {
    let mut outcome = BatchOutcome::default();
    for change in changes {
        match set_flag(blob, change.flag_id, change.value) {
            Ok(()) => outcome.applied += 1,
            Err(e) => outcome.skipped.push(e),
        }
    }
    outcome
}
