pub mod checksum;
pub mod event_flags;
pub mod types;

use std::fs;
use std::io::{self, Cursor};
use std::path::Path;

use crate::layout::{ByteRange, FileLayout, RegionId, RegionLayout};
use crate::reader::LittleEndianReader;
use checksum::ValidationReport;
use event_flags::{BatchOutcome, FlagChange};
use types::{
    CHARACTER_LEVEL_OFFSET, CHARACTER_NAME_OFFSET, CHARACTER_NAME_UNITS, CHECKSUM_LEN,
    ENTRY_COUNT_OFFSET, EVENT_FLAGS_LEN, EVENT_FLAGS_OFFSET, HEADER_LEN, MAGIC, MIN_FILE_LEN,
    OCCUPANCY_MARKER, SLOT_COUNT, SLOT_DATA_LEN, SLOT_REGION_LEN, SLOT_TABLE_ENTRY_LEN,
    SLOT_TABLE_OFFSET,
};

/// The whole file image plus the slot table read from its header. The raw
/// buffer is the single source of truth: byte ranges the tool does not model
/// survive any edit verbatim, and every write is a same-length in-place
/// splice, so the buffer never grows or shrinks.
#[derive(Debug, Clone)]
pub struct SaveContainer {
    raw: Vec<u8>,
    slot_offsets: [usize; SLOT_COUNT],
    layout: FileLayout,
}

/// Borrowed view of one character slot. Reads address the container's own
/// buffer through the slot's recorded offset, never a detached copy.
#[derive(Debug, Clone, Copy)]
pub struct SlotView<'a> {
    index: usize,
    data: &'a [u8],
}

impl SaveContainer {
    pub fn from_bytes(bytes: Vec<u8>) -> io::Result<Self> {
        if bytes.len() < MIN_FILE_LEN {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!(
                    "file too short for a save container: {} bytes, need at least {}",
                    bytes.len(),
                    MIN_FILE_LEN
                ),
            ));
        }
        if &bytes[..MAGIC.len()] != MAGIC {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                "missing BND4 marker at offset 0",
            ));
        }

        let mut r = LittleEndianReader::new(Cursor::new(bytes.as_slice()));
        r.seek_to(ENTRY_COUNT_OFFSET as u64)?;
        let entry_count = r.read_u32()? as usize;
        if entry_count < SLOT_COUNT {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("header lists {entry_count} entries, expected at least {SLOT_COUNT}"),
            ));
        }

        let mut slot_offsets = [0usize; SLOT_COUNT];
        for (index, slot_offset) in slot_offsets.iter_mut().enumerate() {
            r.seek_to((SLOT_TABLE_OFFSET + index * SLOT_TABLE_ENTRY_LEN) as u64)?;
            let region_offset = r.read_u64()? as usize;
            let region_len = r.read_u64()? as usize;

            if region_len != SLOT_REGION_LEN {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidData,
                    format!(
                        "slot {index} region length is {region_len}, expected {SLOT_REGION_LEN}"
                    ),
                ));
            }
            if region_offset < HEADER_LEN
                || region_offset
                    .checked_add(SLOT_REGION_LEN)
                    .is_none_or(|end| end > bytes.len())
            {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidData,
                    format!("slot {index} region at {region_offset} is out of file bounds"),
                ));
            }
            *slot_offset = region_offset;
        }

        let layout = build_layout(bytes.len(), &slot_offsets);
        layout.validate()?;

        Ok(Self {
            raw: bytes,
            slot_offsets,
            layout,
        })
    }

    pub fn from_file(path: &Path) -> io::Result<Self> {
        Self::from_bytes(fs::read(path)?)
    }

    pub fn layout(&self) -> &FileLayout {
        &self.layout
    }

    pub fn len(&self) -> usize {
        self.raw.len()
    }

    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    pub fn slot_offsets(&self) -> &[usize; SLOT_COUNT] {
        &self.slot_offsets
    }

    pub fn slot(&self, index: usize) -> io::Result<SlotView<'_>> {
        let range = self.slot_data_range(index)?;
        Ok(SlotView {
            index,
            data: &self.raw[range.start..range.end],
        })
    }

    /// The slot's packed event-flag blob.
    pub fn event_flags(&self, index: usize) -> io::Result<&[u8]> {
        let range = self.event_flags_range(index)?;
        Ok(&self.raw[range.start..range.end])
    }

    pub fn event_flags_mut(&mut self, index: usize) -> io::Result<&mut [u8]> {
        let range = self.event_flags_range(index)?;
        Ok(&mut self.raw[range.start..range.end])
    }

    /// Apply a batch of flag edits to one slot in a single pass over the
    /// blob. Out-of-range IDs are reported in the outcome, not fatal.
    pub fn apply_flags(&mut self, index: usize, changes: &[FlagChange]) -> io::Result<BatchOutcome> {
        let blob = self.event_flags_mut(index)?;
        Ok(event_flags::apply(blob, changes))
    }

    /// Replace exactly `bytes.len()` bytes at `relative_offset` within the
    /// slot's data region.
    pub fn write_slot_region(
        &mut self,
        index: usize,
        relative_offset: usize,
        bytes: &[u8],
    ) -> io::Result<()> {
        let range = self.slot_data_range(index)?;
        let end = relative_offset.checked_add(bytes.len()).ok_or_else(|| {
            io::Error::new(io::ErrorKind::InvalidInput, "slot write range overflow")
        })?;
        if end > SLOT_DATA_LEN {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!(
                    "write of {} bytes at slot offset {relative_offset} exceeds the {} byte slot region",
                    bytes.len(),
                    SLOT_DATA_LEN
                ),
            ));
        }

        let start = range.start + relative_offset;
        self.raw[start..start + bytes.len()].copy_from_slice(bytes);
        Ok(())
    }

    /// Rewrite every protected region's digest. Must run after content edits
    /// and before serializing; batch edits defer it to the end of the batch.
    pub fn recalculate_checksums(&mut self) {
        checksum::recalculate(&mut self.raw, &self.slot_offsets);
    }

    /// Recompute digests without writing and report per-region matches.
    /// Mismatches are warnings; nothing is repaired here.
    pub fn validate(&self) -> ValidationReport {
        checksum::validate(&self.raw, &self.slot_offsets)
    }

    /// The buffer verbatim. Serialization never recomputes checksums; call
    /// `recalculate_checksums` first after any edit.
    pub fn bytes(&self) -> &[u8] {
        &self.raw
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        self.raw.clone()
    }

    /// Atomic replace: the image lands in a sibling temporary file which is
    /// then renamed over the target, so a crash mid-write cannot leave a
    /// truncated save behind.
    pub fn save_to(&self, path: &Path) -> io::Result<()> {
        write_atomically(path, &self.raw)
    }

    fn slot_region_start(&self, index: usize) -> io::Result<usize> {
        if index >= SLOT_COUNT {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("invalid slot index {index}, expected 0..{}", SLOT_COUNT - 1),
            ));
        }
        Ok(self.slot_offsets[index])
    }

    fn slot_data_range(&self, index: usize) -> io::Result<ByteRange> {
        let start = self.slot_region_start(index)? + CHECKSUM_LEN;
        Ok(ByteRange {
            start,
            end: start + SLOT_DATA_LEN,
        })
    }

    fn event_flags_range(&self, index: usize) -> io::Result<ByteRange> {
        let data = self.slot_data_range(index)?;
        let start = data.start + EVENT_FLAGS_OFFSET;
        Ok(ByteRange {
            start,
            end: start + EVENT_FLAGS_LEN,
        })
    }
}

impl<'a> SlotView<'a> {
    pub fn index(&self) -> usize {
        self.index
    }

    /// No character created in this slot: the occupancy marker is absent.
    pub fn is_empty(&self) -> bool {
        &self.data[..OCCUPANCY_MARKER.len()] != OCCUPANCY_MARKER
    }

    pub fn character_level(&self) -> u32 {
        let bytes = &self.data[CHARACTER_LEVEL_OFFSET..CHARACTER_LEVEL_OFFSET + 4];
        u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])
    }

    pub fn character_name(&self) -> io::Result<String> {
        let field = &self.data
            [CHARACTER_NAME_OFFSET..CHARACTER_NAME_OFFSET + 2 * CHARACTER_NAME_UNITS];
        let mut r = LittleEndianReader::new(Cursor::new(field));
        r.read_utf16_string(CHARACTER_NAME_UNITS)
    }

    pub fn event_flags(&self) -> &'a [u8] {
        &self.data[EVENT_FLAGS_OFFSET..EVENT_FLAGS_OFFSET + EVENT_FLAGS_LEN]
    }
}

fn build_layout(file_len: usize, slot_offsets: &[usize; SLOT_COUNT]) -> FileLayout {
    let mut regions = Vec::with_capacity(2 * SLOT_COUNT + 2);
    regions.push(RegionLayout {
        id: RegionId::Header,
        range: ByteRange {
            start: 0,
            end: HEADER_LEN,
        },
    });

    for (index, &slot_offset) in slot_offsets.iter().enumerate() {
        regions.push(RegionLayout {
            id: RegionId::SlotChecksum(index as u8),
            range: ByteRange {
                start: slot_offset,
                end: slot_offset + CHECKSUM_LEN,
            },
        });
        regions.push(RegionLayout {
            id: RegionId::SlotData(index as u8),
            range: ByteRange {
                start: slot_offset + CHECKSUM_LEN,
                end: slot_offset + SLOT_REGION_LEN,
            },
        });
    }

    let covered = slot_offsets
        .last()
        .map(|&offset| offset + SLOT_REGION_LEN)
        .unwrap_or(HEADER_LEN);
    if covered < file_len {
        regions.push(RegionLayout {
            id: RegionId::Tail,
            range: ByteRange {
                start: covered,
                end: file_len,
            },
        });
    }

    FileLayout { file_len, regions }
}

fn write_atomically(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let mut temp_name = path
        .file_name()
        .map(|name| name.to_os_string())
        .ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("cannot write to {}: no file name", path.display()),
            )
        })?;
    temp_name.push(".tmp");
    let temp_path = path.with_file_name(temp_name);

    fs::write(&temp_path, bytes)?;
    if let Err(e) = fs::rename(&temp_path, path) {
        let _ = fs::remove_file(&temp_path);
        return Err(e);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::SaveContainer;
    use super::types::{MAGIC, MIN_FILE_LEN};

    #[test]
    fn rejects_buffer_shorter_than_minimum() {
        let result = SaveContainer::from_bytes(vec![0u8; 64]);
        assert!(result.is_err());
    }

    #[test]
    fn rejects_missing_marker() {
        let bytes = vec![0u8; MIN_FILE_LEN];
        let err = SaveContainer::from_bytes(bytes).expect_err("marker-less buffer should fail");
        assert!(err.to_string().contains("BND4"));
    }

    #[test]
    fn rejects_bad_slot_table_length() {
        let mut bytes = vec![0u8; MIN_FILE_LEN];
        bytes[..MAGIC.len()].copy_from_slice(MAGIC);
        bytes[0x0C..0x10].copy_from_slice(&10u32.to_le_bytes());
        // leave the slot table zeroed: region_len 0 is invalid
        let result = SaveContainer::from_bytes(bytes);
        assert!(result.is_err());
    }
}
