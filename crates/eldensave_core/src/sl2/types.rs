// Container format constants
pub const MAGIC: &[u8] = b"BND4";
pub const HEADER_LEN: usize = 0x300;
pub const ENTRY_COUNT_OFFSET: usize = 0x0C;
pub const SLOT_TABLE_OFFSET: usize = 0x40;
pub const SLOT_TABLE_ENTRY_LEN: usize = 0x10;
pub const HEADER_DIGEST_OFFSET: usize = 0x2F0;

pub const SLOT_COUNT: usize = 10;
pub const CHECKSUM_LEN: usize = 0x10; // 128-bit MD5
pub const SLOT_DATA_LEN: usize = 0x28_0000;
pub const SLOT_REGION_LEN: usize = CHECKSUM_LEN + SLOT_DATA_LEN;

pub const MIN_FILE_LEN: usize = HEADER_LEN + SLOT_COUNT * SLOT_REGION_LEN;

// Slot data layout (offsets relative to the start of a slot's data region,
// i.e. just past its 16-byte checksum header)
pub const OCCUPANCY_MARKER: &[u8] = b"USER";
pub const CHARACTER_LEVEL_OFFSET: usize = 0x08;
pub const CHARACTER_NAME_OFFSET: usize = 0x10;
pub const CHARACTER_NAME_UNITS: usize = 17; // UTF-16 code units, NUL-padded

// Event-flag blob window within a slot's data region. 0x40000 bytes of
// packed bits, so flag IDs 0..2_097_152 are addressable.
pub const EVENT_FLAGS_OFFSET: usize = 0x1_C000;
pub const EVENT_FLAGS_LEN: usize = 0x4_0000;

/// Window of the header covered by the header digest. The digest field
/// itself sits just past this window so recomputing it is stable.
pub const HEADER_DIGEST_WINDOW: std::ops::Range<usize> = 0..HEADER_DIGEST_OFFSET;
