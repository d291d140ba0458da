use eldensave_core::layout::RegionId;
use eldensave_core::sl2::SaveContainer;
use eldensave_core::sl2::types::{
    CHARACTER_LEVEL_OFFSET, CHARACTER_NAME_OFFSET, CHECKSUM_LEN, HEADER_LEN, MAGIC, MIN_FILE_LEN,
    OCCUPANCY_MARKER, SLOT_COUNT, SLOT_REGION_LEN, SLOT_TABLE_ENTRY_LEN, SLOT_TABLE_OFFSET,
};

fn build_save(occupied: &[(usize, &str, u32)], tail_len: usize) -> Vec<u8> {
    let mut bytes = vec![0u8; MIN_FILE_LEN + tail_len];
    bytes[..MAGIC.len()].copy_from_slice(MAGIC);
    bytes[0x0C..0x10].copy_from_slice(&(SLOT_COUNT as u32).to_le_bytes());

    for index in 0..SLOT_COUNT {
        let entry = SLOT_TABLE_OFFSET + index * SLOT_TABLE_ENTRY_LEN;
        let region_offset = HEADER_LEN + index * SLOT_REGION_LEN;
        bytes[entry..entry + 8].copy_from_slice(&(region_offset as u64).to_le_bytes());
        bytes[entry + 8..entry + 16].copy_from_slice(&(SLOT_REGION_LEN as u64).to_le_bytes());
    }

    for &(index, name, level) in occupied {
        let data = HEADER_LEN + index * SLOT_REGION_LEN + CHECKSUM_LEN;
        bytes[data..data + OCCUPANCY_MARKER.len()].copy_from_slice(OCCUPANCY_MARKER);
        bytes[data + CHARACTER_LEVEL_OFFSET..data + CHARACTER_LEVEL_OFFSET + 4]
            .copy_from_slice(&level.to_le_bytes());
        for (unit, code) in name.encode_utf16().enumerate() {
            let at = data + CHARACTER_NAME_OFFSET + 2 * unit;
            bytes[at..at + 2].copy_from_slice(&code.to_le_bytes());
        }
    }

    for (i, byte) in bytes[MIN_FILE_LEN..].iter_mut().enumerate() {
        *byte = (i % 251) as u8;
    }

    let mut container = SaveContainer::from_bytes(bytes).expect("fixture should parse");
    container.recalculate_checksums();
    container.to_bytes()
}

#[test]
fn unmutated_container_round_trips_byte_identical() {
    let bytes = build_save(&[(0, "Tarnished", 45)], 0);
    let container = SaveContainer::from_bytes(bytes.clone()).expect("save should parse");
    assert_eq!(container.to_bytes(), bytes);
}

#[test]
fn tail_bytes_past_the_slot_regions_survive_verbatim() {
    let bytes = build_save(&[(0, "Tarnished", 45)], 1024);
    let container = SaveContainer::from_bytes(bytes.clone()).expect("save should parse");

    let tail = container
        .layout()
        .regions
        .iter()
        .find(|r| r.id == RegionId::Tail)
        .expect("layout should record a tail region");
    assert_eq!(tail.range.len(), 1024);
    assert_eq!(container.to_bytes(), bytes);
}

#[test]
fn layout_covers_the_whole_file() {
    let bytes = build_save(&[], 0);
    let container = SaveContainer::from_bytes(bytes).expect("save should parse");
    container.layout().validate().expect("layout should be valid");
    assert_eq!(container.layout().file_len, MIN_FILE_LEN);
    // header + (checksum, data) per slot
    assert_eq!(container.layout().regions.len(), 1 + 2 * SLOT_COUNT);
}

#[test]
fn slot_views_expose_occupancy_name_and_level() {
    let bytes = build_save(&[(0, "Tarnished", 45), (3, "Melina", 7)], 0);
    let container = SaveContainer::from_bytes(bytes).expect("save should parse");

    let slot0 = container.slot(0).expect("slot 0 should resolve");
    assert!(!slot0.is_empty());
    assert_eq!(slot0.character_name().expect("name should decode"), "Tarnished");
    assert_eq!(slot0.character_level(), 45);

    let slot3 = container.slot(3).expect("slot 3 should resolve");
    assert_eq!(slot3.character_name().expect("name should decode"), "Melina");

    let slot1 = container.slot(1).expect("slot 1 should resolve");
    assert!(slot1.is_empty());

    assert!(container.slot(SLOT_COUNT).is_err());
}

#[test]
fn rejects_missing_marker() {
    let mut bytes = build_save(&[], 0);
    bytes[0] = b'X';
    assert!(SaveContainer::from_bytes(bytes).is_err());
}

#[test]
fn rejects_truncated_file() {
    let mut bytes = build_save(&[], 0);
    bytes.truncate(MIN_FILE_LEN / 2);
    assert!(SaveContainer::from_bytes(bytes).is_err());
}

#[test]
fn rejects_out_of_bounds_slot_table_entry() {
    let mut bytes = build_save(&[], 0);
    let entry = SLOT_TABLE_OFFSET + 4 * SLOT_TABLE_ENTRY_LEN;
    bytes[entry..entry + 8].copy_from_slice(&(u64::MAX / 2).to_le_bytes());
    assert!(SaveContainer::from_bytes(bytes).is_err());
}

#[test]
fn write_slot_region_is_bounds_checked() {
    let bytes = build_save(&[(0, "Tarnished", 45)], 0);
    let mut container = SaveContainer::from_bytes(bytes).expect("save should parse");

    container
        .write_slot_region(0, 0x100, &[0xAA; 4])
        .expect("in-bounds write should succeed");
    let written_at = container.slot_offsets()[0] + CHECKSUM_LEN + 0x100;
    assert_eq!(&container.bytes()[written_at..written_at + 4], &[0xAA; 4]);

    let err = container
        .write_slot_region(0, eldensave_core::sl2::types::SLOT_DATA_LEN - 2, &[0u8; 4])
        .expect_err("write past the slot region should fail");
    assert!(err.to_string().contains("exceeds"));
}
