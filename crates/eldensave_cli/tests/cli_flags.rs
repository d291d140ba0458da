use std::fs;
use std::path::PathBuf;
use std::process::Command;
use std::time::{SystemTime, UNIX_EPOCH};

use eldensave_core::sl2::SaveContainer;
use eldensave_core::sl2::types::{
    CHARACTER_LEVEL_OFFSET, CHARACTER_NAME_OFFSET, CHECKSUM_LEN, HEADER_LEN, MAGIC, MIN_FILE_LEN,
    OCCUPANCY_MARKER, SLOT_COUNT, SLOT_REGION_LEN, SLOT_TABLE_ENTRY_LEN, SLOT_TABLE_OFFSET,
};
use serde_json::Value;

fn build_save(occupied: &[(usize, &str, u32)]) -> Vec<u8> {
    let mut bytes = vec![0u8; MIN_FILE_LEN];
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

    let mut container = SaveContainer::from_bytes(bytes).expect("fixture should parse");
    container.recalculate_checksums();
    container.to_bytes()
}

fn temp_test_dir(prefix: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system time before unix epoch")
        .as_nanos();
    std::env::temp_dir().join(format!(
        "eldensave_{}_{}_{}",
        prefix,
        std::process::id(),
        nanos
    ))
}

fn run_cli(args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_eldensave"))
        .args(args)
        .output()
        .expect("failed to run eldensave CLI")
}

#[test]
fn cli_lists_slots() {
    let root = temp_test_dir("cli_slots");
    fs::create_dir_all(&root).expect("failed to create temp root");
    let save_path = root.join("ER0000.sl2");
    fs::write(&save_path, build_save(&[(0, "Tarnished", 45)]))
        .expect("failed to write save fixture");
    let path = save_path.to_string_lossy().to_string();

    let output = run_cli(&["--list-slots", &path]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Tarnished"));
    assert!(stdout.contains("(empty)"));

    let _ = fs::remove_dir_all(&root);
}

#[test]
fn cli_sets_a_flag_and_reads_it_back() {
    let root = temp_test_dir("cli_set_flag");
    fs::create_dir_all(&root).expect("failed to create temp root");
    let save_path = root.join("ER0000.sl2");
    fs::write(&save_path, build_save(&[(0, "Tarnished", 45)]))
        .expect("failed to write save fixture");
    let path = save_path.to_string_lossy().to_string();

    let output = run_cli(&["--slot", "1", "--set-flag", "71190=on", &path]);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("applied 1/1"));

    let output = run_cli(&["--slot", "1", "--flags", "71190", &path]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("71190: [ON] Table of Lost Grace"));

    let output = run_cli(&["--validate", &path]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("all checksums match"));

    let output = run_cli(&["--list-backups", &path]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("event_flags_slot_1"));

    let _ = fs::remove_dir_all(&root);
}

#[test]
fn cli_writes_edits_to_a_copy_with_output() {
    let root = temp_test_dir("cli_output");
    fs::create_dir_all(&root).expect("failed to create temp root");
    let save_path = root.join("ER0000.sl2");
    let original = build_save(&[(0, "Tarnished", 45)]);
    fs::write(&save_path, &original).expect("failed to write save fixture");
    let copy_path = root.join("copy.sl2");
    let path = save_path.to_string_lossy().to_string();
    let copy = copy_path.to_string_lossy().to_string();

    let output = run_cli(&[
        "--slot", "1", "--set-flag", "9100=on", "--output", &copy, &path,
    ]);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    // the source save is untouched, the copy has the edit
    assert_eq!(fs::read(&save_path).expect("source should read"), original);
    let output = run_cli(&["--slot", "1", "--flags", "9100", &copy]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("[ON]"));

    let _ = fs::remove_dir_all(&root);
}

#[test]
fn cli_json_output_is_machine_readable() {
    let root = temp_test_dir("cli_json");
    fs::create_dir_all(&root).expect("failed to create temp root");
    let save_path = root.join("ER0000.sl2");
    fs::write(&save_path, build_save(&[(1, "Melina", 7)]))
        .expect("failed to write save fixture");
    let path = save_path.to_string_lossy().to_string();

    let output = run_cli(&["--list-slots", "--json", &path]);
    assert!(output.status.success());
    let parsed: Value =
        serde_json::from_slice(&output.stdout).expect("stdout should be valid JSON");
    let slots = parsed.as_array().expect("slots should be an array");
    assert_eq!(slots.len(), 10);
    assert_eq!(slots[1]["name"], "Melina");
    assert_eq!(slots[1]["slot"], 2);

    let _ = fs::remove_dir_all(&root);
}

#[test]
fn cli_rejects_flag_edit_without_slot() {
    let root = temp_test_dir("cli_usage");
    fs::create_dir_all(&root).expect("failed to create temp root");
    let save_path = root.join("ER0000.sl2");
    fs::write(&save_path, build_save(&[])).expect("failed to write save fixture");
    let path = save_path.to_string_lossy().to_string();

    let output = run_cli(&["--set-flag", "71190=on", &path]);
    assert!(!output.status.success());
    assert_eq!(output.status.code(), Some(2));

    let _ = fs::remove_dir_all(&root);
}

#[test]
fn cli_restores_a_listed_backup() {
    let root = temp_test_dir("cli_restore");
    fs::create_dir_all(&root).expect("failed to create temp root");
    let save_path = root.join("ER0000.sl2");
    let original = build_save(&[(0, "Tarnished", 45)]);
    fs::write(&save_path, &original).expect("failed to write save fixture");
    let path = save_path.to_string_lossy().to_string();

    let output = run_cli(&["--slot", "1", "--set-flag", "9101=on", &path]);
    assert!(output.status.success());
    assert_ne!(fs::read(&save_path).expect("edited save should read"), original);

    let output = run_cli(&["--list-backups", "--json", &path]);
    let parsed: Value =
        serde_json::from_slice(&output.stdout).expect("stdout should be valid JSON");
    let timestamp = parsed[0]["timestamp"]
        .as_str()
        .expect("timestamp should render as a string")
        .to_string();

    let output = run_cli(&["--restore", &timestamp, &path]);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    assert_eq!(fs::read(&save_path).expect("restored save should read"), original);

    let _ = fs::remove_dir_all(&root);
}
