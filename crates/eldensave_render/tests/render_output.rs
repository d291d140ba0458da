use eldensave_core::core_api::{FlagBatchOutcome, FlagCatalog, FlagState, SlotSummary};
use eldensave_core::sl2::checksum::{ProtectedRegion, RegionStatus, ValidationReport};
use eldensave_render::{
    render_flags_json, render_flags_text, render_outcome_text, render_slots_json,
    render_slots_text, render_validation_json, render_validation_text,
};

fn sample_slots() -> Vec<SlotSummary> {
    vec![
        SlotSummary {
            index: 0,
            occupied: true,
            name: "Tarnished".to_string(),
            level: 45,
        },
        SlotSummary {
            index: 1,
            occupied: false,
            name: String::new(),
            level: 0,
        },
    ]
}

#[test]
fn slots_text_marks_empty_slots() {
    let text = render_slots_text(&sample_slots());
    assert!(text.contains("Tarnished"));
    assert!(text.contains("45"));
    assert!(text.contains("(empty)"));
}

#[test]
fn slots_json_omits_name_for_empty_slots() {
    let json = render_slots_json(&sample_slots());
    let slots = json.as_array().expect("slots should render as an array");
    assert_eq!(slots.len(), 2);
    assert_eq!(slots[0]["name"], "Tarnished");
    assert_eq!(slots[0]["slot"], 1);
    assert!(slots[1].get("name").is_none());
    assert_eq!(slots[1]["occupied"], false);
}

#[test]
fn flags_text_uses_catalog_names_and_flags_misses() {
    let catalog = FlagCatalog::builtin();
    let flags = vec![
        FlagState {
            flag_id: 71190,
            value: Some(true),
        },
        FlagState {
            flag_id: 424242,
            value: Some(false),
        },
        FlagState {
            flag_id: u64::MAX,
            value: None,
        },
    ];

    let text = render_flags_text(&flags, &catalog);
    assert!(text.contains("71190: [ON] Table of Lost Grace"));
    assert!(text.contains("424242: [OFF] (undocumented)"));
    assert!(text.contains("[OUT OF RANGE]"));
}

#[test]
fn flags_json_includes_name_only_when_documented() {
    let catalog = FlagCatalog::builtin();
    let flags = vec![
        FlagState {
            flag_id: 9100,
            value: Some(true),
        },
        FlagState {
            flag_id: 424242,
            value: Some(false),
        },
    ];

    let json = render_flags_json(&flags, &catalog);
    let rendered = json.as_array().expect("flags should render as an array");
    assert_eq!(rendered[0]["name"], "Margit, the Fell Omen");
    assert!(rendered[1].get("name").is_none());
}

#[test]
fn validation_text_reports_mismatched_regions() {
    let report = ValidationReport {
        regions: vec![
            RegionStatus {
                region: ProtectedRegion::Header,
                stored: "00".repeat(16),
                computed: "00".repeat(16),
                matches: true,
            },
            RegionStatus {
                region: ProtectedRegion::Slot(3),
                stored: "ab".repeat(16),
                computed: "cd".repeat(16),
                matches: false,
            },
        ],
    };

    let text = render_validation_text(&report);
    assert!(text.contains("header: ok"));
    assert!(text.contains("slot 3: MISMATCH"));
    assert!(!text.contains("all checksums match"));

    let json = render_validation_json(&report);
    assert_eq!(json["all_match"], false);
    assert_eq!(json["regions"][1]["region"], "slot 3");
}

#[test]
fn outcome_text_lists_out_of_range_ids() {
    let clean = FlagBatchOutcome {
        requested: 3,
        applied: 3,
        skipped: Vec::new(),
    };
    assert_eq!(render_outcome_text(&clean), "applied 3/3 flags\n");

    let partial = FlagBatchOutcome {
        requested: 3,
        applied: 2,
        skipped: vec![4_000_000_000],
    };
    let text = render_outcome_text(&partial);
    assert!(text.contains("applied 2/3 flags"));
    assert!(text.contains("4000000000"));
}
