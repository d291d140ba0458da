use std::path::PathBuf;
use std::process;

use clap::Parser;
use eldensave_core::backup::RetentionPolicy;
use eldensave_core::core_api::{Engine, FlagCatalog, Session};
use eldensave_core::sl2::event_flags::FlagChange;
use eldensave_render::{
    render_backups_json, render_backups_text, render_flags_json, render_flags_text,
    render_outcome_json, render_outcome_text, render_slots_json, render_slots_text,
    render_validation_json, render_validation_text,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct FlagEdit {
    flag_id: u64,
    value: bool,
}

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Cli {
    #[arg(value_name = "SAVE.SL2")]
    path: PathBuf,
    /// Character slot, 1-based as shown in game
    #[arg(long)]
    slot: Option<usize>,
    #[arg(long = "list-slots")]
    list_slots: bool,
    #[arg(long)]
    validate: bool,
    /// Flag IDs to read, comma separated
    #[arg(long = "flags", value_name = "ID,ID,..", value_delimiter = ',')]
    flags: Vec<u64>,
    /// List every documented flag in a catalog category
    #[arg(long)]
    category: Option<String>,
    #[arg(
        long = "set-flag",
        value_name = "ID=on|off",
        value_parser = parse_flag_edit
    )]
    set_flag: Vec<FlagEdit>,
    /// Backup description recorded alongside an edit
    #[arg(long)]
    description: Option<String>,
    #[arg(long = "list-backups")]
    list_backups: bool,
    /// Restore the backup with this timestamp
    #[arg(long, value_name = "TIMESTAMP")]
    restore: Option<String>,
    /// Extra flag-name catalog (TSV: id, category, subcategory, name)
    #[arg(long, value_name = "PATH")]
    catalog: Option<PathBuf>,
    /// Prune all but the newest N backups after each edit
    #[arg(long = "keep-backups", value_name = "N")]
    keep_backups: Option<usize>,
    #[arg(long)]
    json: bool,
    /// Write edits to a copy instead of the save itself (no backup taken)
    #[arg(long, value_name = "PATH")]
    output: Option<PathBuf>,
}

fn main() {
    let cli = Cli::parse();

    let wants_flag_listing = !cli.flags.is_empty() || cli.category.is_some();
    if (wants_flag_listing || !cli.set_flag.is_empty()) && cli.slot.is_none() {
        eprintln!("--flags, --category and --set-flag require --slot <N>");
        process::exit(2);
    }
    if cli.restore.is_some() && !cli.set_flag.is_empty() {
        eprintln!("--restore cannot be combined with --set-flag");
        process::exit(2);
    }
    if cli.output.is_some() && cli.set_flag.is_empty() {
        eprintln!("--output requires at least one --set-flag");
        process::exit(2);
    }
    let slot_index = match cli.slot {
        Some(slot) if (1..=10).contains(&slot) => Some(slot - 1),
        Some(slot) => {
            eprintln!("invalid slot {slot}, expected 1..10");
            process::exit(2);
        }
        None => None,
    };

    let catalog = match &cli.catalog {
        Some(path) => FlagCatalog::builtin_with_tsv(path).unwrap_or_else(|e| {
            eprintln!("Error loading flag catalog: {e}");
            process::exit(1);
        }),
        None => FlagCatalog::builtin(),
    };

    let retention = match cli.keep_backups {
        Some(n) => RetentionPolicy::keep_last(n),
        None => RetentionPolicy::keep_all(),
    };

    let engine = Engine::new();
    let mut session = engine
        .open_path_with_retention(&cli.path, retention)
        .unwrap_or_else(|e| {
            eprintln!("Error opening {}: {e}", cli.path.display());
            process::exit(1);
        });

    for mismatch in session.load_report().mismatches() {
        eprintln!(
            "warning: checksum mismatch in {} (file may be corrupt or externally edited)",
            mismatch.region.label()
        );
    }

    if let Some(restore) = &cli.restore {
        let timestamp = restore.parse::<u128>().unwrap_or_else(|_| {
            eprintln!("invalid backup timestamp '{restore}'");
            process::exit(2);
        });
        restore_backup(&mut session, timestamp);
        println!("restored backup {timestamp}");
        return;
    }

    if !cli.set_flag.is_empty() {
        let Some(slot_index) = slot_index else {
            eprintln!("--set-flag requires --slot <N>");
            process::exit(2);
        };
        apply_flag_edits(&mut session, &cli, slot_index);
        return;
    }

    let mut printed = false;

    if cli.list_slots {
        let slots = session.slot_summaries().unwrap_or_else(|e| {
            eprintln!("Error reading slots: {e}");
            process::exit(1);
        });
        if cli.json {
            println!("{}", render_slots_json(&slots));
        } else {
            print!("{}", render_slots_text(&slots));
        }
        printed = true;
    }

    if wants_flag_listing {
        let Some(slot_index) = slot_index else {
            eprintln!("--flags and --category require --slot <N>");
            process::exit(2);
        };
        let mut flag_ids = cli.flags.clone();
        if let Some(category) = &cli.category {
            flag_ids.extend(catalog.flags_in_category(category, None));
        }
        flag_ids.sort_unstable();
        flag_ids.dedup();

        let states = session.flag_states(slot_index, &flag_ids).unwrap_or_else(|e| {
            eprintln!("Error reading flags: {e}");
            process::exit(1);
        });
        if cli.json {
            println!("{}", render_flags_json(&states, &catalog));
        } else {
            print!("{}", render_flags_text(&states, &catalog));
        }
        printed = true;
    }

    if cli.validate {
        let report = session.validate();
        if cli.json {
            println!("{}", render_validation_json(&report));
        } else {
            print!("{}", render_validation_text(&report));
        }
        printed = true;
    }

    if cli.list_backups {
        let backups = session.backup_entries().unwrap_or_else(|e| {
            eprintln!("Error listing backups: {e}");
            process::exit(1);
        });
        if cli.json {
            println!("{}", render_backups_json(&backups));
        } else {
            print!("{}", render_backups_text(&backups));
        }
        printed = true;
    }

    if !printed {
        let slots = session.slot_summaries().unwrap_or_else(|e| {
            eprintln!("Error reading slots: {e}");
            process::exit(1);
        });
        if cli.json {
            println!("{}", render_slots_json(&slots));
        } else {
            print!("{}", render_slots_text(&slots));
        }
    }
}

fn apply_flag_edits(session: &mut Session, cli: &Cli, slot_index: usize) {
    let changes: Vec<FlagChange> = cli
        .set_flag
        .iter()
        .map(|edit| FlagChange {
            flag_id: edit.flag_id,
            value: edit.value,
        })
        .collect();
    let description = cli
        .description
        .clone()
        .unwrap_or_else(|| format!("cli edit of {} flags", changes.len()));

    let outcome = match &cli.output {
        Some(output) => {
            let outcome = session
                .set_flags_in_memory(slot_index, &changes)
                .unwrap_or_else(|e| {
                    eprintln!("Error applying flag edits: {e}");
                    process::exit(1);
                });
            session.save_as(output).unwrap_or_else(|e| {
                eprintln!("Error writing {}: {e}", output.display());
                process::exit(1);
            });
            outcome
        }
        None => session
            .set_flags(slot_index, &changes, &description)
            .unwrap_or_else(|e| {
                eprintln!("Error applying flag edits: {e}");
                process::exit(1);
            }),
    };

    if cli.json {
        println!("{}", render_outcome_json(&outcome));
    } else {
        print!("{}", render_outcome_text(&outcome));
    }
}

fn restore_backup(session: &mut Session, timestamp: u128) {
    let backups = session.list_backups().unwrap_or_else(|e| {
        eprintln!("Error listing backups: {e}");
        process::exit(1);
    });
    let Some(backup) = backups.iter().find(|b| b.timestamp == timestamp) else {
        eprintln!("no backup with timestamp {timestamp}");
        process::exit(1);
    };

    session.restore_backup(backup).unwrap_or_else(|e| {
        eprintln!("Error restoring backup {timestamp}: {e}");
        process::exit(1);
    });
}

fn parse_flag_edit(value: &str) -> Result<FlagEdit, String> {
    let Some((id_part, state_part)) = value.split_once('=') else {
        return Err(format!("invalid flag edit '{value}', expected ID=on|off"));
    };

    let flag_id = id_part
        .trim()
        .parse::<u64>()
        .map_err(|e| format!("invalid flag id '{id_part}': {e}"))?;
    let state = match state_part.trim().to_ascii_lowercase().as_str() {
        "on" | "true" | "1" => true,
        "off" | "false" | "0" => false,
        other => return Err(format!("invalid flag state '{other}', expected on or off")),
    };

    Ok(FlagEdit {
        flag_id,
        value: state,
    })
}
