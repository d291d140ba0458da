use std::fs;
use std::path::{Path, PathBuf};

use crate::backup::{Backup, BackupManager, RetentionPolicy};
use crate::sl2::SaveContainer;
use crate::sl2::checksum::ValidationReport;
use crate::sl2::event_flags::{self, FlagChange};
use crate::sl2::types::SLOT_COUNT;

use super::error::{CoreError, CoreErrorCode};
use super::types::{BackupEntry, FlagBatchOutcome, FlagState, SlotSummary};

#[derive(Debug, Default, Clone, Copy)]
pub struct Engine;

/// One editing session over one save file. The session owns the container
/// exclusively; there is no concurrent-writer protocol. What keeps edits
/// correct is ordering: snapshot the on-disk file, mutate the buffer,
/// recalculate digests, then serialize. That ordering lives here, not in
/// callers.
#[derive(Debug)]
pub struct Session {
    container: SaveContainer,
    source_path: Option<PathBuf>,
    backups: Option<BackupManager>,
    load_report: ValidationReport,
}

impl Engine {
    pub fn new() -> Self {
        Self
    }

    pub fn open_path(&self, path: &Path) -> Result<Session, CoreError> {
        self.open_path_with_retention(path, RetentionPolicy::keep_all())
    }

    pub fn open_path_with_retention(
        &self,
        path: &Path,
        retention: RetentionPolicy,
    ) -> Result<Session, CoreError> {
        let bytes = fs::read(path).map_err(|e| {
            CoreError::new(
                CoreErrorCode::Io,
                format!("failed to read {}: {e}", path.display()),
            )
        })?;
        let container = parse_container(bytes, Some(path))?;
        let load_report = container.validate();

        Ok(Session {
            container,
            source_path: Some(path.to_path_buf()),
            backups: Some(BackupManager::with_retention(path, retention)),
            load_report,
        })
    }

    /// Open an in-memory image. The session can inspect and edit but has no
    /// backing file, so nothing can be persisted or snapshotted.
    pub fn open_bytes<B: AsRef<[u8]>>(&self, bytes: B) -> Result<Session, CoreError> {
        let container = parse_container(bytes.as_ref().to_vec(), None)?;
        let load_report = container.validate();

        Ok(Session {
            container,
            source_path: None,
            backups: None,
            load_report,
        })
    }
}

impl Session {
    pub fn container(&self) -> &SaveContainer {
        &self.container
    }

    pub fn source_path(&self) -> Option<&Path> {
        self.source_path.as_deref()
    }

    /// Digest status observed when the file was opened. A mismatch here did
    /// not block the load; it is the caller's cue to warn.
    pub fn load_report(&self) -> &ValidationReport {
        &self.load_report
    }

    pub fn validate(&self) -> ValidationReport {
        self.container.validate()
    }

    pub fn slot_count(&self) -> usize {
        SLOT_COUNT
    }

    pub fn slot_summary(&self, slot_index: usize) -> Result<SlotSummary, CoreError> {
        self.check_slot_index(slot_index)?;
        let slot = self
            .container
            .slot(slot_index)
            .map_err(|e| CoreError::new(CoreErrorCode::Bounds, e.to_string()))?;

        if slot.is_empty() {
            return Ok(SlotSummary {
                index: slot_index,
                occupied: false,
                name: String::new(),
                level: 0,
            });
        }

        let name = slot.character_name().map_err(|e| {
            CoreError::new(
                CoreErrorCode::Format,
                format!("slot {slot_index} has an undecodable character name: {e}"),
            )
        })?;
        Ok(SlotSummary {
            index: slot_index,
            occupied: true,
            name,
            level: slot.character_level(),
        })
    }

    pub fn slot_summaries(&self) -> Result<Vec<SlotSummary>, CoreError> {
        (0..SLOT_COUNT).map(|i| self.slot_summary(i)).collect()
    }

    pub fn get_flag(&self, slot_index: usize, flag_id: u64) -> Result<bool, CoreError> {
        self.check_slot_index(slot_index)?;
        let blob = self
            .container
            .event_flags(slot_index)
            .map_err(|e| CoreError::new(CoreErrorCode::Bounds, e.to_string()))?;
        event_flags::get_flag(blob, flag_id)
            .map_err(|e| CoreError::new(CoreErrorCode::FlagOutOfRange, e.to_string()))
    }

    /// Current values for a list of IDs. Out-of-range IDs come back with no
    /// value instead of failing the whole listing.
    pub fn flag_states(
        &self,
        slot_index: usize,
        flag_ids: &[u64],
    ) -> Result<Vec<FlagState>, CoreError> {
        self.check_slot_index(slot_index)?;
        let blob = self
            .container
            .event_flags(slot_index)
            .map_err(|e| CoreError::new(CoreErrorCode::Bounds, e.to_string()))?;

        Ok(flag_ids
            .iter()
            .map(|&flag_id| FlagState {
                flag_id,
                value: event_flags::get_flag(blob, flag_id).ok(),
            })
            .collect())
    }

    /// Apply flag edits to the in-memory buffer only. Checksums are left
    /// stale on purpose so a caller can batch further edits; `commit`
    /// recalculates and persists the lot.
    pub fn set_flags_in_memory(
        &mut self,
        slot_index: usize,
        changes: &[FlagChange],
    ) -> Result<FlagBatchOutcome, CoreError> {
        self.check_slot_index(slot_index)?;
        let outcome = self
            .container
            .apply_flags(slot_index, changes)
            .map_err(|e| CoreError::new(CoreErrorCode::Bounds, e.to_string()))?;
        Ok(map_outcome(changes.len(), outcome))
    }

    /// The full mutation sequence for one batch of flag edits: snapshot the
    /// on-disk file, mutate, recalculate digests, write back atomically. A
    /// failed snapshot aborts before any byte of the save changes.
    pub fn set_flags(
        &mut self,
        slot_index: usize,
        changes: &[FlagChange],
        description: &str,
    ) -> Result<FlagBatchOutcome, CoreError> {
        self.check_slot_index(slot_index)?;
        let operation = format!("event_flags_slot_{}", slot_index + 1);
        self.snapshot_source(description, &operation)?;

        let outcome = self
            .container
            .apply_flags(slot_index, changes)
            .map_err(|e| CoreError::new(CoreErrorCode::Bounds, e.to_string()))?;
        self.persist()?;
        Ok(map_outcome(changes.len(), outcome))
    }

    /// Persist pending in-memory edits: snapshot, recalculate, write.
    pub fn commit(&mut self, description: &str) -> Result<(), CoreError> {
        self.snapshot_source(description, "manual_commit")?;
        self.persist()
    }

    /// Write the current image somewhere else. No snapshot is taken: the
    /// target is not the file this session is versioning.
    pub fn save_as(&mut self, path: &Path) -> Result<(), CoreError> {
        self.container.recalculate_checksums();
        self.container.save_to(path).map_err(|e| {
            CoreError::new(
                CoreErrorCode::Io,
                format!("failed to write {}: {e}", path.display()),
            )
        })
    }

    pub fn list_backups(&self) -> Result<Vec<Backup>, CoreError> {
        let manager = self.backup_manager()?;
        manager
            .list_backups()
            .map_err(|e| CoreError::new(CoreErrorCode::Backup, e.to_string()))
    }

    pub fn backup_entries(&self) -> Result<Vec<BackupEntry>, CoreError> {
        Ok(self
            .list_backups()?
            .iter()
            .map(|b| BackupEntry {
                timestamp: b.timestamp,
                description: b.metadata.description.clone(),
                operation: b.metadata.operation.clone(),
                source_path: b.metadata.source_path.clone(),
                original_len: b.metadata.original_len,
            })
            .collect())
    }

    /// Roll the save back to a snapshot. The current on-disk state is
    /// snapshotted first, then the stored bytes go back through the normal
    /// parse-and-serialize path, so a restore obeys the same discipline as
    /// any other write.
    pub fn restore_backup(&mut self, backup: &Backup) -> Result<(), CoreError> {
        let source_path = self
            .source_path
            .clone()
            .ok_or_else(|| in_memory_session_error("restore a backup"))?;

        let manager = self.backup_manager()?;
        let bytes = manager
            .restore(backup)
            .map_err(|e| CoreError::new(CoreErrorCode::Backup, e.to_string()))?;
        self.snapshot_source("before restore", "restore")?;

        let restored = parse_container(bytes, Some(&source_path))?;
        restored.save_to(&source_path).map_err(|e| {
            CoreError::new(
                CoreErrorCode::Io,
                format!("failed to write {}: {e}", source_path.display()),
            )
        })?;

        self.load_report = restored.validate();
        self.container = restored;
        Ok(())
    }

    fn check_slot_index(&self, slot_index: usize) -> Result<(), CoreError> {
        if slot_index >= SLOT_COUNT {
            return Err(CoreError::new(
                CoreErrorCode::SlotIndex,
                format!("invalid slot index {slot_index}, expected 0..{}", SLOT_COUNT - 1),
            ));
        }
        Ok(())
    }

    fn backup_manager(&self) -> Result<&BackupManager, CoreError> {
        self.backups
            .as_ref()
            .ok_or_else(|| in_memory_session_error("use backups"))
    }

    fn snapshot_source(&self, description: &str, operation: &str) -> Result<(), CoreError> {
        let manager = self.backup_manager()?;
        manager.create_backup(description, operation).map_err(|e| {
            CoreError::new(
                CoreErrorCode::Backup,
                format!("backup failed, aborting edit: {e}"),
            )
        })?;
        Ok(())
    }

    fn persist(&mut self) -> Result<(), CoreError> {
        let path = self
            .source_path
            .clone()
            .ok_or_else(|| in_memory_session_error("persist edits"))?;
        self.container.recalculate_checksums();
        self.container.save_to(&path).map_err(|e| {
            CoreError::new(
                CoreErrorCode::Io,
                format!("failed to write {}: {e}", path.display()),
            )
        })
    }
}

fn parse_container(bytes: Vec<u8>, path: Option<&Path>) -> Result<SaveContainer, CoreError> {
    SaveContainer::from_bytes(bytes).map_err(|e| match path {
        Some(path) => CoreError::new(
            CoreErrorCode::Format,
            format!("failed to parse {}: {e}", path.display()),
        ),
        None => CoreError::new(CoreErrorCode::Format, format!("failed to parse input: {e}")),
    })
}

fn map_outcome(requested: usize, outcome: event_flags::BatchOutcome) -> FlagBatchOutcome {
    FlagBatchOutcome {
        requested,
        applied: outcome.applied,
        skipped: outcome.skipped.iter().map(|s| s.flag_id).collect(),
    }
}

fn in_memory_session_error(action: &str) -> CoreError {
    CoreError::new(
        CoreErrorCode::UnsupportedOperation,
        format!("cannot {action}: session was opened from bytes, not a file"),
    )
}
