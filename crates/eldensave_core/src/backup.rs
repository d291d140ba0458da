//! Snapshot store for the on-disk save file. Every mutating operation takes
//! a snapshot of what is currently persisted before anything is written, so
//! a backup always reflects pre-mutation bytes. Snapshots are stored
//! gzip-compressed next to the save, keyed by source path and timestamp,
//! with a JSON metadata sidecar. A backup whose sidecar never landed is not
//! part of the index.

use std::fs::{self, File};
use std::io::{self, Read, Write as _};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use flate2::Compression;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use serde::{Deserialize, Serialize};

const PAYLOAD_SUFFIX: &str = ".sl2.gz";
const METADATA_SUFFIX: &str = ".json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BackupMetadata {
    pub description: String,
    pub operation: String,
    pub source_path: String,
    pub created_unix_nanos: u128,
    pub original_len: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Backup {
    pub timestamp: u128,
    pub metadata: BackupMetadata,
    payload_path: PathBuf,
}

impl Backup {
    pub fn payload_path(&self) -> &Path {
        &self.payload_path
    }
}

/// How many snapshots to keep. Injected, never hard-coded: unbounded
/// accumulation of multi-megabyte snapshots is a real operational risk, but
/// the right bound belongs to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RetentionPolicy {
    max_backups: Option<usize>,
}

impl RetentionPolicy {
    pub fn keep_all() -> Self {
        Self { max_backups: None }
    }

    pub fn keep_last(n: usize) -> Self {
        Self {
            max_backups: Some(n),
        }
    }
}

#[derive(Debug, Clone)]
pub struct BackupManager {
    source_path: PathBuf,
    store_dir: PathBuf,
    retention: RetentionPolicy,
}

impl BackupManager {
    pub fn new(source_path: &Path) -> Self {
        Self::with_retention(source_path, RetentionPolicy::keep_all())
    }

    pub fn with_retention(source_path: &Path, retention: RetentionPolicy) -> Self {
        let stem = source_path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| "save".to_string());
        let store_dir = source_path
            .parent()
            .unwrap_or_else(|| Path::new("."))
            .join("backups")
            .join(stem);

        Self {
            source_path: source_path.to_path_buf(),
            store_dir,
            retention,
        }
    }

    pub fn store_dir(&self) -> &Path {
        &self.store_dir
    }

    /// Snapshot the bytes currently on disk at the source path. Reads the
    /// file, not any in-memory buffer, so it must run before the caller
    /// writes. A failure here means the caller's mutation must not proceed.
    pub fn create_backup(&self, description: &str, operation: &str) -> io::Result<Backup> {
        let bytes = fs::read(&self.source_path).map_err(|e| {
            io::Error::new(
                e.kind(),
                format!(
                    "cannot snapshot {}: {e}",
                    self.source_path.display()
                ),
            )
        })?;

        fs::create_dir_all(&self.store_dir)?;

        let mut timestamp = unix_nanos()?;
        while self
            .store_dir
            .join(format!("{timestamp}{METADATA_SUFFIX}"))
            .exists()
        {
            timestamp += 1;
        }
        let payload_path = self.store_dir.join(format!("{timestamp}{PAYLOAD_SUFFIX}"));
        let metadata_path = self.store_dir.join(format!("{timestamp}{METADATA_SUFFIX}"));

        let metadata = BackupMetadata {
            description: description.to_string(),
            operation: operation.to_string(),
            source_path: self.source_path.to_string_lossy().to_string(),
            created_unix_nanos: timestamp,
            original_len: bytes.len(),
        };

        // Payload first, sidecar second: a snapshot is committed only once
        // its sidecar exists, so neither write can leave a half-entry listed.
        if let Err(e) = write_compressed_atomically(&payload_path, &bytes) {
            let _ = fs::remove_file(&payload_path);
            return Err(e);
        }
        let json = serde_json::to_vec_pretty(&metadata)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        if let Err(e) = write_file_atomically(&metadata_path, &json) {
            let _ = fs::remove_file(&payload_path);
            let _ = fs::remove_file(&metadata_path);
            return Err(e);
        }

        self.prune()?;

        Ok(Backup {
            timestamp,
            metadata,
            payload_path,
        })
    }

    /// Committed snapshots, most recent first.
    pub fn list_backups(&self) -> io::Result<Vec<Backup>> {
        let entries = match fs::read_dir(&self.store_dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e),
        };

        let mut backups = Vec::new();
        for entry in entries {
            let entry = entry?;
            let name = entry.file_name().to_string_lossy().to_string();
            let Some(stem) = name.strip_suffix(METADATA_SUFFIX) else {
                continue;
            };
            let Ok(timestamp) = stem.parse::<u128>() else {
                continue;
            };

            let payload_path = self.store_dir.join(format!("{timestamp}{PAYLOAD_SUFFIX}"));
            if !payload_path.is_file() {
                continue;
            }

            let json = fs::read(entry.path())?;
            let metadata: BackupMetadata = serde_json::from_slice(&json)
                .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

            backups.push(Backup {
                timestamp,
                metadata,
                payload_path,
            });
        }

        backups.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(backups)
    }

    /// The stored pre-mutation bytes, exactly as snapshotted. Writing them
    /// back is the caller's job and goes through the usual serialize path.
    pub fn restore(&self, backup: &Backup) -> io::Result<Vec<u8>> {
        let file = File::open(&backup.payload_path)?;
        let mut decoder = GzDecoder::new(file);
        let mut bytes = Vec::with_capacity(backup.metadata.original_len);
        decoder.read_to_end(&mut bytes)?;

        if bytes.len() != backup.metadata.original_len {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!(
                    "backup {} decompressed to {} bytes, expected {}",
                    backup.timestamp,
                    bytes.len(),
                    backup.metadata.original_len
                ),
            ));
        }
        Ok(bytes)
    }

    fn prune(&self) -> io::Result<()> {
        let Some(max_backups) = self.retention.max_backups else {
            return Ok(());
        };

        let backups = self.list_backups()?;
        for stale in backups.iter().skip(max_backups) {
            let _ = fs::remove_file(&stale.payload_path);
            let _ = fs::remove_file(
                self.store_dir
                    .join(format!("{}{METADATA_SUFFIX}", stale.timestamp)),
            );
        }
        Ok(())
    }
}

fn unix_nanos() -> io::Result<u128> {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .map_err(io::Error::other)
}

fn write_compressed_atomically(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(bytes)?;
    let compressed = encoder.finish()?;
    write_file_atomically(path, &compressed)
}

fn write_file_atomically(path: &Path, bytes: &[u8]) -> io::Result<()> {
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
