mod engine;
mod error;
mod flag_catalog;
mod types;
mod well_known_flags;

pub use engine::{Engine, Session};
pub use error::{CoreError, CoreErrorCode};
pub use flag_catalog::FlagCatalog;
pub use types::{BackupEntry, FlagBatchOutcome, FlagCatalogEntry, FlagState, SlotSummary};
