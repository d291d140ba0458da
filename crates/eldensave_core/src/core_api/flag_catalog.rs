use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use super::error::{CoreError, CoreErrorCode};
use super::types::FlagCatalogEntry;
use super::well_known_flags::WELL_KNOWN_FLAGS;

/// Immutable flag-name lookup table. Built once (from the built-in table, a
/// TSV file, or both) and injected into whatever needs display names; the
/// core never mutates it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FlagCatalog {
    entries: BTreeMap<u64, FlagCatalogEntry>,
}

impl FlagCatalog {
    /// The built-in documented subset.
    pub fn builtin() -> Self {
        let mut entries = BTreeMap::new();
        for flag in WELL_KNOWN_FLAGS {
            entries.insert(
                flag.id,
                FlagCatalogEntry {
                    flag_id: flag.id,
                    category: flag.category.to_string(),
                    subcategory: if flag.subcategory.is_empty() {
                        None
                    } else {
                        Some(flag.subcategory.to_string())
                    },
                    name: flag.name.to_string(),
                },
            );
        }
        Self { entries }
    }

    /// Load a tab-separated catalog: `flag_id<TAB>category<TAB>subcategory
    /// <TAB>name` per line, `#` comments, empty subcategory allowed.
    pub fn load_tsv(path: &Path) -> Result<Self, CoreError> {
        let contents = fs::read_to_string(path).map_err(|e| {
            CoreError::new(
                CoreErrorCode::Io,
                format!("failed to read {}: {e}", path.display()),
            )
        })?;

        let mut entries = BTreeMap::new();
        for (line_number, line) in contents.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let mut fields = line.splitn(4, '\t');
            let (Some(id_field), Some(category), Some(subcategory), Some(name)) = (
                fields.next(),
                fields.next(),
                fields.next(),
                fields.next(),
            ) else {
                return Err(CoreError::new(
                    CoreErrorCode::Format,
                    format!(
                        "{}:{}: expected 4 tab-separated fields",
                        path.display(),
                        line_number + 1
                    ),
                ));
            };

            let flag_id = id_field.trim().parse::<u64>().map_err(|e| {
                CoreError::new(
                    CoreErrorCode::Format,
                    format!(
                        "{}:{}: invalid flag id {id_field:?}: {e}",
                        path.display(),
                        line_number + 1
                    ),
                )
            })?;

            entries.insert(
                flag_id,
                FlagCatalogEntry {
                    flag_id,
                    category: category.trim().to_string(),
                    subcategory: match subcategory.trim() {
                        "" => None,
                        s => Some(s.to_string()),
                    },
                    name: name.trim().to_string(),
                },
            );
        }

        if entries.is_empty() {
            return Err(CoreError::new(
                CoreErrorCode::Format,
                format!("no catalog entries found in {}", path.display()),
            ));
        }

        Ok(Self { entries })
    }

    /// The built-in table with a loaded file layered on top; file entries
    /// win on ID collisions.
    pub fn builtin_with_tsv(path: &Path) -> Result<Self, CoreError> {
        let mut merged = Self::builtin();
        let loaded = Self::load_tsv(path)?;
        merged.entries.extend(loaded.entries);
        Ok(merged)
    }

    pub fn get(&self, flag_id: u64) -> Option<&FlagCatalogEntry> {
        self.entries.get(&flag_id)
    }

    pub fn name(&self, flag_id: u64) -> Option<&str> {
        self.entries.get(&flag_id).map(|e| e.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Distinct categories in sorted order.
    pub fn categories(&self) -> Vec<&str> {
        let mut out: Vec<&str> = self.entries.values().map(|e| e.category.as_str()).collect();
        out.sort_unstable();
        out.dedup();
        out
    }

    pub fn subcategories(&self, category: &str) -> Vec<&str> {
        let mut out: Vec<&str> = self
            .entries
            .values()
            .filter(|e| e.category == category)
            .filter_map(|e| e.subcategory.as_deref())
            .collect();
        out.sort_unstable();
        out.dedup();
        out
    }

    /// Flag IDs under a category, optionally narrowed to one subcategory,
    /// in ascending ID order.
    pub fn flags_in_category(&self, category: &str, subcategory: Option<&str>) -> Vec<u64> {
        self.entries
            .values()
            .filter(|e| e.category == category)
            .filter(|e| match subcategory {
                Some(sub) => e.subcategory.as_deref() == Some(sub),
                None => true,
            })
            .map(|e| e.flag_id)
            .collect()
    }

    /// IDs whose name or decimal ID contains the term, case-insensitively.
    pub fn search(&self, term: &str) -> Vec<u64> {
        let needle = term.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }
        self.entries
            .values()
            .filter(|e| {
                e.name.to_lowercase().contains(&needle) || e.flag_id.to_string().contains(&needle)
            })
            .map(|e| e.flag_id)
            .collect()
    }
}
