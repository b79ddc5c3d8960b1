use crate::record::EmblemRecord;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tracing::warn;

/// The merged symbols dataset, keyed by record id.
///
/// Insertion order is part of the contract: the output file is kept under
/// review, and re-harvesting a country must update its record in place
/// instead of moving it to the end of the list.
#[derive(Debug, Default)]
pub struct SymbolStore {
    records: Vec<EmblemRecord>,
    index: HashMap<String, usize>,
}

impl SymbolStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the store from `path`.
    ///
    /// A missing file is simply an empty store. An unreadable or unparseable
    /// file is logged and treated as empty too; a corrupt dataset must never
    /// block a fresh harvest. Individual entries that do not match the record
    /// shape are skipped with a warning.
    pub fn load(path: &Path) -> Self {
        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Self::new(),
            Err(e) => {
                warn!("could not read {}: {}; starting empty", path.display(), e);
                return Self::new();
            }
        };

        let values: Vec<serde_json::Value> = match serde_json::from_str(&raw) {
            Ok(values) => values,
            Err(e) => {
                warn!("could not parse {}: {}; starting empty", path.display(), e);
                return Self::new();
            }
        };

        let mut store = Self::new();
        for value in values {
            match serde_json::from_value::<EmblemRecord>(value) {
                Ok(record) => store.upsert(record),
                Err(e) => warn!("skipping malformed entry in {}: {}", path.display(), e),
            }
        }
        store
    }

    /// Insert `record`, replacing any existing record with the same id in
    /// place.
    pub fn upsert(&mut self, record: EmblemRecord) {
        match self.index.get(&record.id) {
            Some(&pos) => {
                self.records[pos] = record;
            }
            None => {
                self.index.insert(record.id.clone(), self.records.len());
                self.records.push(record);
            }
        }
    }

    pub fn get(&self, id: &str) -> Option<&EmblemRecord> {
        self.index.get(id).map(|&pos| &self.records[pos])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn records(&self) -> &[EmblemRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Write the dataset to `path`, creating parent directories as needed.
    /// Pretty-printed with two-space indent; non-ASCII stays literal.
    pub fn save(&self, path: &Path) -> std::io::Result<()> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        let mut json = serde_json::to_string_pretty(&self.records)?;
        json.push('\n');
        fs::write(path, json)
    }
}
