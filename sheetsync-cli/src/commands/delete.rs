//! Delete rows by primary key.

use clap::Args;
use serde_json::{Map, Value};

use sheetsync_core::{DeleteOutcome, RowStore, Sheet, SheetError};

use super::CommandError;
use crate::config::Config;
use crate::remote::open_sheet;

/// Delete the rows for the given primary keys
#[derive(Debug, Args)]
pub struct DeleteCommand {
    /// Primary key values to delete
    #[arg(required = true)]
    keys: Vec<String>,

    /// Print the deletes instead of sending them
    #[arg(long)]
    dry_run: bool,
}

impl DeleteCommand {
    pub fn run(&self, config: &Config) -> Result<(), CommandError> {
        let mut config = config.clone();
        config.enable_cache_feed();
        let sheet = open_sheet(&config, self.dry_run)?;

        let mut failed = 0;
        for key in &self.keys {
            match delete_key(&sheet, key) {
                Ok(DeleteOutcome::Deleted) => println!("  ✓ {} deleted", key),
                Ok(DeleteOutcome::Missing) => println!("  - {} not in sheet", key),
                Err(e) => {
                    failed += 1;
                    println!("  ✗ {} - {}", key, e);
                }
            }
        }

        if failed > 0 {
            return Err(CommandError::Failed(failed));
        }
        Ok(())
    }
}

/// Deletes the row for `key`; a missing row is reported, not an error.
pub fn delete_key<S: RowStore>(sheet: &Sheet<S>, key: &str) -> Result<DeleteOutcome, SheetError> {
    let mut payload = Map::new();
    payload.insert(
        sheet.config().primary_key.clone(),
        Value::String(key.to_string()),
    );
    sheet.get(&payload)?.delete()
}

#[cfg(test)]
mod tests {
    use super::*;
    use sheetsync_core::{clean, MemoryStore, SheetConfig};

    #[test]
    fn test_delete_key() {
        let config = SheetConfig::new("book", "od6").primary_key("id");
        let target = config.worksheet_ref();
        let store = MemoryStore::new();
        store.seed(&target, clean(vec![("id", "1"), ("name", "Bond")]));
        let sheet = Sheet::new(store, config);

        assert_eq!(delete_key(&sheet, "1").unwrap(), DeleteOutcome::Deleted);
        assert_eq!(delete_key(&sheet, "1").unwrap(), DeleteOutcome::Missing);
        assert!(sheet.store().rows(&target).is_empty());
    }

    #[test]
    fn test_delete_key_duplicated() {
        let config = SheetConfig::new("book", "od6");
        let target = config.worksheet_ref();
        let store = MemoryStore::new();
        store.seed(&target, clean(vec![("pk", "1")]));
        store.seed(&target, clean(vec![("pk", "1")]));
        let sheet = Sheet::new(store, config);

        assert!(delete_key(&sheet, "1").unwrap_err().is_duplicate());
        assert_eq!(sheet.store().deletes(), 0);
    }
}
