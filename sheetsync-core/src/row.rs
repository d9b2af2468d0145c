//! One local payload paired with its remote row, if any.

use crate::clean::{overlay, RowData};
use crate::convert::Convert;
use crate::error::{Result, SheetError};
use crate::sheet::Sheet;
use crate::store::{RemoteRow, RowStore};

/// What a save did remotely.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    /// A new remote row was inserted
    Created,
    /// The existing remote row was rewritten
    Updated,
    /// The remote row already matched; nothing was written
    Unchanged,
}

/// What a lenient delete did remotely.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// The remote row was removed
    Deleted,
    /// There was no remote row to remove
    Missing,
}

/// A reconciliation unit: converted local data plus the matching remote row.
///
/// Rows are created by [`Sheet::get`] and borrow their sheet. All remote
/// writes go through the sheet.
pub struct Row<'s, S: RowStore> {
    pub(crate) converted: RowData,
    pub(crate) key: String,
    pub(crate) entry: Option<RemoteRow>,
    pub(crate) sheet: &'s Sheet<S>,
}

impl<S: RowStore> std::fmt::Debug for Row<'_, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Row")
            .field("key", &self.key)
            .field("converted", &self.converted)
            .field("entry", &self.entry)
            .finish()
    }
}

impl<'s, S: RowStore> Row<'s, S> {
    /// Primary key value of this row.
    pub fn primary_key(&self) -> &str {
        &self.key
    }

    /// Cleaned local data.
    pub fn converted(&self) -> &RowData {
        &self.converted
    }

    /// True if a remote row is bound.
    pub fn exists(&self) -> bool {
        self.entry.is_some()
    }

    /// The bound remote row.
    pub fn entry(&self) -> Result<&RemoteRow> {
        self.entry
            .as_ref()
            .ok_or_else(|| SheetError::NotFound(self.key.clone()))
    }

    /// Data currently held remotely, including columns the payload
    /// doesn't know about.
    pub fn incoming(&self) -> Result<RowData> {
        Ok(self.entry()?.custom.clone())
    }

    /// Data to send remotely: incoming data with local values on top.
    pub fn outgoing(&self) -> RowData {
        match self.incoming() {
            Ok(incoming) => overlay(incoming, &self.converted),
            Err(_) => self.converted.clone(),
        }
    }

    /// True if a save would write anything.
    ///
    /// Only columns present remotely are compared, so a column that exists
    /// only locally does not count as drift by itself.
    pub fn out_of_sync(&self) -> bool {
        let Ok(incoming) = self.incoming() else {
            return true;
        };
        let outgoing = self.outgoing();
        incoming.iter().any(|(k, remote)| {
            outgoing
                .get(k)
                .is_some_and(|local| !same_cell(remote, local))
        })
    }

    /// Creates or updates the remote row.
    ///
    /// With `refresh`, an out-of-sync row first reloads the sheet's feed and
    /// rebinds to the freshest remote row for its key, so rows written by
    /// someone else since the feed was cached are updated, not duplicated.
    pub fn save(&mut self, refresh: bool) -> Result<SaveOutcome> {
        let sheet = self.sheet;
        if refresh && self.out_of_sync() {
            sheet.load_feed(true)?;
            self.entry = sheet.cached_entry(&self.key)?;
        }
        sheet.save(self)
    }

    /// Deletes the remote row.
    ///
    /// A row that doesn't exist remotely is not an error; it reports
    /// [`DeleteOutcome::Missing`]. Use [`Sheet::delete`] for the strict form.
    pub fn delete(&mut self) -> Result<DeleteOutcome> {
        match self.sheet.delete(&*self) {
            Ok(()) => {
                self.entry = None;
                Ok(DeleteOutcome::Deleted)
            }
            Err(SheetError::NotFound(_)) => Ok(DeleteOutcome::Missing),
            Err(e) => Err(e),
        }
    }

    /// Writes the remote data onto `payload`. Experimental.
    pub fn convert_back<P: Convert + ?Sized>(&self, payload: &mut P) -> Result<()> {
        payload.convert_back(&self.incoming()?)
    }
}

/// Blank cells compare equal whether they read back as `None` or `""`.
fn same_cell(a: &Option<String>, b: &Option<String>) -> bool {
    let a = a.as_deref().unwrap_or_default();
    let b = b.as_deref().unwrap_or_default();
    a == b
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clean::clean;
    use crate::sheet::SheetConfig;
    use crate::store::{MemoryStore, Worksheet};
    use serde_json::json;

    fn config() -> SheetConfig {
        SheetConfig::new("book", "od6")
    }

    fn target() -> Worksheet {
        config().worksheet_ref()
    }

    #[test]
    fn test_unbound_row() {
        let sheet = Sheet::new(MemoryStore::new(), config());
        let row = sheet.get(&json!({"pk": "1", "name": "Bond"})).unwrap();

        assert!(!row.exists());
        assert!(matches!(row.incoming(), Err(SheetError::NotFound(_))));
        assert_eq!(row.outgoing(), clean(vec![("pk", "1"), ("name", "Bond")]));
        assert!(row.out_of_sync());
    }

    #[test]
    fn test_outgoing_merges_remote_columns() {
        let store = MemoryStore::new();
        store.seed(&target(), clean(vec![("pk", "1"), ("a", "1"), ("b", "2")]));
        let sheet = Sheet::new(store, config());

        let row = sheet.get(&json!({"pk": "1", "b": "3", "c": "4"})).unwrap();
        assert_eq!(
            row.outgoing(),
            clean(vec![("pk", "1"), ("a", "1"), ("b", "3"), ("c", "4")])
        );
    }

    #[test]
    fn test_out_of_sync_detection() {
        let store = MemoryStore::new();
        store.seed(&target(), clean(vec![("pk", "1"), ("a", "1")]));
        let sheet = Sheet::new(store, config());

        let row = sheet.get(&json!({"pk": "1", "a": "1"})).unwrap();
        assert!(!row.out_of_sync());

        let row = sheet.get(&json!({"pk": "1", "a": "2"})).unwrap();
        assert!(row.out_of_sync());
    }

    #[test]
    fn test_local_only_column_is_not_drift() {
        let store = MemoryStore::new();
        store.seed(&target(), clean(vec![("pk", "1"), ("a", "1")]));
        let sheet = Sheet::new(store, config());

        let row = sheet.get(&json!({"pk": "1", "a": "1", "new": "x"})).unwrap();
        assert!(!row.out_of_sync());
    }

    #[test]
    fn test_blank_cells_compare_equal() {
        let store = MemoryStore::new();
        store.seed(&target(), clean(vec![("pk", Some("1")), ("note", Some(""))]));
        let sheet = Sheet::new(store, config());

        let row = sheet.get(&json!({"pk": "1", "note": null})).unwrap();
        assert!(!row.out_of_sync());
    }

    #[test]
    fn test_save_twice_writes_once() {
        let sheet = Sheet::new(MemoryStore::new(), config());
        let payload = json!({"pk": "1", "name": "Bond"});

        let mut row = sheet.get(&payload).unwrap();
        assert_eq!(row.save(false).unwrap(), SaveOutcome::Created);
        assert!(row.exists());
        assert_eq!(row.save(false).unwrap(), SaveOutcome::Unchanged);

        let mut again = sheet.get(&payload).unwrap();
        assert_eq!(again.save(false).unwrap(), SaveOutcome::Unchanged);
        assert_eq!(sheet.store().writes(), 1);
    }

    #[test]
    fn test_save_with_refresh_sees_other_writers() {
        let sheet = Sheet::new(MemoryStore::new(), config().cache_feed(true));
        let mut row = sheet.get(&json!({"pk": "1", "name": "Bond"})).unwrap();
        assert!(!row.exists());

        // Someone else creates the row after our feed was cached
        sheet
            .store()
            .seed(&target(), clean(vec![("pk", "1"), ("name", "Blofeld")]));

        assert_eq!(row.save(true).unwrap(), SaveOutcome::Updated);
        assert_eq!(sheet.store().inserts(), 0);
        assert_eq!(sheet.store().rows(&target()).len(), 1);
        assert_eq!(
            sheet.store().rows(&target())[0].custom["name"].as_deref(),
            Some("Bond")
        );
    }

    #[test]
    fn test_refresh_lists_once_without_cache() {
        let store = MemoryStore::new();
        store.seed(&target(), clean(vec![("pk", "1"), ("name", "Bond")]));
        let sheet = Sheet::new(store, config());

        let mut row = sheet.get(&json!({"pk": "1", "name": "James Bond"})).unwrap();
        assert_eq!(sheet.store().lists(), 1);

        assert_eq!(row.save(true).unwrap(), SaveOutcome::Updated);
        assert_eq!(sheet.store().lists(), 2);
    }

    #[test]
    fn test_delete_missing_is_noop() {
        let sheet = Sheet::new(MemoryStore::new(), config());
        let mut row = sheet.get(&json!({"pk": "1"})).unwrap();

        assert_eq!(row.delete().unwrap(), DeleteOutcome::Missing);
        assert_eq!(sheet.store().deletes(), 0);
    }

    #[test]
    fn test_delete_existing() {
        let store = MemoryStore::new();
        store.seed(&target(), clean(vec![("pk", "1")]));
        let sheet = Sheet::new(store, config());

        let mut row = sheet.get(&json!({"pk": "1"})).unwrap();
        assert_eq!(row.delete().unwrap(), DeleteOutcome::Deleted);
        assert!(!row.exists());
        assert!(sheet.store().rows(&target()).is_empty());

        assert_eq!(row.delete().unwrap(), DeleteOutcome::Missing);
    }

    #[test]
    fn test_convert_back_copies_remote_columns() {
        let store = MemoryStore::new();
        store.seed(&target(), clean(vec![("pk", "1"), ("rank", "00")]));
        let sheet = Sheet::new(store, config());

        let mut payload = json!({"pk": "1"});
        let row = sheet.get(&payload).unwrap();
        row.convert_back(&mut payload).unwrap();
        assert_eq!(payload["rank"], json!("00"));
    }
}
