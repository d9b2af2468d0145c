//! In-process row store.
//!
//! Rows live in a map keyed by spreadsheet and worksheet. Every operation
//! is counted so callers can assert how many remote round trips a sync
//! would have cost.

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;

use super::{RemoteRow, RowStore, StoreError, Worksheet};
use crate::clean::RowData;

type SheetKey = (String, String);

/// Row store backed by memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    sheets: RefCell<BTreeMap<SheetKey, Vec<RemoteRow>>>,
    next_id: Cell<u64>,
    lists: Cell<usize>,
    inserts: Cell<usize>,
    updates: Cell<usize>,
    deletes: Cell<usize>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a row directly, bypassing the write counters.
    ///
    /// Seeding the same key twice produces a duplicated sheet.
    pub fn seed(&self, target: &Worksheet, data: RowData) -> RemoteRow {
        let row = self.make_row(target, &data);
        self.sheets
            .borrow_mut()
            .entry(sheet_key(target))
            .or_default()
            .push(row.clone());
        row
    }

    /// Returns a snapshot of the rows in a worksheet.
    pub fn rows(&self, target: &Worksheet) -> Vec<RemoteRow> {
        self.sheets
            .borrow()
            .get(&sheet_key(target))
            .cloned()
            .unwrap_or_default()
    }

    /// Number of `list_rows` calls served.
    pub fn lists(&self) -> usize {
        self.lists.get()
    }

    /// Number of rows inserted.
    pub fn inserts(&self) -> usize {
        self.inserts.get()
    }

    /// Number of rows updated.
    pub fn updates(&self) -> usize {
        self.updates.get()
    }

    /// Number of rows deleted.
    pub fn deletes(&self) -> usize {
        self.deletes.get()
    }

    /// Total number of writes (inserts, updates and deletes).
    pub fn writes(&self) -> usize {
        self.inserts() + self.updates() + self.deletes()
    }

    fn make_row(&self, target: &Worksheet, data: &RowData) -> RemoteRow {
        let id = self.next_id.get() + 1;
        self.next_id.set(id);
        RemoteRow {
            id: id.to_string(),
            title: title_of(target, data),
            custom: data.clone(),
        }
    }
}

fn sheet_key(target: &Worksheet) -> SheetKey {
    (target.spreadsheet.clone(), target.worksheet.clone())
}

fn title_of(target: &Worksheet, data: &RowData) -> String {
    data.get(&target.key_column)
        .cloned()
        .flatten()
        .unwrap_or_default()
}

fn bump(counter: &Cell<usize>) {
    counter.set(counter.get() + 1);
}

impl RowStore for MemoryStore {
    fn list_rows(&self, target: &Worksheet) -> Result<Vec<RemoteRow>, StoreError> {
        bump(&self.lists);
        Ok(self.rows(target))
    }

    fn insert_row(&self, target: &Worksheet, data: &RowData) -> Result<RemoteRow, StoreError> {
        bump(&self.inserts);
        let row = self.make_row(target, data);
        self.sheets
            .borrow_mut()
            .entry(sheet_key(target))
            .or_default()
            .push(row.clone());
        Ok(row)
    }

    fn update_row(
        &self,
        target: &Worksheet,
        row: &RemoteRow,
        data: &RowData,
    ) -> Result<RemoteRow, StoreError> {
        bump(&self.updates);
        let mut sheets = self.sheets.borrow_mut();
        let existing = sheets
            .get_mut(&sheet_key(target))
            .and_then(|rows| rows.iter_mut().find(|r| r.id == row.id))
            .ok_or_else(|| StoreError::Unknown(row.id.clone()))?;

        existing.title = title_of(target, data);
        existing.custom = data.clone();
        Ok(existing.clone())
    }

    fn delete_row(&self, target: &Worksheet, row: &RemoteRow) -> Result<(), StoreError> {
        bump(&self.deletes);
        let mut sheets = self.sheets.borrow_mut();
        let rows = sheets
            .get_mut(&sheet_key(target))
            .ok_or_else(|| StoreError::Unknown(row.id.clone()))?;

        let before = rows.len();
        rows.retain(|r| r.id != row.id);
        if rows.len() == before {
            return Err(StoreError::Unknown(row.id.clone()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clean::clean;

    fn target() -> Worksheet {
        Worksheet::new("book", "od6", "pk")
    }

    #[test]
    fn test_insert_then_list() {
        let store = MemoryStore::new();
        let row = store
            .insert_row(&target(), &clean(vec![("pk", "1"), ("name", "Bond")]))
            .unwrap();

        assert_eq!(row.title, "1");
        let rows = store.list_rows(&target()).unwrap();
        assert_eq!(rows, vec![row]);
        assert_eq!(store.inserts(), 1);
        assert_eq!(store.lists(), 1);
    }

    #[test]
    fn test_seed_does_not_count_writes() {
        let store = MemoryStore::new();
        store.seed(&target(), clean(vec![("pk", "1")]));
        store.seed(&target(), clean(vec![("pk", "1")]));

        assert_eq!(store.rows(&target()).len(), 2);
        assert_eq!(store.writes(), 0);
    }

    #[test]
    fn test_update_replaces_contents() {
        let store = MemoryStore::new();
        let row = store.seed(&target(), clean(vec![("pk", "1"), ("name", "Bond")]));

        let updated = store
            .update_row(&target(), &row, &clean(vec![("pk", "1"), ("name", "Moneypenny")]))
            .unwrap();

        assert_eq!(updated.id, row.id);
        assert_eq!(updated.custom["name"].as_deref(), Some("Moneypenny"));
        assert_eq!(store.rows(&target())[0], updated);
    }

    #[test]
    fn test_delete_unknown_row_fails() {
        let store = MemoryStore::new();
        let row = store.seed(&target(), clean(vec![("pk", "1")]));
        store.delete_row(&target(), &row).unwrap();

        let result = store.delete_row(&target(), &row);
        assert!(matches!(result, Err(StoreError::Unknown(_))));
        assert!(store.rows(&target()).is_empty());
    }

    #[test]
    fn test_worksheets_are_isolated() {
        let store = MemoryStore::new();
        let other = Worksheet::new("book", "other", "pk");
        store.seed(&target(), clean(vec![("pk", "1")]));

        assert!(store.rows(&other).is_empty());
    }
}
