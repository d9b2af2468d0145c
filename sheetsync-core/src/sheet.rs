//! The sheet: feed cache and create/update/delete decisions.
//!
//! A [`Sheet`] owns a [`RowStore`] and a cache of the remote rows grouped
//! by primary key. The cache keeps every row listed for a key, so
//! duplicates stay visible until they are deduplicated.
//!
//! # Usage
//!
//! ```
//! use sheetsync_core::{MemoryStore, SaveOutcome, Sheet, SheetConfig};
//! use serde_json::json;
//!
//! let sheet = Sheet::new(MemoryStore::new(), SheetConfig::new("book", "od6"));
//! let mut row = sheet.get(&json!({"pk": 7, "name": "Bond"})).unwrap();
//! assert_eq!(row.save(false).unwrap(), SaveOutcome::Created);
//! assert_eq!(row.save(false).unwrap(), SaveOutcome::Unchanged);
//! ```

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;

use crate::clean::{clean, IntoCell};
use crate::convert::Convert;
use crate::dedup::{DedupStrategy, FirstSeen};
use crate::error::{Result, SheetError};
use crate::row::{Row, SaveOutcome};
use crate::store::{RemoteRow, RowStore, Worksheet};

/// Primary key column used when none is configured.
pub const DEFAULT_PRIMARY_KEY: &str = "pk";

/// Remote rows grouped by primary key, in listing order.
pub type FeedCache = BTreeMap<String, Vec<RemoteRow>>;

/// Fixed settings of a [`Sheet`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetConfig {
    /// Spreadsheet identifier
    pub spreadsheet: String,
    /// Worksheet within the spreadsheet
    pub worksheet: String,
    /// Column matching local payloads to remote rows
    pub primary_key: String,
    /// Reuse the feed across calls instead of relisting every time
    pub cache_feed: bool,
}

impl SheetConfig {
    /// Creates a config with the default primary key and caching off.
    pub fn new(spreadsheet: impl Into<String>, worksheet: impl Into<String>) -> Self {
        Self {
            spreadsheet: spreadsheet.into(),
            worksheet: worksheet.into(),
            primary_key: DEFAULT_PRIMARY_KEY.to_string(),
            cache_feed: false,
        }
    }

    pub fn primary_key(mut self, primary_key: impl Into<String>) -> Self {
        self.primary_key = primary_key.into();
        self
    }

    pub fn cache_feed(mut self, cache_feed: bool) -> Self {
        self.cache_feed = cache_feed;
        self
    }

    /// The worksheet address handed to the store.
    pub fn worksheet_ref(&self) -> Worksheet {
        Worksheet::new(&self.spreadsheet, &self.worksheet, &self.primary_key)
    }
}

/// Target of [`Sheet::delete`]: a row or a raw remote handle.
#[derive(Debug, Clone, Copy)]
pub enum DeleteTarget<'a> {
    Row {
        key: &'a str,
        entry: Option<&'a RemoteRow>,
    },
    Entry(&'a RemoteRow),
}

impl<'a, S: RowStore> From<&'a Row<'_, S>> for DeleteTarget<'a> {
    fn from(row: &'a Row<'_, S>) -> Self {
        DeleteTarget::Row {
            key: &row.key,
            entry: row.entry.as_ref(),
        }
    }
}

impl<'a> From<&'a RemoteRow> for DeleteTarget<'a> {
    fn from(entry: &'a RemoteRow) -> Self {
        DeleteTarget::Entry(entry)
    }
}

/// A remote worksheet synced by primary key.
///
/// The feed cache sits behind a `RefCell`; a `Sheet` is meant to be driven
/// from one thread.
pub struct Sheet<S> {
    store: S,
    config: SheetConfig,
    target: Worksheet,
    cache: RefCell<FeedCache>,
    loaded: Cell<bool>,
}

impl<S: RowStore> Sheet<S> {
    pub fn new(store: S, config: SheetConfig) -> Self {
        let target = config.worksheet_ref();
        Self {
            store,
            config,
            target,
            cache: RefCell::new(FeedCache::new()),
            loaded: Cell::new(false),
        }
    }

    pub fn config(&self) -> &SheetConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Returns a snapshot of the feed, listing remote rows when caching is
    /// off, `refresh` is set, or nothing has been listed yet.
    ///
    /// Uncached, every call costs a full listing of the worksheet.
    pub fn feed(&self, refresh: bool) -> Result<FeedCache> {
        self.load_feed(refresh)?;
        Ok(self.cache.borrow().clone())
    }

    pub(crate) fn load_feed(&self, refresh: bool) -> Result<()> {
        if self.config.cache_feed && !refresh && self.loaded.get() {
            tracing::debug!("Using cached feed for {}", self.target);
            return Ok(());
        }

        let rows = self.store.list_rows(&self.target)?;
        let total = rows.len();
        let mut grouped = FeedCache::new();
        for row in rows {
            grouped.entry(row.title.clone()).or_default().push(row);
        }

        let duplicated = grouped
            .iter()
            .filter(|(key, rows)| !key.is_empty() && rows.len() > 1)
            .count();
        if duplicated > 0 {
            tracing::warn!(
                "{} key(s) in {} have duplicate rows",
                duplicated,
                self.target
            );
        }
        tracing::debug!("Loaded {} row(s) from {}", total, self.target);

        *self.cache.borrow_mut() = grouped;
        self.loaded.set(true);
        Ok(())
    }

    /// Looks up the single remote row for `pk`.
    ///
    /// Absence is `Ok(None)`; more than one row is
    /// [`SheetError::DuplicateEntries`].
    pub fn find_entry(&self, pk: &str) -> Result<Option<RemoteRow>> {
        self.load_feed(false)?;
        self.cached_entry(pk)
    }

    /// [`find_entry`](Self::find_entry) against the feed as currently held.
    pub(crate) fn cached_entry(&self, pk: &str) -> Result<Option<RemoteRow>> {
        let cache = self.cache.borrow();
        let rows = cache.get(pk).map(Vec::as_slice);
        match rows {
            None | Some([]) => Ok(None),
            Some([row]) => Ok(Some(row.clone())),
            Some(rows) => Err(SheetError::DuplicateEntries {
                key: pk.to_string(),
                count: rows.len(),
            }),
        }
    }

    /// Like [`find_entry`](Self::find_entry), but absence is
    /// [`SheetError::NotFound`].
    pub fn entry(&self, pk: &str) -> Result<RemoteRow> {
        self.find_entry(pk)?
            .ok_or_else(|| SheetError::NotFound(pk.to_string()))
    }

    /// Builds the row for `payload`, bound to its remote row if one exists.
    ///
    /// Duplicate remote rows are an error: deduplicate and retry.
    pub fn get<P: Convert + ?Sized>(&self, payload: &P) -> Result<Row<'_, S>> {
        let data = payload.convert()?;
        let key = data
            .get(&self.config.primary_key)
            .into_cell()
            .filter(|key| !key.is_empty())
            .ok_or_else(|| SheetError::MissingPrimaryKey(self.config.primary_key.clone()))?;
        let entry = self.find_entry(&key)?;

        Ok(Row {
            converted: clean(data),
            key,
            entry,
            sheet: self,
        })
    }

    /// Rows among `payloads` that a save would write.
    pub fn out_of_sync_rows<'p, P, I>(&self, payloads: I) -> Result<Vec<Row<'_, S>>>
    where
        P: Convert + ?Sized + 'p,
        I: IntoIterator<Item = &'p P>,
    {
        let mut rows = Vec::new();
        for payload in payloads {
            let row = self.get(payload)?;
            if row.out_of_sync() {
                rows.push(row);
            }
        }
        Ok(rows)
    }

    /// Inserts `row` remotely. Fails without writing if it already exists.
    pub fn create(&self, row: &mut Row<'_, S>) -> Result<()> {
        if row.exists() {
            return Err(SheetError::AlreadyExists(row.key.clone()));
        }

        let created = self.store.insert_row(&self.target, &row.outgoing())?;
        tracing::info!("Created row '{}' in {}", row.key, self.target);

        self.remember(created.clone());
        row.entry = Some(created);
        Ok(())
    }

    /// Pushes `row`'s outgoing data over its remote row.
    pub fn update(&self, row: &mut Row<'_, S>) -> Result<()> {
        let entry = row.entry()?;
        let updated = self
            .store
            .update_row(&self.target, entry, &row.outgoing())?;
        tracing::info!("Updated row '{}' in {}", row.key, self.target);

        self.forget(entry);
        self.remember(updated.clone());
        row.entry = Some(updated);
        Ok(())
    }

    /// Creates the row, or updates it if it exists and is out of sync.
    ///
    /// Saving an unchanged row again writes nothing.
    pub fn save(&self, row: &mut Row<'_, S>) -> Result<SaveOutcome> {
        match self.create(row) {
            Ok(()) => Ok(SaveOutcome::Created),
            Err(SheetError::AlreadyExists(_)) => {
                if row.out_of_sync() {
                    self.update(row)?;
                    Ok(SaveOutcome::Updated)
                } else {
                    tracing::debug!("Row '{}' is up to date", row.key);
                    Ok(SaveOutcome::Unchanged)
                }
            }
            Err(e) => Err(e),
        }
    }

    /// Deletes a row or remote handle. An unbound row is
    /// [`SheetError::NotFound`].
    pub fn delete<'a>(&self, target: impl Into<DeleteTarget<'a>>) -> Result<()> {
        let entry = match target.into() {
            DeleteTarget::Row { entry: Some(entry), .. } => entry,
            DeleteTarget::Row { key, entry: None } => {
                return Err(SheetError::NotFound(key.to_string()))
            }
            DeleteTarget::Entry(entry) => entry,
        };

        self.store.delete_row(&self.target, entry)?;
        tracing::info!("Deleted row '{}' from {}", entry.title, self.target);
        self.forget(entry);
        Ok(())
    }

    /// Deletes all but the first row of every duplicated key.
    ///
    /// Returns the keys that were cleaned up.
    pub fn deduplicate(&self) -> Result<Vec<String>> {
        self.deduplicate_with(&FirstSeen)
    }

    /// Deletes duplicate rows, keeping the one `strategy` picks per key.
    ///
    /// Rows with a blank key cell are left alone.
    pub fn deduplicate_with<D: DedupStrategy + ?Sized>(&self, strategy: &D) -> Result<Vec<String>> {
        self.load_feed(false)?;
        let duplicated: Vec<(String, Vec<RemoteRow>)> = self
            .cache
            .borrow()
            .iter()
            .filter(|(key, rows)| !key.is_empty() && rows.len() > 1)
            .map(|(key, rows)| (key.clone(), rows.clone()))
            .collect();

        let mut cleaned = Vec::with_capacity(duplicated.len());
        for (key, rows) in duplicated {
            let keep = strategy.keep(&key, &rows).min(rows.len() - 1);
            for (i, row) in rows.iter().enumerate() {
                if i == keep {
                    continue;
                }
                self.store.delete_row(&self.target, row)?;
                self.forget(row);
            }
            tracing::warn!(
                "Removed {} duplicate row(s) for '{}' from {}",
                rows.len() - 1,
                key,
                self.target
            );
            cleaned.push(key);
        }
        Ok(cleaned)
    }

    /// Records a newly written row in the cache.
    fn remember(&self, row: RemoteRow) {
        self.cache
            .borrow_mut()
            .entry(row.title.clone())
            .or_default()
            .push(row);
    }

    /// Drops a row from the cache.
    fn forget(&self, row: &RemoteRow) {
        let mut cache = self.cache.borrow_mut();
        if let Some(rows) = cache.get_mut(&row.title) {
            rows.retain(|r| r.id != row.id);
            if rows.is_empty() {
                cache.remove(&row.title);
            }
        }
    }
}
