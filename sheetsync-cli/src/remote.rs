//! Opening the configured sheet, optionally in dry-run mode.

use std::cell::Cell;

use sheetsync_core::{
    RemoteRow, RowData, RowStore, Sheet, SheetsApiStore, StoreError, Worksheet,
};

use crate::config::{Config, ConfigError};

/// Store type used by the commands.
pub type CliStore = Box<dyn RowStore>;

/// Opens the sheet described by `config`.
///
/// With `dry_run`, reads go to the real store and writes are only printed.
pub fn open_sheet(config: &Config, dry_run: bool) -> Result<Sheet<CliStore>, ConfigError> {
    let sheet_config = config.sheet_config()?;
    let token = config
        .access_token
        .value
        .clone()
        .ok_or(ConfigError::Missing("access_token"))?;

    let mut api = SheetsApiStore::new(token).with_base_url(config.api_base_url.value.clone());
    if let Some(source) = &config.source.value {
        api = api.with_source(source.clone());
    }

    let store: CliStore = if dry_run {
        Box::new(DryRunStore::new(api))
    } else {
        Box::new(api)
    };

    tracing::debug!(
        "Opened {}/{} (primary key '{}', cache_feed {})",
        sheet_config.spreadsheet,
        sheet_config.worksheet,
        sheet_config.primary_key,
        sheet_config.cache_feed
    );
    Ok(Sheet::new(store, sheet_config))
}

/// Wraps a store so that listing is real and writes are printed instead.
pub struct DryRunStore<S> {
    inner: S,
    next_id: Cell<usize>,
}

impl<S: RowStore> DryRunStore<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            next_id: Cell::new(0),
        }
    }
}

fn describe(data: &RowData) -> String {
    data.iter()
        .map(|(k, v)| format!("{}={}", k, v.as_deref().unwrap_or("")))
        .collect::<Vec<_>>()
        .join(", ")
}

impl<S: RowStore> RowStore for DryRunStore<S> {
    fn list_rows(&self, target: &Worksheet) -> Result<Vec<RemoteRow>, StoreError> {
        self.inner.list_rows(target)
    }

    fn insert_row(&self, target: &Worksheet, data: &RowData) -> Result<RemoteRow, StoreError> {
        let id = self.next_id.get() + 1;
        self.next_id.set(id);
        println!("  [dry-run] insert into {}: {}", target, describe(data));

        Ok(RemoteRow {
            id: format!("dry-run-{}", id),
            title: data
                .get(&target.key_column)
                .cloned()
                .flatten()
                .unwrap_or_default(),
            custom: data.clone(),
        })
    }

    fn update_row(
        &self,
        target: &Worksheet,
        row: &RemoteRow,
        data: &RowData,
    ) -> Result<RemoteRow, StoreError> {
        println!(
            "  [dry-run] update row {} in {}: {}",
            row.id,
            target,
            describe(data)
        );
        Ok(RemoteRow {
            custom: data.clone(),
            ..row.clone()
        })
    }

    fn delete_row(&self, target: &Worksheet, row: &RemoteRow) -> Result<(), StoreError> {
        println!(
            "  [dry-run] delete row {} ('{}') from {}",
            row.id, row.title, target
        );
        Ok(())
    }
}
