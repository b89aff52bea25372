//! Client-local persistence of the history record.
//!
//! The record lives under `page-builder-history-<pageId>`. On session start
//! the stored record wins over the one the page loader supplies; anything that
//! fails to read or parse is logged and treated as absent.

use crate::collaborators::Page;
use crate::errors::EditorResult;
use crate::history::HistoryRecord;
use crate::schema::migrate_tree;
use pagebuilder_common::KeyValueStore;

pub const STORAGE_KEY_PREFIX: &str = "page-builder-history-";

pub fn storage_key(page_id: &str) -> String {
    format!("{}{}", STORAGE_KEY_PREFIX, page_id)
}

/// Where the initial record came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistorySource {
    /// Client-local storage
    Local,
    /// The page's own `history` field
    Server,
    /// Built from the page's components
    Fresh,
}

/// Read the stored record for a page, if there is a usable one
pub fn read_stored(store: &dyn KeyValueStore, page_id: &str) -> Option<HistoryRecord> {
    let key = storage_key(page_id);
    let raw = match store.get(&key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(err) => {
            tracing::warn!("Failed to read stored history '{}': {}", key, err);
            return None;
        }
    };

    match serde_json::from_str::<HistoryRecord>(&raw) {
        Ok(record) => Some(record),
        Err(err) => {
            tracing::warn!("Ignoring unreadable stored history '{}': {}", key, err);
            None
        }
    }
}

/// Pick the initial record: local storage, then the page's history, then a
/// fresh record over the page's components. Container nodes are migrated to
/// always carry `children`.
pub fn load_initial_record(page: &Page, store: &dyn KeyValueStore) -> (HistoryRecord, HistorySource) {
    if let Some(record) = read_stored(store, &page.id) {
        return (migrate_record(record), HistorySource::Local);
    }

    if let Some(raw) = &page.history {
        match serde_json::from_value::<HistoryRecord>(raw.clone()) {
            Ok(record) => return (migrate_record(record), HistorySource::Server),
            Err(err) => tracing::warn!("Ignoring invalid history on page '{}': {}", page.id, err),
        }
    }

    (
        HistoryRecord::initial(migrate_tree(&page.components)),
        HistorySource::Fresh,
    )
}

/// Write the record for a page
pub fn persist(store: &mut dyn KeyValueStore, page_id: &str, record: &HistoryRecord) -> EditorResult<()> {
    let json = serde_json::to_string(record)?;
    store.set(&storage_key(page_id), &json)?;
    tracing::debug!("persisted history for '{}' ({} bytes)", page_id, json.len());
    Ok(())
}

/// Drop the stored record for a page
pub fn clear(store: &mut dyn KeyValueStore, page_id: &str) -> EditorResult<()> {
    store.remove(&storage_key(page_id))?;
    Ok(())
}

fn migrate_record(record: HistoryRecord) -> HistoryRecord {
    HistoryRecord {
        past: record.past.iter().map(migrate_tree).collect(),
        present: migrate_tree(&record.present),
        future: record.future.iter().map(migrate_tree).collect(),
        ..record
    }
}
