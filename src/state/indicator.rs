//! Indicator management: drawer form state and optimistic list updates.
//!
//! SYSTEM CONTEXT
//! ==============
//! The indicator page lists rows from the query cache and edits them in a side
//! drawer. Saving writes the row into the cached list immediately, with its
//! category and owner labels backfilled from the cached lookup tables, then
//! reconciles with the server response or rolls the list back.

#[cfg(test)]
#[path = "indicator_test.rs"]
mod indicator_test;

use crate::net::api::{ApiError, IndicatorApi};
use crate::net::types::Indicator;
use crate::query::cache::{QueryCache, QueryKey, QueryOptions, QueryOverrides};
use crate::util::enrich::{FieldMapping, FieldMappings, enrich_as};

pub const CATEGORY_CONFIG_KEY: &str = "indicator_category";
pub const USERS_CONFIG_KEY: &str = "users";
const TEMP_ID_PREFIX: &str = "tmp-";

pub fn indicator_list_key() -> QueryKey {
    QueryKey::new(["indicator", "list"])
}

pub fn indicator_list_options() -> QueryOptions {
    QueryOptions::default().merge(QueryOverrides {
        stale_time: Some(std::time::Duration::from_secs(30)),
        ..QueryOverrides::default()
    })
}

/// Id fields backfilled with labels before the server confirms a save.
pub fn indicator_field_mappings() -> FieldMappings {
    let mut mappings = FieldMappings::new();
    mappings.insert("categoryId".to_owned(), FieldMapping::new("categoryName", CATEGORY_CONFIG_KEY));
    mappings.insert("ownerId".to_owned(), FieldMapping::new("ownerName", USERS_CONFIG_KEY));
    mappings
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DraftError {
    #[error("{0} is required")]
    Required(&'static str),
    #[error("code may only contain letters, digits, '-' and '_'")]
    InvalidCode,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SaveError {
    #[error(transparent)]
    Draft(#[from] DraftError),
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Editable copy of an indicator. `id` is `None` when creating.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct IndicatorDraft {
    pub id: Option<String>,
    pub name: String,
    pub code: String,
    pub unit: String,
    pub category_id: Option<String>,
    pub owner_id: Option<String>,
    pub enabled: bool,
    pub remark: String,
}

impl IndicatorDraft {
    pub fn new() -> Self {
        Self { enabled: true, ..Self::default() }
    }

    pub fn from_indicator(indicator: &Indicator) -> Self {
        Self {
            id: Some(indicator.id.clone()),
            name: indicator.name.clone(),
            code: indicator.code.clone(),
            unit: indicator.unit.clone(),
            category_id: indicator.category_id.clone(),
            owner_id: indicator.owner_id.clone(),
            enabled: indicator.enabled,
            remark: indicator.remark.clone(),
        }
    }

    /// # Errors
    ///
    /// Returns the first failing rule: name, then code presence, then code charset.
    pub fn validate(&self) -> Result<(), DraftError> {
        if self.name.trim().is_empty() {
            return Err(DraftError::Required("name"));
        }
        let code = self.code.trim();
        if code.is_empty() {
            return Err(DraftError::Required("code"));
        }
        if !code.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_') {
            return Err(DraftError::InvalidCode);
        }
        Ok(())
    }

    /// Build the row to send and to show optimistically. New rows get a
    /// temporary id until the server assigns one.
    pub fn to_indicator(&self) -> Indicator {
        Indicator {
            id: self.id.clone().unwrap_or_else(|| format!("{TEMP_ID_PREFIX}{}", uuid::Uuid::new_v4())),
            name: self.name.trim().to_owned(),
            code: self.code.trim().to_owned(),
            unit: self.unit.trim().to_owned(),
            category_id: self.category_id.clone().filter(|v| !v.is_empty()),
            category_name: None,
            owner_id: self.owner_id.clone().filter(|v| !v.is_empty()),
            owner_name: None,
            enabled: self.enabled,
            remark: self.remark.clone(),
        }
    }
}

pub fn is_temporary_id(id: &str) -> bool {
    id.starts_with(TEMP_ID_PREFIX)
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum DrawerMode {
    #[default]
    Create,
    Edit,
}

/// Side drawer holding the indicator form.
#[derive(Clone, Debug, Default)]
pub struct IndicatorDrawer {
    pub open: bool,
    pub mode: DrawerMode,
    pub draft: IndicatorDraft,
    pub error: Option<String>,
    pub saving: bool,
}

impl IndicatorDrawer {
    pub fn open_create(&mut self) {
        *self = Self { open: true, mode: DrawerMode::Create, draft: IndicatorDraft::new(), ..Self::default() };
    }

    pub fn open_edit(&mut self, indicator: &Indicator) {
        *self = Self {
            open: true,
            mode: DrawerMode::Edit,
            draft: IndicatorDraft::from_indicator(indicator),
            ..Self::default()
        };
    }

    pub fn close(&mut self) {
        *self = Self::default();
    }

    pub fn title(&self) -> &'static str {
        match self.mode {
            DrawerMode::Create => "New indicator",
            DrawerMode::Edit => "Edit indicator",
        }
    }
}

/// What the cached list looked like before an optimistic write.
#[derive(Clone, Debug, PartialEq)]
pub struct ListSnapshot {
    previous: Option<Vec<Indicator>>,
}

/// Insert or replace `row` (enriched) in the cached list.
pub fn apply_optimistic_save(cache: &QueryCache, row: &Indicator) -> ListSnapshot {
    let key = indicator_list_key();
    let previous: Option<Vec<Indicator>> = cache.get_query_data(&key);
    let enriched = enrich_as(row, &indicator_field_mappings(), cache);

    let mut list = previous.clone().unwrap_or_default();
    match list.iter_mut().find(|item| item.id == enriched.id) {
        Some(existing) => *existing = enriched,
        None => list.insert(0, enriched),
    }
    cache.set_query_data(&key, &list);
    ListSnapshot { previous }
}

/// Remove `id` from the cached list.
pub fn apply_optimistic_delete(cache: &QueryCache, id: &str) -> ListSnapshot {
    let key = indicator_list_key();
    let previous: Option<Vec<Indicator>> = cache.get_query_data(&key);
    if let Some(list) = &previous {
        let remaining: Vec<Indicator> = list.iter().filter(|item| item.id != id).cloned().collect();
        cache.set_query_data(&key, &remaining);
    }
    ListSnapshot { previous }
}

/// Restore the list captured by an optimistic write.
pub fn rollback(cache: &QueryCache, snapshot: ListSnapshot) {
    let key = indicator_list_key();
    match snapshot.previous {
        Some(list) => cache.set_query_data(&key, &list),
        None => cache.remove(&key),
    }
}

/// An optimistic save waiting for the server.
#[derive(Debug)]
pub struct PendingSave {
    row: Indicator,
    snapshot: ListSnapshot,
}

impl PendingSave {
    /// The row as shown in the list while the request is in flight.
    pub fn row(&self) -> &Indicator {
        &self.row
    }

    /// Send the row, then swap in the server's version or roll the list back.
    ///
    /// # Errors
    ///
    /// Returns the API error after restoring the list.
    pub async fn commit<A>(self, cache: &QueryCache, api: &A) -> Result<Indicator, ApiError>
    where
        A: IndicatorApi + ?Sized,
    {
        let mut outgoing = self.row.clone();
        if is_temporary_id(&outgoing.id) {
            outgoing.id.clear();
        }
        match api.save_indicator(&outgoing).await {
            Ok(saved) => {
                replace_row(cache, &self.row.id, &saved);
                cache.invalidate(&indicator_list_key());
                Ok(saved)
            }
            Err(e) => {
                log::warn!("saving indicator {} failed: {e}", self.row.code);
                rollback(cache, self.snapshot);
                Err(e)
            }
        }
    }
}

/// Validate the draft and write it into the cached list.
///
/// # Errors
///
/// Returns the validation error without touching the cache.
pub fn begin_save(cache: &QueryCache, draft: &IndicatorDraft) -> Result<PendingSave, DraftError> {
    draft.validate()?;
    let row = draft.to_indicator();
    let snapshot = apply_optimistic_save(cache, &row);
    Ok(PendingSave { row, snapshot })
}

/// [`begin_save`] followed by [`PendingSave::commit`].
///
/// # Errors
///
/// Returns [`SaveError::Draft`] without touching the cache when the draft is
/// invalid, or [`SaveError::Api`] after rolling the list back.
pub async fn save_indicator<A>(cache: &QueryCache, api: &A, draft: &IndicatorDraft) -> Result<Indicator, SaveError>
where
    A: IndicatorApi + ?Sized,
{
    let pending = begin_save(cache, draft)?;
    Ok(pending.commit(cache, api).await?)
}

/// An optimistic delete waiting for the server.
#[derive(Debug)]
pub struct PendingDelete {
    id: String,
    snapshot: ListSnapshot,
}

impl PendingDelete {
    /// # Errors
    ///
    /// Returns the API error after restoring the list.
    pub async fn commit<A>(self, cache: &QueryCache, api: &A) -> Result<(), ApiError>
    where
        A: IndicatorApi + ?Sized,
    {
        match api.delete_indicator(&self.id).await {
            Ok(()) => {
                cache.invalidate(&indicator_list_key());
                Ok(())
            }
            Err(e) => {
                log::warn!("deleting indicator {} failed: {e}", self.id);
                rollback(cache, self.snapshot);
                Err(e)
            }
        }
    }
}

pub fn begin_delete(cache: &QueryCache, id: &str) -> PendingDelete {
    PendingDelete { id: id.to_owned(), snapshot: apply_optimistic_delete(cache, id) }
}

/// Delete optimistically, rolling back on failure.
///
/// # Errors
///
/// Returns the API error after restoring the list.
pub async fn delete_indicator<A>(cache: &QueryCache, api: &A, id: &str) -> Result<(), ApiError>
where
    A: IndicatorApi + ?Sized,
{
    begin_delete(cache, id).commit(cache, api).await
}

/// Swap the optimistic row (`old_id`) for the server's version.
fn replace_row(cache: &QueryCache, old_id: &str, saved: &Indicator) {
    let key = indicator_list_key();
    let Some(mut list) = cache.get_query_data::<Vec<Indicator>>(&key) else {
        return;
    };
    let saved = enrich_as(saved, &indicator_field_mappings(), cache);
    match list.iter_mut().find(|item| item.id == old_id) {
        Some(existing) => *existing = saved,
        None => list.insert(0, saved),
    }
    cache.set_query_data(&key, &list);
}
