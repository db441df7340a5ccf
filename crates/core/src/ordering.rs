//! Sparse ordering keys for the project collection.
//!
//! Projects persist a `sort_key` with gaps between neighbours. The API
//! exposes `displayOrder`, the dense 0-based rank in `(sort_key, id)` order,
//! so clients keep seeing contiguous positions while inserts at the front
//! touch a single row.
//!
//! Equal keys are ordered by id ascending.

use std::collections::{HashMap, HashSet};

use crate::error::CoreError;
use crate::types::DbId;

/// Spacing between consecutive keys after a rebalance.
pub const ORDER_GAP: i64 = 1024;

/// Front inserts below this key force a rebalance instead.
pub const MIN_SAFE_KEY: i64 = i64::MIN / 4;

/// Largest accepted `displayOrder` in a reorder batch.
pub const MAX_DISPLAY_ORDER: i64 = 1_000_000;

// ---------------------------------------------------------------------------
// Front insertion
// ---------------------------------------------------------------------------

/// Where a newly created project goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrontInsert {
    /// Insert with this key; no other row changes.
    Key(i64),
    /// The key space in front is exhausted: rewrite existing rows with
    /// [`rebalanced_key`] starting at rank 1 and insert at rank 0.
    Rebalance,
}

/// Decide the key of a project that must appear first in the listing.
pub fn front_insert(current_min: Option<i64>) -> FrontInsert {
    match current_min {
        None => FrontInsert::Key(0),
        Some(min) => match min.checked_sub(ORDER_GAP) {
            Some(key) if key >= MIN_SAFE_KEY => FrontInsert::Key(key),
            _ => FrontInsert::Rebalance,
        },
    }
}

/// Key assigned to `rank` when the collection is rebalanced.
pub fn rebalanced_key(rank: usize) -> i64 {
    i64::try_from(rank)
        .ok()
        .and_then(|r| r.checked_mul(ORDER_GAP))
        .unwrap_or(i64::MAX)
}

// ---------------------------------------------------------------------------
// Batch reorder
// ---------------------------------------------------------------------------

/// One entry of a reorder batch as sent by the admin client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderUpdate {
    pub id: DbId,
    pub display_order: i64,
    /// Version the client last saw. `None` skips the concurrency check.
    pub expected_version: Option<i32>,
}

/// A project's current position, as locked inside the reorder transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderedRow {
    pub id: DbId,
    pub sort_key: i64,
    pub version: i32,
}

/// Shape checks that need no database state.
pub fn validate_updates(updates: &[OrderUpdate]) -> Result<(), CoreError> {
    if updates.is_empty() {
        return Err(CoreError::Validation(
            "updates: must contain at least one entry".into(),
        ));
    }

    let mut seen = HashSet::with_capacity(updates.len());
    for update in updates {
        if !seen.insert(update.id) {
            return Err(CoreError::Validation(format!(
                "updates: project {} appears more than once",
                update.id
            )));
        }
        if !(0..=MAX_DISPLAY_ORDER).contains(&update.display_order) {
            return Err(CoreError::Validation(format!(
                "updates: displayOrder for project {} must be between 0 and {MAX_DISPLAY_ORDER}",
                update.id
            )));
        }
    }
    Ok(())
}

/// Compute the key changes needed to apply `updates` to `current`.
///
/// `current` must hold every project in the collection. Listed projects are
/// taken in `(display_order, batch position)` order and each lands on its
/// requested rank, moved later when an earlier listed project already holds
/// it and clamped so every listed project still fits in the collection.
/// Unlisted projects fill the remaining ranks in their existing order, and
/// every rank gets [`rebalanced_key`]. Only rows whose key actually changes
/// are returned, so re-applying a batch is a no-op.
///
/// Fails without producing any change if an id is unknown or a supplied
/// version is stale.
pub fn plan_reorder(
    current: &[OrderedRow],
    updates: &[OrderUpdate],
) -> Result<Vec<(DbId, i64)>, CoreError> {
    validate_updates(updates)?;

    let by_id: HashMap<DbId, &OrderedRow> = current.iter().map(|row| (row.id, row)).collect();

    for update in updates {
        let row = by_id.get(&update.id).ok_or(CoreError::NotFound {
            entity: "Project",
            id: update.id,
        })?;
        if let Some(expected) = update.expected_version {
            if expected != row.version {
                return Err(CoreError::Conflict(format!(
                    "Project {} was modified by another session (version {} != {})",
                    update.id, expected, row.version
                )));
            }
        }
    }

    let mut listed: Vec<(usize, &OrderUpdate)> = updates.iter().enumerate().collect();
    listed.sort_by_key(|(position, update)| (update.display_order, *position));

    let total = current.len();
    let mut slots: Vec<Option<DbId>> = vec![None; total];
    let mut next_free = 0;
    for (index, (_, update)) in listed.iter().enumerate() {
        let requested = usize::try_from(update.display_order).unwrap_or(usize::MAX);
        let last_fitting = total - (listed.len() - index);
        let rank = requested.max(next_free).min(last_fitting);
        slots[rank] = Some(update.id);
        next_free = rank + 1;
    }

    let listed_ids: HashSet<DbId> = updates.iter().map(|u| u.id).collect();
    let mut rest: Vec<&OrderedRow> = current
        .iter()
        .filter(|row| !listed_ids.contains(&row.id))
        .collect();
    rest.sort_by_key(|row| (row.sort_key, row.id));
    let mut rest = rest.into_iter().map(|row| row.id);

    let final_order = slots
        .into_iter()
        .map(|slot| slot.or_else(|| rest.next()));

    Ok(final_order
        .enumerate()
        .filter_map(|(rank, id)| {
            let id = id?;
            let key = rebalanced_key(rank);
            match by_id.get(&id) {
                Some(row) if row.sort_key == key => None,
                _ => Some((id, key)),
            }
        })
        .collect())
}
