//! Quantity rules for collection membership
//!
//! The server repository and the client's optimistic cache both go
//! through these functions so the two never disagree on what an add or a
//! remove does to an entry.

use super::{CollectionCard, DomainError};

/// Quantity an entry has after one more copy is added.
/// Fails with `Validation` when the entry is already at `i32::MAX`.
pub fn quantity_after_add(existing: Option<i32>) -> Result<i32, DomainError> {
    match existing {
        Some(quantity) => quantity.checked_add(1).ok_or_else(|| {
            DomainError::Validation(format!("quantity cannot exceed {}", i32::MAX))
        }),
        None => Ok(1),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoveOutcome {
    /// Entry stays with this quantity
    Decrement(i32),
    /// Last copy removed, entry must be deleted
    Delete,
    /// Nothing to remove
    Missing,
}

pub fn remove_outcome(existing: Option<i32>) -> RemoveOutcome {
    match existing {
        Some(quantity) if quantity > 1 => RemoveOutcome::Decrement(quantity - 1),
        Some(_) => RemoveOutcome::Delete,
        None => RemoveOutcome::Missing,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetOutcome {
    Store(i32),
    Delete,
}

pub fn set_outcome(quantity: i32) -> SetOutcome {
    if quantity > 0 {
        SetOutcome::Store(quantity)
    } else {
        SetOutcome::Delete
    }
}

/// Apply an add to an in-memory list, returning the resulting entry.
/// The list is left untouched on error.
pub fn apply_add(
    entries: &mut Vec<CollectionCard>,
    collection_id: i32,
    card_id: &str,
) -> Result<CollectionCard, DomainError> {
    if let Some(entry) = entries
        .iter_mut()
        .find(|e| e.matches(collection_id, card_id))
    {
        entry.quantity = quantity_after_add(Some(entry.quantity))?;
        return Ok(entry.clone());
    }

    let entry = CollectionCard {
        id: None,
        collection_id,
        card_id: card_id.to_string(),
        quantity: quantity_after_add(None)?,
        added_at: None,
        updated_at: None,
    };
    entries.push(entry.clone());
    Ok(entry)
}

/// Apply a remove to an in-memory list.
///
/// Returns the entry as it was before the change, or `None` when no entry
/// matched (the list is left untouched).
pub fn apply_remove(
    entries: &mut Vec<CollectionCard>,
    collection_id: i32,
    card_id: &str,
) -> Option<CollectionCard> {
    let index = entries
        .iter()
        .position(|e| e.matches(collection_id, card_id))?;
    let previous = entries[index].clone();

    match remove_outcome(Some(previous.quantity)) {
        RemoveOutcome::Decrement(quantity) => entries[index].quantity = quantity,
        RemoveOutcome::Delete => {
            entries.remove(index);
        }
        RemoveOutcome::Missing => return None,
    }

    Some(previous)
}

/// Apply an exact quantity to an in-memory list; returns the stored entry
pub fn apply_set(
    entries: &mut Vec<CollectionCard>,
    collection_id: i32,
    card_id: &str,
    quantity: i32,
) -> Option<CollectionCard> {
    let index = entries
        .iter()
        .position(|e| e.matches(collection_id, card_id));

    match (set_outcome(quantity), index) {
        (SetOutcome::Store(quantity), Some(index)) => {
            entries[index].quantity = quantity;
            Some(entries[index].clone())
        }
        (SetOutcome::Store(quantity), None) => {
            let entry = CollectionCard {
                id: None,
                collection_id,
                card_id: card_id.to_string(),
                quantity,
                added_at: None,
                updated_at: None,
            };
            entries.push(entry.clone());
            Some(entry)
        }
        (SetOutcome::Delete, Some(index)) => {
            entries.remove(index);
            None
        }
        (SetOutcome::Delete, None) => None,
    }
}
