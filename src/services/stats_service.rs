//! Collection statistics
//!
//! Everything here is computed from rows the caller already fetched.

use std::collections::{BTreeMap, HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::domain::{CachedSet, Collection, CollectionCard};
use crate::tcg::Card;

pub const UNKNOWN_RARITY: &str = "Unknown";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionStats {
    pub collection_id: i32,
    pub name: String,
    pub total_cards: i64,
    pub unique_cards: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetCompletion {
    pub set_id: String,
    pub name: String,
    pub owned: usize,
    pub total: usize,
    pub percent: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    pub total_collections: usize,
    /// Sum of quantities over every entry
    pub total_cards: i64,
    /// Distinct card ids over every collection
    pub unique_cards: usize,
    pub sets_represented: usize,
    pub collections: Vec<CollectionStats>,
    /// Copies per rarity; cards missing from the catalog count as `Unknown`
    pub rarities: BTreeMap<String, i64>,
    pub set_completion: Vec<SetCompletion>,
}

/// Set id of a card id shaped like `<set>-<number>`
fn set_id_from_card_id(card_id: &str) -> Option<&str> {
    card_id.rsplit_once('-').map(|(set_id, _)| set_id)
}

pub fn compute_stats(
    collections: &[Collection],
    entries: &[CollectionCard],
    catalog: &[Card],
    sets: &[CachedSet],
) -> Stats {
    let cards_by_id: HashMap<&str, &Card> = catalog.iter().map(|c| (c.id.as_str(), c)).collect();

    let mut per_collection: HashMap<i32, (i64, i64)> = HashMap::new();
    let mut unique: HashSet<&str> = HashSet::new();
    let mut rarities: BTreeMap<String, i64> = BTreeMap::new();
    let mut owned_by_set: HashMap<&str, HashSet<&str>> = HashMap::new();
    let mut total_cards = 0i64;

    for entry in entries {
        let quantity = entry.quantity as i64;
        total_cards += quantity;

        let slot = per_collection.entry(entry.collection_id).or_insert((0, 0));
        slot.0 += quantity;
        slot.1 += 1;

        unique.insert(entry.card_id.as_str());

        let card = cards_by_id.get(entry.card_id.as_str()).copied();
        let rarity = card
            .and_then(|c| c.rarity.clone())
            .unwrap_or_else(|| UNKNOWN_RARITY.to_string());
        *rarities.entry(rarity).or_insert(0) += quantity;

        let set_id = match card {
            Some(card) => card.set_id(),
            None => set_id_from_card_id(&entry.card_id),
        };
        if let Some(set_id) = set_id {
            owned_by_set
                .entry(set_id)
                .or_default()
                .insert(entry.card_id.as_str());
        }
    }

    let collections_stats = collections
        .iter()
        .map(|c| {
            let (total, unique) = per_collection.get(&c.id).copied().unwrap_or((0, 0));
            CollectionStats {
                collection_id: c.id,
                name: c.name.clone(),
                total_cards: total,
                unique_cards: unique,
            }
        })
        .collect();

    let mut set_completion: Vec<SetCompletion> = sets
        .iter()
        .filter_map(|cached| {
            let owned = owned_by_set.get(cached.set.id.as_str())?.len();
            let total = [
                cached.set.total as usize,
                cached.set.printed_total as usize,
                cached.card_count.max(0) as usize,
            ]
            .into_iter()
            .find(|t| *t > 0)?;
            let percent = (owned as f64 / total as f64 * 1000.0).round() / 10.0;
            Some(SetCompletion {
                set_id: cached.set.id.clone(),
                name: cached.set.name.clone(),
                owned,
                total,
                percent,
            })
        })
        .collect();
    set_completion.sort_by(|a, b| {
        b.percent
            .total_cmp(&a.percent)
            .then_with(|| a.set_id.cmp(&b.set_id))
    });

    Stats {
        total_collections: collections.len(),
        total_cards,
        unique_cards: unique.len(),
        sets_represented: owned_by_set.len(),
        collections: collections_stats,
        rarities,
        set_completion,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tcg::Set;

    fn collection(id: i32, name: &str) -> Collection {
        Collection {
            id,
            user_id: 1,
            name: name.to_string(),
            language: "en".to_string(),
            created_at: String::new(),
            updated_at: String::new(),
            total_cards: 0,
            unique_cards: 0,
        }
    }

    fn entry(collection_id: i32, card_id: &str, quantity: i32) -> CollectionCard {
        CollectionCard {
            id: Some(1),
            collection_id,
            card_id: card_id.to_string(),
            quantity,
            added_at: None,
            updated_at: None,
        }
    }

    fn card(id: &str, rarity: &str) -> Card {
        Card {
            id: id.to_string(),
            name: id.to_string(),
            rarity: Some(rarity.to_string()),
            ..Default::default()
        }
    }

    fn base_set() -> CachedSet {
        CachedSet {
            set: Set {
                id: "base1".to_string(),
                name: "Base".to_string(),
                total: 102,
                ..Default::default()
            },
            card_count: 102,
            last_updated: String::new(),
        }
    }

    #[test]
    fn totals_and_breakdowns() {
        let collections = vec![collection(1, "Binder"), collection(2, "Deck")];
        let entries = vec![
            entry(1, "base1-4", 2),
            entry(1, "base1-58", 1),
            entry(2, "base1-4", 1),
            entry(2, "xy1-1", 3),
        ];
        let catalog = vec![card("base1-4", "Rare Holo"), card("base1-58", "Common")];

        let stats = compute_stats(&collections, &entries, &catalog, &[base_set()]);

        assert_eq!(stats.total_collections, 2);
        assert_eq!(stats.total_cards, 7);
        assert_eq!(stats.unique_cards, 3);
        assert_eq!(stats.sets_represented, 2);
        assert_eq!(stats.collections[0].total_cards, 3);
        assert_eq!(stats.collections[1].unique_cards, 2);
        assert_eq!(stats.rarities["Rare Holo"], 3);
        assert_eq!(stats.rarities[UNKNOWN_RARITY], 3);

        assert_eq!(stats.set_completion.len(), 1);
        let base = &stats.set_completion[0];
        assert_eq!((base.owned, base.total), (2, 102));
        assert_eq!(base.percent, 2.0);
    }

    #[test]
    fn empty_collections_report_zeroes() {
        let stats = compute_stats(&[collection(1, "Empty")], &[], &[], &[base_set()]);

        assert_eq!(stats.total_cards, 0);
        assert_eq!(stats.collections[0].unique_cards, 0);
        assert!(stats.set_completion.is_empty());
        assert!(stats.rarities.is_empty());
    }
}
