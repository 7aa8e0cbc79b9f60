//! Card search over the cached catalog

use serde::{Deserialize, Serialize};
use strsim::jaro_winkler;
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;
use utoipa::IntoParams;

use crate::tcg::Card;

pub const DEFAULT_LIMIT: usize = 50;
pub const MAX_LIMIT: usize = 250;

#[derive(Debug, Clone, Default, Serialize, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchParams {
    /// Name fragment, accent-insensitive
    #[serde(skip_serializing_if = "Option::is_none")]
    pub q: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub set: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supertype: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rarity: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub card_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
}

impl SearchParams {
    fn has_filters(&self) -> bool {
        [&self.set, &self.supertype, &self.rarity, &self.card_type]
            .iter()
            .any(|f| f.as_deref().is_some_and(|v| !v.trim().is_empty()))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResults {
    pub cards: Vec<Card>,
    /// Matches before `limit` was applied
    pub total: usize,
}

/// Lowercase and strip diacritics, so "pokemon" matches "Pokémon"
pub fn normalize(text: &str) -> String {
    text.nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect::<String>()
        .to_lowercase()
        .trim()
        .to_string()
}

fn field_matches(filter: &Option<String>, value: Option<&str>) -> bool {
    match filter.as_deref().map(normalize) {
        None => true,
        Some(wanted) if wanted.is_empty() => true,
        Some(wanted) => value.is_some_and(|v| normalize(v) == wanted),
    }
}

pub fn search_cards(cards: Vec<Card>, params: &SearchParams) -> SearchResults {
    let query = params.q.as_deref().map(normalize).unwrap_or_default();
    if query.is_empty() && !params.has_filters() {
        return SearchResults {
            cards: Vec::new(),
            total: 0,
        };
    }

    let mut scored: Vec<(f64, String, Card)> = cards
        .into_iter()
        .filter(|card| {
            field_matches(&params.set, card.set_id())
                && field_matches(&params.supertype, Some(&card.supertype))
                && field_matches(&params.rarity, card.rarity.as_deref())
                && (field_matches(&params.card_type, None)
                    || card
                        .types
                        .iter()
                        .any(|t| field_matches(&params.card_type, Some(t))))
        })
        .filter_map(|card| {
            let name = normalize(&card.name);
            if query.is_empty() {
                return Some((0.0, name, card));
            }
            if !name.contains(&query) {
                return None;
            }
            let score = jaro_winkler(&query, &name);
            Some((score, name, card))
        })
        .collect();

    scored.sort_by(|a, b| b.0.total_cmp(&a.0).then_with(|| a.1.cmp(&b.1)));

    let total = scored.len();
    let limit = params.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);

    SearchResults {
        cards: scored.into_iter().take(limit).map(|(_, _, c)| c).collect(),
        total,
    }
}
