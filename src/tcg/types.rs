//! Structural shapes of the external card-data API.
//!
//! Field names follow the upstream JSON (camelCase). Everything except
//! `id` and `name` is optional upstream, so most fields default.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attack {
    pub name: String,
    #[serde(default)]
    pub cost: Vec<String>,
    #[serde(default)]
    pub converted_energy_cost: u32,
    #[serde(default)]
    pub damage: String,
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Ability {
    pub name: String,
    #[serde(default)]
    pub text: String,
    #[serde(rename = "type", default)]
    pub kind: String,
}

/// Shared shape of weaknesses and resistances: `{"type": "Fire", "value": "×2"}`
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TypeModifier {
    #[serde(rename = "type")]
    pub kind: String,
    pub value: String,
}

pub type Weakness = TypeModifier;
pub type Resistance = TypeModifier;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Legalities {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub standard: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expanded: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unlimited: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SetImages {
    pub symbol: String,
    pub logo: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CardImages {
    pub small: String,
    pub large: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Set {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub series: String,
    #[serde(default)]
    pub printed_total: u32,
    #[serde(default)]
    pub total: u32,
    #[serde(default)]
    pub legalities: Legalities,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ptcgo_code: Option<String>,
    #[serde(default)]
    pub release_date: String,
    #[serde(default)]
    pub updated_at: String,
    #[serde(default)]
    pub images: SetImages,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub supertype: String,
    #[serde(default)]
    pub subtypes: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hp: Option<String>,
    #[serde(default)]
    pub types: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub evolves_from: Option<String>,
    #[serde(default)]
    pub abilities: Vec<Ability>,
    #[serde(default)]
    pub attacks: Vec<Attack>,
    #[serde(default)]
    pub weaknesses: Vec<Weakness>,
    #[serde(default)]
    pub resistances: Vec<Resistance>,
    #[serde(default)]
    pub retreat_cost: Vec<String>,
    #[serde(default)]
    pub converted_retreat_cost: u32,
    /// Upstream embeds the full set; ingestion fills it from the parent set when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub set: Option<Set>,
    #[serde(default)]
    pub number: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artist: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rarity: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flavor_text: Option<String>,
    #[serde(default)]
    pub national_pokedex_numbers: Vec<u32>,
    #[serde(default)]
    pub legalities: Legalities,
    #[serde(default)]
    pub images: CardImages,
}

impl Card {
    /// Set id from the embedded set, falling back to the `<set>-<number>` id prefix.
    pub fn set_id(&self) -> Option<&str> {
        if let Some(set) = &self.set {
            return Some(set.id.as_str());
        }
        self.id.rsplit_once('-').map(|(set_id, _)| set_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn card_parses_upstream_shape() {
        let json = r#"{
            "id": "base1-4",
            "name": "Charizard",
            "supertype": "Pokémon",
            "subtypes": ["Stage 2"],
            "hp": "120",
            "types": ["Fire"],
            "evolvesFrom": "Charmeleon",
            "attacks": [{
                "name": "Fire Spin",
                "cost": ["Fire", "Fire", "Fire", "Fire"],
                "convertedEnergyCost": 4,
                "damage": "100",
                "text": "Discard 2 Energy cards attached to Charizard."
            }],
            "weaknesses": [{"type": "Water", "value": "×2"}],
            "retreatCost": ["Colorless", "Colorless", "Colorless"],
            "convertedRetreatCost": 3,
            "number": "4",
            "rarity": "Rare Holo",
            "nationalPokedexNumbers": [6],
            "images": {"small": "s.png", "large": "l.png"}
        }"#;

        let card: Card = serde_json::from_str(json).unwrap();
        assert_eq!(card.evolves_from.as_deref(), Some("Charmeleon"));
        assert_eq!(card.attacks[0].converted_energy_cost, 4);
        assert_eq!(card.weaknesses[0].kind, "Water");
        assert_eq!(card.set_id(), Some("base1"));
    }

    #[test]
    fn embedded_set_wins_over_id_prefix() {
        let card = Card {
            id: "swsh12pt5-160".to_string(),
            name: "Pikachu".to_string(),
            set: Some(Set {
                id: "swsh12pt5gg".to_string(),
                ..Default::default()
            }),
            ..Default::default()
        };
        assert_eq!(card.set_id(), Some("swsh12pt5gg"));
    }
}
