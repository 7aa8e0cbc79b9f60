//! Demo data for local development (`SEED_DEMO=1`)

use crate::domain::{CreateCollectionInput, DomainError};
use crate::infrastructure::AppState;
use crate::tcg::{Attack, Card, CardImages, Set, SetImages, TypeModifier};

fn demo_set() -> Set {
    Set {
        id: "base1".to_owned(),
        name: "Base".to_owned(),
        series: "Base".to_owned(),
        printed_total: 102,
        total: 102,
        ptcgo_code: Some("BS".to_owned()),
        release_date: "1999/01/09".to_owned(),
        updated_at: "2022/10/10 15:12:00".to_owned(),
        images: SetImages {
            symbol: "https://images.pokemontcg.io/base1/symbol.png".to_owned(),
            logo: "https://images.pokemontcg.io/base1/logo.png".to_owned(),
        },
        ..Default::default()
    }
}

fn demo_card(
    number: u32,
    name: &str,
    supertype: &str,
    types: &[&str],
    rarity: &str,
    attacks: Vec<Attack>,
) -> Card {
    let id = format!("base1-{}", number);
    Card {
        images: CardImages {
            small: format!("https://images.pokemontcg.io/base1/{}.png", number),
            large: format!("https://images.pokemontcg.io/base1/{}_hires.png", number),
        },
        id,
        name: name.to_owned(),
        supertype: supertype.to_owned(),
        types: types.iter().map(|t| t.to_string()).collect(),
        number: number.to_string(),
        rarity: Some(rarity.to_owned()),
        attacks,
        ..Default::default()
    }
}

fn attack(name: &str, cost: &[&str], damage: &str) -> Attack {
    Attack {
        name: name.to_owned(),
        cost: cost.iter().map(|c| c.to_string()).collect(),
        converted_energy_cost: cost.len() as u32,
        damage: damage.to_owned(),
        text: String::new(),
    }
}

fn demo_cards() -> Vec<Card> {
    let mut charizard = demo_card(
        4,
        "Charizard",
        "Pokémon",
        &["Fire"],
        "Rare Holo",
        vec![attack("Fire Spin", &["Fire", "Fire", "Fire", "Fire"], "100")],
    );
    charizard.hp = Some("120".to_owned());
    charizard.evolves_from = Some("Charmeleon".to_owned());
    charizard.weaknesses = vec![TypeModifier {
        kind: "Water".to_owned(),
        value: "×2".to_owned(),
    }];

    vec![
        charizard,
        demo_card(
            2,
            "Blastoise",
            "Pokémon",
            &["Water"],
            "Rare Holo",
            vec![attack("Hydro Pump", &["Water", "Water", "Water"], "40+")],
        ),
        demo_card(
            46,
            "Charmander",
            "Pokémon",
            &["Fire"],
            "Common",
            vec![attack("Scratch", &["Colorless"], "10")],
        ),
        demo_card(
            58,
            "Pikachu",
            "Pokémon",
            &["Lightning"],
            "Common",
            vec![attack("Gnaw", &["Colorless"], "10")],
        ),
        demo_card(91, "Bill", "Trainer", &[], "Common", Vec::new()),
        demo_card(98, "Fire Energy", "Energy", &[], "Common", Vec::new()),
    ]
}

pub async fn seed_demo_data(state: &AppState) -> Result<(), DomainError> {
    let user = state
        .user_repo
        .ensure(&state.settings.default_username)
        .await?;

    if state.catalog_repo.find_set("base1").await?.is_none() {
        state
            .catalog_repo
            .upsert_set(demo_set(), demo_cards())
            .await?;
    }

    if state.collection_repo.find_for_user(user.id).await?.is_empty() {
        let binder = state
            .collection_repo
            .create(
                user.id,
                CreateCollectionInput {
                    name: "Binder".to_owned(),
                    language: Some("en".to_owned()),
                },
            )
            .await?;

        for card_id in ["base1-4", "base1-58", "base1-58", "base1-91"] {
            state.collection_card_repo.add(binder.id, card_id).await?;
        }
    }

    Ok(())
}
