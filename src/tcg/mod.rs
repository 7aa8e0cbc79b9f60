//! Card-catalog types mirroring the external card-data API

pub mod types;

pub use types::{
    Ability, Attack, Card, CardImages, Legalities, Resistance, Set, SetImages, TypeModifier,
    Weakness,
};
