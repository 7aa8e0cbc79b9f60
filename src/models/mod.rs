pub mod card_cache;
pub mod collection;
pub mod collection_card;
pub mod set_cache;
pub mod user;
