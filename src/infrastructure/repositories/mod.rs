//! Repository implementations using SeaORM

pub mod catalog_repository;
pub mod collection_card_repository;
pub mod collection_repository;
pub mod user_repository;

pub use catalog_repository::SeaOrmCatalogRepository;
pub use collection_card_repository::SeaOrmCollectionCardRepository;
pub use collection_repository::SeaOrmCollectionRepository;
pub use user_repository::SeaOrmUserRepository;
