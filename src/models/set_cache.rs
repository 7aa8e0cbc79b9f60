use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "set_cache")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub set_id: String,
    pub name: String,
    /// Serialized `tcg::Set`
    #[sea_orm(column_type = "Text")]
    pub data: String,
    pub card_count: i32,
    pub last_updated: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::card_cache::Entity")]
    CardCache,
}

impl Related<super::card_cache::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CardCache.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
