use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "card_cache")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub card_id: String,
    pub set_id: String,
    pub name: String,
    pub supertype: String,
    pub rarity: Option<String>,
    /// JSON array of energy types, kept alongside `data` for filtering
    pub types: Option<String>,
    /// Serialized `tcg::Card`
    #[sea_orm(column_type = "Text")]
    pub data: String,
    pub last_updated: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::set_cache::Entity",
        from = "Column::SetId",
        to = "super::set_cache::Column::SetId",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    SetCache,
}

impl Related<super::set_cache::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SetCache.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
