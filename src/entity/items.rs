use sea_orm::entity::prelude::*;

use crate::domain::{CategoryType, ItemSellStatus, ItemType};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "items")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub item_name: String,
    pub price: i64,
    pub quantity: i32,
    pub item_type: ItemType,
    pub category_type: CategoryType,
    pub status: ItemSellStatus,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::item_imgs::Entity")]
    ItemImgs,
    #[sea_orm(has_many = "super::order_items::Entity")]
    OrderItems,
}

impl Related<super::item_imgs::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ItemImgs.def()
    }
}

impl Related<super::order_items::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::OrderItems.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
