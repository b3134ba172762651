use serde::Deserialize;
use utoipa::ToSchema;

use crate::domain::{CategoryType, ItemSellStatus, ItemType};

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateItemRequest {
    pub item_name: String,
    pub price: i64,
    pub quantity: i32,
    pub item_type: ItemType,
    pub category_type: CategoryType,
    pub status: Option<ItemSellStatus>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateItemRequest {
    pub item_name: Option<String>,
    pub price: Option<i64>,
    pub quantity: Option<i32>,
    pub item_type: Option<ItemType>,
    pub category_type: Option<CategoryType>,
    pub status: Option<ItemSellStatus>,
}
