use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::{CategoryType, ItemSellStatus, ItemType};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Address {
    pub region: String,
    pub line: String,
    pub postal_code: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub role: String,
    pub address: Address,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Item {
    pub id: Uuid,
    pub item_name: String,
    pub price: i64,
    pub quantity: i32,
    pub item_type: ItemType,
    pub category_type: CategoryType,
    pub status: ItemSellStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ItemImg {
    pub id: Uuid,
    pub orig_img_name: String,
    pub img_name: String,
    pub img_url: String,
    pub is_main: bool,
}
