use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    domain::{CategoryType, ItemSearchCondition, ItemSellStatus, ItemType, PageMeta},
    models::ItemImg,
};

/// Catalog entry shown in list views.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct MainItem {
    pub id: Uuid,
    pub item_name: String,
    pub price: i64,
    pub category_type: CategoryType,
    pub status: ItemSellStatus,
    /// Stored name of the main image, if the item has one.
    pub img_name: Option<String>,
    pub img_url: Option<String>,
}

/// Everything known about one catalog item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ItemDetail {
    pub id: Uuid,
    pub item_name: String,
    pub price: i64,
    pub quantity: i32,
    pub item_type: ItemType,
    pub category_type: CategoryType,
    pub status: ItemSellStatus,
    pub images: Vec<ItemImg>,
}

/// Display-only projection of an [`ItemDetail`].
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct ProductInfo {
    pub item_name: String,
    pub price: i64,
    pub quantity: i32,
    pub item_type: ItemType,
    pub category_type: CategoryType,
    pub category_name: String,
    pub status: ItemSellStatus,
    pub images: Vec<ItemImg>,
}

impl From<ItemDetail> for ProductInfo {
    fn from(detail: ItemDetail) -> Self {
        Self {
            item_name: detail.item_name,
            price: detail.price,
            quantity: detail.quantity,
            item_type: detail.item_type,
            category_type: detail.category_type,
            category_name: detail.category_type.display_name().to_string(),
            status: detail.status,
            images: detail.images,
        }
    }
}

/// Catalog home page model.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct HomeView {
    pub items: Vec<MainItem>,
    pub page: PageMeta,
    pub condition: ItemSearchCondition,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct HomeQuery {
    pub page: Option<u64>,
    pub size: Option<u64>,
    /// Sort instruction for condition search, e.g. `price,desc`.
    pub sort: Option<String>,
    /// Price sort code: `low` or `high`.
    pub code: Option<String>,
    pub item_name: Option<String>,
    pub category: Option<String>,
}
