use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Deserialize, ToSchema)]
pub struct AddToCartRequest {
    pub item_id: Uuid,
    pub count: i32,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CartLine {
    pub id: Uuid,
    pub item_id: Uuid,
    pub item_name: String,
    pub price: i64,
    pub count: u32,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CartView {
    pub cart_id: Uuid,
    pub lines: Vec<CartLine>,
    pub total_quantity: u64,
}
