use chrono::Utc;
use sea_orm::ActiveValue::NotSet;
use sea_orm::sea_query::LockType;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseTransaction, EntityTrait, PaginatorTrait, QueryFilter,
    QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::{
    domain::ItemSellStatus,
    dto::items::{CreateItemRequest, UpdateItemRequest},
    entity::{
        item_imgs::{self, ActiveModel as ImgActive, Column as ImgCol, Entity as ItemImgs},
        items::{ActiveModel, Entity as Items, Model as ItemModel},
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    models::{Item, ItemImg},
    response::{ApiResponse, Meta},
    services::file_service::StoredImage,
    state::AppState,
};

pub async fn create_item(
    state: &AppState,
    user: &AuthUser,
    payload: CreateItemRequest,
) -> AppResult<ApiResponse<Item>> {
    ensure_admin(user)?;
    validate_amounts(Some(payload.price), Some(payload.quantity))?;
    if payload.item_name.trim().is_empty() {
        return Err(AppError::BadRequest("item_name must not be empty".to_string()));
    }

    let active = ActiveModel {
        id: Set(Uuid::new_v4()),
        item_name: Set(payload.item_name),
        price: Set(payload.price),
        quantity: Set(payload.quantity),
        item_type: Set(payload.item_type),
        category_type: Set(payload.category_type),
        status: Set(payload.status.unwrap_or(ItemSellStatus::Sell)),
        created_at: NotSet,
    };
    let item = active.insert(&state.orm).await?;
    tracing::info!(user_id = %user.user_id, item_id = %item.id, "item created");

    Ok(ApiResponse::success(
        "Item created",
        item_from_entity(item),
        Some(Meta::empty()),
    ))
}

pub async fn update_item(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateItemRequest,
) -> AppResult<ApiResponse<Item>> {
    ensure_admin(user)?;
    validate_amounts(payload.price, payload.quantity)?;
    let existing = Items::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let mut active: ActiveModel = existing.into();
    if let Some(item_name) = payload.item_name {
        active.item_name = Set(item_name);
    }
    if let Some(price) = payload.price {
        active.price = Set(price);
    }
    if let Some(quantity) = payload.quantity {
        active.quantity = Set(quantity);
    }
    if let Some(item_type) = payload.item_type {
        active.item_type = Set(item_type);
    }
    if let Some(category_type) = payload.category_type {
        active.category_type = Set(category_type);
    }
    if let Some(status) = payload.status {
        active.status = Set(status);
    }

    let item = active.update(&state.orm).await?;
    tracing::info!(user_id = %user.user_id, item_id = %item.id, "item updated");

    Ok(ApiResponse::success(
        "Updated",
        item_from_entity(item),
        Some(Meta::empty()),
    ))
}

pub async fn delete_item(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_admin(user)?;
    let images = ItemImgs::find()
        .filter(ImgCol::ItemId.eq(id))
        .all(&state.orm)
        .await?;

    let result = Items::delete_by_id(id).exec(&state.orm).await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }

    for img in images {
        if let Err(err) = state.files.remove(&img.img_name).await {
            tracing::warn!(img_name = %img.img_name, error = %err, "image file not removed");
        }
    }
    tracing::info!(user_id = %user.user_id, item_id = %id, "item deleted");

    Ok(ApiResponse::success(
        "Deleted",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}

/// Stores an uploaded image for `item_id`. The first image of an item becomes its main image.
pub async fn add_item_image(
    state: &AppState,
    user: &AuthUser,
    item_id: Uuid,
    original_name: &str,
    bytes: &[u8],
) -> AppResult<ApiResponse<ItemImg>> {
    ensure_admin(user)?;
    if bytes.is_empty() {
        return Err(AppError::BadRequest("image is empty".to_string()));
    }

    let txn = state.orm.begin().await?;
    // Row lock serialises uploads for one item, so only the first sees no images.
    Items::find_by_id(item_id)
        .lock(LockType::Update)
        .one(&txn)
        .await?
        .ok_or(AppError::NotFound)?;
    let existing = ItemImgs::find()
        .filter(ImgCol::ItemId.eq(item_id))
        .count(&txn)
        .await?;

    let stored = state.files.store(original_name, bytes).await?;
    let img_name = stored.img_name.clone();
    let img = match save_image(txn, item_id, stored, existing == 0).await {
        Ok(img) => img,
        Err(err) => {
            if let Err(cleanup) = state.files.remove(&img_name).await {
                tracing::warn!(img_name = %img_name, error = %cleanup, "orphaned image file");
            }
            return Err(err);
        }
    };
    tracing::info!(item_id = %item_id, img_name = %img.img_name, is_main = img.is_main, "item image added");

    Ok(ApiResponse::success(
        "Image uploaded",
        img_from_entity(img),
        Some(Meta::empty()),
    ))
}

async fn save_image(
    txn: DatabaseTransaction,
    item_id: Uuid,
    stored: StoredImage,
    is_main: bool,
) -> AppResult<item_imgs::Model> {
    let img = ImgActive {
        id: Set(Uuid::new_v4()),
        item_id: Set(item_id),
        orig_img_name: Set(stored.orig_img_name),
        img_name: Set(stored.img_name),
        img_url: Set(stored.img_url),
        is_main: Set(is_main),
        created_at: NotSet,
    }
    .insert(&txn)
    .await?;
    txn.commit().await?;
    Ok(img)
}

fn validate_amounts(price: Option<i64>, quantity: Option<i32>) -> AppResult<()> {
    if price.is_some_and(|p| p < 0) {
        return Err(AppError::BadRequest("price must not be negative".to_string()));
    }
    if quantity.is_some_and(|q| q < 0) {
        return Err(AppError::BadRequest(
            "quantity must not be negative".to_string(),
        ));
    }
    Ok(())
}

pub(crate) fn item_from_entity(model: ItemModel) -> Item {
    Item {
        id: model.id,
        item_name: model.item_name,
        price: model.price,
        quantity: model.quantity,
        item_type: model.item_type,
        category_type: model.category_type,
        status: model.status,
        created_at: model.created_at.with_timezone(&Utc),
    }
}

pub(crate) fn img_from_entity(model: item_imgs::Model) -> ItemImg {
    ItemImg {
        id: model.id,
        orig_img_name: model.orig_img_name,
        img_name: model.img_name,
        img_url: model.img_url,
        is_main: model.is_main,
    }
}
