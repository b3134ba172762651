use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, Multipart, Path, State},
    routing::{post, put},
};
use tower_http::limit::RequestBodyLimitLayer;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    dto::items::{CreateItemRequest, UpdateItemRequest},
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    models::{Item, ItemImg},
    response::ApiResponse,
    services::item_service,
    state::AppState,
};

/// Largest accepted image upload.
pub const MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

#[derive(ToSchema)]
#[allow(dead_code)]
pub struct ImageUpload {
    #[schema(value_type = String, format = Binary)]
    image: Vec<u8>,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/items", post(create_item))
        .route("/items/{id}", put(update_item).delete(delete_item))
        .layer(RequestBodyLimitLayer::new(super::MAX_BODY_BYTES))
        .route(
            "/items/{id}/images",
            post(upload_item_image)
                .layer::<_, std::convert::Infallible>(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
                .layer(RequestBodyLimitLayer::new(MAX_UPLOAD_BYTES)),
        )
}

#[utoipa::path(
    post,
    path = "/api/admin/items",
    request_body = CreateItemRequest,
    responses(
        (status = 200, description = "Register catalog item (admin only)", body = ApiResponse<Item>),
        (status = 403, description = "Forbidden"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn create_item(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateItemRequest>,
) -> AppResult<Json<ApiResponse<Item>>> {
    let resp = item_service::create_item(&state, &user, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/admin/items/{id}",
    params(
        ("id" = Uuid, Path, description = "Item ID")
    ),
    request_body = UpdateItemRequest,
    responses(
        (status = 200, description = "Updated item (admin only)", body = ApiResponse<Item>),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Item not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn update_item(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateItemRequest>,
) -> AppResult<Json<ApiResponse<Item>>> {
    let resp = item_service::update_item(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/admin/items/{id}",
    params(
        ("id" = Uuid, Path, description = "Item ID")
    ),
    responses(
        (status = 200, description = "Deleted item with its images and cart lines"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Item not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn delete_item(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = item_service::delete_item(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/admin/items/{id}/images",
    params(
        ("id" = Uuid, Path, description = "Item ID")
    ),
    request_body(content = ImageUpload, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Stored image; the first one becomes the main image", body = ApiResponse<ItemImg>),
        (status = 400, description = "Missing or unsupported image"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Item not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn upload_item_image(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    mut multipart: Multipart,
) -> AppResult<Json<ApiResponse<ItemImg>>> {
    ensure_admin(&user)?;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| AppError::BadRequest(format!("Multipart error: {err}")))?
    {
        if field.name() != Some("image") {
            continue;
        }
        let file_name = field
            .file_name()
            .map(str::to_owned)
            .ok_or_else(|| AppError::BadRequest("image field has no file name".into()))?;
        let bytes = field
            .bytes()
            .await
            .map_err(|err| AppError::BadRequest(format!("Multipart error: {err}")))?;

        let resp = item_service::add_item_image(&state, &user, id, &file_name, &bytes).await?;
        return Ok(Json(resp));
    }

    Err(AppError::BadRequest("missing `image` field".into()))
}
