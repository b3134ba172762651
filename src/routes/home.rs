use axum::{
    Json, Router,
    body::Body,
    extract::{Path, Query, State},
    http::{HeaderValue, header},
    response::{IntoResponse, Redirect, Response},
    routing::get,
};
use serde::Serialize;
use tokio_util::io::ReaderStream;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    dto::catalog::{HomeQuery, HomeView, ProductInfo},
    error::AppResult,
    middleware::auth::AuthUser,
    response::{ApiResponse, Meta},
    services::catalog_service::{self, HomeOutcome, OrmItemCatalog},
    state::AppState,
};

/// Where anonymous catalog visitors are sent.
pub const LOGIN_PATH: &str = "/bookstore/login";

#[derive(Serialize, ToSchema)]
pub struct LoginHint {
    pub login: String,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/home", get(home))
        .route("/login", get(login_form))
        .route("/products/{item_id}", get(show_one))
        .route("/images/{filename}", get(download_image))
}

#[utoipa::path(
    get,
    path = "/bookstore/home",
    params(
        ("page" = Option<u64>, Query, description = "Page number, default 1"),
        ("size" = Option<u64>, Query, description = "Items per page, default 4"),
        ("sort" = Option<String>, Query, description = "Sort for condition search, e.g. price,desc"),
        ("code" = Option<String>, Query, description = "Price sort code: low, high"),
        ("item_name" = Option<String>, Query, description = "Item name contains"),
        ("category" = Option<String>, Query, description = "Category code: BOOK, MUSIC, STATIONERY"),
    ),
    responses(
        (status = 200, description = "Catalog page", body = ApiResponse<HomeView>),
        (status = 303, description = "Not logged in, redirect to login"),
        (status = 400, description = "Unknown sort code"),
    ),
    security(("bearer_auth" = [])),
    tag = "Catalog"
)]
pub async fn home(
    State(state): State<AppState>,
    user: Option<AuthUser>,
    Query(query): Query<HomeQuery>,
) -> AppResult<Response> {
    let catalog = OrmItemCatalog::new(&state.orm);
    let outcome = catalog_service::home(&catalog, &state.files, user.as_ref(), query.into()).await?;

    let response = match outcome {
        HomeOutcome::RedirectToLogin => Redirect::to(LOGIN_PATH).into_response(),
        HomeOutcome::Page(view) => {
            let meta = Meta::from(&view.page);
            Json(ApiResponse::success("Home", view, Some(meta))).into_response()
        }
    };
    Ok(response)
}

#[utoipa::path(
    get,
    path = "/bookstore/login",
    responses(
        (status = 200, description = "Where to log in", body = ApiResponse<LoginHint>),
    ),
    tag = "Catalog"
)]
pub async fn login_form() -> Json<ApiResponse<LoginHint>> {
    Json(ApiResponse::success(
        "Login required",
        LoginHint {
            login: "/api/auth/login".to_string(),
        },
        Some(Meta::empty()),
    ))
}

#[utoipa::path(
    get,
    path = "/bookstore/products/{item_id}",
    params(
        ("item_id" = Uuid, Path, description = "Item ID")
    ),
    responses(
        (status = 200, description = "Product detail", body = ApiResponse<ProductInfo>),
        (status = 404, description = "Item not found"),
    ),
    tag = "Catalog"
)]
pub async fn show_one(
    State(state): State<AppState>,
    Path(item_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<ProductInfo>>> {
    let catalog = OrmItemCatalog::new(&state.orm);
    let product = catalog_service::show_one(&catalog, item_id).await?;
    Ok(Json(ApiResponse::success("Product", product, None)))
}

#[utoipa::path(
    get,
    path = "/bookstore/images/{filename}",
    params(
        ("filename" = String, Path, description = "Stored image name")
    ),
    responses(
        (status = 200, description = "Image bytes", content_type = "application/octet-stream"),
        (status = 400, description = "Malformed image name"),
        (status = 404, description = "Image not found"),
    ),
    tag = "Catalog"
)]
pub async fn download_image(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> AppResult<Response> {
    let resource = catalog_service::download_image(&state.files, &filename).await?;

    let content_type = HeaderValue::from_str(&resource.content_type)
        .unwrap_or(HeaderValue::from_static("application/octet-stream"));
    let body = Body::from_stream(ReaderStream::new(resource.file));

    Ok((
        [
            (header::CONTENT_TYPE, content_type),
            (header::CONTENT_DISPOSITION, HeaderValue::from_static("inline")),
        ],
        body,
    )
        .into_response())
}
