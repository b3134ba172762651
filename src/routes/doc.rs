use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    domain::{CategoryType, ItemSearchCondition, ItemSellStatus, ItemType, PageMeta},
    dto::{
        auth::{LoginRequest, LoginResponse, RegisterRequest},
        cart::{AddToCartRequest, CartLine, CartView},
        catalog::{HomeView, ItemDetail, MainItem, ProductInfo},
        items::{CreateItemRequest, UpdateItemRequest},
    },
    models::{Address, Item, ItemImg, User},
    response::{ApiResponse, Meta},
    routes::{admin, auth, cart, health, home},
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        home::home,
        home::login_form,
        home::show_one,
        home::download_image,
        auth::login,
        auth::register,
        cart::get_cart,
        cart::create_cart,
        cart::add_to_cart,
        cart::remove_from_cart,
        cart::clear_cart,
        admin::create_item,
        admin::update_item,
        admin::delete_item,
        admin::upload_item_image
    ),
    components(
        schemas(
            User,
            Address,
            Item,
            ItemImg,
            CategoryType,
            ItemType,
            ItemSellStatus,
            ItemSearchCondition,
            PageMeta,
            MainItem,
            ItemDetail,
            ProductInfo,
            HomeView,
            home::LoginHint,
            CartLine,
            CartView,
            AddToCartRequest,
            CreateItemRequest,
            UpdateItemRequest,
            admin::ImageUpload,
            RegisterRequest,
            LoginRequest,
            LoginResponse,
            Meta,
            ApiResponse<HomeView>,
            ApiResponse<ProductInfo>,
            ApiResponse<CartView>,
            ApiResponse<Item>
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Catalog", description = "Catalog pages, product detail and images"),
        (name = "Cart", description = "Cart endpoints"),
        (name = "Admin", description = "Catalog management endpoints"),
        (name = "Auth", description = "Authentication endpoints"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
