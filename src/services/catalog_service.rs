//! Catalog browsing: the home page listing, product detail and image hand-off.

use std::collections::HashMap;

use sea_orm::sea_query::Expr;
use sea_orm::sea_query::extension::postgres::PgExpr;
use sea_orm::{
    ColumnTrait, Condition, DatabaseConnection, EntityTrait, Order, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Select,
};
use uuid::Uuid;

use crate::{
    domain::{CatalogQuery, ItemSearchCondition, Page, PageMeta, PageRequest, PriceOrder},
    dto::catalog::{HomeQuery, HomeView, ItemDetail, MainItem, ProductInfo},
    entity::{
        item_imgs::{self, Column as ImgCol, Entity as ItemImgs},
        items::{self, Column as ItemCol, Entity as Items},
    },
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    services::{
        file_service::{FileService, ImageResource},
        item_service::img_from_entity,
    },
};

/// Catalog queries the page dispatcher relies on.
pub trait ItemCatalog {
    fn search_page_sort(
        &self,
        condition: &ItemSearchCondition,
        page: &PageRequest,
    ) -> impl Future<Output = AppResult<Page<MainItem>>> + Send;

    fn item_price_sort(
        &self,
        order: PriceOrder,
        page: &PageRequest,
    ) -> impl Future<Output = AppResult<Page<MainItem>>> + Send;

    /// Fails with [`AppError::NotFound`] when no item has this id.
    fn get_item_detail(&self, id: Uuid) -> impl Future<Output = AppResult<ItemDetail>> + Send;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HomeRequest {
    pub page: PageRequest,
    pub code: Option<String>,
    pub condition: ItemSearchCondition,
}

impl From<HomeQuery> for HomeRequest {
    fn from(query: HomeQuery) -> Self {
        Self {
            page: PageRequest::new(query.page, query.size, query.sort),
            code: query.code.filter(|c| !c.trim().is_empty()),
            condition: ItemSearchCondition {
                item_name: query.item_name,
                category: query.category,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum HomeOutcome {
    RedirectToLogin,
    Page(HomeView),
}

pub async fn home<C: ItemCatalog>(
    catalog: &C,
    files: &FileService,
    user: Option<&AuthUser>,
    request: HomeRequest,
) -> AppResult<HomeOutcome> {
    let Some(user) = user else {
        tracing::debug!("anonymous catalog request");
        return Ok(HomeOutcome::RedirectToLogin);
    };

    let HomeRequest {
        page,
        code,
        condition,
    } = request;

    let (results, page_meta) = match CatalogQuery::new(code, condition.clone()) {
        CatalogQuery::ByCondition(condition) => {
            let results = catalog.search_page_sort(&condition, &page).await?;
            let meta = PageMeta::new(results.total_elements, &page);
            (results, meta)
        }
        CatalogQuery::ByPriceSort(code) => {
            let order = PriceOrder::from_code(&code)
                .ok_or_else(|| AppError::BadRequest(format!("unknown sort code `{code}`")))?;
            let results = catalog.item_price_sort(order, &page).await?;
            let meta = PageMeta::with_sort_code(results.total_elements, &code, &page);
            (results, meta)
        }
    };

    for item in &results.content {
        let Some(img_name) = item.img_name.as_deref() else {
            continue;
        };
        match files.full_path(img_name) {
            Ok(path) => tracing::info!(img_name, full_path = %path.display(), "item image"),
            Err(err) => tracing::warn!(img_name, error = %err, "item image path unresolved"),
        }
    }
    tracing::info!(
        user_id = %user.user_id,
        total = page_meta.total,
        page = page_meta.page,
        sort_param = ?page_meta.sort_param,
        "catalog page"
    );

    Ok(HomeOutcome::Page(HomeView {
        items: results.content,
        page: page_meta,
        condition,
    }))
}

pub async fn show_one<C: ItemCatalog>(catalog: &C, item_id: Uuid) -> AppResult<ProductInfo> {
    let detail = catalog.get_item_detail(item_id).await?;
    Ok(ProductInfo::from(detail))
}

pub async fn download_image(files: &FileService, filename: &str) -> AppResult<ImageResource> {
    let resource = files.open(filename).await?;
    tracing::info!(full_path = %resource.path.display(), "serving image");
    Ok(resource)
}

/// [`ItemCatalog`] backed by the `items` and `item_imgs` tables.
#[derive(Clone, Copy)]
pub struct OrmItemCatalog<'a> {
    orm: &'a DatabaseConnection,
}

impl<'a> OrmItemCatalog<'a> {
    pub fn new(orm: &'a DatabaseConnection) -> Self {
        Self { orm }
    }

    async fn fetch_page(
        &self,
        finder: Select<Items>,
        page: &PageRequest,
    ) -> AppResult<Page<MainItem>> {
        let total = finder.clone().count(self.orm).await?;
        let items = finder
            .limit(page.size())
            .offset(page.offset())
            .all(self.orm)
            .await?;

        let ids: Vec<Uuid> = items.iter().map(|item| item.id).collect();
        let mut main_imgs: HashMap<Uuid, item_imgs::Model> = if ids.is_empty() {
            HashMap::new()
        } else {
            ItemImgs::find()
                .filter(ImgCol::ItemId.is_in(ids))
                .filter(ImgCol::IsMain.eq(true))
                .all(self.orm)
                .await?
                .into_iter()
                .map(|img| (img.item_id, img))
                .collect()
        };

        let content = items
            .into_iter()
            .map(|item| {
                let img = main_imgs.remove(&item.id);
                main_item_from_entity(item, img)
            })
            .collect();
        Ok(Page::new(content, total))
    }
}

impl ItemCatalog for OrmItemCatalog<'_> {
    async fn search_page_sort(
        &self,
        condition: &ItemSearchCondition,
        page: &PageRequest,
    ) -> AppResult<Page<MainItem>> {
        let mut filter = Condition::all();
        if let Some(name) = condition.name_pattern() {
            filter = filter.add(Expr::col(ItemCol::ItemName).ilike(format!("%{name}%")));
        }
        if let Some(category) = condition.category_type() {
            filter = filter.add(ItemCol::CategoryType.eq(category));
        }

        let (column, order) = sort_column(page.sort());
        let finder = Items::find()
            .filter(filter)
            .order_by(column, order)
            .order_by_asc(ItemCol::Id);
        self.fetch_page(finder, page).await
    }

    async fn item_price_sort(
        &self,
        order: PriceOrder,
        page: &PageRequest,
    ) -> AppResult<Page<MainItem>> {
        let finder = match order {
            PriceOrder::LowToHigh => Items::find().order_by_asc(ItemCol::Price),
            PriceOrder::HighToLow => Items::find().order_by_desc(ItemCol::Price),
        }
        .order_by_asc(ItemCol::ItemName);
        self.fetch_page(finder, page).await
    }

    async fn get_item_detail(&self, id: Uuid) -> AppResult<ItemDetail> {
        let item = Items::find_by_id(id)
            .one(self.orm)
            .await?
            .ok_or(AppError::NotFound)?;

        let images = ItemImgs::find()
            .filter(ImgCol::ItemId.eq(id))
            .order_by_desc(ImgCol::IsMain)
            .order_by_asc(ImgCol::CreatedAt)
            .all(self.orm)
            .await?
            .into_iter()
            .map(img_from_entity)
            .collect();

        Ok(ItemDetail {
            id: item.id,
            item_name: item.item_name,
            price: item.price,
            quantity: item.quantity,
            item_type: item.item_type,
            category_type: item.category_type,
            status: item.status,
            images,
        })
    }
}

/// Maps `field,dir` onto a column; anything unrecognised falls back to newest first.
fn sort_column(sort: Option<&str>) -> (ItemCol, Order) {
    let Some(sort) = sort else {
        return (ItemCol::CreatedAt, Order::Desc);
    };
    let (field, dir) = sort.split_once(',').unwrap_or((sort, "asc"));
    let column = match field.trim() {
        "price" => ItemCol::Price,
        "itemName" | "item_name" => ItemCol::ItemName,
        "createdAt" | "created_at" => ItemCol::CreatedAt,
        _ => return (ItemCol::CreatedAt, Order::Desc),
    };
    let order = if dir.trim().eq_ignore_ascii_case("desc") {
        Order::Desc
    } else {
        Order::Asc
    };
    (column, order)
}

fn main_item_from_entity(item: items::Model, img: Option<item_imgs::Model>) -> MainItem {
    let (img_name, img_url) = match img {
        Some(img) => (Some(img.img_name), Some(img.img_url)),
        None => (None, None),
    };
    MainItem {
        id: item.id,
        item_name: item.item_name,
        price: item.price,
        category_type: item.category_type,
        status: item.status,
        img_name,
        img_url,
    }
}
