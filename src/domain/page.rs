use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::category::CategoryType;

pub const DEFAULT_PAGE_SIZE: u64 = 4;
pub const MAX_PAGE_SIZE: u64 = 100;
/// Highest page whose offset still fits a Postgres `BIGINT`.
pub const MAX_PAGE: u64 = i64::MAX as u64 / MAX_PAGE_SIZE;

/// Number of page links shown at once.
const PAGE_BLOCK: u64 = 10;

/// A bounded slice request: 1-based page, page size and an optional sort
/// instruction such as `price,desc`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    page: u64,
    size: u64,
    sort: Option<String>,
}

impl PageRequest {
    pub fn new(page: Option<u64>, size: Option<u64>, sort: Option<String>) -> Self {
        Self {
            page: page.unwrap_or(1).clamp(1, MAX_PAGE),
            size: size.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE),
            sort: sort.filter(|s| !s.trim().is_empty()),
        }
    }

    pub fn page(&self) -> u64 {
        self.page
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn sort(&self) -> Option<&str> {
        self.sort.as_deref()
    }

    pub fn offset(&self) -> u64 {
        (self.page - 1).saturating_mul(self.size)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(None, None, None)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub content: Vec<T>,
    pub total_elements: u64,
}

impl<T> Page<T> {
    pub fn new(content: Vec<T>, total_elements: u64) -> Self {
        Self {
            content,
            total_elements,
        }
    }
}

/// Free-form catalog search, echoed back so UI controls can re-submit it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ItemSearchCondition {
    pub item_name: Option<String>,
    /// Category code, e.g. `BOOK`.
    pub category: Option<String>,
}

impl ItemSearchCondition {
    pub fn name_pattern(&self) -> Option<&str> {
        self.item_name
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    /// Unknown codes resolve to `None` and therefore do not filter.
    pub fn category_type(&self) -> Option<CategoryType> {
        self.category.as_deref().and_then(CategoryType::enum_of)
    }
}

/// Predefined price orderings selectable by sort code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceOrder {
    LowToHigh,
    HighToLow,
}

impl PriceOrder {
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "low" => Some(PriceOrder::LowToHigh),
            "high" => Some(PriceOrder::HighToLow),
            _ => None,
        }
    }
}

/// Which catalog search a page request runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogQuery {
    ByCondition(ItemSearchCondition),
    ByPriceSort(String),
}

impl CatalogQuery {
    pub fn new(code: Option<String>, condition: ItemSearchCondition) -> Self {
        match code {
            Some(code) => CatalogQuery::ByPriceSort(code),
            None => CatalogQuery::ByCondition(condition),
        }
    }
}

/// Pagination metadata used to render page links.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct PageMeta {
    pub total: u64,
    pub page: u64,
    pub size: u64,
    pub total_pages: u64,
    pub start_page: u64,
    pub end_page: u64,
    pub prev: bool,
    pub next: bool,
    pub sort_param: Option<String>,
}

impl PageMeta {
    /// Metadata for a condition search; the sort parameter comes from the request.
    pub fn new(total: u64, request: &PageRequest) -> Self {
        Self::build(total, request, request.sort().map(str::to_owned))
    }

    /// Metadata for a price-sort search; the sort code is carried as-is.
    pub fn with_sort_code(total: u64, code: &str, request: &PageRequest) -> Self {
        Self::build(total, request, Some(code.to_owned()))
    }

    fn build(total: u64, request: &PageRequest, sort_param: Option<String>) -> Self {
        let page = request.page();
        let size = request.size();
        let total_pages = total.div_ceil(size);

        let block_end = page.div_ceil(PAGE_BLOCK).saturating_mul(PAGE_BLOCK);
        let block_start = block_end + 1 - PAGE_BLOCK;
        let end_page = block_end.min(total_pages.max(1));
        let start_page = block_start.min(end_page);

        Self {
            total,
            page,
            size,
            total_pages,
            start_page,
            end_page,
            prev: start_page > 1,
            next: end_page < total_pages,
            sort_param,
        }
    }
}
