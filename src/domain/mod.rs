//! Storefront domain model. Nothing in here touches the database or the network.

pub mod cart;
pub mod category;
pub mod item;
pub mod page;

pub use cart::{Address, Cart, CartError, OrderItem, User};
pub use category::CategoryType;
pub use item::{ItemSellStatus, ItemType};
pub use page::{CatalogQuery, ItemSearchCondition, Page, PageMeta, PageRequest, PriceOrder};
