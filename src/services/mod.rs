pub mod auth_service;
pub mod cart_service;
pub mod catalog_service;
pub mod file_service;
pub mod item_service;
