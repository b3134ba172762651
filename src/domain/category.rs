use std::collections::HashMap;

use once_cell::sync::Lazy;
use sea_orm::{Iterable, entity::prelude::*};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Product category shown in the catalog.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
    ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CategoryType {
    #[sea_orm(string_value = "BOOK")]
    Book,
    #[sea_orm(string_value = "MUSIC")]
    Music,
    #[sea_orm(string_value = "STATIONERY")]
    Stationery,
}

static BY_CODE: Lazy<HashMap<&'static str, CategoryType>> =
    Lazy::new(|| CategoryType::iter().map(|c| (c.code(), c)).collect());

impl CategoryType {
    /// Stable identifier, also the value stored in the database.
    pub fn code(self) -> &'static str {
        match self {
            CategoryType::Book => "BOOK",
            CategoryType::Music => "MUSIC",
            CategoryType::Stationery => "STATIONERY",
        }
    }

    /// Display label.
    pub fn display_name(self) -> &'static str {
        match self {
            CategoryType::Book => "책",
            CategoryType::Music => "음반",
            CategoryType::Stationery => "문구류",
        }
    }

    /// Looks a category up by its code. Unknown codes yield `None`.
    pub fn enum_of(code: &str) -> Option<Self> {
        BY_CODE.get(code).copied()
    }
}
