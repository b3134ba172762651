pub mod carts;
pub mod item_imgs;
pub mod items;
pub mod order_items;
pub mod users;

pub use carts::Entity as Carts;
pub use item_imgs::Entity as ItemImgs;
pub use items::Entity as Items;
pub use order_items::Entity as OrderItems;
pub use users::Entity as Users;
