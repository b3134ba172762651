use bookstore::{
    config::AppConfig,
    db::{create_orm_conn, run_migrations},
    domain::{CategoryType, ItemSellStatus, ItemType},
    entity::{
        items::{ActiveModel as ItemActive, Column as ItemCol, Entity as Items},
        users::{ActiveModel as UserActive, Column as UserCol, Entity as Users},
    },
    services::{
        auth_service::hash_password,
        cart_service::{ensure_cart, load_customer},
    },
};
use sea_orm::ActiveValue::NotSet;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use uuid::Uuid;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();
    let config = AppConfig::from_env()?;

    let orm = create_orm_conn(&config.database_url).await?;
    run_migrations(&orm).await?;

    let admin_id = ensure_user(&orm, "admin@example.com", "admin123", "admin").await?;
    let user_id = ensure_user(&orm, "user@example.com", "user123", "user").await?;
    seed_items(&orm).await?;

    tracing::info!(%admin_id, %user_id, "seed completed");
    Ok(())
}

async fn ensure_user(
    orm: &DatabaseConnection,
    email: &str,
    password: &str,
    role: &str,
) -> anyhow::Result<Uuid> {
    let existing = Users::find()
        .filter(UserCol::Email.eq(email))
        .one(orm)
        .await?;

    let user_id = match existing {
        Some(user) => user.id,
        None => {
            let password_hash = hash_password(password)?;
            UserActive {
                id: Set(Uuid::new_v4()),
                email: Set(email.to_string()),
                password_hash: Set(password_hash),
                name: Set(role.to_string()),
                role: Set(role.to_string()),
                region: Set("서울".to_string()),
                address_line: Set("1".to_string()),
                postal_code: Set("1111".to_string()),
                created_at: NotSet,
            }
            .insert(orm)
            .await?
            .id
        }
    };

    let mut customer = load_customer(orm, user_id).await?;
    ensure_cart(orm, &mut customer).await?;
    tracing::info!(email, role, "ensured user");
    Ok(user_id)
}

async fn seed_items(orm: &DatabaseConnection) -> anyhow::Result<()> {
    let items = [
        ("spring5", 10000, 10, ItemType::Best, CategoryType::Book),
        ("mvc2", 10000, 10, ItemType::Best, CategoryType::Book),
        ("Rust in Action", 42000, 25, ItemType::New, CategoryType::Book),
        ("Abbey Road", 28000, 5, ItemType::Basic, CategoryType::Music),
        ("Kind of Blue", 24000, 7, ItemType::Best, CategoryType::Music),
        ("Fountain Pen", 15000, 30, ItemType::New, CategoryType::Stationery),
        ("Grid Notebook", 4000, 100, ItemType::Basic, CategoryType::Stationery),
    ];

    for (name, price, quantity, item_type, category) in items {
        let exists = Items::find()
            .filter(ItemCol::ItemName.eq(name))
            .one(orm)
            .await?
            .is_some();
        if exists {
            continue;
        }
        ItemActive {
            id: Set(Uuid::new_v4()),
            item_name: Set(name.to_string()),
            price: Set(price),
            quantity: Set(quantity),
            item_type: Set(item_type),
            category_type: Set(category),
            status: Set(ItemSellStatus::Sell),
            created_at: NotSet,
        }
        .insert(orm)
        .await?;
    }

    tracing::info!("seeded items");
    Ok(())
}
