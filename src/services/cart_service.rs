use std::collections::HashMap;

use sea_orm::ActiveValue::NotSet;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use uuid::Uuid;

use crate::{
    domain::{Address, Cart, CartError, ItemSellStatus, OrderItem, User},
    dto::cart::{AddToCartRequest, CartLine, CartView},
    entity::{
        carts::{ActiveModel as CartActive, Column as CartCol, Entity as Carts},
        items::{Column as ItemCol, Entity as Items},
        order_items::{ActiveModel as LineActive, Column as LineCol, Entity as OrderItems},
        users::Entity as Users,
    },
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    response::{ApiResponse, Meta},
    state::AppState,
};

pub async fn get_cart(state: &AppState, user: &AuthUser) -> AppResult<ApiResponse<CartView>> {
    let customer = load_customer(&state.orm, user.user_id).await?;
    let cart = customer.cart().ok_or(AppError::NotFound)?;
    let view = cart_view(&state.orm, cart).await?;
    Ok(ApiResponse::success("OK", view, Some(Meta::empty())))
}

/// Creates the caller's cart; calling it again returns the cart that already exists.
pub async fn create_cart(state: &AppState, user: &AuthUser) -> AppResult<ApiResponse<CartView>> {
    let txn = state.orm.begin().await?;
    let mut customer = load_customer(&txn, user.user_id).await?;
    ensure_cart(&txn, &mut customer).await?;
    let cart = customer
        .cart()
        .ok_or(CartError::NoCart(customer.id()))?;
    let view = cart_view(&txn, cart).await?;
    txn.commit().await?;

    Ok(ApiResponse::success("Cart ready", view, Some(Meta::empty())))
}

pub async fn add_to_cart(
    state: &AppState,
    user: &AuthUser,
    payload: AddToCartRequest,
) -> AppResult<ApiResponse<CartView>> {
    let count = u32::try_from(payload.count)
        .ok()
        .filter(|count| *count > 0)
        .ok_or_else(|| AppError::BadRequest("count must be greater than 0".to_string()))?;

    let txn = state.orm.begin().await?;
    let item = Items::find_by_id(payload.item_id)
        .one(&txn)
        .await?
        .ok_or(AppError::NotFound)?;
    if item.status != ItemSellStatus::Sell {
        return Err(AppError::BadRequest("item is sold out".to_string()));
    }
    if payload.count > item.quantity {
        return Err(AppError::BadRequest("not enough stock".to_string()));
    }

    let mut customer = load_customer(&txn, user.user_id).await?;
    let cart_id = ensure_cart(&txn, &mut customer).await?;
    let cart = customer
        .cart()
        .ok_or(CartError::NoCart(customer.id()))?;
    let line = OrderItem::new(cart, item.id, count)?;

    LineActive {
        id: Set(line.id()),
        cart_id: Set(line.cart_id()),
        item_id: Set(line.item_id()),
        count: Set(payload.count),
        created_at: NotSet,
    }
    .insert(&txn)
    .await?;
    customer.add_cart_item(line)?;

    let cart = customer
        .cart()
        .ok_or(CartError::NoCart(customer.id()))?;
    let view = cart_view(&txn, cart).await?;
    txn.commit().await?;

    tracing::info!(
        user_id = %user.user_id,
        cart_id = %cart_id,
        item_id = %item.id,
        count,
        total_quantity = view.total_quantity,
        "cart item added"
    );
    Ok(ApiResponse::success("OK", view, None))
}

pub async fn remove_from_cart(
    state: &AppState,
    user: &AuthUser,
    order_item_id: Uuid,
) -> AppResult<ApiResponse<CartView>> {
    let txn = state.orm.begin().await?;
    let mut customer = load_customer(&txn, user.user_id).await?;
    let removed = match customer.remove_cart_item(order_item_id) {
        Ok(Some(line)) => line,
        Ok(None) | Err(CartError::NoCart(_)) => return Err(AppError::NotFound),
        Err(err) => return Err(err.into()),
    };
    OrderItems::delete_by_id(removed.id()).exec(&txn).await?;

    let cart = customer
        .cart()
        .ok_or(CartError::NoCart(customer.id()))?;
    let view = cart_view(&txn, cart).await?;
    txn.commit().await?;

    tracing::info!(
        user_id = %user.user_id,
        order_item_id = %order_item_id,
        "cart item removed"
    );
    Ok(ApiResponse::success(
        "Removed from cart",
        view,
        Some(Meta::empty()),
    ))
}

pub async fn clear_cart(state: &AppState, user: &AuthUser) -> AppResult<ApiResponse<CartView>> {
    let txn = state.orm.begin().await?;
    let mut customer = load_customer(&txn, user.user_id).await?;
    let removed = match customer.clear_cart() {
        Ok(lines) => lines,
        Err(CartError::NoCart(_)) => return Err(AppError::NotFound),
        Err(err) => return Err(err.into()),
    };
    let cart = customer
        .cart()
        .ok_or(CartError::NoCart(customer.id()))?;
    OrderItems::delete_many()
        .filter(LineCol::CartId.eq(cart.id()))
        .exec(&txn)
        .await?;
    let view = cart_view(&txn, cart).await?;
    txn.commit().await?;

    tracing::info!(user_id = %user.user_id, lines = removed.len(), "cart cleared");
    Ok(ApiResponse::success("Cart cleared", view, Some(Meta::empty())))
}

/// Loads a user together with their cart and its lines in insertion order.
pub async fn load_customer<C: ConnectionTrait>(conn: &C, user_id: Uuid) -> AppResult<User> {
    let user = Users::find_by_id(user_id)
        .one(conn)
        .await?
        .ok_or(AppError::NotFound)?;
    let mut customer = User::new(
        user.id,
        user.name,
        user.email,
        Address::new(user.region, user.address_line, user.postal_code),
    );

    let Some(cart) = Carts::find()
        .filter(CartCol::UserId.eq(user_id))
        .one(conn)
        .await?
    else {
        return Ok(customer);
    };

    let lines = OrderItems::find()
        .filter(LineCol::CartId.eq(cart.id))
        .order_by_asc(LineCol::CreatedAt)
        .order_by_asc(LineCol::Id)
        .all(conn)
        .await?
        .into_iter()
        .map(|line| {
            let count = u32::try_from(line.count).unwrap_or(0);
            OrderItem::from_parts(line.id, line.cart_id, line.item_id, count)
        })
        .collect::<Result<Vec<_>, _>>()?;
    customer.create_cart(Cart::from_parts(cart.id, cart.user_id, lines)?)?;
    Ok(customer)
}

/// Persists a new cart for `customer` if they have none yet and returns the cart id.
pub async fn ensure_cart<C: ConnectionTrait>(conn: &C, customer: &mut User) -> AppResult<Uuid> {
    let fresh = Cart::new(Uuid::new_v4(), customer.id());
    let fresh_id = fresh.id();
    let cart_id = customer.create_cart(fresh)?.id();

    if cart_id == fresh_id {
        CartActive {
            id: Set(cart_id),
            user_id: Set(customer.id()),
            created_at: NotSet,
        }
        .insert(conn)
        .await?;
        tracing::info!(user_id = %customer.id(), cart_id = %cart_id, "cart created");
    }
    Ok(cart_id)
}

async fn cart_view<C: ConnectionTrait>(conn: &C, cart: &Cart) -> AppResult<CartView> {
    let item_ids: Vec<Uuid> = cart.order_items().iter().map(OrderItem::item_id).collect();
    let items: HashMap<Uuid, _> = if item_ids.is_empty() {
        HashMap::new()
    } else {
        Items::find()
            .filter(ItemCol::Id.is_in(item_ids))
            .all(conn)
            .await?
            .into_iter()
            .map(|item| (item.id, item))
            .collect()
    };

    let lines = cart
        .order_items()
        .iter()
        .filter_map(|line| {
            let item = items.get(&line.item_id())?;
            Some(CartLine {
                id: line.id(),
                item_id: item.id,
                item_name: item.item_name.clone(),
                price: item.price,
                count: line.count(),
            })
        })
        .collect();

    Ok(CartView {
        cart_id: cart.id(),
        lines,
        total_quantity: cart.total_quantity(),
    })
}
