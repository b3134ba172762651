//! Cart aggregate.
//!
//! A [`User`] owns at most one [`Cart`], and the cart owns its [`OrderItem`]s.
//! Order items point back at their cart and at a catalog item by id only.

use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CartError {
    #[error("user {0} has no cart")]
    NoCart(Uuid),

    #[error("order item is bound to cart {found}, expected cart {expected}")]
    ForeignCart { expected: Uuid, found: Uuid },

    #[error("cart {cart} belongs to user {owner}")]
    ForeignOwner { cart: Uuid, owner: Uuid },

    #[error("order item count must be at least 1")]
    ZeroCount,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Address {
    region: String,
    line: String,
    postal_code: String,
}

impl Address {
    pub fn new(
        region: impl Into<String>,
        line: impl Into<String>,
        postal_code: impl Into<String>,
    ) -> Self {
        Self {
            region: region.into(),
            line: line.into(),
            postal_code: postal_code.into(),
        }
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    pub fn line(&self) -> &str {
        &self.line
    }

    pub fn postal_code(&self) -> &str {
        &self.postal_code
    }
}

/// One product entry in a cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderItem {
    id: Uuid,
    cart_id: Uuid,
    item_id: Uuid,
    count: u32,
}

impl OrderItem {
    /// Creates a line bound to `cart`. The binding cannot change afterwards.
    pub fn new(cart: &Cart, item_id: Uuid, count: u32) -> Result<Self, CartError> {
        Self::from_parts(Uuid::new_v4(), cart.id, item_id, count)
    }

    /// Rebuilds a stored line.
    pub fn from_parts(
        id: Uuid,
        cart_id: Uuid,
        item_id: Uuid,
        count: u32,
    ) -> Result<Self, CartError> {
        if count == 0 {
            return Err(CartError::ZeroCount);
        }
        Ok(Self {
            id,
            cart_id,
            item_id,
            count,
        })
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn cart_id(&self) -> Uuid {
        self.cart_id
    }

    pub fn item_id(&self) -> Uuid {
        self.item_id
    }

    pub fn count(&self) -> u32 {
        self.count
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cart {
    id: Uuid,
    owner: Uuid,
    order_items: Vec<OrderItem>,
}

impl Cart {
    pub fn new(id: Uuid, owner: Uuid) -> Self {
        Self {
            id,
            owner,
            order_items: Vec::new(),
        }
    }

    /// Rebuilds a stored cart; every line must already be bound to `id`.
    pub fn from_parts(
        id: Uuid,
        owner: Uuid,
        order_items: Vec<OrderItem>,
    ) -> Result<Self, CartError> {
        let mut cart = Self::new(id, owner);
        for item in order_items {
            cart.add_order_item(item)?;
        }
        Ok(cart)
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn owner(&self) -> Uuid {
        self.owner
    }

    /// Lines in insertion order.
    pub fn order_items(&self) -> &[OrderItem] {
        &self.order_items
    }

    pub fn is_empty(&self) -> bool {
        self.order_items.is_empty()
    }

    /// Sum of the counts of every line.
    pub fn total_quantity(&self) -> u64 {
        self.order_items.iter().map(|o| u64::from(o.count)).sum()
    }

    pub fn add_order_item(&mut self, item: OrderItem) -> Result<(), CartError> {
        if item.cart_id != self.id {
            return Err(CartError::ForeignCart {
                expected: self.id,
                found: item.cart_id,
            });
        }
        self.order_items.push(item);
        Ok(())
    }

    pub fn remove_order_item(&mut self, order_item_id: Uuid) -> Option<OrderItem> {
        let idx = self
            .order_items
            .iter()
            .position(|o| o.id == order_item_id)?;
        Some(self.order_items.remove(idx))
    }

    pub fn clear(&mut self) -> Vec<OrderItem> {
        std::mem::take(&mut self.order_items)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    id: Uuid,
    name: String,
    email: String,
    address: Address,
    cart: Option<Cart>,
}

impl User {
    pub fn new(id: Uuid, name: impl Into<String>, email: impl Into<String>, address: Address) -> Self {
        Self {
            id,
            name: name.into(),
            email: email.into(),
            address,
            cart: None,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn address(&self) -> &Address {
        &self.address
    }

    pub fn cart(&self) -> Option<&Cart> {
        self.cart.as_ref()
    }

    /// Associates `cart` with this user unless one is already associated, in
    /// which case the existing cart is kept and returned.
    pub fn create_cart(&mut self, cart: Cart) -> Result<&Cart, CartError> {
        self.check_owner(&cart)?;
        Ok(self.cart.get_or_insert(cart))
    }

    /// Swaps in `cart`, handing back the previous one.
    pub fn replace_cart(&mut self, cart: Cart) -> Result<Option<Cart>, CartError> {
        self.check_owner(&cart)?;
        Ok(self.cart.replace(cart))
    }

    pub fn add_cart_item(&mut self, item: OrderItem) -> Result<(), CartError> {
        self.cart_mut()?.add_order_item(item)
    }

    pub fn remove_cart_item(&mut self, order_item_id: Uuid) -> Result<Option<OrderItem>, CartError> {
        Ok(self.cart_mut()?.remove_order_item(order_item_id))
    }

    pub fn clear_cart(&mut self) -> Result<Vec<OrderItem>, CartError> {
        Ok(self.cart_mut()?.clear())
    }

    /// Aggregate quantity across the cart, zero when there is no cart.
    pub fn total_quantity(&self) -> u64 {
        self.cart.as_ref().map_or(0, Cart::total_quantity)
    }

    fn cart_mut(&mut self) -> Result<&mut Cart, CartError> {
        let id = self.id;
        self.cart.as_mut().ok_or(CartError::NoCart(id))
    }

    fn check_owner(&self, cart: &Cart) -> Result<(), CartError> {
        if cart.owner != self.id {
            return Err(CartError::ForeignOwner {
                cart: cart.id,
                owner: cart.owner,
            });
        }
        Ok(())
    }
}
