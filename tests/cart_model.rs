use bookstore::domain::{Address, Cart, CartError, OrderItem, User};
use uuid::Uuid;

fn user(name: &str, email: &str, address: Address) -> User {
    User::new(Uuid::new_v4(), name, email, address)
}

fn with_cart(mut user: User) -> User {
    let cart = Cart::new(Uuid::new_v4(), user.id());
    user.create_cart(cart).expect("own cart");
    user
}

#[test]
fn carts_of_two_users_stay_independent() -> anyhow::Result<()> {
    let mut user_a = with_cart(user("userA", "mimi03@naver.com", Address::new("진주", "2", "2222")));
    let user_b = with_cart(user("userB", "nana05@gmail.com", Address::new("서울", "1", "1111")));

    let item1 = Uuid::new_v4();
    let item2 = Uuid::new_v4();
    let order_item1 = OrderItem::new(user_a.cart().expect("cart"), item1, 5)?;
    let order_item2 = OrderItem::new(user_a.cart().expect("cart"), item2, 2)?;

    user_a.add_cart_item(order_item1)?;
    user_a.add_cart_item(order_item2)?;

    let sum: u32 = user_a
        .cart()
        .expect("cart")
        .order_items()
        .iter()
        .map(OrderItem::count)
        .sum();
    assert_eq!(sum, 7);
    assert_eq!(user_a.total_quantity(), 7);
    assert!(user_b.cart().expect("cart").is_empty());
    assert_eq!(user_b.total_quantity(), 0);
    Ok(())
}

#[test]
fn lines_keep_insertion_order() -> anyhow::Result<()> {
    let mut customer = with_cart(user("u", "u@example.com", Address::new("r", "l", "p")));
    let items: Vec<Uuid> = (0..4).map(|_| Uuid::new_v4()).collect();
    for (i, item) in items.iter().enumerate() {
        let line = OrderItem::new(customer.cart().expect("cart"), *item, i as u32 + 1)?;
        customer.add_cart_item(line)?;
    }

    let order: Vec<Uuid> = customer
        .cart()
        .expect("cart")
        .order_items()
        .iter()
        .map(OrderItem::item_id)
        .collect();
    assert_eq!(order, items);
    assert_eq!(customer.total_quantity(), 1 + 2 + 3 + 4);
    Ok(())
}

#[test]
fn create_cart_is_idempotent() {
    let mut customer = user("u", "u@example.com", Address::new("r", "l", "p"));
    let first = Cart::new(Uuid::new_v4(), customer.id());
    let first_id = first.id();

    assert_eq!(customer.create_cart(first).map(Cart::id), Ok(first_id));
    let second = Cart::new(Uuid::new_v4(), customer.id());
    assert_eq!(customer.create_cart(second).map(Cart::id), Ok(first_id));
}

#[test]
fn replace_cart_hands_back_previous() -> anyhow::Result<()> {
    let mut customer = with_cart(user("u", "u@example.com", Address::new("r", "l", "p")));
    let old_id = customer.cart().expect("cart").id();

    let replacement = Cart::new(Uuid::new_v4(), customer.id());
    let new_id = replacement.id();
    let previous = customer.replace_cart(replacement)?;

    assert_eq!(previous.map(|c| c.id()), Some(old_id));
    assert_eq!(customer.cart().map(Cart::id), Some(new_id));
    Ok(())
}

#[test]
fn cart_of_another_user_is_rejected() {
    let mut customer = user("u", "u@example.com", Address::new("r", "l", "p"));
    let stranger = Uuid::new_v4();
    let cart = Cart::new(Uuid::new_v4(), stranger);
    let cart_id = cart.id();

    assert_eq!(
        customer.create_cart(cart).map(Cart::id),
        Err(CartError::ForeignOwner {
            cart: cart_id,
            owner: stranger
        })
    );
    assert!(customer.cart().is_none());
}

#[test]
fn line_bound_to_another_cart_fails_fast() -> anyhow::Result<()> {
    let mut user_a = with_cart(user("a", "a@example.com", Address::new("r", "l", "p")));
    let user_b = with_cart(user("b", "b@example.com", Address::new("r", "l", "p")));

    let cart_b = user_b.cart().expect("cart");
    let foreign = OrderItem::new(cart_b, Uuid::new_v4(), 3)?;

    let err = user_a.add_cart_item(foreign).expect_err("foreign line");
    assert_eq!(
        err,
        CartError::ForeignCart {
            expected: user_a.cart().expect("cart").id(),
            found: cart_b.id(),
        }
    );
    assert_eq!(user_a.total_quantity(), 0);
    Ok(())
}

#[test]
fn adding_without_cart_fails() -> anyhow::Result<()> {
    let mut customer = user("u", "u@example.com", Address::new("r", "l", "p"));
    let somebody_else = with_cart(user("v", "v@example.com", Address::new("r", "l", "p")));
    let line = OrderItem::new(somebody_else.cart().expect("cart"), Uuid::new_v4(), 1)?;

    assert_eq!(
        customer.add_cart_item(line),
        Err(CartError::NoCart(customer.id()))
    );
    Ok(())
}

#[test]
fn zero_count_is_rejected() {
    let cart = Cart::new(Uuid::new_v4(), Uuid::new_v4());
    assert_eq!(
        OrderItem::new(&cart, Uuid::new_v4(), 0),
        Err(CartError::ZeroCount)
    );
}

#[test]
fn remove_and_clear_update_the_aggregate() -> anyhow::Result<()> {
    let mut customer = with_cart(user("u", "u@example.com", Address::new("r", "l", "p")));
    let first = OrderItem::new(customer.cart().expect("cart"), Uuid::new_v4(), 5)?;
    let first_id = first.id();
    customer.add_cart_item(first)?;
    let second = OrderItem::new(customer.cart().expect("cart"), Uuid::new_v4(), 2)?;
    customer.add_cart_item(second)?;

    let removed = customer.remove_cart_item(first_id)?;
    assert_eq!(removed.map(|l| l.count()), Some(5));
    assert_eq!(customer.total_quantity(), 2);
    assert_eq!(customer.remove_cart_item(first_id)?, None);

    let cleared = customer.clear_cart()?;
    assert_eq!(cleared.len(), 1);
    assert_eq!(customer.total_quantity(), 0);
    assert!(customer.cart().is_some());
    Ok(())
}

#[test]
fn stored_cart_must_hold_only_its_own_lines() -> anyhow::Result<()> {
    let cart_id = Uuid::new_v4();
    let owner = Uuid::new_v4();
    let own = OrderItem::from_parts(Uuid::new_v4(), cart_id, Uuid::new_v4(), 1)?;
    let stray_cart = Uuid::new_v4();
    let stray = OrderItem::from_parts(Uuid::new_v4(), stray_cart, Uuid::new_v4(), 1)?;

    let cart = Cart::from_parts(cart_id, owner, vec![own.clone()])?;
    assert_eq!(cart.order_items(), &[own.clone()]);

    assert_eq!(
        Cart::from_parts(cart_id, owner, vec![own, stray]),
        Err(CartError::ForeignCart {
            expected: cart_id,
            found: stray_cart,
        })
    );
    Ok(())
}

#[test]
fn address_is_read_only() {
    let address = Address::new("진주", "2", "2222");
    assert_eq!(address.region(), "진주");
    assert_eq!(address.line(), "2");
    assert_eq!(address.postal_code(), "2222");
}
