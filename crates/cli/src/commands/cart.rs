//! Cart commands.
//!
//! Every command goes through [`use_cart`], so it runs against whatever store
//! `main` installed as the provider.

use std::fmt::Write as _;

use go_marketplace_core::{NewCartItem, Price, ProductId};
use go_marketplace_storefront::{Cart, use_cart};
use tracing::info;

/// Print the cart, as a table or as pretty JSON.
///
/// # Errors
///
/// Returns an error if no cart provider is installed or JSON encoding fails.
pub fn show(json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let cart = use_cart()?.cart();

    let output = if json {
        serde_json::to_string_pretty(cart.items())?
    } else {
        render(&cart)
    };

    #[allow(clippy::print_stdout)]
    {
        println!("{output}");
    }

    Ok(())
}

/// Add a product to the cart.
///
/// # Errors
///
/// Returns an error if no cart provider is installed or the cart cannot be saved.
pub async fn add(
    id: ProductId,
    title: String,
    image_url: String,
    price: Price,
) -> Result<(), Box<dyn std::error::Error>> {
    let item = NewCartItem {
        id,
        title,
        image_url,
        price,
    };
    let id = item.id.clone();

    let cart = use_cart()?.add_to_cart(item).await?;
    report(&cart, &id);
    Ok(())
}

/// Add one unit of a product.
///
/// # Errors
///
/// Returns an error if no cart provider is installed or the cart cannot be saved.
pub async fn increment(id: &ProductId) -> Result<(), Box<dyn std::error::Error>> {
    let cart = use_cart()?.increment(id.as_str()).await?;
    report(&cart, id);
    Ok(())
}

/// Remove one unit of a product.
///
/// # Errors
///
/// Returns an error if no cart provider is installed or the cart cannot be saved.
pub async fn decrement(id: &ProductId) -> Result<(), Box<dyn std::error::Error>> {
    let cart = use_cart()?.decrement(id.as_str()).await?;
    report(&cart, id);
    Ok(())
}

fn report(cart: &Cart, id: &ProductId) {
    match cart.get(id.as_str()) {
        Some(line) => info!("{} x{} ({} in cart)", line.title, line.quantity, cart.item_count()),
        None => info!("{id} is not in the cart"),
    }
}

/// Render the cart as a plain-text table.
fn render(cart: &Cart) -> String {
    if cart.is_empty() {
        return "Cart is empty".to_string();
    }

    let id_width = cart
        .iter()
        .map(|item| item.id.as_str().len())
        .max()
        .unwrap_or(0)
        .max("ID".len());

    let mut out = String::new();
    let _ = writeln!(out, "{:<id_width$}  {:>4}  {:>10}  TITLE", "ID", "QTY", "PRICE");
    for item in cart {
        let _ = writeln!(
            out,
            "{:<id_width$}  {:>4}  {:>10}  {}",
            item.id.as_str(),
            item.quantity,
            item.price.to_string(),
            item.title
        );
    }
    let _ = write!(out, "{} items in {} lines", cart.item_count(), cart.len());
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_empty_cart() {
        assert_eq!(render(&Cart::new()), "Cart is empty");
    }

    #[test]
    fn test_render_lists_lines_in_order() {
        let cart = Cart::from_items(vec![
            NewCartItem::new("chair-01", "Chair", "u", Price::from_cents(40_000)).into_cart_item(2),
            NewCartItem::new("p2", "Mug", "u", Price::from_cents(950)).into_cart_item(0),
        ]);

        let rendered = render(&cart);
        let lines: Vec<&str> = rendered.lines().collect();

        assert_eq!(lines.len(), 4);
        assert_eq!(lines.first().copied(), Some("ID         QTY       PRICE  TITLE"));
        assert_eq!(lines.get(1).copied(), Some("chair-01     2     $400.00  Chair"));
        assert_eq!(lines.get(2).copied(), Some("p2           0       $9.50  Mug"));
        assert_eq!(lines.get(3).copied(), Some("2 items in 2 lines"));
    }
}
