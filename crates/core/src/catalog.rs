//! Catalog ordering, filtering, and fallback content.

use thiserror::Error;

use crate::cart::Cart;
use crate::types::{CategoryFilter, Price, Product, ProductId};

/// Invalid drag-and-drop move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("cannot move item {from} to {to} in a list of {len}")]
pub struct ReorderError {
    pub from: usize,
    pub to: usize,
    pub len: usize,
}

/// Sort products by `display_order`, ascending.
///
/// Products without an order go to the end. The sort is stable, so ties keep
/// their stored order.
pub fn sort_by_display_order(products: &mut [Product]) {
    products.sort_by_key(|product| product.display_order.unwrap_or(u32::MAX));
}

/// Position for a newly added product: one past the highest existing order.
///
/// Products without an order count as zero.
#[must_use]
pub fn next_display_order(products: &[Product]) -> u32 {
    products
        .iter()
        .map(|product| product.display_order.unwrap_or(0))
        .max()
        .unwrap_or(0)
        .saturating_add(1)
}

/// Move one product from `from` to `to`, then renumber every product.
///
/// After the move each product's `display_order` equals its new index, so
/// the list always carries a dense `0..N-1` sequence.
///
/// # Errors
///
/// Returns `ReorderError` if either index is out of bounds; the list is left
/// untouched in that case.
pub fn reorder(products: &mut Vec<Product>, from: usize, to: usize) -> Result<(), ReorderError> {
    let len = products.len();
    if from >= len || to >= len {
        return Err(ReorderError { from, to, len });
    }

    let moved = products.remove(from);
    products.insert(to, moved);
    resequence(products);
    Ok(())
}

/// Assign `display_order` = index for every product.
pub fn resequence(products: &mut [Product]) {
    for (index, product) in products.iter_mut().enumerate() {
        product.display_order = Some(u32::try_from(index).unwrap_or(u32::MAX));
    }
}

/// Products in the selected category, in catalog order.
#[must_use]
pub fn filter_by_category<'a>(
    products: &'a [Product],
    filter: &CategoryFilter,
) -> Vec<&'a Product> {
    products
        .iter()
        .filter(|product| filter.matches(product))
        .collect()
}

/// Products that are not already in the cart, in catalog order.
#[must_use]
pub fn not_in_cart<'a>(products: &'a [Product], cart: &Cart) -> Vec<&'a Product> {
    products
        .iter()
        .filter(|product| !cart.contains(&product.id))
        .collect()
}

/// Look up a product by ID.
#[must_use]
pub fn find<'a>(products: &'a [Product], id: &ProductId) -> Option<&'a Product> {
    products.iter().find(|product| product.id == *id)
}

/// Products shown when the store is empty or unreachable.
#[must_use]
pub fn fallback_products() -> Vec<Product> {
    vec![
        Product {
            id: ProductId::new("c1"),
            name: "Oreo Cupcake".to_owned(),
            description: "A soft, moist chocolate cupcake topped with creamy Oreo frosting."
                .to_owned(),
            price: Price::from_rupees(250),
            sale_price: Some(Price::from_rupees(200)),
            category: "Cupcakes".to_owned(),
            image: "https://images.unsplash.com/photo-1595188619379-31741db45714?auto=format&fit=crop&q=80&w=800".to_owned(),
            is_best_seller: true,
            display_order: None,
        },
        Product {
            id: ProductId::new("c2"),
            name: "Red Velvet Cupcake".to_owned(),
            description: "A rich, velvety cupcake with a hint of cocoa.".to_owned(),
            price: Price::from_rupees(250),
            sale_price: None,
            category: "Cupcakes".to_owned(),
            image: "https://images.unsplash.com/photo-1614707267537-b85aaf00c4b7?auto=format&fit=crop&q=80&w=800".to_owned(),
            is_best_seller: true,
            display_order: None,
        },
    ]
}
