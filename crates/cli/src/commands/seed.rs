//! Reset the product catalog to the standard menu.
//!
//! Existing products are deleted first. Each product's ID is derived from its
//! name, so reseeding produces the same documents.

use std::sync::Arc;

use tracing::info;

use mousse_melts_core::{Price, Product, ProductId};
use mousse_melts_storefront::db::{CatalogRepository, PgDocumentStore, RepositoryError};

use super::{ConnectError, connect};

#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    #[error(transparent)]
    Connect(#[from] ConnectError),

    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
}

struct MenuItem {
    name: &'static str,
    price: i64,
    category: &'static str,
    description: &'static str,
    image: &'static str,
}

const MENU: [MenuItem; 15] = [
    MenuItem {
        name: "Oreo Cupcake",
        price: 250,
        category: "Cupcakes",
        description: "Soft chocolate cupcake with creamy Oreo frosting.",
        image: "https://placehold.co/400x400/3E2723/FFF?text=Oreo+Cupcake",
    },
    MenuItem {
        name: "Red Velvet Cupcake",
        price: 250,
        category: "Cupcakes",
        description: "Velvety cupcake with cream cheese frosting.",
        image: "https://placehold.co/400x400/800020/FFF?text=Red+Velvet",
    },
    MenuItem {
        name: "Fudge Cupcake",
        price: 250,
        category: "Cupcakes",
        description: "Filled with soft fudge and rich chocolate frosting.",
        image: "https://placehold.co/400x400/3E2723/FFF?text=Fudge+Cupcake",
    },
    MenuItem {
        name: "Molten Lava",
        price: 350,
        category: "Pastries",
        description: "Warm chocolate cake with a flowing center.",
        image: "https://placehold.co/400x400/3E2723/FFF?text=Molten+Lava",
    },
    MenuItem {
        name: "Hazel Brownie",
        price: 300,
        category: "Pastries",
        description: "Fudgy brownie blended with roasted hazelnuts.",
        image: "https://placehold.co/400x400/3E2723/FFF?text=Hazel+Brownie",
    },
    MenuItem {
        name: "Fudge Pastry",
        price: 350,
        category: "Pastries",
        description: "Layered with rich fudge and smooth frosting.",
        image: "https://placehold.co/400x400/3E2723/FFF?text=Fudge+Pastry",
    },
    MenuItem {
        name: "Caramel Pastry",
        price: 350,
        category: "Pastries",
        description: "Layered with smooth caramel cream.",
        image: "https://placehold.co/400x400/D2691E/FFF?text=Caramel+Pastry",
    },
    MenuItem {
        name: "Chocolate Bread",
        price: 300,
        category: "Breads",
        description: "Fluffy bread infused with rich chocolate.",
        image: "https://placehold.co/400x400/3E2723/FFF?text=Choco+Bread",
    },
    MenuItem {
        name: "Banana Bread",
        price: 300,
        category: "Breads",
        description: "Moist bread made with ripe bananas.",
        image: "https://placehold.co/400x400/FFD700/000?text=Banana+Bread",
    },
    MenuItem {
        name: "Chocolate Tart",
        price: 300,
        category: "Tarts",
        description: "Crisp buttery crust filled with smooth ganache.",
        image: "https://placehold.co/400x400/3E2723/FFF?text=Choco+Tart",
    },
    MenuItem {
        name: "Lemon Tart",
        price: 300,
        category: "Tarts",
        description: "Zesty tangy lemon curd filling.",
        image: "https://placehold.co/400x400/FFFACD/000?text=Lemon+Tart",
    },
    MenuItem {
        name: "Mini Puffs",
        price: 100,
        category: "Pastries",
        description: "Light airy pastry bites with cream.",
        image: "https://placehold.co/400x400/FFF/000?text=Mini+Puffs",
    },
    MenuItem {
        name: "Nutella Sundae",
        price: 350,
        category: "Sundaes",
        description: "Layers of ice cream, Nutella and crunchy toppings.",
        image: "https://placehold.co/400x400/3E2723/FFF?text=Nutella+Sundae",
    },
    MenuItem {
        name: "Red Velvet Sundae",
        price: 350,
        category: "Sundaes",
        description: "Layers of red velvet cake and ice cream.",
        image: "https://placehold.co/400x400/800020/FFF?text=Red+Velvet+Sundae",
    },
    MenuItem {
        name: "Tres Leches",
        price: 380,
        category: "Sundaes",
        description: "Sponge cake soaked in three types of milk.",
        image: "https://placehold.co/400x400/FFF/000?text=Tres+Leches",
    },
];

fn menu_products() -> Vec<Product> {
    MENU.iter()
        .zip(0_u32..)
        .map(|(item, position)| Product {
            id: ProductId::from_name(item.name),
            name: item.name.to_string(),
            description: item.description.to_string(),
            price: Price::from_rupees(item.price),
            sale_price: None,
            category: item.category.to_string(),
            image: item.image.to_string(),
            is_best_seller: false,
            display_order: Some(position),
        })
        .collect()
}

/// Delete every product and upload the standard menu.
///
/// Returns the number of products uploaded.
///
/// # Errors
///
/// Returns an error if the database is unreachable or a write fails.
pub async fn products() -> Result<usize, SeedError> {
    let pool = connect().await?;
    let repository = CatalogRepository::new(Arc::new(PgDocumentStore::new(pool)));

    info!("Clearing existing products...");
    let deleted = repository.clear_products().await?;
    info!(deleted, "Deleted existing products");

    info!("Uploading new products...");
    let products = menu_products();
    for product in &products {
        repository.put_product(product).await?;
        info!(id = %product.id, name = %product.name, "Added product");
    }

    info!(count = products.len(), "All products uploaded");
    Ok(products.len())
}
