use std::path::PathBuf;

use catalog_search::{Catalog, Product};

/// Path to the fixture catalog shipped with the tests
pub fn fixture_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join("products.json")
}

/// Load the fixture catalog
pub fn fixture_catalog() -> Catalog {
    Catalog::load(&fixture_path()).expect("fixture catalog should load")
}

/// First `n` products of the fixture catalog
pub fn small_catalog(n: usize) -> Catalog {
    let products: Vec<Product> = fixture_catalog()
        .products()
        .iter()
        .take(n)
        .cloned()
        .collect();
    Catalog::new(products)
}

/// Product ids of a result list, for order comparisons
pub fn ids(products: &[Product]) -> Vec<String> {
    products.iter().map(|p| p.id.to_string()).collect()
}
