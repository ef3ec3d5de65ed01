use anyhow::Result;
use std::sync::Arc;

use catalog_search::search::DEFAULT_RESULTS;
use catalog_search::Product;

use crate::helpers::mock_embeddings::FlakyEmbedder;
use crate::helpers::test_harness::{TestHarness, TEST_DIMENSION};
use crate::helpers::test_utils::{fixture_catalog, ids, small_catalog};

#[test]
fn test_fixture_catalog_loads() {
    let catalog = fixture_catalog();
    assert!(catalog.len() >= 10);

    // Extra fields survive loading
    let first = catalog.get(0).unwrap();
    assert_eq!(first.extra.get("category").and_then(|v| v.as_str()), Some("apparel"));
}

#[test]
fn test_returns_default_number_of_results() -> Result<()> {
    let harness = TestHarness::new()?;
    let engine = harness.build()?;

    for query in ["cotton", "warm winter clothing", "kitchen", "x"] {
        assert_eq!(engine.search(query)?.len(), DEFAULT_RESULTS);
    }
    Ok(())
}

#[test]
fn test_small_catalog_returns_all_products() -> Result<()> {
    let harness = TestHarness::with_catalog(small_catalog(3))?;
    let engine = harness.build()?;

    let results = engine.search("cotton")?;
    assert_eq!(results.len(), 3);

    let mut returned = ids(&results);
    returned.sort();
    assert_eq!(returned, vec!["1", "2", "3"]);
    Ok(())
}

#[test]
fn test_messy_queries_never_fail() -> Result<()> {
    let harness = TestHarness::new()?;
    let engine = harness.build()?;

    for query in ["", "   ", "!!!", "@#$%^&*()", "COTTON!!! t-shirt's", "\t\n", "ümlaut ☕"] {
        let results = engine.search(query)?;
        assert_eq!(results.len(), DEFAULT_RESULTS, "query {:?}", query);
    }
    Ok(())
}

#[test]
fn test_cotton_products_are_found() -> Result<()> {
    let harness = TestHarness::new()?;
    let engine = harness.build()?;

    let results = engine.search("cotton")?;
    let names: Vec<&str> = results.iter().map(|p| p.name.as_str()).collect();

    assert!(names.contains(&"Organic Cotton T-Shirt"));
    assert!(names.contains(&"Cotton Bath Towel Set"));
    Ok(())
}

#[test]
fn test_exact_name_ranks_first() -> Result<()> {
    let harness = TestHarness::new()?;
    let engine = harness.build()?;

    assert_eq!(engine.search("bamboo cutting board")?[0].name, "Bamboo Cutting Board");
    assert_eq!(engine.search("Samegrelo COAT")?[0].name, "Samegrelo Winter Coat");
    Ok(())
}

#[test]
fn test_possessive_matches() -> Result<()> {
    let harness = TestHarness::new()?;
    let engine = harness.build()?;

    let results = engine.search("women linen")?;
    assert_eq!(results[0].name, "Women's Linen Shirt");
    Ok(())
}

#[test]
fn test_results_have_required_fields() -> Result<()> {
    let harness = TestHarness::new()?;
    let engine = harness.build()?;

    for product in engine.search("lamp")? {
        let value = serde_json::to_value(&product)?;
        for field in ["id", "name", "description", "price"] {
            assert!(value.get(field).is_some(), "missing {}", field);
        }
        assert!(value.get("category").is_some());
    }
    Ok(())
}

#[test]
fn test_repeated_searches_are_identical() -> Result<()> {
    let harness = TestHarness::new()?;
    let engine = harness.build()?;

    let first: Vec<Product> = engine.search("soft warm apparel")?;
    for _ in 0..5 {
        assert_eq!(engine.search("soft warm apparel")?, first);
    }
    Ok(())
}

#[test]
fn test_limit_is_clamped() -> Result<()> {
    let harness = TestHarness::new()?;
    let engine = harness.build()?;

    assert_eq!(engine.search_with_limit("mug", 3)?.len(), 3);
    assert_eq!(engine.search_with_limit("mug", 1000)?.len(), engine.len());
    Ok(())
}

#[test]
fn test_embedder_failure_fails_build() -> Result<()> {
    let harness = TestHarness::new()?;
    let result = harness.build_with(Arc::new(FlakyEmbedder::failing(TEST_DIMENSION)));

    assert!(result.is_err());
    assert!(!harness.cache_path().exists());
    Ok(())
}

#[test]
fn test_query_embedding_failure_is_surfaced() -> Result<()> {
    let harness = TestHarness::new()?;
    let embedder = Arc::new(FlakyEmbedder::new(TEST_DIMENSION));
    let engine = harness.build_with(embedder.clone())?;

    embedder.set_failing(true);
    assert!(engine.search("cotton").is_err());

    embedder.set_failing(false);
    assert_eq!(engine.search("cotton")?.len(), DEFAULT_RESULTS);
    Ok(())
}

#[test]
fn test_concurrent_searches() -> Result<()> {
    let harness = TestHarness::new()?;
    let engine = Arc::new(harness.build()?);
    let expected = engine.search("leather wallet")?;

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let engine = Arc::clone(&engine);
            std::thread::spawn(move || engine.search("leather wallet"))
        })
        .collect();

    for handle in handles {
        let results = handle.join().expect("search thread panicked")?;
        assert_eq!(results, expected);
    }
    Ok(())
}
