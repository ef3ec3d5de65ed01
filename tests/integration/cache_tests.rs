use anyhow::Result;
use std::sync::Arc;

use catalog_search::embeddings::MockEmbedder;
use catalog_search::search::MatrixSource;
use catalog_search::{Catalog, EngineOptions, Product, SearchEngine};

use crate::helpers::test_harness::{TestHarness, TEST_DIMENSION};
use crate::helpers::test_utils::small_catalog;

#[test]
fn test_second_build_uses_cache() -> Result<()> {
    let harness = TestHarness::new()?;

    let first_embedder = Arc::new(MockEmbedder::new(TEST_DIMENSION));
    let first = harness.build_with(first_embedder.clone())?;
    assert_eq!(first.matrix_source(), MatrixSource::Computed);
    assert_eq!(first_embedder.embedded_texts(), harness.catalog.len());
    assert!(harness.cache_path().exists());

    let second_embedder = Arc::new(MockEmbedder::new(TEST_DIMENSION));
    let second = harness.build_with(second_embedder.clone())?;
    assert_eq!(second.matrix_source(), MatrixSource::Cache);
    assert_eq!(second_embedder.embedded_texts(), 0);

    for query in ["cotton", "kitchen tools", ""] {
        assert_eq!(first.search(query)?, second.search(query)?);
    }
    // Only the queries went through the second embedder
    assert_eq!(second_embedder.embedded_texts(), 3);
    Ok(())
}

#[test]
fn test_changed_catalog_recomputes() -> Result<()> {
    let harness = TestHarness::new()?;
    harness.build()?;

    let mut products: Vec<Product> = harness.catalog.products().to_vec();
    products[0].description = "Completely different description".to_string();
    let changed = TestHarness {
        temp_dir: harness.temp_dir,
        catalog: Catalog::new(products),
    };

    let embedder = Arc::new(MockEmbedder::new(TEST_DIMENSION));
    let engine = changed.build_with(embedder.clone())?;
    assert_eq!(engine.matrix_source(), MatrixSource::Computed);
    assert_eq!(embedder.embedded_texts(), changed.catalog.len());

    // The rewritten cache now matches the new catalog
    assert_eq!(changed.build()?.matrix_source(), MatrixSource::Cache);
    Ok(())
}

#[test]
fn test_resized_catalog_recomputes() -> Result<()> {
    let harness = TestHarness::with_catalog(small_catalog(5))?;
    harness.build()?;

    let smaller = TestHarness {
        temp_dir: harness.temp_dir,
        catalog: small_catalog(4),
    };
    let engine = smaller.build()?;
    assert_eq!(engine.matrix_source(), MatrixSource::Computed);
    assert_eq!(engine.len(), 4);
    Ok(())
}

#[test]
fn test_different_model_recomputes() -> Result<()> {
    let harness = TestHarness::new()?;
    harness.build()?;

    let engine = harness.build_with(Arc::new(MockEmbedder::new(TEST_DIMENSION * 2)))?;
    assert_eq!(engine.matrix_source(), MatrixSource::Computed);
    assert!(!engine.search("cotton")?.is_empty());
    Ok(())
}

#[test]
fn test_corrupt_cache_is_overwritten() -> Result<()> {
    let harness = TestHarness::new()?;
    std::fs::write(harness.cache_path(), "{ not json")?;

    let engine = harness.build()?;
    assert_eq!(engine.matrix_source(), MatrixSource::Computed);

    let content = std::fs::read_to_string(harness.cache_path())?;
    let value: serde_json::Value = serde_json::from_str(&content)?;
    assert_eq!(value["vectors"].as_array().map(|v| v.len()), Some(harness.catalog.len()));
    assert_eq!(value["dimension"], TEST_DIMENSION);
    Ok(())
}

#[test]
fn test_unwritable_cache_does_not_fail_build() -> Result<()> {
    let harness = TestHarness::new()?;
    let blocker = harness.path().join("blocker");
    std::fs::write(&blocker, "a file, not a directory")?;

    let options = EngineOptions {
        cache_path: Some(blocker.join("embeddings.json")),
        ..EngineOptions::default()
    };
    let engine = SearchEngine::build(
        harness.catalog.clone(),
        Arc::new(MockEmbedder::new(TEST_DIMENSION)),
        options,
    )?;

    assert_eq!(engine.matrix_source(), MatrixSource::Computed);
    assert!(!engine.search("mug")?.is_empty());
    Ok(())
}

#[test]
fn test_no_cache_path_always_computes() -> Result<()> {
    let harness = TestHarness::new()?;
    for _ in 0..2 {
        let engine = SearchEngine::build(
            harness.catalog.clone(),
            Arc::new(MockEmbedder::new(TEST_DIMENSION)),
            EngineOptions::default(),
        )?;
        assert_eq!(engine.matrix_source(), MatrixSource::Computed);
    }
    assert!(!harness.cache_path().exists());
    Ok(())
}
