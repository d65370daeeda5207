//! Tests for the async filter service.

mod common;

use common::fixtures;
use mibae::services::FilterService;
use mibae_filter::{MibaeFilter, PaletteSet, Rgba};
use std::sync::Arc;

#[tokio::test]
async fn test_service_output_is_deterministic() {
    let input = fixtures::gradient(24, 16);
    let service = FilterService::new(MibaeFilter::new(PaletteSet::sketchbook()));

    let first = service.run_to_end(&input).await.unwrap();
    let second = service.run_to_end(&input).await.unwrap();
    let direct = MibaeFilter::new(PaletteSet::sketchbook())
        .apply(&input)
        .unwrap();

    common::assert_same_image(first.buffer(), second.buffer());
    common::assert_same_image(first.buffer(), direct.buffer());
}

#[tokio::test]
async fn test_spawned_run_completes() {
    let service = FilterService::new(MibaeFilter::new(PaletteSet::sketchbook()));
    let image = service
        .spawn(fixtures::gradient(8, 8))
        .join()
        .await
        .unwrap();
    assert!(image.is_complete());
    assert_eq!(image.rows_completed(), 8);
}

#[tokio::test]
async fn test_cancel_keeps_finished_rows() {
    let input = fixtures::gradient(32, 32);
    let full = MibaeFilter::new(PaletteSet::sketchbook())
        .apply(&input)
        .unwrap();

    let service = FilterService::new(MibaeFilter::new(PaletteSet::sketchbook()));
    let handle = service.spawn(input);
    // Let the run take a few rows on this single-threaded runtime.
    for _ in 0..3 {
        tokio::task::yield_now().await;
    }
    handle.cancel();
    let partial = handle.join().await.unwrap();

    assert!(!partial.is_complete());
    let rows = partial.rows_completed();
    let width = partial.width();
    for y in 0..partial.height() {
        for x in 0..width {
            let got = partial.buffer().get(x, y);
            if y < rows {
                assert_eq!(got, full.buffer().get(x, y), "row {y} differs from full run");
            } else {
                assert_eq!(got, Some(Rgba::TRANSPARENT), "row {y} should be empty");
            }
        }
    }
}

#[tokio::test]
async fn test_concurrent_runs_share_caches() {
    let filter = Arc::new(MibaeFilter::new(PaletteSet::sketchbook()));
    let a = FilterService::from_shared(Arc::clone(&filter));
    let b = FilterService::from_shared(Arc::clone(&filter));

    let left = fixtures::gradient(16, 12);
    let right = fixtures::gray(16, 12, 70);
    let (left_out, right_out) = tokio::join!(a.run_to_end(&left), b.run_to_end(&right));

    let fresh = MibaeFilter::new(PaletteSet::sketchbook());
    common::assert_same_image(left_out.unwrap().buffer(), fresh.apply(&left).unwrap().buffer());
    common::assert_same_image(
        right_out.unwrap().buffer(),
        fresh.apply(&right).unwrap().buffer(),
    );
    assert!(!filter.pattern_cache().is_empty());
}
