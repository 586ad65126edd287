//! Tests for the in-memory asset repository.

use atelier_core::{Asset, AssetType, Owner};
use atelier_database::MemoryAssetRepository;
use atelier_interface::{AssetRepository, StaticOwnerDirectory};
use atelier_query::AssetFilterBuilder;
use std::sync::Arc;
use uuid::Uuid;

fn asset_for(client_id: Uuid, name: &str) -> Asset {
    Asset::new(
        name,
        AssetType::Image,
        format!("{}/x/original.png", client_id),
        Uuid::new_v4(),
        client_id,
    )
}

#[tokio::test]
async fn insert_then_fetch_round_trips() {
    let repo = MemoryAssetRepository::new();
    let asset = asset_for(Uuid::new_v4(), "hero");

    repo.insert(&asset).await.unwrap();
    let fetched = repo.fetch(asset.id).await.unwrap().unwrap();
    assert_eq!(fetched, asset);
}

#[tokio::test]
async fn duplicate_insert_is_rejected() {
    let repo = MemoryAssetRepository::new();
    let asset = asset_for(Uuid::new_v4(), "hero");

    repo.insert(&asset).await.unwrap();
    assert!(repo.insert(&asset).await.is_err());
}

#[tokio::test]
async fn missing_owner_surfaces_as_foreign_key_violation() {
    let owner = Uuid::new_v4();
    let directory = Arc::new(StaticOwnerDirectory::new(
        [Owner {
            id: owner,
            display_name: "designer".to_string(),
        }],
        Uuid::new_v4(),
    ));
    let repo = MemoryAssetRepository::with_owner_checks(directory);

    let mut known = asset_for(Uuid::new_v4(), "ok");
    known.owner_id = owner;
    repo.insert(&known).await.unwrap();

    let unknown = asset_for(Uuid::new_v4(), "bad");
    let err = repo.insert(&unknown).await.unwrap_err();
    match err.kind() {
        atelier_error::AtelierErrorKind::Database(db) => {
            assert!(db.is_foreign_key_violation())
        }
        other => panic!("expected database error, got {other}"),
    }
}

#[tokio::test]
async fn update_of_missing_record_errors() {
    let repo = MemoryAssetRepository::new();
    let asset = asset_for(Uuid::new_v4(), "ghost");
    assert!(repo.update(&asset).await.is_err());
}

#[tokio::test]
async fn delete_reports_whether_the_record_existed() {
    let repo = MemoryAssetRepository::new();
    let asset = asset_for(Uuid::new_v4(), "gone");

    repo.insert(&asset).await.unwrap();
    assert!(repo.delete(asset.id).await.unwrap());
    assert!(!repo.delete(asset.id).await.unwrap());
}

#[tokio::test]
async fn query_scopes_to_the_requested_client() {
    let repo = MemoryAssetRepository::new();
    let client_a = Uuid::new_v4();
    let client_b = Uuid::new_v4();

    for i in 0..3 {
        repo.insert(&asset_for(client_a, &format!("a{i}"))).await.unwrap();
    }
    repo.insert(&asset_for(client_b, "b0")).await.unwrap();

    let filter = AssetFilterBuilder::default().build().unwrap();
    let page = repo.query(client_a, &filter).await.unwrap();
    assert_eq!(page.total, 3);
    assert!(page.assets.iter().all(|a| a.client_id == client_a));
}

#[tokio::test]
async fn query_total_ignores_pagination() {
    let repo = MemoryAssetRepository::new();
    let client = Uuid::new_v4();
    for i in 0..25 {
        repo.insert(&asset_for(client, &format!("a{i:02}"))).await.unwrap();
    }

    let filter = AssetFilterBuilder::default()
        .limit(10usize)
        .offset(20usize)
        .build()
        .unwrap();
    let page = repo.query(client, &filter).await.unwrap();
    assert_eq!(page.total, 25);
    assert_eq!(page.assets.len(), 5);
}
