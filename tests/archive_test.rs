mod common;

use std::io::{Cursor, Read};

use common::{cover_bytes, spawn_image_server};
use coverfetch::{
    management::{archive_folder, list_folder, persist_covers},
    types::AlbumEntry,
};
use reqwest::Client;

fn entry(name: &str, base: &str, cover: &str) -> AlbumEntry {
    AlbumEntry {
        name: name.to_string(),
        cover_url: format!("{base}/covers/{cover}"),
    }
}

#[tokio::test]
async fn test_persist_covers_writes_sanitized_files() {
    let base = spawn_image_server().await;
    let dir = tempfile::tempdir().unwrap();
    let folder = dir.path().join("alice");

    let entries = vec![
        entry("AC/DC: Live", &base, "acdc"),
        entry("Plain", &base, "plain"),
    ];
    let written = persist_covers(&Client::new(), &entries, &folder)
        .await
        .unwrap();

    assert_eq!(written, vec!["ACDC Live.jpg", "Plain.jpg"]);
    assert_eq!(
        std::fs::read(folder.join("ACDC Live.jpg")).unwrap(),
        cover_bytes("acdc")
    );
    assert_eq!(
        std::fs::read(folder.join("Plain.jpg")).unwrap(),
        cover_bytes("plain")
    );
}

#[tokio::test]
async fn test_failed_downloads_are_skipped() {
    let base = spawn_image_server().await;
    let dir = tempfile::tempdir().unwrap();

    let entries = vec![
        entry("Gone", &base, "missing-1"),
        entry("Here", &base, "here"),
        AlbumEntry {
            name: "Unreachable".to_string(),
            cover_url: "http://127.0.0.1:1/nothing".to_string(),
        },
    ];
    let written = persist_covers(&Client::new(), &entries, dir.path())
        .await
        .unwrap();

    assert_eq!(written, vec!["Here.jpg"]);
    assert_eq!(list_folder(dir.path()).await.unwrap(), vec!["Here.jpg"]);
}

#[tokio::test]
async fn test_unwritable_names_are_skipped() {
    let base = spawn_image_server().await;
    let dir = tempfile::tempdir().unwrap();

    // 260 bytes, over the usual 255-byte file name limit
    let too_long = "é".repeat(130);
    let entries = vec![
        entry("Good", &base, "good"),
        entry(&too_long, &base, "long"),
        entry("Also Good", &base, "also"),
    ];
    let written = persist_covers(&Client::new(), &entries, dir.path())
        .await
        .unwrap();

    assert_eq!(written, vec!["Good.jpg", "Also Good.jpg"]);
    assert_eq!(
        list_folder(dir.path()).await.unwrap(),
        vec!["Also Good.jpg", "Good.jpg"]
    );
}

#[tokio::test]
async fn test_refetch_overwrites_without_growing() {
    let base = spawn_image_server().await;
    let dir = tempfile::tempdir().unwrap();
    let entries = vec![entry("One", &base, "one"), entry("Two", &base, "two")];
    let client = Client::new();

    persist_covers(&client, &entries, dir.path()).await.unwrap();
    let first = list_folder(dir.path()).await.unwrap();
    persist_covers(&client, &entries, dir.path()).await.unwrap();
    let second = list_folder(dir.path()).await.unwrap();

    assert_eq!(first, vec!["One.jpg", "Two.jpg"]);
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_colliding_names_keep_the_later_cover() {
    let base = spawn_image_server().await;
    let dir = tempfile::tempdir().unwrap();
    let entries = vec![entry("A/B", &base, "first"), entry("AB", &base, "second")];

    persist_covers(&Client::new(), &entries, dir.path())
        .await
        .unwrap();

    assert_eq!(list_folder(dir.path()).await.unwrap(), vec!["AB.jpg"]);
    assert_eq!(
        std::fs::read(dir.path().join("AB.jpg")).unwrap(),
        cover_bytes("second")
    );
}

#[tokio::test]
async fn test_list_folder_skips_directories_and_missing_folders() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("b.jpg"), b"b").unwrap();
    std::fs::write(dir.path().join("a.jpg"), b"a").unwrap();
    std::fs::create_dir(dir.path().join("bob")).unwrap();

    assert_eq!(
        list_folder(dir.path()).await.unwrap(),
        vec!["a.jpg", "b.jpg"]
    );
    assert!(
        list_folder(&dir.path().join("absent"))
            .await
            .unwrap()
            .is_empty()
    );
}

#[tokio::test]
async fn test_archive_folder_contains_exact_files() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("a.jpg"), b"first image").unwrap();
    std::fs::write(dir.path().join("b.jpg"), b"second image").unwrap();
    std::fs::create_dir(dir.path().join("nested")).unwrap();
    std::fs::write(dir.path().join("nested").join("c.jpg"), b"hidden").unwrap();

    let bytes = archive_folder(dir.path()).await.unwrap();
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();

    let mut names: Vec<String> = archive.file_names().map(str::to_string).collect();
    names.sort();
    assert_eq!(names, vec!["a.jpg", "b.jpg"]);

    for (name, expected) in [("a.jpg", &b"first image"[..]), ("b.jpg", &b"second image"[..])] {
        let mut contents = Vec::new();
        archive
            .by_name(name)
            .unwrap()
            .read_to_end(&mut contents)
            .unwrap();
        assert_eq!(contents, expected);
    }
}

#[tokio::test]
async fn test_archive_of_missing_folder_is_empty() {
    let dir = tempfile::tempdir().unwrap();

    let bytes = archive_folder(&dir.path().join("absent")).await.unwrap();
    let archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();

    assert_eq!(archive.len(), 0);
}
