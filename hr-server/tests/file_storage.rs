//! Stored-file management tests: documents and profile photos.

use hr_server::core::Config;
use hr_server::services::FileStorage;

fn setup() -> (tempfile::TempDir, Config, FileStorage) {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = Config::with_overrides(dir.path().to_string_lossy(), 0);
    config
        .ensure_work_dir_structure()
        .expect("work dir structure");
    let storage = FileStorage::new(&config);
    (dir, config, storage)
}

fn tiny_png() -> Vec<u8> {
    let img = image::RgbImage::from_pixel(4, 4, image::Rgb([200, 120, 40]));
    let mut buffer = std::io::Cursor::new(Vec::new());
    image::DynamicImage::ImageRgb8(img)
        .write_to(&mut buffer, image::ImageFormat::Png)
        .expect("encode png");
    buffer.into_inner()
}

#[test]
fn documents_are_stored_under_generated_names_and_released() {
    let (_dir, config, storage) = setup();

    let stored = storage
        .store_document("Contrato 2024.pdf", b"%PDF-1.4 fake body")
        .unwrap();
    assert!(stored.ends_with(".pdf"));

    let path = config.documents_dir().join(&stored);
    assert!(path.exists());

    storage.delete_document(&stored);
    assert!(!path.exists());

    // Deleting again is a no-op, not an error
    storage.delete_document(&stored);
}

#[test]
fn document_validation_rejects_bad_uploads() {
    let (_dir, _config, storage) = setup();

    assert!(storage.store_document("empty.pdf", b"").is_err());
    assert!(storage.store_document("script.exe", b"MZ").is_err());
    assert!(storage.store_document("no-extension", b"data").is_err());
}

#[test]
fn document_paths_refuse_traversal() {
    let (_dir, _config, storage) = setup();

    assert!(storage.document_path("ok.pdf").is_ok());
    assert!(storage.document_path("../secrets.txt").is_err());
    assert!(storage.document_path("a/b.pdf").is_err());
}

#[test]
fn photos_are_recompressed_to_jpeg() {
    let (_dir, config, storage) = setup();

    let stored = storage.store_photo("avatar.png", &tiny_png()).unwrap();
    assert!(stored.ends_with(".jpg"));

    let path = config.photos_dir().join(&stored);
    let bytes = std::fs::read(&path).unwrap();
    // JPEG magic bytes
    assert_eq!(&bytes[..2], &[0xFF, 0xD8]);

    storage.delete_photo(&stored);
    assert!(!path.exists());
}

#[test]
fn photo_validation_rejects_non_images() {
    let (_dir, _config, storage) = setup();

    // Right extension, not an image
    assert!(storage.store_photo("avatar.png", b"not an image").is_err());
    // Unsupported extension
    assert!(storage.store_photo("avatar.gif", &tiny_png()).is_err());
}
