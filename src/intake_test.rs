use super::*;

fn completed_contact() -> ContactForm {
    let mut form = ContactForm::new();
    form.set_name("Ana Ruiz");
    form.set_email("ana@x.co");
    form
}

fn tif(name: &str, len: usize) -> FileHandle {
    FileHandle::new(name, "image/tiff", vec![0u8; len])
}

// =============================================================================
// Gate
// =============================================================================

#[test]
fn select_without_contact_is_rejected() {
    let mut intake = FileIntake::new();
    let contact = ContactForm::new();
    let err = intake.select(&contact, FileSlot::Image, tif("ortho.tif", 4)).unwrap_err();
    assert!(matches!(err, IntakeError::ContactIncomplete(ContactError::MissingField(_))));
    assert!(intake.files().is_empty());
}

#[test]
fn repeated_rejections_never_populate_slots() {
    let mut intake = FileIntake::new();
    let mut contact = ContactForm::new();
    contact.set_name("Ana");
    contact.set_email("bad-email");
    for _ in 0..3 {
        assert!(intake.select(&contact, FileSlot::Vector, tif("a.kml", 1)).is_err());
        assert!(intake.select(&contact, FileSlot::Image, tif("b.tif", 1)).is_err());
    }
    assert_eq!(intake.files(), &UploadedFiles::default());
}

#[test]
fn select_with_contact_fills_slot() {
    let mut intake = FileIntake::new();
    let contact = completed_contact();
    let handle = intake.select(&contact, FileSlot::Image, tif("ortho.tif", 8)).unwrap();
    assert_eq!(handle.name, "ortho.tif");
    assert_eq!(intake.files().image.as_ref().map(|f| f.size_bytes), Some(8));
    assert!(intake.files().vector.is_none());
}

#[test]
fn reselecting_replaces_previous_handle() {
    let mut intake = FileIntake::new();
    let contact = completed_contact();
    intake.select(&contact, FileSlot::Image, tif("first.tif", 1)).unwrap();
    intake.select(&contact, FileSlot::Image, tif("second.tif", 2)).unwrap();
    assert_eq!(intake.files().image.as_ref().map(|f| f.name.as_str()), Some("second.tif"));
}

#[test]
fn no_format_enforcement() {
    let mut intake = FileIntake::new();
    let contact = completed_contact();
    let odd = FileHandle::new("notes.txt", "text/plain", "hello");
    assert!(intake.select(&contact, FileSlot::Image, odd).is_ok());
}

// =============================================================================
// UploadedFiles
// =============================================================================

#[test]
fn iter_yields_image_before_vector() {
    let files = UploadedFiles { image: Some(tif("i.tif", 1)), vector: Some(tif("v.kml", 1)) };
    let order: Vec<_> = files.iter().map(|(slot, _)| slot).collect();
    assert_eq!(order, vec![FileSlot::Image, FileSlot::Vector]);
}

#[test]
fn iter_skips_empty_slots() {
    let files = UploadedFiles { image: None, vector: Some(tif("v.kml", 1)) };
    let names: Vec<_> = files.iter().map(|(_, f)| f.name.as_str()).collect();
    assert_eq!(names, vec!["v.kml"]);
}

// =============================================================================
// FileHandle
// =============================================================================

#[test]
fn status_text_shows_megabytes() {
    let file = tif("ortho.tif", 2 * 1024 * 1024);
    assert_eq!(file.status_text(), "✓ ortho.tif\n2.00 MB");
}

#[test]
fn placeholder_lists_formats() {
    assert_eq!(FileSlot::Image.placeholder(), "↑ Click para subir\nFormatos: TIFF, GeoTIFF, HDF");
    assert!(FileSlot::Vector.placeholder().contains(".KMZ"));
}

#[test]
fn mime_inferred_from_extension() {
    assert_eq!(mime_for_name("ORTHO.TIF"), "image/tiff");
    assert_eq!(mime_for_name("lote.kml"), "application/vnd.google-earth.kml+xml");
    assert_eq!(mime_for_name("no_extension"), "application/octet-stream");
}

#[tokio::test]
async fn from_path_reads_bytes_and_name() {
    let dir = std::env::temp_dir().join(format!("mapia-intake-{}", uuid::Uuid::new_v4()));
    tokio::fs::create_dir_all(&dir).await.unwrap();
    let path = dir.join("lote.kml");
    tokio::fs::write(&path, b"<kml/>").await.unwrap();

    let file = FileHandle::from_path(&path).await.unwrap();
    assert_eq!(file.name, "lote.kml");
    assert_eq!(file.size_bytes, 6);
    assert_eq!(file.mime_type, "application/vnd.google-earth.kml+xml");

    tokio::fs::remove_dir_all(&dir).await.unwrap();
}

#[tokio::test]
async fn from_path_missing_file_is_read_error() {
    let err = FileHandle::from_path(Path::new("/definitely/not/here.tif")).await.unwrap_err();
    assert!(matches!(err, IntakeError::Read { .. }));
}
