use std::fs;
use std::sync::{Arc, Mutex};

use ingest_engine::{image_extension, ExtractedImage, ImageRelocator, IngestEvent, IngestObserver};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

#[derive(Default)]
struct RecordingObserver {
    events: Mutex<Vec<IngestEvent>>,
}

impl IngestObserver for RecordingObserver {
    fn notify(&self, event: IngestEvent) {
        self.events.lock().unwrap().push(event);
    }
}

fn image(index: usize, hint: Option<&str>, data: &[u8]) -> ExtractedImage {
    ExtractedImage {
        index,
        format_hint: hint.map(str::to_string),
        data: data.to_vec(),
    }
}

#[test]
fn extension_from_hint() {
    assert_eq!(image_extension(Some("image/jpeg")), ".jpg");
    assert_eq!(image_extension(Some("image/WEBP")), ".webp");
    assert_eq!(image_extension(Some("image/x-unknown")), ".png");
    assert_eq!(image_extension(Some("JPEG")), ".jpeg");
    assert_eq!(image_extension(Some(".gif")), ".gif");
    assert_eq!(image_extension(Some("we!rd")), ".png");
    assert_eq!(image_extension(Some("")), ".png");
    assert_eq!(image_extension(None), ".png");
}

#[test]
fn images_are_written_beside_the_page_and_references_rewritten() {
    ingest_logging::initialize_for_tests();
    let target = TempDir::new().unwrap();
    let observer = Arc::new(RecordingObserver::default());
    let relocator = ImageRelocator::new(observer.clone());

    let markdown = "![one](image_1)\n\n![two](image_2.jpg)\n";
    let images = vec![
        image(1, Some("image/png"), b"first"),
        image(2, Some("image/jpeg"), b"second"),
    ];
    let rewritten = relocator.relocate(markdown, &images, target.path(), "Q3 deck.pptx");

    assert_eq!(
        rewritten,
        "![one](<./Q3 deck_image_1.png>)\n\n![two](<./Q3 deck_image_2.jpg>)\n"
    );
    assert_eq!(fs::read(target.path().join("Q3 deck_image_1.png")).unwrap(), b"first");
    assert_eq!(fs::read(target.path().join("Q3 deck_image_2.jpg")).unwrap(), b"second");
    let written = observer
        .events
        .lock()
        .unwrap()
        .iter()
        .filter(|e| matches!(e, IngestEvent::ImageWritten { .. }))
        .count();
    assert_eq!(written, 2);
}

#[test]
fn missing_target_directory_is_created() {
    let root = TempDir::new().unwrap();
    let nested = root.path().join("docs").join("api");
    let relocator = ImageRelocator::new(Arc::new(ingest_engine::NullObserver));

    relocator.relocate("![](image_1)", &[image(1, None, b"x")], &nested, "spec.pdf");

    assert!(nested.join("spec_image_1.png").is_file());
}

#[test]
fn failed_image_leaves_reference_untouched() {
    let root = TempDir::new().unwrap();
    let not_a_dir = root.path().join("occupied");
    fs::write(&not_a_dir, "file").unwrap();
    let observer = Arc::new(RecordingObserver::default());
    let relocator = ImageRelocator::new(observer.clone());

    let markdown = "before ![pic](image_1) after";
    let rewritten = relocator.relocate(markdown, &[image(1, None, b"x")], &not_a_dir, "doc.docx");

    assert_eq!(rewritten, markdown);
    let events = observer.events.lock().unwrap();
    assert!(matches!(
        events.as_slice(),
        [IngestEvent::ImageFailed { index: 1, .. }]
    ));
}

#[test]
fn without_images_markdown_is_returned_as_is() {
    let target = TempDir::new().unwrap();
    let relocator = ImageRelocator::new(Arc::new(ingest_engine::NullObserver));
    assert_eq!(
        relocator.relocate("![x](image_1)", &[], target.path(), "doc.docx"),
        "![x](image_1)"
    );
    assert_eq!(fs::read_dir(target.path()).unwrap().count(), 0);
}
