use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use ingest_engine::{IngestEvent, IngestObserver, IngestSettings, NameResolver, NullObserver};
use pretty_assertions::assert_eq;

#[derive(Default)]
struct RecordingObserver {
    events: Mutex<Vec<IngestEvent>>,
}

impl IngestObserver for RecordingObserver {
    fn notify(&self, event: IngestEvent) {
        self.events.lock().unwrap().push(event);
    }
}

fn taken(names: &[&str]) -> HashSet<String> {
    names.iter().map(|n| n.to_string()).collect()
}

#[test]
fn free_name_is_returned_unchanged() {
    ingest_logging::initialize_for_tests();
    let resolver = NameResolver::new(Arc::new(NullObserver));
    assert_eq!(resolver.resolve("guide", "docs", &|_| false), "guide");
}

#[test]
fn numbered_suffix_skips_taken_names() {
    let resolver = NameResolver::new(Arc::new(NullObserver));
    let existing = taken(&["docs/guide", "docs/guide_1"]);
    let exists = |name: &str| existing.contains(name);
    assert_eq!(resolver.resolve("guide", "docs", &exists), "guide_2");
}

#[test]
fn lookups_are_scoped_to_the_directory() {
    let resolver = NameResolver::new(Arc::new(NullObserver));
    let existing = taken(&["guide"]);
    let exists = |name: &str| existing.contains(name);
    assert_eq!(resolver.resolve("guide", "docs", &exists), "guide");
    assert_eq!(resolver.resolve("guide", "", &exists), "guide_1");
}

#[test]
fn exhausted_suffixes_fall_back_to_timestamp() {
    let observer = Arc::new(RecordingObserver::default());
    let settings = IngestSettings {
        max_suffix_attempts: 3,
        clock: Arc::new(|| "20240102_030405".to_string()),
        ..IngestSettings::default()
    };
    let resolver = NameResolver::from_settings(&settings, observer.clone());

    let resolved = resolver.resolve("report", "", &|_| true);

    assert_eq!(resolved, "report_20240102_030405");
    let events = observer.events.lock().unwrap();
    assert_eq!(
        *events,
        vec![IngestEvent::NamingExhausted {
            directory: String::new(),
            base_name: "report".to_string(),
            fallback: "report_20240102_030405".to_string(),
        }]
    );
}

#[test]
fn default_timestamp_has_expected_shape() {
    let stamp = ingest_engine::timestamp_now();
    assert_eq!(stamp.len(), "YYYYMMDD_HHMMSS".len());
    assert_eq!(stamp.as_bytes()[8], b'_');
    assert!(stamp
        .chars()
        .enumerate()
        .all(|(i, c)| i == 8 || c.is_ascii_digit()));
}
