use std::sync::Arc;

use crate::filename::join_page_name;
use crate::observer::{IngestEvent, IngestObserver};
use crate::settings::IngestSettings;

/// Upper bound on `_N` suffixes before the timestamp fallback kicks in.
pub const MAX_SUFFIX_ATTEMPTS: u32 = 1000;

pub type Clock = Arc<dyn Fn() -> String + Send + Sync>;

/// Local time formatted `YYYYMMDD_HHMMSS`.
pub fn timestamp_now() -> String {
    chrono::Local::now().format("%Y%m%d_%H%M%S").to_string()
}

/// Finds a page name not yet taken within a directory.
///
/// No lock is held between the existence checks and the eventual write, so two
/// concurrent batches writing into the same directory can both see a name as
/// free. The timestamp fallback is not checked at all.
pub struct NameResolver {
    max_attempts: u32,
    clock: Clock,
    observer: Arc<dyn IngestObserver>,
}

impl NameResolver {
    pub fn new(observer: Arc<dyn IngestObserver>) -> Self {
        Self::from_settings(&IngestSettings::default(), observer)
    }

    pub fn from_settings(settings: &IngestSettings, observer: Arc<dyn IngestObserver>) -> Self {
        Self {
            max_attempts: settings.max_suffix_attempts,
            clock: settings.clock.clone(),
            observer,
        }
    }

    /// Returns `base_name` or `base_name_N`; the directory is only used for lookups.
    pub fn resolve(
        &self,
        base_name: &str,
        directory: &str,
        exists: &dyn Fn(&str) -> bool,
    ) -> String {
        if !exists(&join_page_name(directory, base_name)) {
            return base_name.to_string();
        }

        for counter in 1..=self.max_attempts {
            let candidate = format!("{base_name}_{counter}");
            if !exists(&join_page_name(directory, &candidate)) {
                return candidate;
            }
        }

        let fallback = format!("{base_name}_{}", (self.clock)());
        self.observer.notify(IngestEvent::NamingExhausted {
            directory: directory.to_string(),
            base_name: base_name.to_string(),
            fallback: fallback.clone(),
        });
        fallback
    }
}
