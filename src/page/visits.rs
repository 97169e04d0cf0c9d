//! Unique-visit counting and the count-up display.
//!
//! A visit is counted when the session has no active flag and the previous
//! counted visit is more than 30 minutes old. The count and its timestamp
//! live in durable storage; the session flag lives in session storage.

use std::collections::HashMap;

use crate::error::StorageError;

pub const COUNT_KEY: &str = "portfolioVisitCount";
pub const LAST_VISIT_KEY: &str = "portfolioLastVisit";
pub const SESSION_KEY: &str = "portfolioSessionActive";

/// Minimum gap between two counted visits.
pub const REVISIT_WINDOW_MS: u64 = 30 * 60 * 1000;

/// Interval between count-up frames.
pub const COUNT_UP_TICK_MS: u32 = 16;
/// Count-up frames from zero to the target (2 s at 16 ms).
const COUNT_UP_TICKS: f64 = 125.0;

/// String key-value storage, shaped like the browser's `Storage`.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// Storage that lives as long as the process; used as the session store.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.values.insert(key.to_owned(), value.to_owned());
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub use file_store::JsonFileStore;

#[cfg(not(target_arch = "wasm32"))]
mod file_store {
    use std::collections::BTreeMap;
    use std::fs;
    use std::io::ErrorKind;
    use std::path::{Path, PathBuf};

    use super::KeyValueStore;
    use crate::error::StorageError;

    /// Durable storage in a flat JSON object on disk. Every write rewrites
    /// the file.
    #[derive(Debug, Clone)]
    pub struct JsonFileStore {
        path: PathBuf,
        values: BTreeMap<String, String>,
    }

    impl JsonFileStore {
        /// Open `path`, starting empty when the file does not exist yet.
        pub fn open(path: impl AsRef<Path>) -> Result<Self, StorageError> {
            let path = path.as_ref().to_path_buf();
            let values = match fs::read_to_string(&path) {
                Ok(json) => serde_json::from_str(&json)?,
                Err(e) if e.kind() == ErrorKind::NotFound => BTreeMap::new(),
                Err(e) => return Err(e.into()),
            };
            Ok(Self { path, values })
        }

        pub fn path(&self) -> &Path {
            &self.path
        }
    }

    impl KeyValueStore for JsonFileStore {
        fn get(&self, key: &str) -> Option<String> {
            self.values.get(key).cloned()
        }

        fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
            self.values.insert(key.to_owned(), value.to_owned());
            if let Some(parent) = self.path.parent() {
                if !parent.as_os_str().is_empty() {
                    fs::create_dir_all(parent)?;
                }
            }
            fs::write(&self.path, serde_json::to_string_pretty(&self.values)?)?;
            Ok(())
        }
    }
}

/// Result of recording a page view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisitOutcome {
    /// Total unique visits, including this one if it counted.
    pub count: u64,
    pub counted: bool,
}

/// Applies the unique-visit rule against a durable and a session store.
pub struct VisitTracker;

impl VisitTracker {
    pub fn record(
        durable: &mut dyn KeyValueStore,
        session: &mut dyn KeyValueStore,
        now_ms: u64,
    ) -> Result<VisitOutcome, StorageError> {
        let mut count = read_int(durable.get(COUNT_KEY));
        let last_visit = read_int(durable.get(LAST_VISIT_KEY));
        let session_active = session.get(SESSION_KEY).is_some_and(|v| !v.is_empty());

        let counted = !session_active && now_ms.saturating_sub(last_visit) > REVISIT_WINDOW_MS;
        if counted {
            count += 1;
            durable.set(COUNT_KEY, &count.to_string())?;
            durable.set(LAST_VISIT_KEY, &now_ms.to_string())?;
            session.set(SESSION_KEY, "true")?;
            tracing::info!(count, "new unique visit counted");
        } else {
            tracing::info!(count, "same session; visit not counted");
        }

        Ok(VisitOutcome { count, counted })
    }
}

/// Leading-digit integer parse; anything unparseable reads as zero.
fn read_int(value: Option<String>) -> u64 {
    let Some(value) = value else { return 0 };
    let digits: String = value
        .trim_start()
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().unwrap_or(0)
}

/// Animates a displayed number from zero up to a target.
#[derive(Debug, Clone, PartialEq)]
pub struct CountUp {
    current: f64,
    target: u64,
    increment: f64,
}

impl CountUp {
    pub fn new(target: u64) -> Self {
        Self {
            current: 0.0,
            target,
            increment: target as f64 / COUNT_UP_TICKS,
        }
    }

    /// Advance one frame. Returns the value to display, and whether the
    /// target has been reached.
    pub fn tick(&mut self) -> (u64, bool) {
        self.current += self.increment;
        let done = self.current >= self.target as f64;
        if done {
            self.current = self.target as f64;
        }
        (self.current.floor() as u64, done)
    }

    pub fn display(&self) -> String {
        format_count(self.current.floor() as u64)
    }
}

/// `1234567` as `1,234,567`.
pub fn format_count(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINUTE: u64 = 60 * 1000;

    #[test]
    fn test_first_visit_counts() {
        let mut durable = MemoryStore::new();
        let mut session = MemoryStore::new();
        let outcome = VisitTracker::record(&mut durable, &mut session, 100 * MINUTE).unwrap();

        assert_eq!(outcome, VisitOutcome { count: 1, counted: true });
        assert_eq!(durable.get(COUNT_KEY).as_deref(), Some("1"));
        assert_eq!(durable.get(LAST_VISIT_KEY), Some((100 * MINUTE).to_string()));
        assert_eq!(session.get(SESSION_KEY).as_deref(), Some("true"));
    }

    #[test]
    fn test_same_session_does_not_count() {
        let mut durable = MemoryStore::new();
        let mut session = MemoryStore::new();
        VisitTracker::record(&mut durable, &mut session, 100 * MINUTE).unwrap();
        let outcome = VisitTracker::record(&mut durable, &mut session, 500 * MINUTE).unwrap();
        assert_eq!(outcome, VisitOutcome { count: 1, counted: false });
    }

    #[test]
    fn test_new_session_within_window_does_not_count() {
        let mut durable = MemoryStore::new();
        VisitTracker::record(&mut durable, &mut MemoryStore::new(), 100 * MINUTE).unwrap();

        let outcome =
            VisitTracker::record(&mut durable, &mut MemoryStore::new(), 130 * MINUTE).unwrap();
        assert!(!outcome.counted, "exactly 30 minutes is not enough");

        let outcome =
            VisitTracker::record(&mut durable, &mut MemoryStore::new(), 131 * MINUTE).unwrap();
        assert_eq!(outcome, VisitOutcome { count: 2, counted: true });
    }

    #[test]
    fn test_garbage_values_read_as_zero() {
        assert_eq!(read_int(Some("abc".into())), 0);
        assert_eq!(read_int(Some("42px".into())), 42);
        assert_eq!(read_int(None), 0);

        let mut durable = MemoryStore::new();
        durable.set(COUNT_KEY, "NaN").unwrap();
        let outcome = VisitTracker::record(&mut durable, &mut MemoryStore::new(), MINUTE * 60).unwrap();
        assert_eq!(outcome.count, 1);
    }

    #[test]
    fn test_json_file_store_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state").join("visits.json");

        let mut store = JsonFileStore::open(&path).unwrap();
        assert_eq!(store.get(COUNT_KEY), None);
        store.set(COUNT_KEY, "7").unwrap();

        let reopened = JsonFileStore::open(&path).unwrap();
        assert_eq!(reopened.get(COUNT_KEY).as_deref(), Some("7"));
    }

    #[test]
    fn test_count_up_reaches_target_in_125_ticks() {
        let mut counter = CountUp::new(1000);
        let mut ticks = 0;
        loop {
            ticks += 1;
            let (value, done) = counter.tick();
            assert!(value <= 1000);
            if done {
                assert_eq!(value, 1000);
                break;
            }
        }
        assert!((124..=126).contains(&ticks));
        assert_eq!(counter.display(), "1,000");
    }

    #[test]
    fn test_count_up_zero_finishes_immediately() {
        assert_eq!(CountUp::new(0).tick(), (0, true));
    }

    #[test]
    fn test_format_count() {
        assert_eq!(format_count(0), "0");
        assert_eq!(format_count(999), "999");
        assert_eq!(format_count(1000), "1,000");
        assert_eq!(format_count(1234567), "1,234,567");
    }
}
