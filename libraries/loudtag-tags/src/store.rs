//! Tag persistence seam

use crate::error::Result;
use crate::update::TagUpdate;

/// Persists a [`TagUpdate`] into a file's native tag format
///
/// Implementations must apply the removals and insertions of one update in a
/// single save, so that applying the same update twice equals applying it once.
pub trait TagStore {
    /// Apply one update
    fn apply(&mut self, update: &TagUpdate) -> Result<()>;
}

#[cfg(any(test, feature = "test-utils"))]
pub use memory::MemoryTagStore;

#[cfg(any(test, feature = "test-utils"))]
mod memory {
    use super::TagStore;
    use crate::error::{Result, TagError};
    use crate::update::TagUpdate;
    use std::collections::{BTreeMap, HashMap, HashSet};
    use std::path::{Path, PathBuf};

    /// In-memory tag store for engine tests
    #[derive(Debug, Default)]
    pub struct MemoryTagStore {
        files: HashMap<PathBuf, BTreeMap<String, String>>,
        failing: HashSet<PathBuf>,
        applied: Vec<TagUpdate>,
    }

    impl MemoryTagStore {
        /// Create an empty store
        pub fn new() -> Self {
            Self::default()
        }

        /// Pre-populate a tag value
        pub fn seed(&mut self, path: impl Into<PathBuf>, name: &str, value: &str) {
            self.files
                .entry(path.into())
                .or_default()
                .insert(name.to_string(), value.to_string());
        }

        /// Make every save to `path` fail
        pub fn fail_on(&mut self, path: impl Into<PathBuf>) {
            self.failing.insert(path.into());
        }

        /// Current tags of `path`
        pub fn tags(&self, path: &Path) -> Option<&BTreeMap<String, String>> {
            self.files.get(path)
        }

        /// Value of one tag of `path`
        pub fn value(&self, path: &Path, name: &str) -> Option<&str> {
            self.files.get(path)?.get(name).map(String::as_str)
        }

        /// Every update applied so far, in order
        pub fn applied(&self) -> &[TagUpdate] {
            &self.applied
        }
    }

    impl TagStore for MemoryTagStore {
        fn apply(&mut self, update: &TagUpdate) -> Result<()> {
            if self.failing.contains(&update.path) {
                return Err(TagError::Lofty(format!(
                    "simulated save failure for {}",
                    update.path.display()
                )));
            }

            let tags = self.files.entry(update.path.clone()).or_default();
            for name in &update.remove {
                tags.remove(name);
            }
            for (name, value) in &update.insert {
                tags.insert(name.clone(), value.clone());
            }
            self.applied.push(update.clone());
            Ok(())
        }
    }
}
