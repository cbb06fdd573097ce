// File: src/persistence.rs
use crate::core::engine::profile;
use crate::core::phonology::Separator;
use crate::core::types::VerbProfile;
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, warn};

/// Everything a generated profile depends on.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CacheKey {
    pub word: String,
    pub phonemic: Option<String>,
    pub separator: Separator,
}

impl CacheKey {
    pub fn new(word: &str, phonemic: Option<&str>, separator: Separator) -> Self {
        Self {
            word: word.to_string(),
            phonemic: phonemic.filter(|p| !p.is_empty()).map(str::to_string),
            separator,
        }
    }
}

/// Generated profiles, kept across runs in a bincode file.
#[derive(Debug, Default)]
pub struct ParadigmCache {
    entries: HashMap<CacheKey, VerbProfile>,
    path: Option<PathBuf>,
}

impl ParadigmCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads the cache at `path`, or starts empty when the file is missing or
    /// unreadable. Either way the cache saves back to `path`.
    pub fn from_file_or_new(path: &Path) -> Self {
        let entries = match load_from_disk(path) {
            Ok(entries) => entries,
            Err(e) => {
                if path.exists() {
                    warn!(path = %path.display(), error = %e, "discarding unreadable paradigm cache");
                }
                HashMap::new()
            }
        };
        debug!(path = %path.display(), entries = entries.len(), "paradigm cache opened");
        Self {
            entries,
            path: Some(path.to_path_buf()),
        }
    }

    pub fn get_or_generate(
        &mut self,
        word: &str,
        phonemic: Option<&str>,
        separator: Separator,
    ) -> Result<&VerbProfile> {
        match self.entries.entry(CacheKey::new(word, phonemic, separator)) {
            Entry::Occupied(e) => Ok(&*e.into_mut()),
            Entry::Vacant(e) => {
                let generated = profile(word, phonemic, separator)?;
                Ok(&*e.insert(generated))
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Writes the cache to its file. A cache without a file is a no-op.
    pub fn save(&self) -> Result<()> {
        match &self.path {
            Some(path) => save_to_disk(&self.entries, path),
            None => Ok(()),
        }
    }
}

pub fn save_to_disk(entries: &HashMap<CacheKey, VerbProfile>, path: &Path) -> Result<()> {
    let parent_dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent_dir)?;

    // Written beside the target so the final rename stays on one filesystem.
    let temp_file = NamedTempFile::new_in(parent_dir)?;
    {
        let mut writer = BufWriter::new(&temp_file);
        bincode::serialize_into(&mut writer, entries)?;
        writer.flush()?;
    }
    temp_file.persist(path).map_err(|e| e.error)?;
    debug!(path = %path.display(), entries = entries.len(), "paradigm cache saved");
    Ok(())
}

pub fn load_from_disk(path: &Path) -> Result<HashMap<CacheKey, VerbProfile>> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    Ok(bincode::deserialize_from(reader)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    #[test]
    fn generated_profiles_are_memoized() {
        let mut cache = ParadigmCache::new();
        let first = cache.get_or_generate("رقص", Some("ræGs"), Separator::Zwnj).unwrap().clone();
        assert_eq!(cache.len(), 1);
        let second = cache.get_or_generate("رقص", Some("ræGs"), Separator::Zwnj).unwrap();
        assert_eq!(&first, second);
        assert_eq!(cache.len(), 1);
        cache.get_or_generate("رقص", Some("ræGs"), Separator::Space).unwrap();
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn empty_transcription_shares_the_key_of_none() {
        assert_eq!(
            CacheKey::new("رفتن", Some(""), Separator::Zwnj),
            CacheKey::new("رفتن", None, Separator::Zwnj)
        );
    }

    #[test]
    fn invalid_input_is_not_cached() {
        let mut cache = ParadigmCache::new();
        assert!(cache.get_or_generate("رقص", Some("raqs"), Separator::Zwnj).is_err());
        assert!(cache.is_empty());
    }

    #[test]
    fn cache_survives_a_round_trip_through_disk() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("paradigms.bin");

        let mut cache = ParadigmCache::from_file_or_new(&path);
        assert!(cache.is_empty());
        let expected = cache
            .get_or_generate("رساندن", Some("resɒndæn"), Separator::Zwnj)
            .unwrap()
            .clone();
        cache.get_or_generate("رفتن", None, Separator::Space).unwrap();
        cache.save().unwrap();

        let mut reloaded = ParadigmCache::from_file_or_new(&path);
        assert_eq!(reloaded.len(), 2);
        let cached = reloaded
            .get_or_generate("رساندن", Some("resɒndæn"), Separator::Zwnj)
            .unwrap();
        assert_eq!(cached, &expected);
    }

    #[test]
    fn corrupt_file_starts_an_empty_cache() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("paradigms.bin");
        fs::write(&path, b"not a cache").unwrap();
        let cache = ParadigmCache::from_file_or_new(&path);
        assert!(cache.is_empty());
    }
}
