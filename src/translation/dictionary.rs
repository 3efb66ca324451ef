/*!
 * Persistent term dictionary.
 *
 * The dictionary is the cross-run translation memory: for every target
 * language it maps an original text to its accepted translation. It is
 * stored as `{ "terms": { "<lang>": { "<original>": "<translation>" } } }`.
 *
 * [`DictionaryStore`] owns one dictionary together with its backing file and
 * is what the batch coordinator is constructed with.
 */

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, warn};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::errors::DictionaryError;
use super::similarity::SimilarityMatcher;

/// A prior translation offered as an in-context example
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranslationExample {
    pub original: String,
    pub translation: String,
    pub language: String,
}

/// A dictionary entry scored against a query string
#[derive(Debug, Clone, PartialEq)]
pub struct SimilarityMatch {
    pub example: TranslationExample,
    pub score: f64,
}

/// Cross-run translation memory keyed by target language, then original text
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TermDictionary {
    #[serde(default)]
    terms: BTreeMap<String, BTreeMap<String, String>>,
}

impl TermDictionary {
    /// Create an empty dictionary
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a dictionary from disk
    ///
    /// A missing file yields an empty dictionary.
    pub fn load_from(path: &Path) -> Result<Self, DictionaryError> {
        let data = match fs::read_to_string(path) {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No dictionary at {:?}, starting empty", path);
                return Ok(Self::new());
            }
            Err(e) => {
                return Err(DictionaryError::Read {
                    path: path.to_path_buf(),
                    source: e,
                });
            }
        };

        serde_json::from_str(&data).map_err(|e| DictionaryError::Corrupt {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Write the full dictionary as pretty JSON, creating parent directories
    pub fn save_to(&self, path: &Path) -> Result<(), DictionaryError> {
        let write_error = |message: String| DictionaryError::Write {
            path: path.to_path_buf(),
            message,
        };

        let data = serde_json::to_string_pretty(self).map_err(|e| write_error(e.to_string()))?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| write_error(e.to_string()))?;
        }

        fs::write(path, data).map_err(|e| write_error(e.to_string()))
    }

    /// Exact lookup of a translation
    pub fn lookup(&self, text: &str, language: &str) -> Option<&str> {
        self.terms
            .get(language)
            .and_then(|terms| terms.get(text))
            .map(String::as_str)
    }

    /// Insert or overwrite the translation for `(language, text)`
    pub fn add(&mut self, text: &str, language: &str, translation: &str) {
        self.terms
            .entry(language.to_string())
            .or_default()
            .insert(text.to_string(), translation.to_string());
    }

    /// Find entries for `language` whose original is at least `threshold`
    /// similar to `text`, best first, at most `max_results`.
    ///
    /// Equal scores keep the lexicographic order of the original text.
    pub fn find_similar(
        &self,
        text: &str,
        language: &str,
        threshold: f64,
        max_results: usize,
    ) -> Vec<SimilarityMatch> {
        let Some(terms) = self.terms.get(language) else {
            return Vec::new();
        };

        let mut matches: Vec<SimilarityMatch> = terms
            .iter()
            .filter_map(|(original, translation)| {
                let score = SimilarityMatcher::similarity(text, original);
                (score >= threshold).then(|| SimilarityMatch {
                    example: TranslationExample {
                        original: original.clone(),
                        translation: translation.clone(),
                        language: language.to_string(),
                    },
                    score,
                })
            })
            .collect();

        // sort_by is stable, so ties keep map order
        matches.sort_by(|a, b| b.score.total_cmp(&a.score));
        matches.truncate(max_results);
        matches
    }

    /// Number of entries for one language
    pub fn len_for(&self, language: &str) -> usize {
        self.terms.get(language).map_or(0, BTreeMap::len)
    }

    /// Total number of entries across all languages
    pub fn len(&self) -> usize {
        self.terms.values().map(BTreeMap::len).sum()
    }

    /// Check if the dictionary holds no entries
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A term dictionary bound to its backing file
///
/// The store is the only shared mutable state of a translation run. It is
/// read once at the start and written once at the end; concurrent runs
/// against the same file must be serialized by the caller.
#[derive(Debug)]
pub struct DictionaryStore {
    path: Option<PathBuf>,
    dictionary: RwLock<TermDictionary>,
}

impl DictionaryStore {
    /// Store backed by a file; nothing is read until [`load`](Self::load)
    pub fn at_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
            dictionary: RwLock::new(TermDictionary::new()),
        }
    }

    /// Store without a backing file
    pub fn in_memory(dictionary: TermDictionary) -> Self {
        Self {
            path: None,
            dictionary: RwLock::new(dictionary),
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Reload from the backing file, best effort
    ///
    /// On failure the current contents are kept and a warning is logged. A
    /// file that cannot be parsed is moved to `<path>.bak` so the next
    /// [`persist`](Self::persist) does not destroy it.
    pub fn load(&self) {
        let Some(path) = &self.path else {
            return;
        };

        match TermDictionary::load_from(path) {
            Ok(dictionary) => {
                debug!("Loaded {} dictionary entries from {:?}", dictionary.len(), path);
                *self.dictionary.write() = dictionary;
            }
            Err(e @ DictionaryError::Corrupt { .. }) => {
                warn!("Could not load term dictionary: {}", e);
                let backup = backup_path(path);
                match fs::rename(path, &backup) {
                    Ok(()) => warn!("Moved unreadable dictionary to {:?}", backup),
                    Err(e) => warn!("Could not back up unreadable dictionary {:?}: {}", path, e),
                }
            }
            Err(e) => warn!("Could not load term dictionary: {}", e),
        }
    }

    /// Persist to the backing file, best effort
    pub fn persist(&self) {
        let Some(path) = &self.path else {
            return;
        };

        if let Err(e) = self.dictionary.read().save_to(path) {
            warn!("Could not save term dictionary: {}", e);
        }
    }

    pub fn lookup(&self, text: &str, language: &str) -> Option<String> {
        self.dictionary.read().lookup(text, language).map(str::to_string)
    }

    pub fn add(&self, text: &str, language: &str, translation: &str) {
        self.dictionary.write().add(text, language, translation);
    }

    pub fn find_similar(
        &self,
        text: &str,
        language: &str,
        threshold: f64,
        max_results: usize,
    ) -> Vec<SimilarityMatch> {
        self.dictionary
            .read()
            .find_similar(text, language, threshold, max_results)
    }

    /// Copy of the current dictionary contents
    pub fn snapshot(&self) -> TermDictionary {
        self.dictionary.read().clone()
    }
}

/// `dictionary.json` -> `dictionary.json.bak`
fn backup_path(path: &Path) -> PathBuf {
    let mut backup = path.as_os_str().to_owned();
    backup.push(".bak");
    PathBuf::from(backup)
}
