use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, warn};
use serde_json::Value;
use walkdir::WalkDir;

use crate::quests::dialect::split_tag;

/// File names BetterQuesting is known to use
const WELL_KNOWN_NAMES: [&str; 4] = ["defaultquests.json", "quests.json", "betterquesting.json", "questbook.json"];

/// Directories searched, relative to an instance root
const SEARCH_DIRS: [&str; 4] = ["config/betterquesting", "config", "saves", ""];

fn has_json_extension(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.to_string_lossy().eq_ignore_ascii_case("json"))
}

/// Whether the top-level keys of `value` look like a quest document
pub fn looks_like_quest_document(value: &Value) -> bool {
    let Some(root) = value.as_object() else {
        return false;
    };

    root.iter().any(|(key, child)| match split_tag(key) {
        ("format" | "questDatabase" | "questLines", Some(_)) => true,
        ("format", None) => child.as_str().is_some_and(|format| format.contains("bq_standard")),
        ("questDatabase" | "questLines", None) => !child.is_null(),
        _ => false,
    })
}

/// Best-effort check whether `path` is a BetterQuesting quest file
pub fn is_quest_file<P: AsRef<Path>>(path: P) -> bool {
    let path = path.as_ref();
    if !has_json_extension(path) {
        return false;
    }

    let well_known = path
        .file_name()
        .map(|name| name.to_string_lossy().to_lowercase())
        .is_some_and(|name| WELL_KNOWN_NAMES.contains(&name.as_str()));
    if well_known {
        return true;
    }

    fs::read_to_string(path)
        .ok()
        .and_then(|content| serde_json::from_str::<Value>(&content).ok())
        .is_some_and(|value| looks_like_quest_document(&value))
}

/// Find quest files under the usual locations of a Minecraft instance.
///
/// Results are deduplicated and sorted.
pub fn find_quest_files<P: AsRef<Path>>(root: P) -> Vec<PathBuf> {
    let root = root.as_ref();
    let mut found = BTreeSet::new();

    for dir in SEARCH_DIRS {
        let search_root = root.join(dir);
        if !search_root.is_dir() {
            continue;
        }
        debug!("Searching quest files in {}", search_root.display());

        for entry in WalkDir::new(&search_root).follow_links(true) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("Skipping unreadable entry under {}: {}", search_root.display(), e);
                    continue;
                }
            };
            let path = entry.path();
            if entry.file_type().is_file() && is_quest_file(path) {
                found.insert(path.to_path_buf());
            }
        }
    }

    found.into_iter().collect()
}
