use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};

use crate::language_utils;
use crate::lang_file::LangFormat;
use crate::quests;

// @module: File and directory utilities

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @creates: Directory and parents if needed
    pub fn ensure_dir<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        if !path.as_os_str().is_empty() && !path.exists() {
            fs::create_dir_all(path)?;
        }
        Ok(())
    }

    // @generates: Output path for a translated file
    // @params: input_file, target_language
    /// A file named after a locale (`en_us.json`) gets a sibling named after
    /// the target locale (`ja_jp.json`); anything else gets the locale
    /// appended to its stem (`quests_ja_jp.json`).
    pub fn generate_output_path<P: AsRef<Path>>(input_file: P, target_language: &str) -> PathBuf {
        let input_file = input_file.as_ref();

        let stem = input_file.file_stem().unwrap_or_default().to_string_lossy().to_string();
        let extension = input_file
            .extension()
            .map(|ext| format!(".{}", ext.to_string_lossy()))
            .unwrap_or_default();

        let output_filename = if language_utils::get_language(&stem).is_some() {
            format!("{}{}", target_language, extension)
        } else {
            format!("{}_{}{}", stem, target_language, extension)
        };

        input_file.with_file_name(output_filename)
    }

    /// Output path for `file`, found under `input_root`, placed under `output_root`
    ///
    /// The directory layout below `input_root` is kept, so same-named files
    /// from different worlds do not overwrite each other.
    pub fn mirrored_output_path(input_root: &Path, file: &Path, output_root: &Path, target_language: &str) -> PathBuf {
        let generated = Self::generate_output_path(file, target_language);
        match generated.strip_prefix(input_root) {
            Ok(relative) => output_root.join(relative),
            Err(_) => output_root.join(generated.file_name().unwrap_or_default()),
        }
    }

    /// Classify an input path
    ///
    /// Archives are checked first, then quest documents, then plain
    /// translation files; directories are searched for quest files.
    pub fn detect_input_type<P: AsRef<Path>>(path: P) -> Result<InputType> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(anyhow::anyhow!("Input path does not exist: {:?}", path));
        }

        if path.is_dir() {
            return Ok(InputType::Directory);
        }

        let is_archive = path
            .extension()
            .is_some_and(|ext| ext.to_string_lossy().eq_ignore_ascii_case("jar"));
        if is_archive {
            return Ok(InputType::Archive);
        }

        if quests::is_quest_file(path) {
            return Ok(InputType::QuestFile);
        }

        if LangFormat::from_path(path).is_some() {
            return Ok(InputType::LanguageFile);
        }

        Ok(InputType::Unknown)
    }
}

/// Enum representing different input types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputType {
    /// Plain translation file (.json, .lang, .snbt)
    LanguageFile,
    /// BetterQuesting quest document
    QuestFile,
    /// Directory searched for quest documents
    Directory,
    /// Mod archive (.jar), not supported
    Archive,
    /// Unknown file type
    Unknown,
}

impl std::fmt::Display for InputType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::LanguageFile => "Language File",
            Self::QuestFile => "BetterQuesting File",
            Self::Directory => "Directory",
            Self::Archive => "JAR File",
            Self::Unknown => "Unknown",
        };
        write!(f, "{}", name)
    }
}
