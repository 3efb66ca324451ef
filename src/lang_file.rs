/*!
 * Plain translation files.
 *
 * Minecraft ships translations either as JSON objects (1.13 and later) or as
 * `key=value` `.lang` files (1.12 and earlier). Both are read into and written
 * from the flat [`TranslationData`] mapping the translation engine works on.
 */

use std::fmt;
use std::fs;
use std::path::Path;

use log::debug;
use serde_json::{Map, Value};

use crate::errors::FormatError;
use crate::translation::TranslationData;

/// Supported plain file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LangFormat {
    Json,
    Lang,
    /// Recognised so it can be reported, but not readable yet
    Snbt,
}

impl LangFormat {
    /// Detect the format from a file extension
    pub fn from_path<P: AsRef<Path>>(path: P) -> Option<Self> {
        let ext = path.as_ref().extension()?.to_string_lossy().to_lowercase();
        match ext.as_str() {
            "json" => Some(Self::Json),
            "lang" => Some(Self::Lang),
            "snbt" => Some(Self::Snbt),
            _ => None,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Self::Json => ".json",
            Self::Lang => ".lang",
            Self::Snbt => ".snbt",
        }
    }
}

impl fmt::Display for LangFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json => write!(f, "JSON"),
            Self::Lang => write!(f, "LANG"),
            Self::Snbt => write!(f, "SNBT"),
        }
    }
}

/// Parse JSON translation content, flattening nested objects with `.`
pub fn parse_json(content: &str) -> Result<TranslationData, String> {
    let value: Value = serde_json::from_str(content).map_err(|e| e.to_string())?;
    let Value::Object(root) = value else {
        return Err("top-level value is not an object".to_string());
    };

    let mut data = TranslationData::new();
    flatten_into(&root, "", &mut data);
    Ok(data)
}

fn flatten_into(map: &Map<String, Value>, prefix: &str, data: &mut TranslationData) {
    for (key, value) in map {
        let full_key = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{}.{}", prefix, key)
        };

        match value {
            Value::Object(nested) => flatten_into(nested, &full_key, data),
            Value::String(text) => {
                data.insert(full_key, text.clone());
            }
            other => {
                data.insert(full_key, other.to_string());
            }
        }
    }
}

/// Parse `key=value` lines; blank lines and `#` comments are skipped
pub fn parse_lang(content: &str) -> TranslationData {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| line.split_once('='))
        .map(|(key, value)| (key.trim().to_string(), value.trim().to_string()))
        .collect()
}

pub fn render_json(data: &TranslationData) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(data)
}

/// Render sorted `key=value` lines
pub fn render_lang(data: &TranslationData) -> String {
    data.iter().map(|(key, value)| format!("{}={}\n", key, value)).collect()
}

/// Read a plain translation file, detecting its format from the extension
pub fn read_file<P: AsRef<Path>>(path: P) -> Result<(TranslationData, LangFormat), FormatError> {
    let path = path.as_ref();
    let format = LangFormat::from_path(path).ok_or_else(|| unsupported(path))?;

    if format == LangFormat::Snbt {
        return Err(FormatError::Unsupported("SNBT format is not yet implemented".to_string()));
    }

    let content = fs::read_to_string(path).map_err(|source| FormatError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let data = match format {
        LangFormat::Json => parse_json(&content).map_err(|message| FormatError::Parse {
            path: path.to_path_buf(),
            message,
        })?,
        _ => parse_lang(&content),
    };

    debug!("Read {} entries from {} ({})", data.len(), path.display(), format);
    Ok((data, format))
}

/// Write a plain translation file in `format`, creating parent directories
pub fn write_file<P: AsRef<Path>>(path: P, data: &TranslationData, format: LangFormat) -> Result<(), FormatError> {
    let path = path.as_ref();
    let content = match format {
        LangFormat::Json => render_json(data).map_err(|e| FormatError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?,
        LangFormat::Lang => render_lang(data),
        LangFormat::Snbt => {
            return Err(FormatError::Unsupported("SNBT format is not yet implemented".to_string()));
        }
    };

    let io_error = |source| FormatError::Io {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(io_error)?;
    }
    fs::write(path, content).map_err(io_error)
}

fn unsupported(path: &Path) -> FormatError {
    let ext = path
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_else(|| "(none)".to_string());
    FormatError::Unsupported(ext)
}
