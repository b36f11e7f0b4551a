//! Korean account name to output column mapping.
//!
//! The mapping file holds one `korean:ENGLISH` pair per line, e.g.
//!
//! ```text
//! 유동자산:CURRENT_ASSET
//! 유동부채:CURRENT_LIAB
//! ```

use crate::error::{DataError, Result};
use std::collections::HashMap;
use std::path::Path;
use tracing::warn;

/// Account name translations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Translation {
    entries: HashMap<String, String>,
}

impl Translation {
    /// Build from explicit pairs.
    pub fn new<K: Into<String>, V: Into<String>>(pairs: impl IntoIterator<Item = (K, V)>) -> Self {
        Self {
            entries: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Load a UTF-8 mapping file.
    pub fn from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parse mapping text. Blank lines and `#` comments are skipped.
    pub fn parse(content: &str) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(b':')
            .has_headers(false)
            .comment(Some(b'#'))
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(content.as_bytes());

        let mut entries = HashMap::new();
        for record in reader.records() {
            let record = record?;
            match (record.get(0), record.get(1), record.len()) {
                (Some(kr), Some(en), 2) if !kr.is_empty() && !en.is_empty() => {
                    entries.insert(kr.to_string(), en.to_string());
                }
                (Some(""), None, 1) => {}
                _ => {
                    return Err(DataError::Parse(format!(
                        "Invalid translation line {}: expected 'korean:ENGLISH'",
                        record.position().map_or(0, |p| p.line())
                    )));
                }
            }
        }
        Ok(Self { entries })
    }

    /// English column name for an account, if mapped.
    pub fn get(&self, korean: &str) -> Option<&str> {
        self.entries.get(korean).map(String::as_str)
    }

    /// English column name for an account, falling back to the Korean name.
    pub fn column_name(&self, korean: &str) -> String {
        self.get(korean).map_or_else(
            || {
                warn!(account = korean, "no translation for account; keeping original name");
                korean.to_string()
            },
            str::to_string,
        )
    }

    /// Number of mapped accounts.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing is mapped.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        let translation = Translation::parse(
            "# balance sheet\n유동자산:CURRENT_ASSET\n\n유동부채 : CURRENT_LIAB\n",
        )
        .unwrap();

        assert_eq!(translation.len(), 2);
        assert_eq!(translation.get("유동자산"), Some("CURRENT_ASSET"));
        assert_eq!(translation.get("유동부채"), Some("CURRENT_LIAB"));
    }

    #[test]
    fn test_parse_rejects_malformed_line() {
        let result = Translation::parse("유동자산:CURRENT_ASSET\n비유동부채\n");
        assert!(matches!(result, Err(DataError::Parse(_))));
    }

    #[test]
    fn test_column_name_fallback() {
        let translation = Translation::new([("유동자산", "CURRENT_ASSET")]);
        assert_eq!(translation.column_name("유동자산"), "CURRENT_ASSET");
        assert_eq!(translation.column_name("영업이익"), "영업이익");
    }

    #[test]
    fn test_bundled_mapping_file() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../data/kr2eng.txt");
        let translation = Translation::from_path(&path).unwrap();
        for account in ["유동자산", "유동부채", "비유동자산", "비유동부채"] {
            assert!(translation.get(account).is_some(), "missing {}", account);
        }
    }
}
