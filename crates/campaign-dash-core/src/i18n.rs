//! Translations for user-facing messages.
//!
//! Messages are written in English in the source and passed through [`tr`].
//! A translation table is loaded once from `translations/<language>.json`;
//! when no table or no entry exists the English text is shown.

use std::collections::HashMap;
use std::sync::OnceLock;

use serde::Deserialize;
use tracing::debug;

/// Global translation table, loaded once at startup
static TRANSLATIONS: OnceLock<TranslationTable> = OnceLock::new();

#[derive(Debug, Deserialize, Default)]
struct TranslationFile {
    #[serde(default)]
    language: String,
    #[serde(default)]
    messages: HashMap<String, String>,
}

#[derive(Debug, Default)]
struct TranslationTable {
    messages: HashMap<String, String>,
}

/// Load the translation table for `language`.
/// Call this once at app startup; later calls have no effect.
pub fn init(language: Option<&str>) {
    let _ = TRANSLATIONS.get_or_init(|| {
        language
            .and_then(load_translations)
            .unwrap_or_default()
    });
}

fn load_translations(language: &str) -> Option<TranslationTable> {
    let paths = [
        format!("translations/{}.json", language),
        format!("../translations/{}.json", language),
    ];

    for path in &paths {
        if let Ok(data) = std::fs::read_to_string(path) {
            if let Some(table) = parse_table(&data) {
                debug!(path = %path, language = %language, count = table.messages.len(), "Loaded translations");
                return Some(table);
            }
        }
    }

    debug!(language = %language, "No translation file found, using source messages");
    None
}

fn parse_table(data: &str) -> Option<TranslationTable> {
    let file: TranslationFile = serde_json::from_str(data).ok()?;
    debug!(language = %file.language, "Parsed translation file");
    Some(TranslationTable {
        messages: file.messages,
    })
}

/// Translate a message, falling back to the source text.
pub fn tr(text: &str) -> String {
    TRANSLATIONS
        .get()
        .and_then(|table| table.messages.get(text))
        .cloned()
        .unwrap_or_else(|| text.to_string())
}
