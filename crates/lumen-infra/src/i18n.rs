//! Message catalog loader.
//!
//! The English and Ukrainian catalogs ship embedded in the binary (the
//! `i18n/` directory at the workspace root, pulled in at compile time);
//! an optional on-disk directory of `<lang>.json` files can add languages
//! or override the embedded strings at startup.

use std::collections::HashMap;
use std::path::Path;

use lumen_core::i18n::{CatalogStore, MessageCatalog};

/// Embedded default catalogs, compiled into the binary.
const EMBEDDED: &[(&str, &str)] = &[
    ("en", include_str!("../../../i18n/en.json")),
    ("uk", include_str!("../../../i18n/uk.json")),
];

fn parse_catalog(source: &str) -> Result<MessageCatalog, serde_json::Error> {
    let messages: HashMap<String, String> = serde_json::from_str(source)?;
    Ok(MessageCatalog::new(messages))
}

/// Build the catalog store from the embedded defaults, overlaying any
/// `<lang>.json` files found in `dir`.
///
/// Unreadable or malformed override files are logged and skipped; the
/// embedded catalogs always remain available.
pub async fn load_catalogs(dir: Option<&Path>, default_lang: &str) -> CatalogStore {
    let mut catalogs: HashMap<String, MessageCatalog> = HashMap::new();

    for (lang, source) in EMBEDDED {
        match parse_catalog(source) {
            Ok(catalog) => {
                catalogs.insert(lang.to_string(), catalog);
            }
            Err(err) => {
                // Embedded catalogs are validated by tests; reaching this
                // at runtime means a broken build, but degrade anyway.
                tracing::error!(lang, error = %err, "embedded catalog failed to parse");
            }
        }
    }

    if let Some(dir) = dir {
        let mut entries = match tokio::fs::read_dir(dir).await {
            Ok(entries) => entries,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return CatalogStore::new(catalogs, default_lang.to_string());
            }
            Err(err) => {
                tracing::warn!(dir = %dir.display(), error = %err, "failed to read i18n dir");
                return CatalogStore::new(catalogs, default_lang.to_string());
            }
        };

        while let Ok(Some(entry)) = entries.next_entry().await {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let Some(lang) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            match tokio::fs::read_to_string(&path).await {
                Ok(source) => match parse_catalog(&source) {
                    Ok(catalog) => {
                        tracing::info!(lang, path = %path.display(), "loaded catalog override");
                        catalogs.insert(lang.to_string(), catalog);
                    }
                    Err(err) => {
                        tracing::warn!(path = %path.display(), error = %err, "skipping malformed catalog");
                    }
                },
                Err(err) => {
                    tracing::warn!(path = %path.display(), error = %err, "failed to read catalog");
                }
            }
        }
    }

    CatalogStore::new(catalogs, default_lang.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_embedded_catalogs_parse() {
        let store = load_catalogs(None, "en").await;
        let langs: Vec<&str> = store.languages().collect();
        assert!(langs.contains(&"en"));
        assert!(langs.contains(&"uk"));
    }

    #[tokio::test]
    async fn test_embedded_catalogs_share_the_same_keys() {
        let en: HashMap<String, String> =
            serde_json::from_str(include_str!("../../../i18n/en.json")).unwrap();
        let uk: HashMap<String, String> =
            serde_json::from_str(include_str!("../../../i18n/uk.json")).unwrap();

        let mut en_keys: Vec<&String> = en.keys().collect();
        let mut uk_keys: Vec<&String> = uk.keys().collect();
        en_keys.sort();
        uk_keys.sort();
        assert_eq!(en_keys, uk_keys);
    }

    #[tokio::test]
    async fn test_unknown_lang_falls_back_to_default() {
        let store = load_catalogs(None, "en").await;
        let fallback = store.get("de").text("saved");
        assert_eq!(fallback, store.get("en").text("saved"));
    }

    #[tokio::test]
    async fn test_dir_overrides_embedded() {
        let tmp = TempDir::new().unwrap();
        tokio::fs::write(tmp.path().join("en.json"), r#"{"saved": "Stored!"}"#)
            .await
            .unwrap();

        let store = load_catalogs(Some(tmp.path()), "en").await;
        assert_eq!(store.get("en").text("saved"), "Stored!");
    }

    #[tokio::test]
    async fn test_malformed_override_is_skipped() {
        let tmp = TempDir::new().unwrap();
        tokio::fs::write(tmp.path().join("en.json"), "not json")
            .await
            .unwrap();

        let store = load_catalogs(Some(tmp.path()), "en").await;
        // The embedded catalog remains in effect.
        assert_eq!(store.get("en").text("saved"), "Saved.");
    }

    #[tokio::test]
    async fn test_missing_dir_uses_embedded_only() {
        let store = load_catalogs(Some(Path::new("/nonexistent/i18n")), "en").await;
        assert!(!store.get("en").is_empty());
    }
}
