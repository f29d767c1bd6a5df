//! Message catalogs and language resolution.
//!
//! A [`MessageCatalog`] maps message keys to templates with `{name}`
//! placeholders. The [`CatalogStore`] holds one catalog per language and
//! falls back to the default language for unknown codes, so the dispatcher
//! can always render something. Catalog loading (JSON files) lives in
//! `lumen-infra`; this module only defines the in-memory shape.

use std::collections::HashMap;
use std::sync::LazyLock;

/// One language's message-key -> template mapping.
#[derive(Debug, Clone, Default)]
pub struct MessageCatalog {
    messages: HashMap<String, String>,
}

impl MessageCatalog {
    pub fn new(messages: HashMap<String, String>) -> Self {
        Self { messages }
    }

    /// Look up a message by key.
    ///
    /// Returns the key itself when missing -- a visible marker of an
    /// incomplete catalog rather than a crashed turn.
    pub fn text(&self, key: &str) -> String {
        self.messages
            .get(key)
            .cloned()
            .unwrap_or_else(|| key.to_string())
    }

    /// Look up a message and substitute `{name}` placeholders.
    pub fn render(&self, key: &str, params: &[(&str, &str)]) -> String {
        let mut out = self.text(key);
        for (name, value) in params {
            out = out.replace(&format!("{{{name}}}"), value);
        }
        out
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

/// All loaded catalogs, keyed by language code.
#[derive(Debug, Clone)]
pub struct CatalogStore {
    catalogs: HashMap<String, MessageCatalog>,
    default_lang: String,
}

impl CatalogStore {
    pub fn new(catalogs: HashMap<String, MessageCatalog>, default_lang: String) -> Self {
        Self {
            catalogs,
            default_lang,
        }
    }

    /// Catalog for `lang`, falling back to the default language.
    pub fn get(&self, lang: &str) -> &MessageCatalog {
        self.catalogs
            .get(lang)
            .or_else(|| self.catalogs.get(&self.default_lang))
            .unwrap_or(&*EMPTY_CATALOG)
    }

    /// Catalog for the configured default language.
    pub fn default_catalog(&self) -> &MessageCatalog {
        self.get(&self.default_lang)
    }

    pub fn languages(&self) -> impl Iterator<Item = &str> {
        self.catalogs.keys().map(String::as_str)
    }
}

static EMPTY_CATALOG: LazyLock<MessageCatalog> = LazyLock::new(MessageCatalog::default);
