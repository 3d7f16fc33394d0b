//! Alternate spellings of unit symbols

use std::collections::HashMap;

use crate::UnitError;

/// Mapping from a case-insensitive alias to a canonical, case-sensitive
/// unit symbol. Keys are stored trimmed and lower-cased.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AliasTable {
    aliases: HashMap<String, String>,
}

impl AliasTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Normalize an alias the way it is stored
    pub fn normalize(alias: &str) -> String {
        alias.trim().to_lowercase()
    }

    /// Associate `alias` with `symbol`, replacing any previous mapping.
    /// Returns the symbol previously mapped from this alias.
    pub fn insert(&mut self, alias: &str, symbol: &str) -> Result<Option<String>, UnitError> {
        if alias.trim().is_empty() {
            return Err(UnitError::invalid("unit symbol alias cannot be blank"));
        }
        if symbol.trim().is_empty() {
            return Err(UnitError::invalid("unit symbol cannot be blank"));
        }
        Ok(self
            .aliases
            .insert(Self::normalize(alias), symbol.trim().to_string()))
    }

    /// Canonical symbol for `alias`, if one is registered
    pub fn resolve(&self, alias: &str) -> Option<&str> {
        self.aliases.get(&Self::normalize(alias)).map(|s| s.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.aliases.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.aliases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.aliases.is_empty()
    }
}
