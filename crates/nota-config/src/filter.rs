//! Classification allow-list settings.

use serde::{Deserialize, Serialize};

fn default_document_extension() -> String {
    String::from("xml")
}

/// Allow-list as written in configuration.
///
/// Environment variables carry a single semicolon-separated string
/// (`"VENDA;DEVOLUCAO"`); TOML files may use either that or an array.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum AllowedValues {
    List(Vec<String>),
    Joined(String),
}

impl Default for AllowedValues {
    fn default() -> Self {
        Self::Joined(String::new())
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FilterConfig {
    /// Accepted classification values. Empty disables filtering.
    #[serde(default)]
    pub allowed: AllowedValues,

    /// Extension of the documents inside the archive (without the dot).
    #[serde(default = "default_document_extension")]
    pub document_extension: String,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            allowed: AllowedValues::default(),
            document_extension: default_document_extension(),
        }
    }
}

impl FilterConfig {
    /// Allow-list entries, trimmed, with blanks dropped, in configured order.
    #[must_use]
    pub fn allowed_values(&self) -> Vec<String> {
        let raw: Vec<&str> = match &self.allowed {
            AllowedValues::List(values) => values.iter().map(String::as_str).collect(),
            AllowedValues::Joined(joined) => joined.split(';').collect(),
        };
        raw.into_iter()
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_owned)
            .collect()
    }

    /// Whether any allow-list entry is configured.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        !self.allowed_values().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn default_disables_filtering() {
        let config = FilterConfig::default();
        assert!(!config.is_enabled());
        assert_eq!(config.document_extension, "xml");
    }

    #[test]
    fn joined_values_are_split_and_trimmed() {
        let config = FilterConfig {
            allowed: AllowedValues::Joined(" VENDA ;; Devolução;".into()),
            ..Default::default()
        };
        assert_eq!(config.allowed_values(), vec!["VENDA", "Devolução"]);
    }

    #[test]
    fn list_values_drop_blanks() {
        let config = FilterConfig {
            allowed: AllowedValues::List(vec!["VENDA".into(), "  ".into()]),
            ..Default::default()
        };
        assert_eq!(config.allowed_values(), vec!["VENDA"]);
        assert!(config.is_enabled());
    }
}
