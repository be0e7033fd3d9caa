// Node configuration
//
// Options are fixed when a template is built and travel with it. Nothing in
// this crate reads process-wide state.

use serde::{Deserialize, Serialize};

/// Configuration for a whitespace-run node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WhitespaceConfig {
    /// Whether line endings (`\n`, `\r`, U+0085, U+2028, U+2029) count as
    /// whitespace. When `false` a run stops at the first line ending.
    pub include_line_endings: bool,
}

impl WhitespaceConfig {
    /// Whitespace including line endings.
    pub const MULTILINE: Self = Self {
        include_line_endings: true,
    };

    /// Whitespace within a single line.
    pub const SINGLE_LINE: Self = Self {
        include_line_endings: false,
    };
}

/// Configuration for a separated-sequence node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeparatedConfig {
    /// Require a separator before the first element.
    pub initial: bool,
    /// Require a separator after the last element.
    pub trailing: bool,
    /// Keep matched separators in the parsed value and in capture search.
    pub keep_separators: bool,
}

impl Default for SeparatedConfig {
    fn default() -> Self {
        Self {
            initial: false,
            trailing: false,
            keep_separators: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whitespace_default_is_single_line() {
        assert_eq!(WhitespaceConfig::default(), WhitespaceConfig::SINGLE_LINE);
        assert!(WhitespaceConfig::MULTILINE.include_line_endings);
    }

    #[test]
    fn separated_default_keeps_separators() {
        let config = SeparatedConfig::default();
        assert!(!config.initial);
        assert!(!config.trailing);
        assert!(config.keep_separators);
    }

    #[test]
    fn separated_config_deserializes_with_defaults() {
        let config: SeparatedConfig = serde_json::from_str(r#"{"initial": true}"#).unwrap();
        assert!(config.initial);
        assert!(!config.trailing);
        assert!(config.keep_separators);
    }
}
