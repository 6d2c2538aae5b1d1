//! Engine configuration
//!
//! Deserializable with serde so hosts can keep it in their own config file
//! (the `sheen` CLI reads it from `sheen.toml`).

use serde::{Deserialize, Serialize};
use sheen_core::{PseudoState, StateRules};

/// What to do with properties the engine does not know
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum UnsupportedPropertyPolicy {
    /// Drop the declaration and report a warning
    #[default]
    Warn,
    /// Drop the declaration silently
    Ignore,
    /// Keep it as a custom property and hand it to the sink unchanged
    PassThrough,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct EngineConfig {
    /// Longest ancestor chain selector matching will walk
    #[serde(default = "default_max_ancestor_depth")]
    pub max_ancestor_depth: usize,
    #[serde(default)]
    pub unsupported_properties: UnsupportedPropertyPolicy,
    /// States masked out of matching while a widget is disabled
    #[serde(default = "default_disabled_suppresses")]
    pub disabled_suppresses: Vec<String>,
}

fn default_max_ancestor_depth() -> usize {
    64
}

fn default_disabled_suppresses() -> Vec<String> {
    vec!["hover".to_string(), "pressed".to_string()]
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_ancestor_depth: default_max_ancestor_depth(),
            unsupported_properties: UnsupportedPropertyPolicy::default(),
            disabled_suppresses: default_disabled_suppresses(),
        }
    }
}

impl EngineConfig {
    pub fn state_rules(&self) -> StateRules {
        StateRules::new(
            self.disabled_suppresses
                .iter()
                .map(|name| PseudoState::parse(name)),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_empty_toml() {
        let config: EngineConfig = toml::from_str("").unwrap();
        assert_eq!(config, EngineConfig::default());
        assert_eq!(config.max_ancestor_depth, 64);
        assert_eq!(config.state_rules(), StateRules::default());
    }

    #[test]
    fn test_policy_names() {
        let config: EngineConfig = toml::from_str(
            r#"
            max_ancestor_depth = 8
            unsupported_properties = "pass-through"
            disabled_suppresses = ["hover", "focus"]
            "#,
        )
        .unwrap();
        assert_eq!(config.max_ancestor_depth, 8);
        assert_eq!(
            config.unsupported_properties,
            UnsupportedPropertyPolicy::PassThrough
        );
        assert_eq!(
            config.state_rules(),
            StateRules::new([PseudoState::Hover, PseudoState::Focus])
        );
    }
}
