//! Directional description rules ("Paid to X", "Received from Y").

use regex::Regex;

use super::patterns::{keyword_pattern, COUNTERPARTY_NAME};
use crate::models::config::{DescriptionRuleConfig, ExtractionConfig};

/// One keyword rule: finds the counterparty after `keyword`.
#[derive(Debug, Clone)]
pub struct DescriptionRule {
    label: String,
    pattern: Regex,
}

impl DescriptionRule {
    /// Compile a rule. The name ends at the first rail keyword or end of text.
    pub fn new(config: &DescriptionRuleConfig, rails: &[String]) -> Result<Self, regex::Error> {
        let rails = rails
            .iter()
            .filter(|r| !r.trim().is_empty())
            .map(|r| keyword_pattern(r))
            .collect::<Vec<_>>();

        let terminator = if rails.is_empty() {
            "$".to_string()
        } else {
            format!(r"\s+(?:{})\b|$", rails.join("|"))
        };

        let pattern = Regex::new(&format!(
            r"(?i){}\s+({})(?:{})",
            keyword_pattern(&config.keyword),
            COUNTERPARTY_NAME,
            terminator
        ))?;

        Ok(Self {
            label: config.label.clone(),
            pattern,
        })
    }

    /// `"<label> <name>"` if the keyword is present with a usable name.
    pub fn apply(&self, text: &str) -> Option<String> {
        let caps = self.pattern.captures(text)?;
        let name = caps.get(1)?.as_str().trim();
        if name.is_empty() {
            return None;
        }
        Some(format!("{} {}", self.label, name))
    }
}

/// Ordered rule list; the first rule that matches decides the description.
#[derive(Debug, Clone)]
pub struct DescriptionRules {
    rules: Vec<DescriptionRule>,
    fallback: String,
}

impl DescriptionRules {
    pub fn new() -> Self {
        Self::from_config(&ExtractionConfig::default()).expect("default description rules compile")
    }

    pub fn from_config(config: &ExtractionConfig) -> Result<Self, regex::Error> {
        let rules = config
            .description_rules
            .iter()
            .map(|rule| DescriptionRule::new(rule, &config.transfer_rails))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            rules,
            fallback: config.default_description.clone(),
        })
    }

    /// Describe a segment body.
    pub fn describe(&self, text: &str) -> String {
        self.rules
            .iter()
            .find_map(|rule| rule.apply(text))
            .unwrap_or_else(|| self.fallback.clone())
    }
}

impl Default for DescriptionRules {
    fn default() -> Self {
        Self::new()
    }
}
