//! Keyword-based sector classification.
//!
//! An ordered list of (case-insensitive pattern, sector label) rules,
//! evaluated top to bottom against a record's `target` text; the first
//! match wins and no match yields the default label. Modeling the rules
//! as an explicit ordered list keeps them independently testable and
//! safely reorderable.

use regex::{Regex, RegexBuilder};

/// Label assigned when no rule matches.
pub const DEFAULT_SECTOR: &str = "General";

/// Built-in keyword table, in evaluation order.
const BUILTIN_RULES: &[(&str, &str)] = &[
    ("auto|car|vehicle", "Automotive"),
    ("steel|aluminum|metal|iron", "Metals & Mining"),
    ("electronic|tech|computer|semiconductor|chip", "Electronics & Technology"),
    ("food|agriculture|crop|grain|fruit|vegetable|meat", "Agricultural Products"),
    ("textile|clothing|apparel|garment|fabric", "Textiles & Apparel"),
    ("energy|oil|gas|petroleum|coal", "Energy"),
    ("chemical|pharmaceutical|drug|medicine", "Chemicals & Pharmaceuticals"),
    ("non.*reciprocal|trade", "General Trade"),
    ("digital|service|tax", "Digital Services"),
    ("lumber|timber|wood", "Forestry & Wood Products"),
    ("copper|mineral", "Minerals & Resources"),
];

/// Ordered sector classification rule set.
#[derive(Debug, Clone)]
pub struct SectorRules {
    rules: Vec<(Regex, String)>,
    default_label: String,
}

impl SectorRules {
    /// The built-in rule set.
    pub fn builtin() -> Self {
        Self::from_pairs(BUILTIN_RULES, DEFAULT_SECTOR)
            .expect("built-in sector patterns are valid")
    }

    /// Build a rule set from (pattern, label) pairs; patterns are compiled
    /// case-insensitively and evaluated in the given order.
    pub fn from_pairs<P, L>(
        pairs: &[(P, L)],
        default_label: &str,
    ) -> Result<Self, regex::Error>
    where
        P: AsRef<str>,
        L: AsRef<str>,
    {
        let mut rules = Vec::with_capacity(pairs.len());
        for (pattern, label) in pairs {
            let regex = RegexBuilder::new(pattern.as_ref())
                .case_insensitive(true)
                .build()?;
            rules.push((regex, label.as_ref().to_string()));
        }
        Ok(Self {
            rules,
            default_label: default_label.to_string(),
        })
    }

    /// Classify a target description; first matching rule wins.
    pub fn classify(&self, target: &str) -> &str {
        for (regex, label) in &self.rules {
            if regex.is_match(target) {
                return label;
            }
        }
        &self.default_label
    }

    /// Number of rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether the rule set is empty (everything classifies as default).
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_classification() {
        let rules = SectorRules::builtin();
        assert_eq!(rules.classify("steel pipes"), "Metals & Mining");
        assert_eq!(rules.classify("Automobiles and parts"), "Automotive");
        assert_eq!(rules.classify("Semiconductor chips"), "Electronics & Technology");
        assert_eq!(rules.classify("Softwood lumber"), "Forestry & Wood Products");
        assert_eq!(rules.classify("Fine porcelain"), "General");
    }

    #[test]
    fn test_case_insensitive() {
        let rules = SectorRules::builtin();
        assert_eq!(rules.classify("STEEL and ALUMINUM"), "Metals & Mining");
    }

    #[test]
    fn test_first_match_wins() {
        // "auto" is evaluated before "steel", so a target containing both
        // classifies as Automotive.
        let rules = SectorRules::builtin();
        assert_eq!(rules.classify("automotive steel"), "Automotive");
    }

    #[test]
    fn test_custom_rules_and_default() {
        let rules =
            SectorRules::from_pairs(&[("wine|cheese", "Gourmet")], "Misc").unwrap();
        assert_eq!(rules.classify("French wine"), "Gourmet");
        assert_eq!(rules.classify("steel pipes"), "Misc");
        assert_eq!(rules.len(), 1);
    }

    #[test]
    fn test_invalid_pattern_is_an_error() {
        let result = SectorRules::from_pairs(&[("(", "Broken")], DEFAULT_SECTOR);
        assert!(result.is_err());
    }
}
