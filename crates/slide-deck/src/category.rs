use crate::error::DeckError;
use crate::model::Category;

/// Keyword table used when no override is configured. Order is significant:
/// the first keyword contained in the lower-cased title wins.
pub const DEFAULT_RULES: &[(&str, Category)] = &[
    ("introduction", Category::Introduction),
    ("personalized", Category::Introduction),
    ("problem", Category::Problem),
    ("current", Category::Problem),
    ("solution", Category::Solution),
    ("recommended", Category::Solution),
    ("roi", Category::Impact),
    ("impact", Category::Impact),
    ("expected", Category::Impact),
    ("implementation", Category::Plan),
    ("plan", Category::Plan),
    ("why", Category::Differentiation),
    ("works", Category::Differentiation),
    ("next", Category::NextSteps),
    ("step", Category::NextSteps),
    ("contact", Category::Contact),
];

/// Classify a title with [`DEFAULT_RULES`].
pub fn categorize(title: &str) -> Category {
    first_match(DEFAULT_RULES.iter().copied(), title)
}

/// Ordered keyword → category table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryRules {
    rules: Vec<(String, Category)>,
}

impl Default for CategoryRules {
    fn default() -> Self {
        Self::new(DEFAULT_RULES.iter().copied())
    }
}

impl CategoryRules {
    /// Build a table from `(keyword, category)` pairs, keeping their order.
    pub fn new<I, K>(rules: I) -> Self
    where
        I: IntoIterator<Item = (K, Category)>,
        K: AsRef<str>,
    {
        Self {
            rules: rules
                .into_iter()
                .map(|(keyword, category)| (keyword.as_ref().to_lowercase(), category))
                .collect(),
        }
    }

    /// Parse a comma-separated `keyword=category` list, e.g.
    /// `pricing=impact, roadmap=plan`.
    pub fn parse(list: &str) -> Result<Self, DeckError> {
        let mut rules = Vec::new();
        for entry in list.split(',').map(str::trim).filter(|e| !e.is_empty()) {
            let (keyword, category) = entry.split_once('=').ok_or_else(|| DeckError::InvalidRule {
                rule: entry.to_string(),
            })?;
            let keyword = keyword.trim();
            if keyword.is_empty() {
                return Err(DeckError::InvalidRule {
                    rule: entry.to_string(),
                });
            }
            rules.push((keyword.to_string(), category.parse::<Category>()?));
        }
        Ok(Self::new(rules))
    }

    pub fn classify(&self, title: &str) -> Category {
        first_match(self.rules.iter().map(|(k, c)| (k.as_str(), *c)), title)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Category)> {
        self.rules.iter().map(|(k, c)| (k.as_str(), *c))
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

fn first_match<'a>(mut rules: impl Iterator<Item = (&'a str, Category)>, title: &str) -> Category {
    let lower = title.to_lowercase();
    rules
        .find(|(keyword, _)| lower.contains(*keyword))
        .map(|(_, category)| category)
        .unwrap_or(Category::Document)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_rules_cover_proposal_sections() {
        assert_eq!(categorize("Personalized Introduction"), Category::Introduction);
        assert_eq!(categorize("The Current Challenge"), Category::Problem);
        assert_eq!(categorize("Recommended Solution"), Category::Solution);
        assert_eq!(categorize("Expected ROI"), Category::Impact);
        assert_eq!(categorize("Implementation Timeline"), Category::Plan);
        assert_eq!(categorize("Why Choose Us"), Category::Differentiation);
        assert_eq!(categorize("Next Steps"), Category::NextSteps);
        assert_eq!(categorize("Contact"), Category::Contact);
        assert_eq!(categorize("Appendix"), Category::Document);
        assert_eq!(categorize(""), Category::Document);
    }

    #[test]
    fn first_keyword_in_table_order_wins() {
        // "plan" appears in the title, but "solution" is earlier in the table.
        assert_eq!(categorize("Solution plan"), Category::Solution);
        // "works" is listed before "next"/"step".
        assert_eq!(categorize("How it works: next steps"), Category::Differentiation);
    }

    #[test]
    fn matching_is_case_insensitive_containment() {
        assert_eq!(categorize("PROBLEMS WE SEE"), Category::Problem);
        // Containment, not word match: "roi" inside "heroic".
        assert_eq!(categorize("A heroic effort"), Category::Impact);
    }

    #[test]
    fn default_table_matches_constant() {
        let rules = CategoryRules::default();
        assert_eq!(rules.len(), DEFAULT_RULES.len());
        for title in ["Expected ROI", "Why us", "Appendix"] {
            assert_eq!(rules.classify(title), categorize(title));
        }
    }

    #[test]
    fn parse_keeps_configured_order() {
        let rules = CategoryRules::parse("Pricing=impact, roadmap = plan ,price=contact").unwrap();
        let parsed: Vec<_> = rules.iter().collect();
        assert_eq!(
            parsed,
            vec![
                ("pricing", Category::Impact),
                ("roadmap", Category::Plan),
                ("price", Category::Contact),
            ]
        );
        assert_eq!(rules.classify("Pricing overview"), Category::Impact);
        assert_eq!(rules.classify("Price list"), Category::Contact);
        assert_eq!(rules.classify("Problem"), Category::Document);
    }

    #[test]
    fn parse_rejects_malformed_entries() {
        assert!(matches!(
            CategoryRules::parse("pricing"),
            Err(DeckError::InvalidRule { rule }) if rule == "pricing"
        ));
        assert!(matches!(
            CategoryRules::parse("=plan"),
            Err(DeckError::InvalidRule { .. })
        ));
        assert!(matches!(
            CategoryRules::parse("pricing=money"),
            Err(DeckError::UnknownCategory(name)) if name == "money"
        ));
        assert!(CategoryRules::parse("").unwrap().is_empty());
    }
}
