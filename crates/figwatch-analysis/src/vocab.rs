//! Controlled vocabulary of market-relevant categories.

/// Tags a post may carry. Backend output outside this list is discarded.
pub const MARKET_TAGS: [&str; 10] = [
    "stock",
    "market",
    "economy",
    "interest rate",
    "inflation",
    "policy",
    "regulation",
    "AI",
    "technology",
    "trade",
];

/// Filter a comma-separated completion down to the controlled vocabulary.
///
/// Matching is case-insensitive; the canonical casing from [`MARKET_TAGS`]
/// is returned. Duplicates are collapsed, order follows the input.
#[must_use]
pub fn filter_market_tags(raw: &str) -> Vec<String> {
    let mut tags: Vec<String> = Vec::new();

    for candidate in raw.split(',') {
        let candidate = candidate.trim();
        if candidate.is_empty() {
            continue;
        }
        let Some(canonical) = MARKET_TAGS
            .iter()
            .find(|tag| tag.eq_ignore_ascii_case(candidate))
        else {
            continue;
        };
        if !tags.iter().any(|t| t == canonical) {
            tags.push((*canonical).to_string());
        }
    }

    tags
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_only_vocabulary_tags() {
        let tags = filter_market_tags("inflation, kittens, Policy, trade");
        assert_eq!(tags, vec!["inflation", "policy", "trade"]);
    }

    #[test]
    fn matching_is_case_insensitive_with_canonical_output() {
        let tags = filter_market_tags("ai, INTEREST RATE");
        assert_eq!(tags, vec!["AI", "interest rate"]);
    }

    #[test]
    fn duplicates_are_collapsed() {
        let tags = filter_market_tags("stock, Stock, STOCK");
        assert_eq!(tags, vec!["stock"]);
    }

    #[test]
    fn garbage_yields_empty() {
        assert!(filter_market_tags("lorem ipsum dolor").is_empty());
        assert!(filter_market_tags("").is_empty());
        assert!(filter_market_tags(", ,, ").is_empty());
    }
}
