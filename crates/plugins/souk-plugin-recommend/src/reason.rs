//! Recommendation reason rules
//!
//! Reasons come from a fixed rule list evaluated in priority order, first
//! match wins. Each rule pairs a session keyword with a product-text
//! keyword and a canned explanation.

use souk_core::Product;

/// Which product field a rule matches against
#[derive(Debug, Clone, Copy)]
enum Field {
    Title,
    Description,
}

struct ReasonRule {
    session_keyword: &'static str,
    product_keyword: &'static str,
    field: Field,
    reason: &'static str,
}

const REASON_RULES: &[ReasonRule] = &[
    ReasonRule {
        session_keyword: "running",
        product_keyword: "shoes",
        field: Field::Title,
        reason: "Matches your request for running shoes.",
    },
    ReasonRule {
        session_keyword: "lightweight",
        product_keyword: "lightweight",
        field: Field::Description,
        reason: "Recommended for lightweight preference.",
    },
    ReasonRule {
        session_keyword: "yoga",
        product_keyword: "yoga",
        field: Field::Title,
        reason: "Recommended for yoga practice.",
    },
];

/// Short natural-language reason a product was suggested for a session.
///
/// Falls back to a generic category-based reason when no rule fires.
pub fn reason_for(session_text: &str, product: &Product) -> String {
    let session = session_text.to_lowercase();
    for rule in REASON_RULES {
        if !session.contains(rule.session_keyword) {
            continue;
        }
        let haystack = match rule.field {
            Field::Title => product.title.to_lowercase(),
            Field::Description => product.description.to_lowercase(),
        };
        if haystack.contains(rule.product_keyword) {
            return rule.reason.to_string();
        }
    }
    format!(
        "Relevant to your interest in {} products.",
        product.category.to_lowercase()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(title: &str, description: &str, category: &str) -> Product {
        Product {
            id: 1,
            title: title.to_string(),
            description: description.to_string(),
            category: category.to_string(),
            stock: 1,
            popularity: 0.5,
            recency: 0.5,
            personal: 0.5,
            seller_boost: 0.0,
        }
    }

    #[test]
    fn test_running_shoes_rule() {
        let p = product("Running Shoes", "lightweight trainer", "Footwear");
        assert_eq!(
            reason_for("I need running shoes", &p),
            "Matches your request for running shoes."
        );
    }

    #[test]
    fn test_first_match_wins() {
        // Session mentions both running and lightweight; the running rule
        // has priority.
        let p = product("Running Shoes", "lightweight trainer", "Footwear");
        assert_eq!(
            reason_for("lightweight running shoes please", &p),
            "Matches your request for running shoes."
        );
    }

    #[test]
    fn test_lightweight_rule_matches_description() {
        let p = product("Trail Trainer", "lightweight mesh upper", "Footwear");
        assert_eq!(
            reason_for("something lightweight", &p),
            "Recommended for lightweight preference."
        );
    }

    #[test]
    fn test_yoga_rule() {
        let p = product("Yoga Mat", "non-slip", "Fitness");
        assert_eq!(reason_for("gear for yoga", &p), "Recommended for yoga practice.");
    }

    #[test]
    fn test_generic_fallback_uses_category() {
        let p = product("Espresso Machine", "15 bar pump", "Kitchen");
        assert_eq!(
            reason_for("I want coffee at home", &p),
            "Relevant to your interest in kitchen products."
        );
    }
}
