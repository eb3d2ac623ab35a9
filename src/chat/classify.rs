//! Keyword routing applied before any embedding work.

use crate::knowledge::Category;

const GREETING_TOKENS: &[&str] = &["hello", "hi", "hey"];

/// Ordered substring rules; the first matching rule wins. No rule ever
/// produces `Styles` - style names are handled by the containment lookup in
/// the response selector instead.
const CATEGORY_RULES: &[(Category, &[&str])] = &[
    (Category::Trends, &["trend", "trending"]),
    (Category::Colors, &["color", "colors", "colour"]),
    (Category::Accessories, &["accessory", "accessories"]),
    (Category::Outfits, &["outfit", "wear", "dress"]),
];

/// True when the lower-cased message contains a greeting token. Checked
/// ahead of classification; a greeting short-circuits the whole pipeline.
pub fn is_greeting(message_lower: &str) -> bool {
    GREETING_TOKENS.iter().any(|token| message_lower.contains(token))
}

/// Route the lower-cased message to a category, or `None` to search all of
/// them.
pub fn classify(message_lower: &str) -> Option<Category> {
    CATEGORY_RULES
        .iter()
        .find(|(_, tokens)| tokens.iter().any(|token| message_lower.contains(token)))
        .map(|(category, _)| *category)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn greetings_are_substring_matches() {
        assert!(is_greeting("hello there"));
        assert!(is_greeting("hey, quick question"));
        // "hi" inside a longer word still counts
        assert!(is_greeting("is this in style?"));
        assert!(!is_greeting("what about scarves?"));
    }

    #[test]
    fn each_rule_routes_its_tokens() {
        assert_eq!(classify("any new trends?"), Some(Category::Trends));
        assert_eq!(classify("which colours go with beige"), Some(Category::Colors));
        assert_eq!(classify("do i need accessories"), Some(Category::Accessories));
        assert_eq!(classify("what should i wear tonight"), Some(Category::Outfits));
        assert_eq!(classify("summer dress ideas"), Some(Category::Outfits));
    }

    #[test]
    fn first_matching_rule_wins() {
        // Contains both a trend token and a color token; trends is checked
        // first.
        assert_eq!(classify("what colors are trending?"), Some(Category::Trends));
        // Color rule outranks the outfit rule.
        assert_eq!(classify("a colorful dress"), Some(Category::Colors));
    }

    #[test]
    fn unmatched_messages_have_no_category() {
        assert_eq!(classify("tell me about scarves"), None);
        assert_eq!(classify("asdkjasd"), None);
    }
}
