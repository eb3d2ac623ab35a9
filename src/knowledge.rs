//! Builtin fashion knowledge base.
//!
//! The hand-curated reference texts the retrieval engine matches against,
//! grouped into a closed set of categories. Constructed once at startup and
//! never mutated afterwards.

use serde::{Deserialize, Serialize};

/// Fixed reply for any message containing a greeting token.
pub const GREETING: &str =
    "Hello! I'm your fashion assistant. How can I help you with fashion today?";

/// Fixed reply for an empty or whitespace-only message.
pub const EMPTY_PROMPT: &str =
    "I didn't receive any message. Could you please ask me something about fashion?";

const TRENDS_DIGEST_PREFIX: &str = "Here are some current fashion trends: ";

const TRENDS: &[&str] = &[
    "Oversized blazers are in style this season.",
    "Pastel colors are trending for spring.",
    "Sustainable fashion is becoming increasingly popular.",
    "Vintage and retro styles are making a comeback.",
    "Minimalist and capsule wardrobes are trending for their sustainability.",
];

/// Named styles. The names feed the containment lookup; only the
/// descriptions are embedded.
const STYLES: &[(&str, &str)] = &[
    (
        "casual",
        "Casual style is all about comfort and simplicity. Think jeans, t-shirts, and sneakers. It's perfect for everyday wear.",
    ),
    (
        "formal",
        "Formal wear typically includes suits, dress shirts, formal shoes, and accessories like ties and cufflinks. For women, this could mean elegant dresses or pantsuits.",
    ),
    (
        "business",
        "Business attire is professional and polished. For men, this means dress shirts, slacks, and blazers. For women, it could be blouses, pencil skirts, or tailored pants.",
    ),
    (
        "bohemian",
        "Bohemian style features flowy fabrics, earthy tones, and eclectic patterns. Think maxi dresses, fringed vests, and layered jewelry.",
    ),
    (
        "athleisure",
        "Athleisure combines athletic wear with casual clothing. It includes items like yoga pants, hoodies, and sneakers that are both comfortable and stylish.",
    ),
];

const COLORS: &[&str] = &[
    "Neutral colors like beige, white, and gray are versatile and timeless.",
    "Bold colors can make a statement and add personality to your outfit.",
    "Earthy tones like olive green, terracotta, and mustard are great for a natural look.",
    "Jewel tones such as emerald, sapphire, and amethyst add richness to any outfit.",
];

const ACCESSORIES: &[&str] = &[
    "Statement jewelry can elevate any outfit.",
    "A good quality watch is a timeless accessory.",
    "Scarves can add color and texture to your look.",
    "A classic leather belt can tie an outfit together.",
    "Sunglasses are both stylish and practical for sunny days.",
];

const OUTFITS: &[&str] = &[
    "For a casual day out, try pairing light wash jeans with a white t-shirt and sneakers.",
    "A little black dress is perfect for any formal occasion and can be dressed up or down with accessories.",
    "For a business casual look, pair tailored trousers with a blouse and a blazer.",
    "Layering is key for transitional weather - try a denim jacket over a summer dress.",
];

/// Generic utterances used when no knowledge-base match is confident enough.
const FALLBACKS: &[&str] = &[
    "I'm a fashion assistant. I can help you with fashion trends, styles, colors, and accessories.",
    "I'm not sure I understand. Could you rephrase your question about fashion?",
    "I'm here to help with fashion advice. Could you tell me more about what you're looking for?",
    "I specialize in fashion advice. You can ask me about trends, styles, colors, or outfit ideas.",
];

/// Topical partition of the knowledge base. Closed set; the classifier never
/// produces a category outside it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Trends,
    Styles,
    Colors,
    Accessories,
    Outfits,
}

impl Category {
    /// Canonical scan order. Ties across categories resolve to the earliest.
    pub const ALL: [Category; 5] = [
        Category::Trends,
        Category::Styles,
        Category::Colors,
        Category::Accessories,
        Category::Outfits,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Trends => "trends",
            Category::Styles => "styles",
            Category::Colors => "colors",
            Category::Accessories => "accessories",
            Category::Outfits => "outfits",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Read-only category → texts mapping plus the style-name side table and the
/// fallback utterances.
pub struct KnowledgeBase {
    trends: Vec<String>,
    styles: Vec<(String, String)>,
    style_texts: Vec<String>,
    colors: Vec<String>,
    accessories: Vec<String>,
    outfits: Vec<String>,
    fallbacks: Vec<String>,
}

impl KnowledgeBase {
    pub fn builtin() -> Self {
        let owned = |texts: &[&str]| texts.iter().map(|t| t.to_string()).collect::<Vec<_>>();

        Self {
            trends: owned(TRENDS),
            styles: STYLES
                .iter()
                .map(|(name, text)| (name.to_string(), text.to_string()))
                .collect(),
            style_texts: STYLES.iter().map(|(_, text)| text.to_string()).collect(),
            colors: owned(COLORS),
            accessories: owned(ACCESSORIES),
            outfits: owned(OUTFITS),
            fallbacks: owned(FALLBACKS),
        }
    }

    /// Ordered texts of a category. Styles are flattened to their
    /// descriptions; the names only matter for [`Self::style_matching`].
    pub fn texts(&self, category: Category) -> &[String] {
        match category {
            Category::Trends => &self.trends,
            Category::Styles => &self.style_texts,
            Category::Colors => &self.colors,
            Category::Accessories => &self.accessories,
            Category::Outfits => &self.outfits,
        }
    }

    /// `(category, texts)` pairs in canonical scan order.
    pub fn categories(&self) -> impl Iterator<Item = (Category, &[String])> {
        Category::ALL.iter().map(move |&category| (category, self.texts(category)))
    }

    /// Description of the first style whose name appears verbatim in the
    /// lower-cased message.
    pub fn style_matching(&self, message_lower: &str) -> Option<&str> {
        self.styles
            .iter()
            .find(|(name, _)| message_lower.contains(name.as_str()))
            .map(|(_, text)| text.as_str())
    }

    pub fn fallbacks(&self) -> &[String] {
        &self.fallbacks
    }

    /// All trend texts joined into a single breadth-first answer.
    pub fn trends_digest(&self) -> String {
        format!("{TRENDS_DIGEST_PREFIX}{}", self.trends.join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_shape() {
        let kb = KnowledgeBase::builtin();
        assert_eq!(kb.texts(Category::Trends).len(), 5);
        assert_eq!(kb.texts(Category::Styles).len(), 5);
        assert_eq!(kb.texts(Category::Colors).len(), 4);
        assert_eq!(kb.texts(Category::Accessories).len(), 5);
        assert_eq!(kb.texts(Category::Outfits).len(), 4);
        assert_eq!(kb.fallbacks().len(), 4);
    }

    #[test]
    fn categories_follow_scan_order() {
        let kb = KnowledgeBase::builtin();
        let order: Vec<Category> = kb.categories().map(|(category, _)| category).collect();
        assert_eq!(order, Category::ALL);
    }

    #[test]
    fn style_matching_finds_literal_name() {
        let kb = KnowledgeBase::builtin();
        let description = kb.style_matching("i want a casual look").unwrap();
        assert!(description.starts_with("Casual style"));

        assert!(kb.style_matching("tell me about shoes").is_none());
    }

    #[test]
    fn trends_digest_concatenates_every_trend() {
        let kb = KnowledgeBase::builtin();
        let digest = kb.trends_digest();
        assert!(digest.starts_with("Here are some current fashion trends: "));
        for trend in kb.texts(Category::Trends) {
            assert!(digest.contains(trend.as_str()));
        }
    }
}
