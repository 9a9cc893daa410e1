//! Topic tagging from trigger substrings
//!
//! Retrieved context is summarized with coarse topic tags derived from
//! substring matching against multi-locale keyword lists (Arabic, French,
//! English). The table-driven form keeps adding locales or topics a
//! one-line change.

use std::collections::BTreeSet;

/// Topic tag paired with the substrings that trigger it.
pub type TopicTriggers = (&'static str, &'static [&'static str]);

/// Static topic table. Order is irrelevant; matching is substring-based
/// against lowercased text.
pub const TOPIC_TRIGGERS: &[TopicTriggers] = &[
    ("skincare", &["بشرة", "peau", "skin"]),
    ("haircare", &["شعر", "cheveux", "hair"]),
    ("makeup", &["مكياج", "makeup", "maquillage"]),
];

/// Detect topic tags across a set of texts.
///
/// Returns a `BTreeSet` so callers get a deterministic ordering when
/// rendering the tags into summaries.
pub fn detect_topics<'a, I, S>(texts: I) -> BTreeSet<&'static str>
where
    I: IntoIterator<Item = &'a S>,
    S: AsRef<str> + 'a,
{
    let mut topics = BTreeSet::new();
    for text in texts {
        let lower = text.as_ref().to_lowercase();
        for (topic, triggers) in TOPIC_TRIGGERS {
            if triggers.iter().any(|t| lower.contains(t)) {
                topics.insert(*topic);
            }
        }
    }
    topics
}
