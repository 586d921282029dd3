//! Filesystem-safe directory names derived from topics.

/// Longest slug produced by [`topic_slug`].
pub const MAX_SLUG_LEN: usize = 100;

/// Slug used when a topic has no usable characters.
pub const FALLBACK_SLUG: &str = "topic";

/// Derive an output directory name from `topic`.
///
/// The result contains only `[A-Za-z0-9_-]`, is at most [`MAX_SLUG_LEN`]
/// characters, never starts or ends with `_`, and is a fixed point:
/// `topic_slug(&topic_slug(t)) == topic_slug(t)`.
pub fn topic_slug(topic: &str) -> String {
    let replaced: String = topic
        .trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .take(MAX_SLUG_LEN)
        .collect();

    let slug = replaced.trim_matches('_');
    if slug.is_empty() {
        FALLBACK_SLUG.to_string()
    } else {
        slug.to_string()
    }
}
