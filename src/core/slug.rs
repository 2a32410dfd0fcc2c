//! Title to file-name slugs
//!
//! Articles are saved as `<slug>.md` where the slug is derived from the title.

use std::sync::LazyLock;

use regex::Regex;

static DISALLOWED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9 _-]+").expect("valid slug pattern"));
static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid whitespace pattern"));

/// Slug used when a title has no usable characters
pub const DEFAULT_SLUG: &str = "blog";

/// Convert a title to its file-name slug
///
/// Lowercases, drops everything outside `[a-z0-9 _-]`, joins words with `_`.
pub fn slugify(title: &str) -> String {
    let lower = title.trim().to_lowercase();
    let kept = DISALLOWED.replace_all(&lower, "");
    let joined = WHITESPACE.replace_all(&kept, "_");
    let slug = joined.trim_matches('_');

    if slug.is_empty() {
        DEFAULT_SLUG.to_string()
    } else {
        slug.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify_corpus_titles() {
        assert_eq!(
            slugify("Your Guide to Sunday Pilates in Las Vegas"),
            "your_guide_to_sunday_pilates_in_las_vegas"
        );
        assert_eq!(
            slugify("Navigating the AI Bubble: What to Expect in 2027"),
            "navigating_the_ai_bubble_what_to_expect_in_2027"
        );
    }

    #[test]
    fn test_slugify_keeps_dashes_and_underscores() {
        assert_eq!(slugify("  Pre-Class  Snacks_101 "), "pre-class_snacks_101");
    }

    #[test]
    fn test_slugify_trims_underscores() {
        assert_eq!(slugify("_Hidden_"), "hidden");
        assert_eq!(slugify("What? Why!"), "what_why");
    }

    #[test]
    fn test_slugify_empty_falls_back() {
        assert_eq!(slugify(""), DEFAULT_SLUG);
        assert_eq!(slugify("¿¡!?"), DEFAULT_SLUG);
    }
}
