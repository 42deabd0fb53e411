//! Slug normalisation and candidate generation.
//!
//! A slug is derived from an explicit request value or, failing that, from
//! the record's title/name. Uniqueness is resolved by the repository layer,
//! which walks [`candidate`] suffixes until the table accepts one.

/// Maximum length of a normalised base slug.
pub const MAX_SLUG_LENGTH: usize = 80;

/// Upper bound on the number of candidates tried for a single write.
pub const MAX_SLUG_ATTEMPTS: u32 = 100;

/// The content table a slug belongs to. Determines the fallback slug used
/// when normalisation produces nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlugKind {
    Post,
    Page,
    Category,
}

impl SlugKind {
    /// Default slug for input that normalises to an empty string.
    pub fn fallback(self) -> &'static str {
        match self {
            SlugKind::Post => "post",
            SlugKind::Page => "page",
            SlugKind::Category => "category",
        }
    }
}

/// Normalise arbitrary text into a URL-safe slug.
///
/// Runs of anything outside `[a-z0-9]` (after ASCII lowercasing) collapse
/// into a single hyphen; leading and trailing hyphens are removed and the
/// result is capped at [`MAX_SLUG_LENGTH`].
///
/// ```
/// use folio_core::slug::to_slug;
///
/// assert_eq!(to_slug("  Hello, World!  "), "hello-world");
/// assert_eq!(to_slug("Rust & Axum 0.8"), "rust-axum-0-8");
/// assert_eq!(to_slug("---"), "");
/// ```
pub fn to_slug(value: &str) -> String {
    let mut slug = String::with_capacity(value.len());
    let mut pending_dash = false;

    for ch in value.trim().chars() {
        let lower = ch.to_ascii_lowercase();
        if lower.is_ascii_lowercase() || lower.is_ascii_digit() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            slug.push(lower);
            pending_dash = false;
        } else {
            pending_dash = true;
        }
    }

    if slug.len() > MAX_SLUG_LENGTH {
        // Only ASCII is ever pushed, so byte truncation is char-safe.
        slug.truncate(MAX_SLUG_LENGTH);
        while slug.ends_with('-') {
            slug.pop();
        }
    }

    slug
}

/// Build the base slug for a record.
///
/// A non-blank `requested` slug wins over `source` (the title or name). If
/// the chosen input normalises to nothing, the kind's fallback is used.
pub fn base_slug(kind: SlugKind, requested: Option<&str>, source: &str) -> String {
    let input = requested
        .filter(|s| !s.trim().is_empty())
        .unwrap_or(source);
    let slug = to_slug(input);
    if slug.is_empty() {
        kind.fallback().to_string()
    } else {
        slug
    }
}

/// The `attempt`-th candidate for `base`: the base itself for attempt 1,
/// `base-2`, `base-3`, ... afterwards.
pub fn candidate(base: &str, attempt: u32) -> String {
    if attempt <= 1 {
        base.to_string()
    } else {
        format!("{base}-{attempt}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collapses_symbol_runs() {
        assert_eq!(to_slug("a  --  b"), "a-b");
        assert_eq!(to_slug("Café au lait"), "caf-au-lait");
    }

    #[test]
    fn strips_edge_hyphens() {
        assert_eq!(to_slug("!!Launch day!!"), "launch-day");
    }

    #[test]
    fn caps_length_without_trailing_hyphen() {
        let title = format!("{} tail", "a".repeat(79));
        let slug = to_slug(&title);
        assert_eq!(slug.len(), 79);
        assert!(!slug.ends_with('-'));

        let long = "x".repeat(200);
        assert_eq!(to_slug(&long).len(), MAX_SLUG_LENGTH);
    }

    #[test]
    fn requested_slug_takes_precedence() {
        assert_eq!(
            base_slug(SlugKind::Post, Some("Custom Slug"), "Title"),
            "custom-slug"
        );
    }

    #[test]
    fn blank_requested_slug_falls_back_to_source() {
        assert_eq!(base_slug(SlugKind::Page, Some("   "), "About Us"), "about-us");
        assert_eq!(base_slug(SlugKind::Page, None, "About Us"), "about-us");
    }

    #[test]
    fn empty_normalisation_uses_kind_default() {
        assert_eq!(base_slug(SlugKind::Post, None, "!!!"), "post");
        assert_eq!(base_slug(SlugKind::Page, Some("***"), "ignored"), "page");
        assert_eq!(base_slug(SlugKind::Category, None, ""), "category");
    }

    #[test]
    fn candidates_are_suffixed_from_two() {
        assert_eq!(candidate("news", 1), "news");
        assert_eq!(candidate("news", 2), "news-2");
        assert_eq!(candidate("news", 10), "news-10");
    }
}
