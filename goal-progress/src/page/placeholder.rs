//! Locating progress placeholders in HTML.

use regex::Regex;
use std::ops::Range;
use std::sync::LazyLock;

/// Class that marks a progress placeholder.
pub const PLACEHOLDER_CLASS: &str = "tracking-issue-progress";

static DIV_OPEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<div\b([^>]*)>").expect("Invalid div regex"));

static DIV_TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<(/)?div\b([^>]*)>").expect("Invalid div tag regex"));

static CLASS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)(?:^|\s)class\s*=\s*(?:"([^"]*)"|'([^']*)')"#).expect("Invalid class regex")
});

static ID_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)(?:^|\s)id\s*=\s*(?:"([^"]*)"|'([^']*)')"#).expect("Invalid id regex")
});

/// A `div.tracking-issue-progress` element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholder {
    /// Value of the `id` attribute, if present and non-empty.
    pub id: Option<String>,

    /// Byte range of the element's inner content.
    pub content: Range<usize>,
}

/// Finds all progress placeholders in `html`, in document order.
///
/// A placeholder's content runs to its matching `</div>`, so nested divs are
/// part of the content. Placeholders nested inside another placeholder belong
/// to the outer one's content. Unterminated placeholders are ignored.
pub fn find_placeholders(html: &str) -> Vec<Placeholder> {
    let mut placeholders = Vec::new();
    let mut resume_at = 0;

    for open in DIV_OPEN_RE.captures_iter(html) {
        let (Some(tag), Some(attrs)) = (open.get(0), open.get(1)) else {
            continue;
        };
        if tag.start() < resume_at || !is_placeholder(attrs.as_str()) {
            continue;
        }

        let Some(close) = matching_close(html, tag.end()) else {
            continue;
        };

        placeholders.push(Placeholder {
            id: attribute(&ID_RE, attrs.as_str()).filter(|id| !id.is_empty()),
            content: tag.end()..close.start,
        });
        resume_at = close.end;
    }

    placeholders
}

/// Returns the range of the `</div>` closing a div whose content starts at `from`.
fn matching_close(html: &str, from: usize) -> Option<Range<usize>> {
    let mut depth = 0usize;

    for tag in DIV_TAG_RE.captures_iter(&html[from..]) {
        let (Some(whole), Some(attrs)) = (tag.get(0), tag.get(2)) else {
            continue;
        };

        if tag.get(1).is_some() {
            if depth == 0 {
                return Some(from + whole.start()..from + whole.end());
            }
            depth -= 1;
        } else if !attrs.as_str().trim_end().ends_with('/') {
            depth += 1;
        }
    }

    None
}

fn is_placeholder(attrs: &str) -> bool {
    attribute(&CLASS_RE, attrs)
        .is_some_and(|class| class.split_whitespace().any(|c| c == PLACEHOLDER_CLASS))
}

fn attribute(re: &Regex, attrs: &str) -> Option<String> {
    let captures = re.captures(attrs)?;
    captures
        .get(1)
        .or_else(|| captures.get(2))
        .map(|m| m.as_str().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_placeholders_in_order() {
        let html = r#"<p>Goal</p>
<div class="tracking-issue-progress" id="2024h2:rust-lang:rust-project-goals:1"></div>
<div class="other"><div id='2024h2:rust-lang:rust-project-goals:2' class='tracking-issue-progress'>old</div></div>"#;

        let placeholders = find_placeholders(html);

        assert_eq!(placeholders.len(), 2);
        assert_eq!(
            placeholders[0].id.as_deref(),
            Some("2024h2:rust-lang:rust-project-goals:1")
        );
        assert!(placeholders[0].content.is_empty());
        assert_eq!(
            placeholders[1].id.as_deref(),
            Some("2024h2:rust-lang:rust-project-goals:2")
        );
        assert_eq!(&html[placeholders[1].content.clone()], "old");
    }

    #[test]
    fn placeholder_without_id_has_none() {
        let html = r#"<div class="tracking-issue-progress"></div><div class="tracking-issue-progress" id=""></div>"#;

        let placeholders = find_placeholders(html);

        assert_eq!(placeholders.len(), 2);
        assert!(placeholders.iter().all(|p| p.id.is_none()));
    }

    #[test]
    fn ignores_other_divs_and_similar_attributes() {
        let html = r#"<div class="tracking-issue-progress-legend" id="a:b:c:1"></div>
<div data-class="tracking-issue-progress" data-id="a:b:c:2"></div>
<div class="wide tracking-issue-progress" data-id="x" id="a:b:c:3"></div>"#;

        let placeholders = find_placeholders(html);

        assert_eq!(placeholders.len(), 1);
        assert_eq!(placeholders[0].id.as_deref(), Some("a:b:c:3"));
    }

    #[test]
    fn nested_divs_stay_inside_placeholder_content() {
        let html = r#"<section><div class="tracking-issue-progress" id="2024h2:a:b:1"><div class="spinner">loading</div><div/></div></section>"#;

        let placeholders = find_placeholders(html);

        assert_eq!(placeholders.len(), 1);
        assert_eq!(
            &html[placeholders[0].content.clone()],
            r#"<div class="spinner">loading</div><div/>"#
        );
        assert_eq!(&html[placeholders[0].content.end..], "</div></section>");
    }

    #[test]
    fn placeholder_with_unbalanced_content_is_ignored() {
        let html = r#"<div class="tracking-issue-progress" id="a:b:c:1"><div>open</div>"#;
        assert!(find_placeholders(html).is_empty());
    }

    #[test]
    fn unterminated_placeholder_is_ignored() {
        let html = r#"<div class="tracking-issue-progress" id="a:b:c:1">"#;
        assert!(find_placeholders(html).is_empty());
    }
}
