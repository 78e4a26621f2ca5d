pub const START_MARKER: &str = "<!-- LANGUAGE-STATS:START -->";
pub const END_MARKER: &str = "<!-- LANGUAGE-STATS:END -->";

/// Fallback anchor: the github-readme-stats "Top Languages" image.
const BADGE_PREFIX: &str = "![Top Languages]";

/// Where a block went in the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    Replaced,
    BeforeBadge,
    Appended,
}

pub fn wrap(block: &str) -> String {
    format!("{START_MARKER}\n{block}\n{END_MARKER}")
}

/// Put `block` into `document` between the marker lines.
///
/// An existing marked section is replaced whole. Without one, the block goes
/// in front of the first Top Languages badge, or else at the end after one
/// blank line. Running it again on its own output changes nothing.
pub fn splice(document: &str, block: &str) -> (String, Placement) {
    let wrapped = wrap(block);

    if let Some((start, end)) = marked_section(document) {
        let mut out = String::with_capacity(document.len() + wrapped.len());
        out.push_str(&document[..start]);
        out.push_str(&wrapped);
        out.push_str(&document[end..]);
        return (out, Placement::Replaced);
    }

    if let Some(badge) = find_badge(document) {
        let mut out = String::with_capacity(document.len() + wrapped.len() + 2);
        out.push_str(&document[..badge]);
        out.push_str(&wrapped);
        out.push_str("\n\n");
        out.push_str(&document[badge..]);
        return (out, Placement::BeforeBadge);
    }

    let body = document.trim_end();
    let out = if body.is_empty() {
        format!("{wrapped}\n")
    } else {
        format!("{body}\n\n{wrapped}\n")
    };
    (out, Placement::Appended)
}

/// Byte range from the first start marker through the first end marker
/// that follows it.
fn marked_section(document: &str) -> Option<(usize, usize)> {
    let start = document.find(START_MARKER)?;
    let after_start = start + START_MARKER.len();
    let end = document[after_start..].find(END_MARKER)? + after_start + END_MARKER.len();
    Some((start, end))
}

/// Offset of the first `![Top Languages](...)` image, closing paren on the
/// same line.
fn find_badge(document: &str) -> Option<usize> {
    let mut offset = 0;
    while let Some(found) = document[offset..].find(BADGE_PREFIX) {
        let begin = offset + found;
        let rest = &document[begin + BADGE_PREFIX.len()..];
        let line = rest.split('\n').next().unwrap_or("");
        if line.contains(')') {
            return Some(begin);
        }
        offset = begin + BADGE_PREFIX.len();
    }
    None
}
