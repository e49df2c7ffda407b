//! Line-oriented insertion of code fragments below marker lines.
//!
//! Markers are matched by exact equality of the trimmed line. Insertion is
//! idempotent: a fragment whose text already appears after its marker is
//! left alone.

/// Inserts `fragment` directly below the first line equal to `marker`.
///
/// Returns `None` if no line matches the marker. The returned text is
/// identical to `content` when the fragment is already present below the
/// marker.
pub fn insert_below_marker(content: &str, marker: &str, fragment: &str) -> Option<String> {
    insert_all_below_marker(content, marker, &[fragment])
}

/// Inserts every fragment not yet present, in order, below `marker`.
pub fn insert_all_below_marker<S: AsRef<str>>(
    content: &str,
    marker: &str,
    fragments: &[S],
) -> Option<String> {
    let marker = marker.trim();
    let (line_start, line_end) = find_marker_line(content, marker)?;
    let below = &content[line_end..];

    let mut block = String::new();
    for fragment in fragments {
        let fragment = fragment.as_ref();
        let needle = fragment.trim_end_matches('\n');
        if needle.is_empty() || below.contains(needle) || block.contains(needle) {
            continue;
        }
        block.push_str(needle);
        block.push('\n');
    }

    if block.is_empty() {
        return Some(content.to_string());
    }

    let mut out = String::with_capacity(content.len() + block.len() + 1);
    out.push_str(&content[..line_end]);
    if !content[line_start..line_end].ends_with('\n') {
        out.push('\n');
    }
    out.push_str(&block);
    out.push_str(below);
    Some(out)
}

/// `true` if some line of `content` matches `marker`.
pub fn has_marker(content: &str, marker: &str) -> bool {
    find_marker_line(content, marker.trim()).is_some()
}

/// Byte range of the first line (newline included) whose trimmed text
/// equals `marker`.
fn find_marker_line(content: &str, marker: &str) -> Option<(usize, usize)> {
    let mut start = 0;
    for line in content.split_inclusive('\n') {
        let end = start + line.len();
        if line.trim() == marker {
            return Some((start, end));
        }
        start = end;
    }
    None
}
