use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// Cells taken by one grapheme. A tab is drawn as four spaces.
fn cells(grapheme: &str) -> usize {
    match grapheme {
        "\t" => 4,
        g => UnicodeWidthStr::width(g),
    }
}

/// Display width in terminal cells. Tabs count as 4 cells.
pub fn display_width(s: &str) -> usize {
    s.graphemes(true).map(cells).sum()
}

/// Fit a todo message into `budget` cells.
///
/// Messages narrower than `budget` are returned as-is. Longer ones are cut
/// to the longest grapheme prefix that stays below `budget` and get `...`
/// appended, so the result may extend up to two cells past `budget`; the
/// panel leaves room for that.
pub fn truncate_with_ellipsis(s: &str, budget: usize) -> String {
    if display_width(s) < budget {
        return s.to_string();
    }
    let mut used = 0;
    let kept = s
        .grapheme_indices(true)
        .find_map(|(at, g)| {
            used += cells(g);
            (used >= budget).then_some(at)
        })
        .unwrap_or(s.len());
    format!("{}...", &s[..kept])
}

/// Byte offset just past the grapheme starting at `at`, or None at the end
pub fn next_grapheme_boundary(s: &str, at: usize) -> Option<usize> {
    let g = s.get(at..)?.graphemes(true).next()?;
    Some(at + g.len())
}

/// Byte offset where the grapheme ending at `at` starts, or None at the start
pub fn prev_grapheme_boundary(s: &str, at: usize) -> Option<usize> {
    let g = s.get(..at)?.graphemes(true).next_back()?;
    Some(at - g.len())
}

/// Terminal column of byte offset `at`. Offsets past the end clamp to the
/// full width.
pub fn byte_offset_to_display_col(s: &str, at: usize) -> usize {
    display_width(s.get(..at).unwrap_or(s))
}
