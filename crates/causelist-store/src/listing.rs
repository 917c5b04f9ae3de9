//! Cause-list table extraction.
//!
//! A cause list is an HTML page whose first `<table>` lists one case per row:
//! the item number in the first cell and the case number, often followed by
//! connected matters, in the second. Only those two columns are kept.
//!
//! Markup is scanned by tag position rather than parsed; cause lists are
//! generated pages with flat, unnested tables.

use causelist_core::SecondaryRow;

/// Extract listing rows from the first table of `html`.
///
/// Returns `None` when the document has no table. Rows without `<td>` cells
/// (header rows) are skipped. The second column is reduced to its first
/// whitespace-separated token.
pub fn extract_listing(html: &str) -> Option<Vec<SecondaryRow>> {
    // ASCII lower-casing keeps byte offsets valid for slicing `html`.
    let lower = html.to_ascii_lowercase();

    let table_start = find_tag(&lower, "table", 0)?;
    let table_end = lower[table_start..]
        .find("</table")
        .map_or(lower.len(), |i| table_start + i);

    let mut rows = Vec::new();
    let mut pos = table_start;
    while let Some(tr) = find_tag(&lower, "tr", pos).filter(|&i| i < table_end) {
        let row_end = block_end(&lower, tr, "tr", table_end);
        let cells = cells_in(html, &lower, tr, row_end);
        if !cells.is_empty() {
            let mut cells = cells.into_iter();
            let index = cells.next().unwrap_or_default();
            let case_text = cells
                .next()
                .and_then(|c| c.split_whitespace().next().map(str::to_string))
                .unwrap_or_default();
            rows.push(SecondaryRow { index, case_text });
        }
        pos = row_end;
    }
    Some(rows)
}

/// Text of every `<td>` between `start` and `end`.
fn cells_in(html: &str, lower: &str, start: usize, end: usize) -> Vec<String> {
    let mut out = Vec::new();
    let mut pos = start;
    while let Some(td) = find_tag(lower, "td", pos).filter(|&i| i < end) {
        let cell_end = block_end(lower, td, "td", end);
        let inner_start = lower[td..cell_end].find('>').map_or(cell_end, |i| td + i + 1);
        let inner_end = lower[inner_start..cell_end]
            .find("</td")
            .map_or(cell_end, |i| inner_start + i);
        out.push(cell_text(&html[inner_start..inner_end]));
        pos = cell_end;
    }
    out
}

/// Offset of the next `<tag` opening at or after `from`, ignoring longer tag
/// names that share the prefix (`<tr` vs `<track`).
fn find_tag(lower: &str, tag: &str, from: usize) -> Option<usize> {
    let open = format!("<{tag}");
    let mut pos = from;
    while let Some(rel) = lower.get(pos..)?.find(&open) {
        let at = pos + rel;
        match lower.as_bytes().get(at + open.len()) {
            Some(b) if *b == b'>' || *b == b'/' || b.is_ascii_whitespace() => return Some(at),
            None => return None,
            _ => pos = at + open.len(),
        }
    }
    None
}

/// End of the element opened at `start`: just past its closing tag, or the
/// next sibling opening, or `limit`, whichever comes first.
fn block_end(lower: &str, start: usize, tag: &str, limit: usize) -> usize {
    let body_from = start + tag.len() + 1;
    let close = lower[body_from..limit]
        .find(&format!("</{tag}"))
        .map(|i| {
            let at = body_from + i;
            lower[at..limit].find('>').map_or(limit, |j| at + j + 1)
        });
    let next = find_tag(lower, tag, body_from).filter(|&i| i < limit);
    match (close, next) {
        (Some(c), Some(n)) => c.min(n),
        (Some(c), None) => c,
        (None, Some(n)) => n,
        (None, None) => limit,
    }
}

/// Strip tags, decode common entities, and collapse whitespace.
fn cell_text(fragment: &str) -> String {
    let mut text = String::with_capacity(fragment.len());
    let mut in_tag = false;
    for ch in fragment.chars() {
        match ch {
            '<' => in_tag = true,
            '>' => {
                in_tag = false;
                text.push(' ');
            }
            _ if !in_tag => text.push(ch),
            _ => {}
        }
    }
    let decoded = text
        .replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&");
    decoded.split_whitespace().collect::<Vec<_>>().join(" ")
}
