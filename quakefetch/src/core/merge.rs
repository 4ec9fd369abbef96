//! Stitching of tabular bodies returned by bisected queries.

/// Concatenate two CSV bodies that share a header line.
///
/// The second body's first line is dropped. Inputs are left untouched; the
/// merged text is a new allocation. An empty `first` (no header at all) yields
/// `second` unchanged.
pub fn merge_tabular(first: &str, second: &str) -> String {
    if first.is_empty() {
        return second.to_string();
    }
    let rows = match second.split_once('\n') {
        Some((_header, rows)) => rows,
        None => "",
    };

    let mut merged = String::with_capacity(first.len() + rows.len() + 1);
    merged.push_str(first);
    if !rows.is_empty() && !first.ends_with('\n') {
        merged.push('\n');
    }
    merged.push_str(rows);
    merged
}
