//! Common utility functions shared across the codebase.

use std::path::Path;

/// Build an index of line start byte offsets for O(log n) line lookups.
///
/// The returned vector contains byte offsets where each line starts.
/// Line 1 starts at offset 0, line 2 starts after the first '\n', etc.
pub fn build_line_index(content: &str) -> Vec<usize> {
    let mut offsets = vec![0];
    for (i, c) in content.char_indices() {
        if c == '\n' {
            offsets.push(i + 1);
        }
    }
    offsets
}

/// Find line number for a byte offset using binary search.
///
/// Returns 1-based line number.
pub fn offset_to_line(line_index: &[usize], offset: usize) -> usize {
    match line_index.binary_search(&offset) {
        Ok(line) => line + 1,
        Err(line) => line,
    }
}

/// Largest char boundary that is `<= offset`.
pub fn floor_char_boundary(text: &str, offset: usize) -> usize {
    let mut offset = offset.min(text.len());
    while !text.is_char_boundary(offset) {
        offset -= 1;
    }
    offset
}

/// Slice of `text` spanning `radius` characters on each side of `offset`,
/// clipped to the text bounds.
///
/// # Examples
///
/// ```
/// use loctext::utils::context_window;
///
/// assert_eq!(context_window("abcdefgh", 4, 2), "cdef");
/// assert_eq!(context_window("abcdefgh", 1, 3), "abcd");
/// assert_eq!(context_window("안녕하세요", 6, 1), "녕하");
/// ```
pub fn context_window(text: &str, offset: usize, radius: usize) -> &str {
    let offset = floor_char_boundary(text, offset);
    let start = text[..offset]
        .char_indices()
        .rev()
        .take(radius)
        .last()
        .map(|(i, _)| i)
        .unwrap_or(offset);
    let end = text[offset..]
        .char_indices()
        .nth(radius)
        .map(|(i, _)| offset + i)
        .unwrap_or(text.len());
    &text[start..end]
}

/// Render `path` relative to `root` when possible, with forward slashes.
pub fn display_path(path: &Path, root: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative.to_string_lossy().replace('\\', "/")
}
