//! URL line extraction from fetched response bodies.

/// Literal substring that marks a URL-bearing line.
pub const URL_MARKER: &str = "https://www";

/// Extract URL-bearing lines from a response body.
///
/// Splits the body on line boundaries (both `\n` and `\r\n`), keeps only
/// lines containing [`URL_MARKER`], and truncates each kept line to start at
/// the first marker occurrence. A body with no matching lines yields an
/// empty iterator — that is a normal outcome, not an error.
pub fn extract_url_lines(body: &str) -> impl Iterator<Item = &str> {
    body.lines()
        .filter_map(|line| line.find(URL_MARKER).map(|idx| &line[idx..]))
}
