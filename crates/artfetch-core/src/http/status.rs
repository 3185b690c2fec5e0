//! Status line handling.

/// True for statuses in `[200, 300)`.
pub fn is_success(status: u32) -> bool {
    (200..300).contains(&status)
}

/// Parses the code out of a raw status line such as `HTTP/1.1 404 Not Found`
/// or `HTTP/2 200`. Returns `None` for ordinary header lines.
pub fn parse_status_line(line: &[u8]) -> Option<u32> {
    let line = std::str::from_utf8(line).ok()?.trim_end();
    if !line.starts_with("HTTP/") {
        return None;
    }
    line.split_whitespace().nth(1)?.parse().ok()
}
