/// Parses raw `"Key: Value"` lines into unique keys, in first-seen order.
///
/// Each line splits on its first colon and loses at most one leading space
/// from the value. Lines without a colon are skipped. A key seen again has its
/// value appended with `"; "`.
#[must_use]
pub fn parse_header_lines<S>(lines: &[S]) -> Vec<(String, String)>
where
    S: AsRef<str>,
{
    let mut headers = Vec::with_capacity(lines.len());
    for line in lines {
        merge_header_line(&mut headers, line.as_ref());
    }
    headers
}

/// Merges one raw header line into `headers`. Returns `false` when the line
/// has no colon and was ignored.
pub fn merge_header_line(headers: &mut Vec<(String, String)>, line: &str) -> bool {
    let Some((key, raw_value)) = line.split_once(':') else {
        return false;
    };
    let value = raw_value.strip_prefix(' ').unwrap_or(raw_value);

    if let Some((_, existing)) = headers.iter_mut().find(|(name, _)| name == key) {
        existing.push_str("; ");
        existing.push_str(value);
    } else {
        headers.push((key.to_owned(), value.to_owned()));
    }
    true
}
