//! Tags are kept in a single `tag` column, joined by spaces.
//!
//! A tag that itself contains whitespace cannot survive the round trip: it
//! comes back split into several tags.

pub fn encode_tags<S: AsRef<str>>(tags: &[S]) -> String {
    tags.iter()
        .map(|t| t.as_ref())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Splits on any whitespace and drops empty pieces, so an empty column
/// decodes to no tags at all.
pub fn decode_tags(tag: &str) -> Vec<String> {
    tag.split_whitespace().map(str::to_string).collect()
}
