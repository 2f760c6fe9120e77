//! Decoding of HTML-escaped text as delivered by the trivia API.

/// Replace HTML character references (`&quot;`, `&#039;`, `&#x27;`, `&eacute;`, ...)
/// with the characters they stand for, using the full HTML5 entity table.
///
/// Unknown references are kept verbatim.
#[must_use]
pub fn decode_html_entities(input: &str) -> String {
    html_escape::decode_html_entities(input).into_owned()
}
