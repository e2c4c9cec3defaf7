//! Citation-marker removal for spoken answers.

use std::sync::LazyLock;

use regex::Regex;

/// Bracketed reference such as `[doc1]` or `[2]`: non-greedy, single line.
static CITATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[.*?\]").expect("citation pattern is valid"));

/// Run of markers, each with the spaces or tabs before it, directly in front
/// of closing punctuation. Group 1 keeps the punctuation. Each marker ends at
/// its first `]`, the same span [`CITATION`] matches, so a run never bridges
/// plain text.
static CITATION_BEFORE_PUNCT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:[ \t]*\[[^\]\n]*\])+([.,;:!?])")
        .expect("citation/punctuation pattern is valid")
});

/// Removes every citation marker and trims the result.
///
/// A marker that sits right before `. , ; : ! ?` is removed together with the
/// whitespace that precedes it, so no space is left in front of the
/// punctuation. Elsewhere only the marker itself goes.
///
/// ```
/// use rag_pipeline::sanitize::clean_response;
///
/// assert_eq!(clean_response("Revenue was €1.2B [doc3]."), "Revenue was €1.2B.");
/// assert_eq!(clean_response("Revenue grew [doc1] by 5% [2]"), "Revenue grew  by 5%");
/// ```
pub fn clean_response(text: &str) -> String {
    let text = CITATION_BEFORE_PUNCT.replace_all(text, "$1");
    let text = CITATION.replace_all(&text, "");
    text.trim().to_string()
}
