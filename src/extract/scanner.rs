use once_cell::sync::Lazy;
use regex::Regex;

use super::is_space;

static SCHEME: Lazy<Regex> = Lazy::new(|| Regex::new(r"https?://").unwrap());

const SUFFIX: &str = ".mp4";
const TEMPLATE_SUFFIX: &str = ".t.mp4";

/// Finds every `http(s)://...mp4` run in `text`, left to right.
///
/// A match is the longest stretch of non-whitespace after the scheme that ends
/// with `.mp4` but not with `.t.mp4`. When a start has no acceptable end the
/// search moves on by one byte, after a match it continues at the match end.
pub fn scan(text: &str) -> Vec<&str> {
    let mut matches = Vec::new();
    let mut pos = 0;
    while let Some(scheme) = SCHEME.find_at(text, pos) {
        let start = scheme.start();
        let run_end = text[scheme.end()..]
            .find(is_space)
            .map_or(text.len(), |i| scheme.end() + i);
        match last_media_end(&text[start..run_end], scheme.end() - start) {
            Some(len) => {
                matches.push(&text[start..start + len]);
                pos = start + len;
            }
            None => pos = start + 1,
        }
    }
    matches
}

/// Length of the longest prefix of `run` that is a media url, if any.
/// At least one character has to sit between the scheme and the suffix.
fn last_media_end(run: &str, scheme_len: usize) -> Option<usize> {
    run.rmatch_indices(SUFFIX)
        .map(|(idx, _)| idx + SUFFIX.len())
        .filter(|end| end - SUFFIX.len() > scheme_len)
        .find(|end| is_media_url(&run[..*end]))
}

fn is_media_url(candidate: &str) -> bool {
    candidate.ends_with(SUFFIX) && !candidate.ends_with(TEMPLATE_SUFFIX)
}
