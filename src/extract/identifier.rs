use std::fmt;

use super::is_space;

const MAX_LEN: usize = 20;
const FALLBACK_STEM: &str = "video";

/// Short name derived from a page url, used as the stem of saved files.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct Identifier(String);

impl Identifier {
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// `{identifier}.mp4`, or `video.mp4` when nothing could be derived.
    pub fn file_name(&self) -> String {
        if self.is_empty() {
            format!("{}.mp4", FALLBACK_STEM)
        } else {
            format!("{}.mp4", self.0)
        }
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<Identifier> for String {
    fn from(identifier: Identifier) -> String {
        identifier.0
    }
}

/// Takes the last path segment, cuts it at the first `.`, strips whitespace and
/// path separators and keeps at most 20 characters.
pub fn derive(url: &str) -> Identifier {
    let segment = url.rsplit('/').next().unwrap_or(url);
    let base = segment.split('.').next().unwrap_or(segment);
    Identifier(
        base.chars()
            .filter(|c| !is_space(*c))
            .filter(|c| !std::path::is_separator(*c))
            .take(MAX_LEN)
            .collect(),
    )
}
