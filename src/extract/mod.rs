pub mod filter;
pub mod identifier;
pub mod scanner;

pub use filter::CandidateSet;
pub use identifier::Identifier;

/// Whitespace as web pages count it: Unicode `White_Space` plus the byte
/// order mark, minus NEL.
pub(crate) fn is_space(c: char) -> bool {
    c == '\u{feff}' || (c.is_whitespace() && c != '\u{85}')
}

/// Scans `text` for media urls and returns the filtered candidates.
pub fn extract_candidates(text: &str) -> CandidateSet {
    filter::filter(scanner::scan(text))
}
