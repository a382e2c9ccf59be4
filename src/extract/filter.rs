use std::collections::HashSet;

/// Marker the source site puts on av1 template assets.
const TEMPLATE_MARKER: &str = "_TPL_.av1";

/// Unique media urls in first-seen order.
pub type CandidateSet = Vec<String>;

/// Drops template assets, un-escapes backslashes and removes duplicates,
/// keeping the order in which urls first appeared.
pub fn filter<'a, I>(raw: I) -> CandidateSet
where
    I: IntoIterator<Item = &'a str>,
{
    let mut seen = HashSet::new();
    let mut candidates = Vec::new();
    for url in raw {
        let url = url.replace('\\', "");
        if url.contains(TEMPLATE_MARKER) {
            continue;
        }
        if seen.insert(url.clone()) {
            candidates.push(url);
        }
    }
    candidates
}
