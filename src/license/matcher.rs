use std::collections::BTreeSet;

/// Maximum number of near matches returned per lookup.
const MAX_MATCHES: usize = 3;

/// Minimum Ratcliff/Obershelp similarity for two names to count as a match.
pub const SIMILARITY_CUTOFF: f32 = 0.6;

/// Lower-case, drop the word `license` and trim.
///
/// `"BSD License"` and `"bsd"` both normalize to `"bsd"`.
pub fn normalize(license: &str) -> String {
    license.to_lowercase().replace("license", "").trim().to_string()
}

/// Candidates from `policy` that are close to `license`, best first.
///
/// Both sides are normalized before comparison, so exact matches modulo case
/// and the word `license` always succeed.
pub fn near_matches<'a>(license: &str, policy: &'a BTreeSet<String>) -> Vec<&'a str> {
    if policy.is_empty() {
        return Vec::new();
    }

    let word = normalize(license);
    let normalized: Vec<(String, &'a str)> = policy
        .iter()
        .map(|entry| (normalize(entry), entry.as_str()))
        .collect();
    let candidates: Vec<&str> = normalized.iter().map(|(n, _)| n.as_str()).collect();

    difflib::get_close_matches(&word, candidates, MAX_MATCHES, SIMILARITY_CUTOFF)
        .into_iter()
        .filter_map(|hit| {
            normalized
                .iter()
                .find(|(n, _)| n == hit)
                .map(|(_, original)| *original)
        })
        .collect()
}

pub fn is_near_match(license: &str, policy: &BTreeSet<String>) -> bool {
    !near_matches(license, policy).is_empty()
}
