/// Prefix shared by every license-related trove classifier.
const LICENSE_PREFIX: &str = "License";

/// Tokens removed from a classifier to leave only the license name.
const STRIPPED_TOKENS: [&str; 2] = ["License :: ", "OSI Approved :: "];

/// Derive license names from trove classifiers.
///
/// `License :: OSI Approved :: MIT License` becomes `MIT License`; multiple
/// license classifiers are joined with newlines, one license per line.
pub fn licenses_from_classifiers<'a, I>(classifiers: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    classifiers
        .into_iter()
        .filter(|c| c.starts_with(LICENSE_PREFIX))
        .map(|c| {
            STRIPPED_TOKENS
                .iter()
                .fold(c.to_string(), |acc, token| acc.replace(token, ""))
        })
        .collect::<Vec<_>>()
        .join("\n")
}
