use std::sync::LazyLock;

use regex::Regex;

/// Names that only describe a release detail (resolution, season, episode)
/// and would otherwise flood results for short queries.
static NOISE_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?ix)^\s*[\[(]?\s*(?:
            \d{3,4}\s*p
            | season\s*\d+
            | ep\s*\d+
            | episode\s*\d+
        )\s*[\])]?\s*$",
    )
    .expect("noise pattern compiles")
});

#[must_use]
pub(crate) fn is_noise_name(name: &str) -> bool {
    NOISE_NAME.is_match(name)
}
