//! Fuzzy string matching
//!
//! Normalized Damerau-Levenshtein similarity used to rank free-text queries
//! against candidate names and to decide whether two scenarios are the same
//! logical scenario after an edit.

pub use strsim::damerau_levenshtein;

/// Scores below this are treated as no match
pub const MIN_THRESHOLD: f64 = 0.25;

/// Two scores closer than this are treated as tied
pub const ADJACENT_THRESHOLD: f64 = 0.05;

/// Minimum similarity for two scenarios to be the same logical scenario
pub const RELATEDNESS_THRESHOLD: f64 = 0.75;

/// A ranked candidate
#[derive(Debug, Clone, PartialEq)]
pub struct Match {
    /// The candidate term
    pub term: String,
    /// Similarity in `[0, 1]`
    pub score: f64,
}

impl Match {
    /// Whether the score is below [`MIN_THRESHOLD`]
    #[inline]
    #[must_use]
    pub fn is_negligible(&self) -> bool {
        self.score < MIN_THRESHOLD
    }

    /// Whether two matches score within [`ADJACENT_THRESHOLD`] of each other
    #[inline]
    #[must_use]
    pub fn is_equivalent(&self, other: &Self) -> bool {
        (self.score - other.score).abs() < ADJACENT_THRESHOLD
    }
}

/// Rank every candidate in `pool` against `term`, best first.
///
/// The sort is stable: candidates with identical scores keep their pool order.
#[must_use]
pub fn rank<I, S>(term: &str, pool: I) -> Vec<Match>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut ranked: Vec<Match> = pool
        .into_iter()
        .map(|candidate| {
            let candidate = candidate.into();
            Match {
                score: strcmp(term, &candidate),
                term: candidate,
            }
        })
        .collect();

    ranked.sort_by(|a, b| b.score.total_cmp(&a.score));
    ranked
}

/// Similarity of two strings in `[0, 1]`
///
/// `1 - distance(a, b) / max(len(a), len(b))` with the unrestricted
/// Damerau-Levenshtein distance, lengths counted in chars. Two empty strings
/// are identical.
#[must_use]
pub fn strcmp(a: &str, b: &str) -> f64 {
    let max_len = a.chars().count().max(b.chars().count());
    if max_len == 0 {
        return 1.0;
    }
    #[allow(clippy::cast_precision_loss)]
    let normalized = damerau_levenshtein(a, b) as f64 / max_len as f64;
    1.0 - normalized
}
