//! String similarity scorers used by the matcher.
//!
//! Scores are on a 0..=100 scale where 100 means identical after token
//! sorting. Both built-in scorers are order-insensitive on whitespace
//! tokens, so "liverpool vs man utd" and "man utd vs liverpool" score 100.

use serde::{Deserialize, Serialize};

/// Scores how alike two already-normalized names are.
pub trait Similarity: Send + Sync {
    /// Short identifier used in logs.
    fn name(&self) -> &'static str;

    /// Similarity in `0.0..=100.0`.
    fn score(&self, a: &str, b: &str) -> f64;
}

/// Token-sort ratio: tokens are sorted, rejoined, and compared with the
/// indel ratio `200 * LCS / (len_a + len_b)` over characters.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokenSortRatio;

impl Similarity for TokenSortRatio {
    fn name(&self) -> &'static str {
        "token_sort_ratio"
    }

    fn score(&self, a: &str, b: &str) -> f64 {
        let a: Vec<char> = sort_tokens(a).chars().collect();
        let b: Vec<char> = sort_tokens(b).chars().collect();

        let total = a.len() + b.len();
        if total == 0 {
            return 100.0;
        }

        200.0 * lcs_len(&a, &b) as f64 / total as f64
    }
}

/// Token-sort followed by Jaro-Winkler, scaled to 0..=100.
///
/// More forgiving of abbreviations sharing a prefix than [`TokenSortRatio`].
#[derive(Debug, Clone, Copy, Default)]
pub struct TokenSortJaroWinkler;

impl Similarity for TokenSortJaroWinkler {
    fn name(&self) -> &'static str {
        "token_sort_jaro_winkler"
    }

    fn score(&self, a: &str, b: &str) -> f64 {
        let a = sort_tokens(a);
        let b = sort_tokens(b);
        if a.is_empty() && b.is_empty() {
            return 100.0;
        }
        strsim::jaro_winkler(&a, &b) * 100.0
    }
}

/// Scorer selection as written in configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScorerKind {
    #[default]
    TokenSortRatio,
    TokenSortJaroWinkler,
}

impl ScorerKind {
    /// Instantiate the scorer.
    pub fn build(self) -> Box<dyn Similarity> {
        match self {
            Self::TokenSortRatio => Box::new(TokenSortRatio),
            Self::TokenSortJaroWinkler => Box::new(TokenSortJaroWinkler),
        }
    }
}

fn sort_tokens(text: &str) -> String {
    let mut tokens: Vec<&str> = text.split_whitespace().collect();
    tokens.sort_unstable();
    tokens.join(" ")
}

/// Longest common subsequence length, two-row dynamic programming.
fn lcs_len(a: &[char], b: &[char]) -> usize {
    if a.is_empty() || b.is_empty() {
        return 0;
    }

    let mut prev = vec![0usize; b.len() + 1];
    let mut curr = vec![0usize; b.len() + 1];

    for &ca in a {
        for (j, &cb) in b.iter().enumerate() {
            curr[j + 1] = if ca == cb {
                prev[j] + 1
            } else {
                prev[j + 1].max(curr[j])
            };
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}
