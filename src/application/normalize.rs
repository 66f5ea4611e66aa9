//! Canonicalization of free-text team, league and outcome names.
//!
//! Normalization lowercases, turns punctuation into word breaks, collapses
//! whitespace and then rewrites known aliases ("man utd" -> "manchester
//! united") from an externally supplied table. Signs and decimal points that
//! belong to a number survive so that handicap labels like `+1.5` stay
//! distinguishable from `-1.5`.
//!
//! The function is pure and idempotent: `normalize(normalize(x)) ==
//! normalize(x)`.

use std::collections::{BTreeMap, BTreeSet};

use tracing::debug;

use crate::error::ConfigError;

/// Alias phrase -> canonical phrase, both stored as cleaned token lists.
#[derive(Debug, Clone, Default)]
pub struct AliasTable {
    aliases: Vec<(Vec<String>, Vec<String>)>,
    canonicals: Vec<Vec<String>>,
}

impl AliasTable {
    /// Create an empty table; every name passes through unchanged.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from `(alias, canonical)` pairs.
    ///
    /// Both sides are cleaned the same way input text is. Pairs that clean to
    /// the same phrase are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] when either side is blank after
    /// cleaning, an alias is mapped to two different canonical phrases, or a
    /// canonical phrase is itself an alias (so it would not survive
    /// normalization unchanged).
    pub fn from_pairs<I, K, V>(pairs: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut by_alias: BTreeMap<Vec<String>, Vec<String>> = BTreeMap::new();

        for (alias, canonical) in pairs {
            let alias_tokens = clean(alias.as_ref());
            let canonical_tokens = clean(canonical.as_ref());

            if alias_tokens.is_empty() || canonical_tokens.is_empty() {
                return Err(ConfigError::invalid(
                    "aliases",
                    format!(
                        "alias {:?} -> {:?} is blank after cleaning",
                        alias.as_ref(),
                        canonical.as_ref()
                    ),
                ));
            }
            if alias_tokens == canonical_tokens {
                continue;
            }
            if let Some(existing) = by_alias.get(&alias_tokens) {
                if existing != &canonical_tokens {
                    return Err(ConfigError::invalid(
                        "aliases",
                        format!(
                            "alias {:?} maps to both {:?} and {:?}",
                            alias_tokens.join(" "),
                            existing.join(" "),
                            canonical_tokens.join(" ")
                        ),
                    ));
                }
            }
            by_alias.insert(alias_tokens, canonical_tokens);
        }

        if let Some((alias, canonical)) = by_alias
            .iter()
            .find(|(_, canonical)| by_alias.contains_key(*canonical))
        {
            return Err(ConfigError::invalid(
                "aliases",
                format!(
                    "canonical {:?} of alias {:?} is itself an alias",
                    canonical.join(" "),
                    alias.join(" ")
                ),
            ));
        }

        let mut canonicals: Vec<Vec<String>> = by_alias.values().cloned().collect();
        canonicals.sort();
        canonicals.dedup();
        canonicals.sort_by(|a, b| b.len().cmp(&a.len()));

        let mut aliases: Vec<(Vec<String>, Vec<String>)> = by_alias.into_iter().collect();
        aliases.sort_by(|a, b| b.0.len().cmp(&a.0.len()));

        Ok(Self {
            aliases,
            canonicals,
        })
    }

    /// Number of alias entries.
    pub fn len(&self) -> usize {
        self.aliases.len()
    }

    /// Check if the table has no aliases.
    pub fn is_empty(&self) -> bool {
        self.aliases.is_empty()
    }

    /// One left-to-right rewrite pass. At each position the longest phrase
    /// wins; a canonical phrase beats an alias of the same length.
    fn rewrite(&self, tokens: &[String]) -> Vec<String> {
        let mut out = Vec::with_capacity(tokens.len());
        let mut i = 0;

        while i < tokens.len() {
            let rest = &tokens[i..];
            let canonical_len = self
                .canonicals
                .iter()
                .find(|phrase| rest.starts_with(phrase))
                .map_or(0, Vec::len);
            let alias = self.aliases.iter().find(|(phrase, _)| rest.starts_with(phrase));

            match alias {
                Some((phrase, replacement)) if phrase.len() > canonical_len => {
                    out.extend(replacement.iter().cloned());
                    i += phrase.len();
                }
                _ if canonical_len > 0 => {
                    out.extend_from_slice(&rest[..canonical_len]);
                    i += canonical_len;
                }
                _ => {
                    out.push(tokens[i].clone());
                    i += 1;
                }
            }
        }

        out
    }
}

/// Canonicalizes names using an [`AliasTable`].
#[derive(Debug, Clone, Default)]
pub struct Normalizer {
    aliases: AliasTable,
}

impl Normalizer {
    /// Create a normalizer with the given alias table.
    pub fn new(aliases: AliasTable) -> Self {
        Self { aliases }
    }

    /// The alias table in use.
    pub fn aliases(&self) -> &AliasTable {
        &self.aliases
    }

    /// Canonical form of `text`.
    ///
    /// Rewrite passes repeat until the token list stops changing. A rewrite
    /// can expose a new alias across a phrase boundary ("real madrid cf cf"
    /// loses one "cf" per pass), so there is no fixed pass count.
    pub fn normalize(&self, text: &str) -> String {
        let mut tokens = clean(text);
        if self.aliases.is_empty() {
            return tokens.join(" ");
        }

        let mut seen = BTreeSet::new();
        loop {
            let next = self.aliases.rewrite(&tokens);
            if next == tokens {
                return tokens.join(" ");
            }
            seen.insert(tokens);
            if seen.contains(&next) {
                debug!(input = text, "alias rewriting cycles");
                return self.cycle_minimum(next).join(" ");
            }
            tokens = next;
        }
    }

    /// Smallest state on the rewrite cycle through `start`. Every member of
    /// the cycle maps to it, so the result is itself a stable output.
    fn cycle_minimum(&self, start: Vec<String>) -> Vec<String> {
        let mut smallest = start.clone();
        let mut current = self.aliases.rewrite(&start);
        while current != start {
            if current < smallest {
                smallest = current.clone();
            }
            current = self.aliases.rewrite(&current);
        }
        smallest
    }
}

/// Lowercase and split into tokens, treating punctuation as a separator.
///
/// A `+`/`-` directly before a digit at the start of a word, and a `.`/`,`
/// between two digits, are kept as part of the number.
fn clean(text: &str) -> Vec<String> {
    let chars: Vec<char> = text.chars().flat_map(char::to_lowercase).collect();
    let mut buf = String::with_capacity(chars.len());

    for (i, &c) in chars.iter().enumerate() {
        let prev = i.checked_sub(1).map(|p| chars[p]);
        let next = chars.get(i + 1).copied();
        let next_is_digit = next.is_some_and(|n| n.is_ascii_digit());

        let keep = if c.is_alphanumeric() {
            Some(c)
        } else if (c == '+' || c == '-') && next_is_digit && prev.map_or(true, char::is_whitespace)
        {
            Some(c)
        } else if (c == '.' || c == ',') && next_is_digit && prev.is_some_and(|p| p.is_ascii_digit())
        {
            Some('.')
        } else {
            None
        };

        buf.push(keep.unwrap_or(' '));
    }

    buf.split_whitespace().map(str::to_string).collect()
}
