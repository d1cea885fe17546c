//! Locale fallback for localized tool and parameter strings.
//!
//! Each locale in a [`LocaleChain`] is queried separately and merged in
//! order, so a string from an earlier locale is never replaced by a later one.

use crate::error::Result;
use std::collections::HashMap;
use std::hash::Hash;

// ---------------------------------------------------------------------------
// LocaleChain
// ---------------------------------------------------------------------------

/// Ordered locale preferences. The first tier that defines a key wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocaleChain {
    tiers: Vec<String>,
}

impl LocaleChain {
    /// Primary locale plus an optional fallback. A fallback that is absent,
    /// empty, or equal to the primary adds no tier.
    pub fn new(primary: impl Into<String>, fallback: Option<&str>) -> Self {
        let chain = Self {
            tiers: vec![primary.into()],
        };
        match fallback {
            Some(f) => chain.with_tier(f),
            None => chain,
        }
    }

    pub fn with_tier(mut self, locale: &str) -> Self {
        if !locale.is_empty() && !self.tiers.iter().any(|t| t == locale) {
            self.tiers.push(locale.to_string());
        }
        self
    }

    pub fn primary(&self) -> &str {
        &self.tiers[0]
    }

    pub fn tiers(&self) -> &[String] {
        &self.tiers
    }
}

// ---------------------------------------------------------------------------
// Resolution
// ---------------------------------------------------------------------------

/// Merge per-locale query results into one lookup map.
///
/// `query` is run once per tier, in chain order. Rows from the first tier are
/// inserted unconditionally; rows from later tiers only fill keys that are
/// still missing.
pub fn resolve<K, R, Q, F>(
    chain: &LocaleChain,
    mut query: Q,
    key_of: F,
) -> Result<HashMap<K, R>>
where
    K: Eq + Hash,
    Q: FnMut(&str) -> Result<Vec<R>>,
    F: Fn(&R) -> K,
{
    let mut resolved: HashMap<K, R> = HashMap::new();

    for (tier, locale) in chain.tiers().iter().enumerate() {
        let rows = query(locale)?;
        let before = resolved.len();
        for row in rows {
            let key = key_of(&row);
            if tier == 0 {
                resolved.insert(key, row);
            } else {
                resolved.entry(key).or_insert(row);
            }
        }
        if tier > 0 && resolved.len() == before {
            tracing::debug!(locale = %locale, "fallback locale filled no missing entries");
        }
    }

    Ok(resolved)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Row {
        id: i64,
        locale: &'static str,
        name: &'static str,
    }

    fn rows() -> Vec<Row> {
        vec![
            Row {
                id: 1,
                locale: "fr",
                name: "Ouvrir",
            },
            Row {
                id: 1,
                locale: "en",
                name: "Open",
            },
            Row {
                id: 2,
                locale: "en",
                name: "Close",
            },
            Row {
                id: 3,
                locale: "de",
                name: "Speichern",
            },
        ]
    }

    fn run(chain: &LocaleChain) -> (HashMap<i64, Row>, Vec<String>) {
        let all = rows();
        let mut queried = Vec::new();
        let resolved = resolve(
            chain,
            |locale| {
                queried.push(locale.to_string());
                Ok(all.iter().filter(|r| r.locale == locale).cloned().collect())
            },
            |r: &Row| r.id,
        )
        .unwrap();
        (resolved, queried)
    }

    #[test]
    fn chain_skips_missing_empty_and_duplicate_fallback() {
        assert_eq!(LocaleChain::new("en", None).tiers(), ["en"]);
        assert_eq!(LocaleChain::new("en", Some("")).tiers(), ["en"]);
        assert_eq!(LocaleChain::new("en", Some("en")).tiers(), ["en"]);
        assert_eq!(LocaleChain::new("fr", Some("en")).tiers(), ["fr", "en"]);
    }

    #[test]
    fn chain_accepts_extra_tiers_in_order() {
        let chain = LocaleChain::new("fr-CA", Some("fr"))
            .with_tier("en")
            .with_tier("fr");
        assert_eq!(chain.tiers(), ["fr-CA", "fr", "en"]);
        assert_eq!(chain.primary(), "fr-CA");
    }

    #[test]
    fn primary_beats_fallback() {
        let (resolved, _) = run(&LocaleChain::new("fr", Some("en")));
        assert_eq!(resolved[&1].name, "Ouvrir");
    }

    #[test]
    fn fallback_fills_missing_keys() {
        let (resolved, _) = run(&LocaleChain::new("fr", Some("en")));
        assert_eq!(resolved[&2].name, "Close");
        assert!(!resolved.contains_key(&3));
    }

    #[test]
    fn missing_in_both_locales_yields_no_entry() {
        let (resolved, _) = run(&LocaleChain::new("de", Some("en")));
        assert_eq!(resolved[&1].name, "Open");
        assert_eq!(resolved[&3].name, "Speichern");
        let (resolved, _) = run(&LocaleChain::new("ja", None));
        assert!(resolved.is_empty());
    }

    #[test]
    fn same_fallback_queries_once() {
        let (_, queried) = run(&LocaleChain::new("en", Some("en")));
        assert_eq!(queried, vec!["en"]);
    }

    #[test]
    fn last_row_wins_within_a_tier() {
        let chain = LocaleChain::new("en", None);
        let resolved = resolve(
            &chain,
            |_| Ok(vec![(1, "first"), (1, "second")]),
            |r: &(i64, &str)| r.0,
        )
        .unwrap();
        assert_eq!(resolved[&1].1, "second");
    }
}
