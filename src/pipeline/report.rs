//! Ranked results over the persisted cache

use std::collections::BTreeMap;

use super::cache::{CacheData, CacheKind};
use crate::types::{Availability, Rating, SearchEvaluation, SocialPlatform, social_available_count};

/// An available domain with its enrichment results
#[derive(Debug, Clone, PartialEq)]
pub struct RankedName {
    pub word: String,
    pub rating: Rating,
    pub npm: Availability,
    /// Platforms where the handle is free
    pub social_available: usize,
    pub search: Option<SearchEvaluation>,
}

fn mark(available: bool) -> &'static str {
    if available { "✓" } else { "✗" }
}

impl RankedName {
    /// One report line, `index` starting at 1
    pub fn row(&self, index: usize) -> String {
        let search = self
            .search
            .map(|s| format!(" | Search: {} ({:.0}%)", mark(s.is_available), s.confidence))
            .unwrap_or_default();
        format!(
            "{:2}. {:15} | Rating: {:5.1} | NPM: {} | Social: {}/{}{}",
            index,
            self.word,
            self.rating,
            mark(self.npm.is_available()),
            self.social_available,
            SocialPlatform::ALL.len(),
            search
        )
    }
}

/// Available, successfully rated domains ordered best first
#[derive(Debug, Clone)]
pub struct ResultsReport {
    pub ranked: Vec<RankedName>,
    pub cache_sizes: BTreeMap<CacheKind, usize>,
}

impl ResultsReport {
    pub fn from_cache(data: &CacheData) -> Self {
        let mut ranked: Vec<RankedName> = data
            .available_domains()
            .filter_map(|word| {
                let rating = *data.ratings_cache.get(word)?;
                (rating > 0.0).then(|| RankedName {
                    word: word.to_string(),
                    rating,
                    npm: data
                        .npm_cache
                        .get(word)
                        .copied()
                        .unwrap_or(Availability::Unknown),
                    social_available: data
                        .social_cache
                        .get(word)
                        .map_or(0, social_available_count),
                    search: data.search_evaluation_cache.get(word).copied(),
                })
            })
            .collect();

        ranked.sort_by(|a, b| {
            b.rating
                .total_cmp(&a.rating)
                .then_with(|| a.word.cmp(&b.word))
        });

        let cache_sizes = CacheKind::ALL
            .iter()
            .map(|&kind| (kind, data.len_of(kind)))
            .collect();

        Self {
            ranked,
            cache_sizes,
        }
    }

    pub fn total(&self) -> usize {
        self.ranked.len()
    }

    pub fn top(&self, limit: usize) -> &[RankedName] {
        &self.ranked[..limit.min(self.ranked.len())]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> CacheData {
        let mut data = CacheData::default();
        for (word, availability) in [
            ("zynk", Availability::Available),
            ("qorp", Availability::Available),
            ("vex", Availability::Available),
            ("wolke", Availability::Unavailable),
            ("blip", Availability::Unknown),
        ] {
            data.whois_cache.insert(word.to_string(), availability);
        }
        for (word, rating) in [("zynk", 72.0), ("qorp", 88.5), ("vex", -1.0), ("wolke", 95.0)] {
            data.ratings_cache.insert(word.to_string(), rating);
        }
        data.npm_cache
            .insert("zynk".to_string(), Availability::Available);
        data.social_cache.insert(
            "zynk".to_string(),
            SocialPlatform::ALL
                .iter()
                .map(|p| (p.name().to_string(), Availability::Available))
                .collect(),
        );
        data.search_evaluation_cache.insert(
            "zynk".to_string(),
            SearchEvaluation {
                is_available: true,
                confidence: 80.0,
            },
        );
        data
    }

    #[test]
    fn test_only_available_and_rated() {
        let report = ResultsReport::from_cache(&sample());
        let words: Vec<&str> = report.ranked.iter().map(|r| r.word.as_str()).collect();
        assert_eq!(words, vec!["qorp", "zynk"]);
        assert_eq!(report.total(), 2);
        assert_eq!(report.top(1).len(), 1);
        assert_eq!(report.top(50).len(), 2);
    }

    #[test]
    fn test_row_format() {
        let report = ResultsReport::from_cache(&sample());
        assert_eq!(
            report.ranked[1].row(2),
            " 2. zynk            | Rating:  72.0 | NPM: ✓ | Social: 4/4 | Search: ✓ (80%)"
        );
        assert_eq!(
            report.ranked[0].row(1),
            " 1. qorp            | Rating:  88.5 | NPM: ✗ | Social: 0/4"
        );
    }

    #[test]
    fn test_cache_sizes() {
        let report = ResultsReport::from_cache(&sample());
        assert_eq!(report.cache_sizes[&CacheKind::Whois], 5);
        assert_eq!(report.cache_sizes[&CacheKind::Trademark], 0);
    }
}
