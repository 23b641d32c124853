use std::collections::HashSet;

use crate::types::TopTag;

/// Tags kept per release.
pub const MAX_TAGS: usize = 8;

/// Normalized weight a tag needs to be kept.
pub const MIN_TAG_WEIGHT: f64 = 50.0;

/// A tag with its weight relative to the artist's heaviest tag (100).
#[derive(Debug, Clone, PartialEq)]
pub struct WeightedTag {
    pub name: String,
    pub weight: f64,
}

/// Order of magnitude of the listener count. No listeners means zero.
pub fn popularity_from_listeners(listeners: u64) -> f64 {
    if listeners == 0 {
        return 0.0;
    }
    (listeners as f64).log10().trunc()
}

/// Drops tags outside the whitelist and scales the rest so the heaviest
/// one weighs 100. Without a whitelist every tag is allowed.
pub fn normalize_tags(tags: Vec<TopTag>, whitelist: Option<&HashSet<String>>) -> Vec<WeightedTag> {
    let allowed: Vec<TopTag> = tags
        .into_iter()
        .filter(|tag| !tag.name.trim().is_empty() && tag.count > 0.0)
        .filter(|tag| whitelist.is_none_or(|list| list.contains(&tag.name.trim().to_lowercase())))
        .collect();

    let max_weight = allowed.iter().map(|tag| tag.count).fold(0.0, f64::max);
    if max_weight <= 0.0 {
        return Vec::new();
    }

    let multiplier = 100.0 / max_weight;
    allowed
        .into_iter()
        .map(|tag| WeightedTag {
            name: tag.name.trim().to_string(),
            weight: tag.count * multiplier,
        })
        .collect()
}

/// Combines the tags of all credited artists: heaviest first, one entry per
/// name, at most [`MAX_TAGS`], and only those weighing at least
/// [`MIN_TAG_WEIGHT`].
///
/// The weight filter runs after truncation, so fewer than eight tags may
/// remain even when lighter qualifying tags exist further down.
pub fn merge_tags(per_artist: Vec<Vec<WeightedTag>>) -> Vec<String> {
    let mut tags: Vec<WeightedTag> = per_artist.into_iter().flatten().collect();
    tags.sort_by(|a, b| b.weight.total_cmp(&a.weight));

    let mut seen = HashSet::new();
    tags.into_iter()
        .filter(|tag| seen.insert(tag.name.clone()))
        .take(MAX_TAGS)
        .filter(|tag| tag.weight >= MIN_TAG_WEIGHT)
        .map(|tag| tag.name)
        .collect()
}

/// One allowed tag per line, compared case-insensitively.
pub fn parse_whitelist(content: &str) -> HashSet<String> {
    content
        .lines()
        .map(|line| line.trim().to_lowercase())
        .filter(|line| !line.is_empty())
        .collect()
}
