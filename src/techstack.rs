use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};

use crate::models::{TechCategorySummary, TechStackSummary, Website};

/// Maps a raw category key to its dashboard display name. Unrecognized
/// keys fall back to capitalizing the first letter.
pub fn category_display_name(raw: &str) -> String {
    match raw {
        "frontend" => "Frontend".to_string(),
        "backend" => "Backend".to_string(),
        "database" => "Database".to_string(),
        "deployment" => "Deployment".to_string(),
        "aiTools" => "AI/ML Tools".to_string(),
        "other" => "Other".to_string(),
        _ => {
            let mut chars = raw.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        }
    }
}

/// Accumulates per-category technology sets across all websites, in the
/// order categories are first encountered. Returns the occurrence count of
/// every non-empty string technology (pre-dedup) alongside the buckets.
fn collect_buckets(websites: &[Website]) -> (usize, Vec<(String, BTreeSet<String>)>) {
    let mut total_occurrences = 0;
    let mut buckets: Vec<(String, BTreeSet<String>)> = Vec::new();

    for website in websites {
        for (category, value) in &website.tech_stack.categories {
            // non-array category values are silently skipped
            let Value::Array(items) = value else {
                continue;
            };

            let index = match buckets.iter().position(|(name, _)| name == category) {
                Some(index) => index,
                None => {
                    buckets.push((category.clone(), BTreeSet::new()));
                    buckets.len() - 1
                }
            };

            for item in items {
                // non-string technologies are silently skipped
                let Value::String(tech) = item else {
                    continue;
                };
                if tech.is_empty() {
                    continue;
                }
                total_occurrences += 1;
                buckets[index].1.insert(tech.clone());
            }
        }
    }

    (total_occurrences, buckets)
}

fn summarize(category: &str, technologies: &BTreeSet<String>) -> TechCategorySummary {
    TechCategorySummary {
        name: category_display_name(category),
        count: technologies.len(),
        // BTreeSet iteration is already lexicographic
        technologies: technologies.iter().cloned().collect(),
    }
}

/// Derives the full summary: `total_technologies` counts every occurrence
/// across websites before deduplication, while each category's `count` is
/// the size of its deduplicated set. The asymmetry is intentional.
pub fn calculate_tech_stack_summary(websites: &[Website]) -> TechStackSummary {
    let (total_technologies, buckets) = collect_buckets(websites);

    let categories: BTreeMap<String, TechCategorySummary> = buckets
        .iter()
        .map(|(category, technologies)| (category.clone(), summarize(category, technologies)))
        .collect();

    TechStackSummary {
        total_websites: websites.len(),
        total_technologies,
        categories,
    }
}

/// Category summaries sorted non-increasing by distinct-technology count.
/// Ties keep the order categories were first encountered (stable sort).
pub fn calculate_tech_categories(websites: &[Website]) -> Vec<TechCategorySummary> {
    let (_, buckets) = collect_buckets(websites);

    let mut categories: Vec<TechCategorySummary> = buckets
        .iter()
        .map(|(category, technologies)| summarize(category, technologies))
        .collect();

    categories.sort_by(|a, b| b.count.cmp(&a.count));
    categories
}
