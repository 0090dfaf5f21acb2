use serde::Serialize;
use utoipa::ToSchema;

use super::model::Query;

/// Section selector value meaning "no section restriction".
pub const ALL_SECTIONS: &str = "all";

/// One entry of the section-tab summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SectionCount {
    pub label: String,
    pub count: usize,
}

/// Stable filter over the catalog: section equality first, then a
/// case-insensitive substring search over the query's visible fields.
/// Original relative order is preserved.
pub fn filter<'a>(queries: &'a [Query], section_selector: &str, search_term: &str) -> Vec<&'a Query> {
    let term = search_term.to_lowercase();
    queries
        .iter()
        .filter(|query| section_selector == ALL_SECTIONS || query.section == section_selector)
        .filter(|query| term.is_empty() || matches_term(query, &term))
        .collect()
}

fn matches_term(query: &Query, term: &str) -> bool {
    query.title.to_lowercase().contains(term)
        || query.sql.to_lowercase().contains(term)
        || query.description.to_lowercase().contains(term)
        || query.number.contains(term)
        || query.section.to_lowercase().contains(term)
}

/// Section-tab counts computed from the unfiltered catalog: "all" first with
/// the total, then each distinct section in first-seen order.
pub fn section_counts(queries: &[Query]) -> Vec<SectionCount> {
    let mut counts = vec![SectionCount {
        label: ALL_SECTIONS.to_string(),
        count: queries.len(),
    }];
    for query in queries {
        match counts[1..].iter_mut().find(|entry| entry.label == query.section) {
            Some(entry) => entry.count += 1,
            None => counts.push(SectionCount {
                label: query.section.clone(),
                count: 1,
            }),
        }
    }
    counts
}
