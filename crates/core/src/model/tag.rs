use std::collections::HashMap;

/// Tags seen this many times or fewer are not offered as subjects.
pub const MIN_SUBJECT_OCCURRENCES: u32 = 10;

/// How often a cleaned tag appears across the question store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagCount {
    pub tag: String,
    pub count: u32,
}

/// Normalize one comma-separated piece of a raw tag field.
///
/// Tag fields are stored as stringified lists (`['Politics', 'Joe Biden']`),
/// so a piece may carry a leading or trailing bracket and quotes.
#[must_use]
pub fn clean_tag(raw: &str) -> String {
    let trimmed = raw.trim();
    let trimmed = trimmed.strip_prefix(['[', ']']).unwrap_or(trimmed);
    let trimmed = trimmed.strip_suffix(['[', ']']).unwrap_or(trimmed);
    trimmed
        .chars()
        .filter(|c| *c != '\'' && *c != '"')
        .collect::<String>()
        .trim()
        .to_string()
}

/// Count cleaned tags across raw tag fields.
///
/// Keeps tags with more than `min_occurrences` hits, most frequent first.
#[must_use]
pub fn count_tags<'a>(
    fields: impl IntoIterator<Item = &'a str>,
    min_occurrences: u32,
) -> Vec<TagCount> {
    let mut counts: HashMap<String, u32> = HashMap::new();
    for field in fields {
        for piece in field.split(',') {
            let tag = clean_tag(piece);
            if tag.is_empty() {
                continue;
            }
            let slot = counts.entry(tag).or_insert(0);
            *slot = slot.saturating_add(1);
        }
    }

    let mut out: Vec<TagCount> = counts
        .into_iter()
        .filter(|(_, count)| *count > min_occurrences)
        .map(|(tag, count)| TagCount { tag, count })
        .collect();
    out.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.tag.cmp(&b.tag)));
    out
}
