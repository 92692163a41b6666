/// Split a free-text tag list into normalised tag names.
///
/// Tags are comma-separated, trimmed, lowercased and de-duplicated in
/// first-seen order. Empty entries are dropped.
pub fn parse_tags(raw: &str) -> Vec<String> {
    let mut tags: Vec<String> = Vec::new();
    for tag in raw.split(',').map(normalize_tag) {
        if !tag.is_empty() && !tags.contains(&tag) {
            tags.push(tag);
        }
    }
    tags
}

pub fn normalize_tag(tag: &str) -> String {
    tag.trim().to_lowercase()
}
