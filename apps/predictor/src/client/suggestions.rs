/// Returns cached job titles containing `typed` (case-insensitive), titles
/// that start with it first. Server order is kept within each group.
pub fn suggest<'a>(titles: &'a [String], typed: &str, limit: usize) -> Vec<&'a str> {
    let needle = typed.trim().to_lowercase();
    if needle.is_empty() || limit == 0 {
        return vec![];
    }

    let mut prefixed = Vec::new();
    let mut contained = Vec::new();
    for title in titles {
        let lower = title.to_lowercase();
        if lower.starts_with(&needle) {
            prefixed.push(title.as_str());
        } else if lower.contains(&needle) {
            contained.push(title.as_str());
        }
    }

    prefixed.into_iter().chain(contained).take(limit).collect()
}
