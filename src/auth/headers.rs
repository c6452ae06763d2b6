//! Extra authentication headers for proxy-fronted clusters.

/// Parses `Name: value, Name2: value2` into ordered header pairs.
///
/// Each entry is split on its first `:`, so values like `Bearer a:b` stay
/// intact. Entries without a colon or with an empty name are skipped.
pub fn parse_auth_headers(input: &str) -> Vec<(String, String)> {
    input
        .split(',')
        .filter_map(|entry| {
            let (name, value) = entry.split_once(':')?;
            let name = name.trim();
            if name.is_empty() {
                return None;
            }
            Some((name.to_string(), value.trim().to_string()))
        })
        .collect()
}
