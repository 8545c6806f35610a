/// Separator users type or paste between course codes.
pub const CODE_SEPARATOR: char = ',';

/// Returns true when `text` would be split into several entries.
pub fn has_separator(text: &str) -> bool {
    text.contains(CODE_SEPARATOR)
}

/// Splits comma-delimited text into trimmed, non-empty course codes,
/// preserving the order in which they appear.
pub fn split_codes(text: &str) -> Vec<String> {
    text.split(CODE_SEPARATOR)
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(str::to_string)
        .collect()
}

/// Splits every entry on its own, keeping entry order.
pub fn split_each<I, S>(entries: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    entries
        .into_iter()
        .flat_map(|entry| split_codes(entry.as_ref()))
        .collect()
}

/// Normalizes a list of raw field values into the codes handed to the selector.
pub fn normalize_codes<I, S>(values: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    values
        .into_iter()
        .map(|v| v.as_ref().trim().to_string())
        .filter(|v| !v.is_empty())
        .collect()
}
