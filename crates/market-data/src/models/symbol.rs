/// Canonicalize a ticker symbol.
///
/// Trims surrounding whitespace and uppercases the result. Returns `None`
/// for symbols that are empty after trimming.
///
/// ```
/// use stockwidget_market_data::normalize_symbol;
///
/// assert_eq!(normalize_symbol(" aapl "), Some("AAPL".to_string()));
/// assert_eq!(normalize_symbol("   "), None);
/// ```
pub fn normalize_symbol(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(trimmed.to_uppercase())
}
