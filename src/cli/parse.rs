use chrono::NaiveDate;

/// Parse a similarity value in 0.0-1.0
pub fn parse_similarity(s: &str) -> std::result::Result<f64, String> {
    let value: f64 = s
        .parse()
        .map_err(|_| format!("'{}' is not a number", s))?;
    if !(0.0..=1.0).contains(&value) {
        return Err(format!("{} is outside 0.0-1.0", value));
    }
    Ok(value)
}

/// Parse a calendar date in YYYY-MM-DD form
pub fn parse_date(s: &str) -> std::result::Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|e| format!("invalid date '{}': {}", s, e))
}
