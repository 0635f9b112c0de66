use chrono::NaiveDate;

/// This is the standard way of converting a date to a string in habitkeeper.
/// Lexicographic order of the result matches chronological order.
pub fn date_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::date_key;

    #[test]
    fn test_date_key_is_iso_and_zero_padded() {
        let date = NaiveDate::from_ymd_opt(2025, 8, 5).unwrap();
        assert_eq!(date_key(date), "2025-08-05");
    }
}
