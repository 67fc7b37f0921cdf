//! Lenient publication-date parsing.
//!
//! Providers disagree on date formats: ISO dates, RFC 3339 timestamps (arXiv),
//! "2023 Mar 15" / "2023 Mar-Apr" / "2023" (PubMed esummary). Anything that
//! carries at least a year is accepted; missing month/day default to 1.

use chrono::NaiveDate;

const MONTHS: [&str; 12] = [
    "jan", "feb", "mar", "apr", "may", "jun", "jul", "aug", "sep", "oct", "nov", "dec",
];

pub fn parse_loose_date(raw: &str) -> Option<NaiveDate> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    if let Some(iso) = s.get(..10) {
        for fmt in ["%Y-%m-%d", "%Y/%m/%d"] {
            if let Ok(d) = NaiveDate::parse_from_str(iso, fmt) {
                return Some(d);
            }
        }
    }

    // "2023-05" and "2023/05/01"
    let dashed: Vec<&str> = s.split(['-', '/']).collect();
    if dashed.len() >= 2 && dashed.iter().all(|p| p.chars().all(|c| c.is_ascii_digit())) {
        let year = dashed[0].parse().ok()?;
        let month = dashed[1].parse().ok()?;
        let day = dashed.get(2).and_then(|d| d.parse().ok()).unwrap_or(1);
        return NaiveDate::from_ymd_opt(year, month, day);
    }

    let mut parts = s.split_whitespace();
    let year: i32 = parts.next()?.parse().ok()?;
    let month = parts.next().and_then(month_from_name).unwrap_or(1);
    let day = parts
        .next()
        .and_then(|d| {
            let digits: String = d.chars().take_while(|c| c.is_ascii_digit()).collect();
            digits.parse().ok()
        })
        .unwrap_or(1);

    NaiveDate::from_ymd_opt(year, month, day).or_else(|| NaiveDate::from_ymd_opt(year, month, 1))
}

fn month_from_name(token: &str) -> Option<u32> {
    let prefix: String = token.chars().take(3).collect::<String>().to_lowercase();
    MONTHS.iter().position(|m| *m == prefix).map(|i| i as u32 + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(y, m, d)
    }

    #[test]
    fn test_iso_and_timestamp() {
        assert_eq!(parse_loose_date("2024-06-01"), ymd(2024, 6, 1));
        assert_eq!(parse_loose_date("2024-01-05T18:00:00Z"), ymd(2024, 1, 5));
        assert_eq!(parse_loose_date("2023-05"), ymd(2023, 5, 1));
        assert_eq!(parse_loose_date("2023/03/15 00:00"), ymd(2023, 3, 15));
    }

    #[test]
    fn test_pubmed_styles() {
        assert_eq!(parse_loose_date("2023 Mar 15"), ymd(2023, 3, 15));
        assert_eq!(parse_loose_date("2023 Mar-Apr"), ymd(2023, 3, 1));
        assert_eq!(parse_loose_date("2022"), ymd(2022, 1, 1));
        assert_eq!(parse_loose_date("2021 Winter"), ymd(2021, 1, 1));
    }

    #[test]
    fn test_garbage() {
        assert_eq!(parse_loose_date(""), None);
        assert_eq!(parse_loose_date("unknown"), None);
    }
}
