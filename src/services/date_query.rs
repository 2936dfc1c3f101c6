//! Loose date text -> `LIKE` patterns against a `YYYY-MM-DD` column.
//!
//! Registry dates are typed from decades of paper books, so parsing favours
//! recall: every plausible reading contributes a pattern and the patterns are
//! OR'd together. Nothing here fails; unreadable text degrades to a literal
//! substring pattern.

use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;

use crate::services::query_normalizer::like_pattern;

static WRITTEN_DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([a-z]+)\s+(\d{1,2})(?:,?\s+(\d{4}))?").expect("written date pattern is valid")
});

/// Numeric layouts tried in order. Ambiguous input may parse under several.
const NUMERIC_FORMATS: &[NumericFormat] = &[
    NumericFormat::Full("%Y-%m-%d"),
    NumericFormat::MonthDay,
    NumericFormat::Full("%d-%m-%Y"),
    NumericFormat::Full("%m/%d/%Y"),
    NumericFormat::Full("%d/%m/%Y"),
];

#[derive(Debug, Clone, Copy)]
enum NumericFormat {
    Full(&'static str),
    /// `MM-DD` with no year.
    MonthDay,
}

// Any leap year, so that 02-29 is accepted as a month/day.
const MONTH_DAY_PROBE_YEAR: i32 = 2000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateQueryKind {
    WrittenWithYear,
    WrittenMonthDay,
    Numeric,
    Literal,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateQuery {
    pub kind: DateQueryKind,
    pub patterns: Vec<String>,
}

impl DateQuery {
    fn literal(query: &str) -> Self {
        Self {
            kind: DateQueryKind::Literal,
            patterns: vec![like_pattern(query)],
        }
    }
}

pub fn month_number(token: &str) -> Option<u32> {
    let month = match token {
        "january" | "jan" => 1,
        "february" | "feb" => 2,
        "march" | "mar" => 3,
        "april" | "apr" => 4,
        "may" => 5,
        "june" | "jun" => 6,
        "july" | "jul" => 7,
        "august" | "aug" => 8,
        "september" | "sep" | "sept" => 9,
        "october" | "oct" => 10,
        "november" | "nov" => 11,
        "december" | "dec" => 12,
        _ => return None,
    };
    Some(month)
}

pub fn parse_date_query(query: &str) -> DateQuery {
    let raw = query.trim();
    let lowered = raw.to_lowercase();

    if let Some(caps) = WRITTEN_DATE.captures(&lowered) {
        let month_token = &caps[1];
        let day_token = &caps[2];
        let Some(month) = month_number(month_token) else {
            return DateQuery::literal(raw);
        };
        let month_day = format!("{month:02}-{day_token:0>2}");

        return match caps.get(3) {
            Some(year) => DateQuery {
                kind: DateQueryKind::WrittenWithYear,
                patterns: vec![
                    like_pattern(&format!("{}-{month_day}", year.as_str())),
                    like_pattern(raw),
                    like_pattern(&month_day),
                ],
            },
            None => DateQuery {
                kind: DateQueryKind::WrittenMonthDay,
                patterns: vec![
                    like_pattern(&month_day),
                    like_pattern(raw),
                    like_pattern(&format!("{month_token} {day_token}")),
                ],
            },
        };
    }

    let mut patterns: Vec<String> = NUMERIC_FORMATS
        .iter()
        .filter_map(|format| numeric_pattern(raw, *format))
        .collect();

    if patterns.is_empty() {
        return DateQuery::literal(raw);
    }

    patterns.push(like_pattern(raw));
    DateQuery {
        kind: DateQueryKind::Numeric,
        patterns,
    }
}

/// chrono's `%Y` takes any digit count; a typed year must have exactly four.
fn has_four_digit_year(raw: &str, layout: &str) -> bool {
    let mut parts = raw.split(['-', '/']);
    let year = if layout.starts_with("%Y") {
        parts.next()
    } else {
        parts.last()
    };
    year.is_some_and(|y| y.len() == 4 && y.bytes().all(|b| b.is_ascii_digit()))
}

fn numeric_pattern(raw: &str, format: NumericFormat) -> Option<String> {
    match format {
        NumericFormat::Full(layout) => {
            if !has_four_digit_year(raw, layout) {
                return None;
            }
            NaiveDate::parse_from_str(raw, layout)
                .ok()
                .map(|date| like_pattern(&date.format("%Y-%m-%d").to_string()))
        }
        NumericFormat::MonthDay => {
            let probe = format!("{MONTH_DAY_PROBE_YEAR}-{raw}");
            NaiveDate::parse_from_str(&probe, "%Y-%m-%d")
                .ok()
                .map(|date| like_pattern(&date.format("-%m-%d").to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn two_digit_year_is_not_a_full_date() {
        let parsed = parse_date_query("17-12-24");
        assert_eq!(parsed.kind, DateQueryKind::Literal);
        assert_eq!(parsed.patterns, vec!["%17-12-24%"]);

        let parsed = parse_date_query("12/17/24");
        assert_eq!(parsed.patterns, vec!["%12/17/24%"]);
    }

    #[test]
    fn written_date_with_year() {
        let parsed = parse_date_query("December 17 2024");
        assert_eq!(parsed.kind, DateQueryKind::WrittenWithYear);
        assert_eq!(
            parsed.patterns,
            vec!["%2024-12-17%", "%December 17 2024%", "%12-17%"]
        );
    }

    #[test]
    fn written_date_without_year_spans_all_years() {
        let parsed = parse_date_query("December 17");
        assert_eq!(parsed.kind, DateQueryKind::WrittenMonthDay);
        assert!(parsed.patterns.contains(&"%12-17%".to_string()));
        assert_eq!(
            parsed.patterns,
            vec!["%12-17%", "%December 17%", "%december 17%"]
        );
    }

    #[test]
    fn abbreviated_month_and_single_digit_day_are_padded() {
        let parsed = parse_date_query("sept 5, 1987");
        assert_eq!(parsed.kind, DateQueryKind::WrittenWithYear);
        assert_eq!(parsed.patterns[0], "%1987-09-05%");
        assert_eq!(parsed.patterns[2], "%09-05%");
    }

    #[test]
    fn unknown_month_word_falls_back_to_literal() {
        let parsed = parse_date_query("Smarch 12");
        assert_eq!(parsed.kind, DateQueryKind::Literal);
        assert_eq!(parsed.patterns, vec!["%Smarch 12%"]);
    }

    #[test]
    fn iso_date_parses_once() {
        let parsed = parse_date_query("2024-12-17");
        assert_eq!(parsed.kind, DateQueryKind::Numeric);
        assert_eq!(parsed.patterns, vec!["%2024-12-17%", "%2024-12-17%"]);
    }

    #[test]
    fn day_first_and_month_first_slashes_are_both_tried() {
        let day_first = parse_date_query("17/12/2024");
        assert!(day_first.patterns.contains(&"%2024-12-17%".to_string()));

        let month_first = parse_date_query("12/17/2024");
        assert!(month_first.patterns.contains(&"%2024-12-17%".to_string()));
    }

    #[test]
    fn ambiguous_slashes_yield_both_readings() {
        let parsed = parse_date_query("03/04/2024");
        assert_eq!(
            parsed.patterns,
            vec!["%2024-03-04%", "%2024-04-03%", "%03/04/2024%"]
        );
    }

    #[test]
    fn dashed_day_month_year() {
        let parsed = parse_date_query("17-12-2024");
        assert_eq!(parsed.patterns, vec!["%2024-12-17%", "%17-12-2024%"]);
    }

    #[test]
    fn month_day_without_year_is_year_agnostic() {
        let parsed = parse_date_query("03-04");
        assert_eq!(parsed.kind, DateQueryKind::Numeric);
        assert_eq!(parsed.patterns, vec!["%-03-04%", "%03-04%"]);
    }

    #[test]
    fn leap_day_without_year_is_accepted() {
        let parsed = parse_date_query("02-29");
        assert_eq!(parsed.patterns[0], "%-02-29%");
    }

    #[test]
    fn garbage_falls_back_to_literal() {
        for text in ["13/13/2024", "1998", "??", "32-01-2020"] {
            let parsed = parse_date_query(text);
            assert_eq!(parsed.kind, DateQueryKind::Literal, "{text}");
            assert_eq!(parsed.patterns, vec![format!("%{text}%")]);
        }
    }
}
