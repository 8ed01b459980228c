//! Record-count resolution across receipt generations.
//!
//! Newer receipts carry the count as a field (under one of several names);
//! the oldest generation only encoded it in the file name.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Number;

use crate::wakama::receipt::RawReceipt;

/// Upper bound for counts recovered from file names. Larger numbers are far
/// more likely to be dates, coordinates or ids than batch sizes.
pub const MAX_INFERRED_COUNT: u64 = 5_000_000;

#[derive(Debug, Clone, Copy)]
enum CountStrategy {
    Field(&'static [&'static str]),
    FileName,
}

const COUNT_STRATEGIES: &[CountStrategy] = &[
    CountStrategy::Field(&["count"]),
    CountStrategy::Field(&["points"]),
    CountStrategy::Field(&["events"]),
    CountStrategy::Field(&["records"]),
    CountStrategy::Field(&["rows"]),
    CountStrategy::Field(&["meta", "count"]),
    CountStrategy::FileName,
];

static DIGITS_BEFORE_SUFFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d{2,})-[A-Za-z0-9_]+\.json$").expect("valid suffix count regex")
});

static DIGITS_AFTER_HYPHEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"-(\d{2,})").expect("valid hyphen count regex"));

pub fn resolve_count(raw: &RawReceipt, file_name: &str) -> Option<Number> {
    COUNT_STRATEGIES.iter().find_map(|strategy| match strategy {
        CountStrategy::Field(path) => raw.number_at(path).cloned(),
        CountStrategy::FileName => infer_count_from_file(file_name).map(Number::from),
    })
}

pub fn infer_count_from_file(file_name: &str) -> Option<u64> {
    let digits = DIGITS_BEFORE_SUFFIX
        .captures(file_name)
        .or_else(|| DIGITS_AFTER_HYPHEN.captures(file_name))
        .and_then(|caps| caps.get(1))?;
    let value = digits.as_str().parse::<u64>().ok()?;
    (value > 0 && value <= MAX_INFERRED_COUNT).then_some(value)
}
