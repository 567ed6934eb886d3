use crate::config::PartyNames;
use crate::error::{GaugeError, Result};
use crate::ir::{Category, Dataset, HistoricalPoint};
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::Path;

static POINT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?P<projected>(?i:forecast|projected)\s+)?(?P<category>[A-Za-z_-]+)\s+(?P<year>\d{4})\s+(?P<margin>\S+)(?:\s+(?P<flag>(?i:projected|forecast)))?$",
    )
    .unwrap()
});
static PARTY_MARGIN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?P<party>[A-Za-z]+)\+(?P<value>\d+(?:\.\d+)?)$").unwrap());

/// Parse a margin token: `D+1.2`, `R+6.8`, `EVEN`, or a signed number.
/// `positive`/`negative` are the party prefixes that map to each sign.
pub fn parse_margin(token: &str, positive: &str, negative: &str) -> Option<f64> {
    let token = token.trim();
    if token.eq_ignore_ascii_case("even") {
        return Some(0.0);
    }
    if let Some(caps) = PARTY_MARGIN_RE.captures(token) {
        let value: f64 = caps["value"].parse().ok()?;
        let party = &caps["party"];
        if party.eq_ignore_ascii_case(positive) {
            return Some(value);
        }
        if party.eq_ignore_ascii_case(negative) {
            return Some(-value);
        }
        return None;
    }
    token.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Line-oriented dataset: `<category> <year> <margin> [projected]`, with `#`
/// comments and blank lines ignored.
///
/// ```text
/// midterm   2010 R+6.8
/// house     2012 D+1.2
/// president 2024 -1.5
/// forecast midterm 2026 D+2.0
/// ```
pub fn parse_dataset(input: &str) -> Result<Dataset> {
    parse_dataset_with(input, "D", "R")
}

pub fn parse_dataset_with(input: &str, positive: &str, negative: &str) -> Result<Dataset> {
    let mut points = Vec::new();
    for (idx, raw) in input.lines().enumerate() {
        let line_no = idx + 1;
        let line = raw.split('#').next().unwrap_or("").trim();
        if line.is_empty() {
            continue;
        }
        let Some(caps) = POINT_RE.captures(line) else {
            return Err(GaugeError::Parse {
                line: line_no,
                message: format!("expected `<category> <year> <margin>`, got {line:?}"),
            });
        };
        let category = Category::from_token(&caps["category"]).ok_or_else(|| GaugeError::Parse {
            line: line_no,
            message: format!("unknown category {:?}", &caps["category"]),
        })?;
        let year: i32 = caps["year"].parse().map_err(|_| GaugeError::Parse {
            line: line_no,
            message: format!("bad year {:?}", &caps["year"]),
        })?;
        let margin =
            parse_margin(&caps["margin"], positive, negative).ok_or_else(|| GaugeError::Parse {
                line: line_no,
                message: format!("bad margin {:?}", &caps["margin"]),
            })?;
        let projected = caps.name("projected").is_some() || caps.name("flag").is_some();
        points.push(HistoricalPoint {
            year,
            margin,
            category,
            projected,
        });
    }
    Ok(Dataset::new(points))
}

/// JSON arrays of points are accepted alongside the text format.
pub fn parse_dataset_auto(input: &str) -> anyhow::Result<Dataset> {
    parse_dataset_auto_with(input, &PartyNames::default())
}

pub fn parse_dataset_auto_with(input: &str, parties: &PartyNames) -> anyhow::Result<Dataset> {
    if input.trim_start().starts_with('[') {
        let dataset: Dataset = serde_json::from_str(input)?;
        if let Some(bad) = dataset.points.iter().find(|p| !p.margin.is_finite()) {
            return Err(GaugeError::ValueError { value: bad.margin }.into());
        }
        return Ok(dataset);
    }
    Ok(parse_dataset_with(input, &parties.positive, &parties.negative)?)
}

/// Read a dataset file. No path means the built-in results.
pub fn load_dataset(path: Option<&Path>, parties: &PartyNames) -> anyhow::Result<Dataset> {
    let Some(path) = path else {
        return Ok(Dataset::sample());
    };
    let contents = std::fs::read_to_string(path)?;
    parse_dataset_auto_with(&contents, parties)
}
