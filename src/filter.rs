use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::record::Record;

/// Inclusive range of publication years.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct YearRange {
    pub min: i32,
    pub max: i32,
}

impl YearRange {
    pub fn contains(&self, year: i32) -> bool {
        self.min <= year && year <= self.max
    }
}

impl FromStr for YearRange {
    type Err = String;

    /// Accepts `MIN-MAX`, a single `YEAR`, or the open-ended `MIN-` and `-MAX`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        static RANGE_RE: Lazy<Regex> =
            Lazy::new(|| Regex::new(r"^\s*(\d*)\s*(-?)\s*(\d*)\s*$").unwrap());

        let caps = RANGE_RE
            .captures(s)
            .ok_or_else(|| format!("invalid year range `{s}`, expected MIN-MAX"))?;
        let bound = |i: usize| -> Result<Option<i32>, String> {
            match caps.get(i).map(|m| m.as_str()).filter(|m| !m.is_empty()) {
                Some(m) => m
                    .parse()
                    .map(Some)
                    .map_err(|_| format!("year `{m}` is out of range")),
                None => Ok(None),
            }
        };
        let (lo, dash, hi) = (bound(1)?, !caps[2].is_empty(), bound(3)?);

        let range = match (lo, dash, hi) {
            (Some(y), false, None) => YearRange { min: y, max: y },
            (lo, true, hi) if lo.is_some() || hi.is_some() => YearRange {
                min: lo.unwrap_or(i32::MIN),
                max: hi.unwrap_or(i32::MAX),
            },
            _ => return Err(format!("invalid year range `{s}`, expected MIN-MAX")),
        };
        if range.min > range.max {
            return Err(format!(
                "invalid year range `{s}`: {} is after {}",
                range.min, range.max
            ));
        }
        Ok(range)
    }
}

/// Predicates a record has to satisfy to be kept. Unset predicates accept everything.
#[derive(Clone, Debug, Default)]
pub struct Filter {
    pub author: Option<Regex>,
    pub title: Option<Regex>,
    pub venue: Option<Regex>,
    pub years: Option<YearRange>,
}

impl Filter {
    pub fn is_empty(&self) -> bool {
        self.author.is_none() && self.title.is_none() && self.venue.is_none() && self.years.is_none()
    }

    /// Whether `record` passes every set predicate.
    ///
    /// Only the fields a set predicate looks at are resolved, and a record missing one of them
    /// is an error rather than a mismatch.
    pub fn matches(&self, record: &Record) -> anyhow::Result<bool> {
        if let Some(re) = &self.author
            && !re.is_match(&record.names()?)
        {
            return Ok(false);
        }
        if let Some(re) = &self.title
            && !re.is_match(record.title()?)
        {
            return Ok(false);
        }
        if let Some(re) = &self.venue
            && !re.is_match(record.venue()?)
        {
            return Ok(false);
        }
        if let Some(years) = &self.years
            && !years.contains(record.year()?)
        {
            return Ok(false);
        }
        Ok(true)
    }

    /// Keep the records that match, in their original order.
    pub fn apply(&self, records: Vec<Record>) -> anyhow::Result<Vec<Record>> {
        let mut kept = Vec::with_capacity(records.len());
        for record in records {
            if self.matches(&record)? {
                kept.push(record);
            }
        }
        Ok(kept)
    }
}
