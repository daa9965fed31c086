use std::{fs, path::PathBuf, str::FromStr};

use clap::Parser;
use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};
use url::Url;

use crate::filter::{Filter, YearRange};

#[derive(Parser, Debug)]
#[command(version, about = "Turn a DBLP person page into BibTeX or a LaTeX table", long_about = None)]
pub struct Cli {
    /// Output mode: `bibtex` or `latex-table`
    #[arg(value_name = "MODE")]
    pub mode: String,

    /// DBLP person page URL (`.html` is fetched as `.xml`) or a local XML file
    #[arg(value_name = "ADDRESS")]
    pub address: Address,

    /// Write the result to FILE instead of standard output
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Keep publications whose author (or editor) list matches REGEX
    #[arg(short, long, value_name = "REGEX", value_parser = parse_pattern)]
    pub author: Option<Regex>,

    /// Keep publications whose title matches REGEX
    #[arg(short, long, value_name = "REGEX", value_parser = parse_pattern)]
    pub title: Option<Regex>,

    /// Keep publications whose journal, proceedings or publisher matches REGEX
    #[arg(short, long, value_name = "REGEX", value_parser = parse_pattern)]
    pub journal: Option<Regex>,

    /// Keep publications from years MIN-MAX (inclusive)
    #[arg(short, long, value_name = "MIN-MAX")]
    pub year: Option<YearRange>,

    /// Maximum number of redirects to follow
    #[arg(long, value_name = "N", default_value_t = 10)]
    pub max_redirects: u32,

    /// Give up on the fetch after SECS seconds
    #[arg(long, value_name = "SECS", default_value_t = 30)]
    pub timeout: u64,

    /// Do not print progress messages
    #[arg(short, long)]
    pub quiet: bool,
}

impl Cli {
    pub fn filter(&self) -> Filter {
        Filter {
            author: self.author.clone(),
            title: self.title.clone(),
            venue: self.journal.clone(),
            years: self.year,
        }
    }
}

/// Where the person page comes from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Address {
    Remote(Url),
    Local(PathBuf),
}

impl FromStr for Address {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.starts_with("http://") || s.starts_with("https://") {
            let url = Url::parse(s).map_err(|e| format!("invalid URL `{s}`: {e}"))?;
            Ok(Address::Remote(url))
        } else if let Ok(path) = fs::canonicalize(s) {
            Ok(Address::Local(path))
        } else {
            Err(format!("`{s}` is neither an http(s) URL nor an existing file"))
        }
    }
}

impl std::fmt::Display for Address {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Address::Remote(url) => write!(f, "{url}"),
            Address::Local(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Parse a filter pattern.
///
/// Either a plain regex, which may carry inline flags such as `(?i)`, or a `/regex/flags`
/// literal. In a literal, `i`, `m` and `s` become the matching inline flags; `g`, `u` and `y`
/// are accepted and have no effect.
pub fn parse_pattern(s: &str) -> Result<Regex, String> {
    static LITERAL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^/(.*)/([gimsuy]*)$").unwrap());

    let (source, flags) = match LITERAL_RE.captures(s) {
        Some(caps) => (
            caps.get(1).map_or("", |m| m.as_str()),
            caps.get(2).map_or("", |m| m.as_str()),
        ),
        None => (s, ""),
    };
    RegexBuilder::new(source)
        .case_insensitive(flags.contains('i'))
        .multi_line(flags.contains('m'))
        .dot_matches_new_line(flags.contains('s'))
        .build()
        .map_err(|e| format!("invalid pattern `{s}`: {e}"))
}
