use std::fmt::Write;

use crate::{record::Record, render::Render};

/// BibTeX output: one entry per record, each followed by a blank line.
///
/// Values are written as they appear in the source, without escaping BibTeX special characters.
pub struct Bibtex;

impl Render for Bibtex {
    fn render(&self, records: &[Record]) -> anyhow::Result<String> {
        let mut out = String::new();
        for record in records {
            out.push_str(&entry(record)?);
            out.push('\n');
        }
        Ok(out)
    }
}

/// Citation key: last name token, year, then the first word of the title.
///
/// `Jane Doe`, 2020, `Deep Learning` gives `doe2020deep`.
pub fn cite_key(record: &Record) -> anyhow::Result<String> {
    let names = record.names()?;
    let name = names.split_whitespace().last().unwrap_or_default().to_lowercase();
    let year = record.year()?;
    let word: String = record
        .title()?
        .split_whitespace()
        .next()
        .unwrap_or_default()
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        .collect();
    Ok(format!("{name}{year}{word}"))
}

pub fn entry(record: &Record) -> anyhow::Result<String> {
    let mut out = String::new();
    writeln!(out, "@{}{{{},", record.category(), cite_key(record)?)?;
    if !record.authors().is_empty() {
        writeln!(out, "  author = {{{}}},", record.authors().join(" and "))?;
    }
    if !record.editors().is_empty() {
        writeln!(out, "  editor = {{{}}},", record.editors().join(" and "))?;
    }
    for (name, value) in record.fields() {
        writeln!(out, "  {name} = {{{value}}},")?;
    }
    out.push_str("}\n");
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::tests::{JANE_DOE, entry as record, records};

    #[test]
    fn keys_follow_name_year_title() {
        let recs = records(JANE_DOE);
        assert_eq!(cite_key(&recs[0]).unwrap(), "doe2020deep");
        assert_eq!(cite_key(&recs[1]).unwrap(), "doe2019shallow");
    }

    #[test]
    fn key_strips_punctuation_from_title_word() {
        let r = record(
            "article",
            "<author>Ann van Lee</author><title>What's up? Nothing.</title><year>2001</year>",
        );
        assert_eq!(cite_key(&r).unwrap(), "lee2001whats");
        let r = record(
            "article",
            "<author>A B</author><title>\u{dc}ber-Graphs</title><year>2001</year>",
        );
        assert_eq!(cite_key(&r).unwrap(), "b2001bergraphs");
    }

    #[test]
    fn renders_entries_with_blank_line_separators() {
        let text = Bibtex.render(&records(JANE_DOE)).unwrap();
        let expected = "\
@article{doe2020deep,
  author = {Jane Doe},
  title = {Deep Learning},
  pages = {1-10},
  year = {2020},
  volume = {7},
  journal = {Nature},
  ee = {https://doi.org/10.1000/1},
}

@inproceedings{doe2019shallow,
  author = {Jane Doe},
  title = {Shallow Nets},
  year = {2019},
  booktitle = {ICML},
}

";
        assert_eq!(text, expected);
    }

    #[test]
    fn editor_only_record_keys_on_editors() {
        let r = record(
            "proceedings",
            "<editor>Ann Lee</editor><editor>Bo Kim</editor><title>Proc. of X</title><year>2010</year><publisher>ACM</publisher>",
        );
        let text = entry(&r).unwrap();
        assert!(text.starts_with("@proceedings{kim2010proc,\n"), "{text}");
        assert!(text.contains("  editor = {Ann Lee and Bo Kim},\n"));
        assert!(!text.contains("author ="));
    }

    #[test]
    fn both_author_and_editor_lines_when_present() {
        let r = record(
            "incollection",
            "<author>A B</author><editor>C D</editor><title>T</title><year>2000</year>",
        );
        let text = entry(&r).unwrap();
        assert!(text.starts_with("@incollection{b2000t,\n  author = {A B},\n  editor = {C D},\n"));
    }

    #[test]
    fn no_records_render_to_nothing() {
        assert_eq!(Bibtex.render(&[]).unwrap(), "");
    }

    #[test]
    fn malformed_year_fails_the_render() {
        let r = record("article", "<author>A B</author><title>T</title><year>soon</year>");
        assert!(Bibtex.render(&[r]).is_err());
    }

    #[test]
    fn output_parses_as_bibtex() {
        let text = Bibtex.render(&records(JANE_DOE)).unwrap();
        let bib = biblatex::Bibliography::parse(&text).unwrap();
        assert_eq!(bib.len(), 2);
        assert!(bib.get("doe2020deep").is_some());
        assert!(bib.get("doe2019shallow").is_some());
    }

    #[test]
    fn keys_are_stable_across_renders() {
        proptest::proptest!(|(
            first in "[A-Z][a-z]{1,8}",
            last in "[A-Z][a-z]{1,8}",
            title in "[A-Za-z0-9:,.!? -]{1,40}",
            year in 1950i32..2030,
        )| {
            let r = record(
                "article",
                &format!("<author>{first} {last}</author><title>{title}</title><year>{year}</year>"),
            );
            let a = cite_key(&r).unwrap();
            let b = cite_key(&r).unwrap();
            proptest::prop_assert_eq!(&a, &b);
            let prefix = format!("{}{}", last.to_lowercase(), year);
            proptest::prop_assert!(a.starts_with(&prefix));
            proptest::prop_assert!(a.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit()));
        })
    }
}
