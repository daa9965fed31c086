use std::fmt::Write;

use crate::{record::Record, render::Render};

const TABLE_HEADER: &str = r"\begin{tabular}{|l|l|l|l|l|l|}
\hline
S. No. & Authors & Title & Name of the Journal/Conference & Pages & Year \\ \hline
";

const TABLE_FOOTER: &str = "\\end{tabular}\n";

/// Six-column LaTeX `tabular`, one numbered row per record.
pub struct LatexTable;

impl Render for LatexTable {
    fn render(&self, records: &[Record]) -> anyhow::Result<String> {
        let mut out = String::from(TABLE_HEADER);
        for (i, record) in records.iter().enumerate() {
            writeln!(
                out,
                r"{} & {} & {} & {} & {} & {} \\ \hline",
                i + 1,
                record.names()?,
                record.title()?,
                record.venue()?,
                record.pages().unwrap_or_default(),
                record.year()?,
            )?;
        }
        out.push_str(TABLE_FOOTER);
        Ok(out)
    }
}
