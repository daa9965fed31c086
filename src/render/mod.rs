use crate::record::Record;

pub mod bibtex;
pub mod latex;

/// Turns a list of records into one block of output text.
pub trait Render {
    fn render(&self, records: &[Record]) -> anyhow::Result<String>;
}

/// Output format selected on the command line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    Bibtex,
    LatexTable,
}

impl Mode {
    /// Look up a mode by its command-line name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "bibtex" => Some(Mode::Bibtex),
            "latex-table" => Some(Mode::LatexTable),
            _ => None,
        }
    }

    pub fn renderer(self) -> Box<dyn Render> {
        match self {
            Mode::Bibtex => Box::new(bibtex::Bibtex),
            Mode::LatexTable => Box::new(latex::LatexTable),
        }
    }
}
