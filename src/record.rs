use anyhow::{Context, anyhow, bail};

use crate::document::Element;

/// Root element of a DBLP person page.
const PERSON_ROOT: &str = "dblpperson";
/// Wrapper element around each publication on a person page.
const REFERENCE: &str = "r";

/// One publication taken from a person page.
///
/// Author and editor lists are kept apart from the other fields; everything else is stored in
/// the order it first appears in the source so it can be echoed back unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    category: String,
    key: Option<String>,
    authors: Vec<String>,
    editors: Vec<String>,
    fields: Vec<(String, String)>,
}

impl Record {
    /// Build a record from one entry element, tagged with `category`.
    ///
    /// Repeated fields keep their first value.
    pub fn from_element(category: &str, entry: &Element) -> Self {
        let mut authors = Vec::new();
        let mut editors = Vec::new();
        let mut fields: Vec<(String, String)> = Vec::new();
        for child in entry.children() {
            let value = child.text();
            match child.name.as_str() {
                "author" => authors.push(value),
                "editor" => editors.push(value),
                name => {
                    if !fields.iter().any(|(k, _)| k == name) {
                        fields.push((name.to_string(), value));
                    }
                }
            }
        }
        Record {
            category: category.to_string(),
            key: entry.attribute("key").map(str::to_string),
            authors,
            editors,
            fields,
        }
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn authors(&self) -> &[String] {
        &self.authors
    }

    pub fn editors(&self) -> &[String] {
        &self.editors
    }

    /// Scalar fields other than author and editor, in source order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Authors joined with `" and "`, or editors when there are no authors.
    pub fn names(&self) -> anyhow::Result<String> {
        let list = if !self.authors.is_empty() {
            &self.authors
        } else if !self.editors.is_empty() {
            &self.editors
        } else {
            bail!("{} has neither author nor editor", self.describe());
        };
        Ok(list.join(" and "))
    }

    /// Title, falling back to booktitle and then chaptertitle.
    pub fn title(&self) -> anyhow::Result<&str> {
        self.first_of(&["title", "booktitle", "chaptertitle"])
            .ok_or_else(|| anyhow!("{} has no title, booktitle or chaptertitle", self.describe()))
    }

    /// Publication venue, falling back from journal to booktitle and then publisher.
    pub fn venue(&self) -> anyhow::Result<&str> {
        self.first_of(&["journal", "booktitle", "publisher"])
            .ok_or_else(|| anyhow!("{} has no journal, booktitle or publisher", self.describe()))
    }

    pub fn year(&self) -> anyhow::Result<i32> {
        let raw = self
            .field("year")
            .ok_or_else(|| anyhow!("{} has no year", self.describe()))?;
        raw.trim()
            .parse()
            .with_context(|| format!("{} has a non-numeric year {raw:?}", self.describe()))
    }

    pub fn pages(&self) -> Option<&str> {
        self.field("pages")
    }

    fn first_of(&self, names: &[&str]) -> Option<&str> {
        names.iter().find_map(|n| self.field(n))
    }

    /// How the record is named in error messages.
    fn describe(&self) -> String {
        match &self.key {
            Some(key) => format!("{} `{key}`", self.category),
            None => format!("{} entry", self.category),
        }
    }
}

/// Flatten a person page into its publications, in page order.
///
/// Within one reference element, entries are grouped by category in the order each category
/// first appears.
pub fn extract(root: &Element) -> anyhow::Result<Vec<Record>> {
    if root.name != PERSON_ROOT {
        bail!(
            "expected a <{PERSON_ROOT}> document, found <{}>",
            root.name
        );
    }
    let mut records = Vec::new();
    for reference in root.children_named(REFERENCE) {
        let mut categories: Vec<&str> = Vec::new();
        for entry in reference.children() {
            if !categories.contains(&entry.name.as_str()) {
                categories.push(&entry.name);
            }
        }
        for category in categories {
            for entry in reference.children_named(category) {
                records.push(Record::from_element(category, entry));
            }
        }
    }
    Ok(records)
}

/// Name of the person the page belongs to.
pub fn person(root: &Element) -> Option<&str> {
    root.attribute("name")
}
