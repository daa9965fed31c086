use anyhow::{Context, bail};
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

/// An element of the fetched XML document, with its attributes and its content in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub content: Vec<Content>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Content {
    Text(String),
    Element(Element),
}

impl Element {
    fn new(start: &BytesStart<'_>) -> anyhow::Result<Self> {
        let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
        let mut attributes = Vec::new();
        for attr in start.attributes() {
            let attr = attr.with_context(|| format!("bad attribute on <{name}>"))?;
            let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
            let raw = std::str::from_utf8(attr.value.as_ref())
                .with_context(|| format!("attribute `{key}` on <{name}> is not UTF-8"))?;
            let value = quick_xml::escape::unescape(raw)
                .with_context(|| format!("bad escape in attribute `{key}` on <{name}>"))?
                .into_owned();
            attributes.push((key, value));
        }
        Ok(Element {
            name,
            attributes,
            content: Vec::new(),
        })
    }

    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Child elements, skipping text.
    pub fn children(&self) -> impl Iterator<Item = &Element> {
        self.content.iter().filter_map(|c| match c {
            Content::Element(e) => Some(e),
            Content::Text(_) => None,
        })
    }

    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> {
        self.children().filter(move |e| e.name == name)
    }

    /// Concatenated text of this element and everything below it, with nested markup flattened.
    pub fn text(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        for c in &self.content {
            match c {
                Content::Text(t) => out.push_str(t),
                Content::Element(e) => e.collect_text(out),
            }
        }
    }

    fn push_text(&mut self, text: &str) {
        if let Some(Content::Text(last)) = self.content.last_mut() {
            last.push_str(text);
        } else {
            self.content.push(Content::Text(text.to_string()));
        }
    }
}

/// Parse `xml` into its root element.
///
/// Character references and the predefined XML entities are resolved; any other entity
/// reference is kept verbatim as `&name;`.
pub fn parse(xml: &str) -> anyhow::Result<Element> {
    let mut reader = Reader::from_str(xml);
    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    let mut buf = Vec::new();
    loop {
        let event = match reader.read_event_into(&mut buf) {
            Ok(e) => e,
            Err(e) => bail!(
                "XML parse error at byte {}: {e}",
                reader.error_position()
            ),
        };
        match event {
            Event::Eof => break,
            Event::Start(e) => {
                if root.is_some() {
                    bail!("XML document has more than one root element");
                }
                stack.push(Element::new(&e)?);
            }
            Event::Empty(e) => {
                let element = Element::new(&e)?;
                attach(&mut stack, &mut root, element)?;
            }
            Event::End(_) => {
                // End names are checked by the reader, so the top of the stack is the match.
                if let Some(element) = stack.pop() {
                    attach(&mut stack, &mut root, element)?;
                }
            }
            Event::Text(t) => {
                let text = String::from_utf8_lossy(t.as_ref());
                match stack.last_mut() {
                    Some(top) => top.push_text(&text),
                    None if text.trim().is_empty() => {}
                    None => bail!("text outside the root element: {:?}", text.trim()),
                }
            }
            Event::CData(t) => match stack.last_mut() {
                Some(top) => top.push_text(&String::from_utf8_lossy(t.as_ref())),
                None => bail!("CDATA outside the root element"),
            },
            Event::GeneralRef(r) => {
                let name = String::from_utf8_lossy(r.as_ref()).into_owned();
                match stack.last_mut() {
                    Some(top) => top.push_text(&resolve_reference(&name)),
                    None => bail!("entity reference `&{name};` outside the root element"),
                }
            }
            _ => {}
        }
        buf.clear();
    }

    if let Some(open) = stack.last() {
        bail!("XML document ended inside <{}>", open.name);
    }
    match root {
        Some(root) => Ok(root),
        None => bail!("XML document has no root element"),
    }
}

fn attach(
    stack: &mut [Element],
    root: &mut Option<Element>,
    element: Element,
) -> anyhow::Result<()> {
    if let Some(parent) = stack.last_mut() {
        parent.content.push(Content::Element(element));
    } else if root.is_some() {
        bail!("XML document has more than one root element");
    } else {
        *root = Some(element);
    }
    Ok(())
}

fn resolve_reference(name: &str) -> String {
    if let Some(num) = name.strip_prefix('#') {
        let code = match num.strip_prefix('x').or_else(|| num.strip_prefix('X')) {
            Some(hex) => u32::from_str_radix(hex, 16).ok(),
            None => num.parse::<u32>().ok(),
        };
        if let Some(c) = code.and_then(char::from_u32) {
            return c.to_string();
        }
    } else if let Some(s) = quick_xml::escape::resolve_predefined_entity(name) {
        return s.to_string();
    }
    format!("&{name};")
}
