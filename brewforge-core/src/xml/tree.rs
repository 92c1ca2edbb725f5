//! A small owned element tree over quick-xml events.
//!
//! BeerXML is element-only (no attributes carry data, no mixed content), so
//! each node keeps its name, the raw text of leaf elements, its child
//! elements and the source line it started on. Callers trim where a value is
//! coerced or looked up.

use encoding_rs::{Encoding, UTF_8};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use std::borrow::Cow;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct XmlElement {
    pub name: String,
    pub text: Option<String>,
    pub children: Vec<XmlElement>,
    /// 1-based line of the start tag in the parsed text, 0 for built nodes.
    pub line: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct XmlError {
    pub line: usize,
    pub message: String,
}

impl fmt::Display for XmlError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {}", self.line, self.message)
    }
}

impl std::error::Error for XmlError {}

impl XmlElement {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_text(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: Some(text.into()),
            ..Self::default()
        }
    }

    pub fn push(&mut self, child: XmlElement) {
        self.children.push(child);
    }

    pub fn child(&self, name: &str) -> Option<&XmlElement> {
        self.children.iter().find(|c| c.name == name)
    }

    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a XmlElement> + 'a {
        self.children.iter().filter(move |c| c.name == name)
    }

    /// Raw text of the first child called `name`, if it has any.
    pub fn child_text(&self, name: &str) -> Option<&str> {
        self.child(name).and_then(|c| c.text.as_deref())
    }

    /// Every element called `name` below this one, in document order. The
    /// search does not descend into a match.
    pub fn descendants_named<'a>(&'a self, name: &str) -> Vec<&'a XmlElement> {
        let mut found = Vec::new();
        collect_named(&self.children, name, &mut found);
        found
    }
}

fn collect_named<'a>(elements: &'a [XmlElement], name: &str, found: &mut Vec<&'a XmlElement>) {
    for element in elements {
        if element.name == name {
            found.push(element);
        } else {
            collect_named(&element.children, name, found);
        }
    }
}

struct LineCounter<'a> {
    src: &'a [u8],
    offset: usize,
    line: usize,
}

impl<'a> LineCounter<'a> {
    fn new(src: &'a str) -> Self {
        Self {
            src: src.as_bytes(),
            offset: 0,
            line: 1,
        }
    }

    fn line_at(&mut self, position: usize) -> usize {
        let end = position.min(self.src.len());
        if end > self.offset {
            self.line += self.src[self.offset..end].iter().filter(|&&b| b == b'\n').count();
            self.offset = end;
        }
        self.line
    }
}

fn element_name(bytes: &[u8], line: usize) -> Result<String, XmlError> {
    std::str::from_utf8(bytes)
        .map(str::to_string)
        .map_err(|e| XmlError {
            line,
            message: format!("element name is not UTF-8: {e}"),
        })
}

fn append_text(element: &mut XmlElement, text: &str) {
    if text.is_empty() {
        return;
    }
    match &mut element.text {
        Some(existing) => existing.push_str(text),
        None => element.text = Some(text.to_string()),
    }
}

/// Encoding label from the `<?xml ... encoding="..."?>` declaration, if any.
fn declared_encoding(bytes: &[u8]) -> Option<&[u8]> {
    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
    if !bytes.starts_with(b"<?xml") {
        return None;
    }
    let end = bytes.windows(2).position(|w| w == b"?>")?;
    let decl = &bytes[..end];
    let at = decl.windows(8).position(|w| w == b"encoding")?;
    let rest = &decl[at + 8..];
    let rest = &rest[rest.iter().position(|&b| b == b'=')? + 1..];
    let start = rest.iter().position(|&b| b == b'"' || b == b'\'')?;
    let quote = rest[start];
    let value = &rest[start + 1..];
    let len = value.iter().position(|&b| b == quote)?;
    Some(&value[..len])
}

/// Decodes raw document bytes to text.
///
/// A byte order mark wins, then the encoding named in the XML declaration,
/// then UTF-8. Malformed input for the chosen encoding is an error carrying
/// the line of the first bad byte.
pub fn decode(bytes: &[u8]) -> Result<Cow<'_, str>, XmlError> {
    let (encoding, body) = match Encoding::for_bom(bytes) {
        Some((encoding, bom)) => (encoding, &bytes[bom..]),
        None => {
            let encoding = match declared_encoding(bytes) {
                Some(label) => Encoding::for_label(label).ok_or_else(|| XmlError {
                    line: 1,
                    message: format!("unsupported encoding '{}'", String::from_utf8_lossy(label)),
                })?,
                None => UTF_8,
            };
            (encoding, bytes)
        }
    };

    if encoding == UTF_8 {
        return std::str::from_utf8(body).map(Cow::Borrowed).map_err(|e| {
            let valid = &body[..e.valid_up_to()];
            XmlError {
                line: 1 + valid.iter().filter(|&&b| b == b'\n').count(),
                message: format!("document is not valid UTF-8: {e}"),
            }
        });
    }

    match encoding.decode_without_bom_handling_and_without_replacement(body) {
        Some(text) => Ok(text),
        None => Err(XmlError {
            line: 1,
            message: format!("document is not valid {}", encoding.name()),
        }),
    }
}

/// Parses `text` and returns its top-level elements wrapped in an unnamed
/// document node.
pub fn parse(text: &str) -> Result<XmlElement, XmlError> {
    let mut reader = Reader::from_str(text);
    let mut lines = LineCounter::new(text);
    let mut stack: Vec<XmlElement> = vec![XmlElement::default()];

    loop {
        let event = reader.read_event().map_err(|e| XmlError {
            line: lines.line_at(reader.buffer_position()),
            message: e.to_string(),
        })?;
        let line = lines.line_at(reader.buffer_position());
        match event {
            Event::Start(start) => {
                let mut element = XmlElement::new(element_name(start.name().as_ref(), line)?);
                element.line = line;
                stack.push(element);
            }
            Event::Empty(start) => {
                let mut element = XmlElement::new(element_name(start.name().as_ref(), line)?);
                element.line = line;
                if let Some(parent) = stack.last_mut() {
                    parent.push(element);
                }
            }
            Event::Text(t) => {
                let unescaped = t.unescape().map_err(|e| XmlError {
                    line,
                    message: e.to_string(),
                })?;
                if let Some(current) = stack.last_mut() {
                    append_text(current, &unescaped);
                }
            }
            Event::CData(c) => {
                if let Some(current) = stack.last_mut() {
                    append_text(current, &String::from_utf8_lossy(&c));
                }
            }
            Event::End(_) => {
                let mut finished = stack.pop().unwrap_or_default();
                if !finished.children.is_empty() {
                    // Indentation between child elements.
                    finished.text = None;
                }
                if stack.is_empty() {
                    return Err(XmlError {
                        line,
                        message: "unexpected end tag at document level".to_string(),
                    });
                }
                if let Some(parent) = stack.last_mut() {
                    parent.push(finished);
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if stack.len() != 1 {
        let open = stack.last().map(|e| e.name.clone()).unwrap_or_default();
        return Err(XmlError {
            line: lines.line_at(text.len()),
            message: format!("unexpected end of document inside '{open}'"),
        });
    }
    let mut document = stack.pop().unwrap_or_default();
    document.text = None;
    if document.children.is_empty() {
        return Err(XmlError {
            line: 1,
            message: "document has no root element".to_string(),
        });
    }
    Ok(document)
}

fn write_element(writer: &mut Writer<Vec<u8>>, element: &XmlElement) -> Result<(), quick_xml::Error> {
    let name = element.name.as_str();
    match (&element.text, element.children.is_empty()) {
        (None, true) => writer.write_event(Event::Empty(BytesStart::new(name)))?,
        _ => {
            writer.write_event(Event::Start(BytesStart::new(name)))?;
            if let Some(text) = &element.text {
                writer.write_event(Event::Text(BytesText::new(text)))?;
            }
            for child in &element.children {
                write_element(writer, child)?;
            }
            writer.write_event(Event::End(BytesEnd::new(name)))?;
        }
    }
    Ok(())
}

/// Renders `roots` as an indented document with an XML declaration.
pub fn write(roots: &[XmlElement]) -> Result<String, XmlError> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
    let to_err = |e: quick_xml::Error| XmlError {
        line: 0,
        message: e.to_string(),
    };
    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
        .map_err(to_err)?;
    for root in roots {
        write_element(&mut writer, root).map_err(to_err)?;
    }
    String::from_utf8(writer.into_inner()).map_err(|e| XmlError {
        line: 0,
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = "<?xml version=\"1.0\"?>\n<HOPS>\n  <HOP>\n    <NAME>Cascade &amp; Co</NAME>\n    <ALPHA> 5.5 </ALPHA>\n    <NOTES/>\n  </HOP>\n</HOPS>\n";

    #[test]
    fn parses_nested_elements_with_lines() {
        let doc = parse(DOC).unwrap();
        let hops = doc.child("HOPS").unwrap();
        assert_eq!(hops.line, 2);
        let hop = hops.child("HOP").unwrap();
        assert_eq!(hop.line, 3);
        assert_eq!(hop.child_text("NAME"), Some("Cascade & Co"));
        assert_eq!(hop.child_text("ALPHA"), Some(" 5.5 "));
        assert_eq!(hop.text, None);
        assert_eq!(hop.child("NOTES").unwrap().text, None);
        assert_eq!(hop.child("NAME").unwrap().line, 4);
    }

    #[test]
    fn reports_mismatched_tags() {
        let err = parse("<A>\n<B></A>").unwrap_err();
        assert!(err.line >= 1);
        assert!(parse("").is_err());
    }

    #[test]
    fn finds_descendants_in_document_order() {
        let doc = parse("<R><X><HOP><NAME>a</NAME></HOP></X><HOP><NAME>b</NAME></HOP></R>").unwrap();
        let names: Vec<_> = doc
            .descendants_named("HOP")
            .iter()
            .filter_map(|h| h.child_text("NAME"))
            .collect();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn written_document_parses_back() {
        let mut hop = XmlElement::new("HOP");
        hop.push(XmlElement::with_text("NAME", "Saaz <Czech>"));
        hop.push(XmlElement::new("NOTES"));
        let mut hops = XmlElement::new("HOPS");
        hops.push(hop);

        let text = write(&[hops]).unwrap();
        assert!(text.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        let back = parse(&text).unwrap();
        let hop = back.child("HOPS").and_then(|h| h.child("HOP")).unwrap();
        assert_eq!(hop.child_text("NAME"), Some("Saaz <Czech>"));
    }

    #[test]
    fn leaf_text_keeps_its_whitespace() {
        let doc = parse("<HOP>\n  <NOTES>  spicy\n</NOTES>\n  <NAME><![CDATA[ Saaz ]]></NAME>\n</HOP>").unwrap();
        let hop = doc.child("HOP").unwrap();
        assert_eq!(hop.child_text("NOTES"), Some("  spicy\n"));
        assert_eq!(hop.child_text("NAME"), Some(" Saaz "));
        assert_eq!(hop.text, None);

        let back = parse(&write(&doc.children).unwrap()).unwrap();
        assert_eq!(back.child("HOP").and_then(|h| h.child_text("NOTES")), Some("  spicy\n"));
    }

    #[test]
    fn decodes_the_declared_encoding() {
        let latin1 = b"<?xml version=\"1.0\" encoding=\"ISO-8859-1\"?>\n<NAME>M\xFCnchner</NAME>";
        let text = decode(latin1).unwrap();
        assert!(text.ends_with("<NAME>M\u{fc}nchner</NAME>"));

        let utf8 = "<?xml version='1.0' encoding='UTF-8'?><NAME>M\u{fc}nchner</NAME>";
        assert_eq!(decode(utf8.as_bytes()).unwrap(), utf8);

        let bom = b"\xEF\xBB\xBF<A/>";
        assert_eq!(decode(bom).unwrap(), "<A/>");
    }

    #[test]
    fn undecodable_bytes_report_their_line() {
        let err = decode(b"<A>\n<B>\xFC</B></A>").unwrap_err();
        assert_eq!(err.line, 2);
        assert!(err.message.contains("UTF-8"));

        let err = decode(b"<?xml version=\"1.0\" encoding=\"klingon\"?><A/>").unwrap_err();
        assert!(err.message.contains("klingon"));
    }
}
