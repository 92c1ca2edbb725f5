//! Schema validation of raw BeerXML bytes.
//!
//! BeerXML lets siblings appear in any order and tells readers to ignore
//! tags they do not know. The grammar therefore uses an "all" content model
//! and the validator downgrades the two classes of complaint that unknown
//! tags produce to ignorable issues. Everything else is fatal.
//!
//! Top-level content is wrapped in a synthetic `<BEER_XML>` element so the
//! grammar has a single root. The wrapper is inserted as a new line after
//! the first line, and reported line numbers are mapped back.

use crate::error::{BrewforgeError, GrammarError};
use crate::xml::deserialize::{parse_bool, parse_datetime};
use crate::xml::tree::{self, XmlElement};
use brewforge_schemas::file_formats::{ElementDecl, GrammarFile, SimpleType};
use regex::Regex;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fs;
use std::path::Path;

const GRAMMAR_YAML: &str = include_str!("../../resources/beerxml_schema.yaml");
const WRAPPER_TAG: &str = "BEER_XML";

const IGNORABLE_PATTERNS: [&str; 2] = [
    "^no declaration found for element",
    "^element '[^']*' is not allowed for content model",
];

#[derive(Debug, Clone, PartialEq)]
pub struct ValidationIssue {
    /// Line in the caller's document, not in the wrapped copy.
    pub line: usize,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationReport {
    pub ignored: Vec<ValidationIssue>,
    pub fatal: Vec<ValidationIssue>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.fatal.is_empty()
    }
}

/// The compiled grammar: element declarations plus every tag name it knows.
pub struct BeerXmlGrammar {
    root: String,
    elements: BTreeMap<String, ElementDecl>,
    known_tags: HashSet<String>,
}

impl BeerXmlGrammar {
    pub fn from_yaml(text: &str) -> Result<Self, GrammarError> {
        let file: GrammarFile = serde_yaml::from_str(text)?;
        if !file.elements.contains_key(&file.root) {
            return Err(GrammarError::MissingRoot(file.root));
        }
        for (parent, decl) in &file.elements {
            if let Some(child) = decl.children.keys().find(|c| !file.elements.contains_key(*c)) {
                return Err(GrammarError::UndeclaredChild {
                    parent: parent.clone(),
                    child: child.clone(),
                });
            }
        }
        let mut known_tags: HashSet<String> = file.elements.keys().cloned().collect();
        for decl in file.elements.values() {
            known_tags.extend(decl.fields.keys().cloned());
        }
        tracing::debug!(
            "Loaded BeerXML grammar {} with {} elements",
            file.schema_version,
            file.elements.len()
        );
        Ok(Self {
            root: file.root,
            elements: file.elements,
            known_tags,
        })
    }

    /// The grammar compiled into the binary.
    pub fn embedded() -> Result<Self, GrammarError> {
        Self::from_yaml(GRAMMAR_YAML)
    }
}

pub struct Validator {
    grammar: BeerXmlGrammar,
    ignorable: Vec<Regex>,
}

impl Validator {
    pub fn new() -> Result<Self, GrammarError> {
        Self::with_grammar(BeerXmlGrammar::embedded()?)
    }

    pub fn with_grammar(grammar: BeerXmlGrammar) -> Result<Self, GrammarError> {
        let ignorable = IGNORABLE_PATTERNS
            .iter()
            .map(|p| Regex::new(p))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { grammar, ignorable })
    }

    pub fn validate_file(&self, path: &Path) -> Result<ValidationReport, BrewforgeError> {
        let bytes =
            fs::read(path).map_err(|e| BrewforgeError::FileIO(path.display().to_string(), e))?;
        Ok(self.validate(&bytes))
    }

    pub fn validate(&self, bytes: &[u8]) -> ValidationReport {
        let mut collector = IssueCollector {
            ignorable: &self.ignorable,
            wrapper_line: 2,
            report: ValidationReport::default(),
        };

        let text = match tree::decode(bytes) {
            Ok(text) => text,
            Err(e) => {
                // Nothing is wrapped yet.
                collector.wrapper_line = usize::MAX;
                collector.raise(e.line, e.message);
                return collector.report;
            }
        };

        let (wrapped, wrapper_line) = wrap(&text);
        collector.wrapper_line = wrapper_line;

        match tree::parse(&wrapped) {
            Ok(document) => match document.children.as_slice() {
                [root] if root.name == WRAPPER_TAG => {
                    self.check_element(root, &self.grammar.root, &mut collector)
                }
                _ => collector.raise(1, "document content must follow the XML declaration".to_string()),
            },
            Err(e) => collector.raise(e.line, format!("malformed document: {}", e.message)),
        }
        collector.report
    }

    fn check_element(&self, element: &XmlElement, decl_name: &str, out: &mut IssueCollector) {
        let Some(decl) = self.grammar.elements.get(decl_name) else {
            out.raise(element.line, format!("no declaration found for element '{}'", element.name));
            return;
        };

        let mut seen: HashMap<&str, usize> = HashMap::new();
        for child in &element.children {
            let name = child.name.as_str();
            if let Some(field) = decl.fields.get(name) {
                *seen.entry(name).or_default() += 1;
                if seen[name] == 2 {
                    out.raise(
                        child.line,
                        format!("element '{name}' occurs more than once in content model '{decl_name}'"),
                    );
                }
                if !child.children.is_empty() {
                    out.raise(child.line, format!("element '{name}' must contain text only"));
                }
                check_text(child, field.field_type, field.required, out);
            } else if let Some(child_decl) = decl.children.get(name) {
                *seen.entry(name).or_default() += 1;
                if seen[name] == 2 && !child_decl.repeated {
                    out.raise(
                        child.line,
                        format!("element '{name}' occurs more than once in content model '{decl_name}'"),
                    );
                }
                self.check_element(child, name, out);
            } else if self.grammar.known_tags.contains(name) {
                out.raise(
                    child.line,
                    format!("element '{name}' is not allowed for content model '{decl_name}'"),
                );
            } else {
                out.raise(child.line, format!("no declaration found for element '{name}'"));
            }
        }

        let missing_fields = decl.fields.iter().filter(|(_, f)| f.required).map(|(n, _)| n);
        let missing_children = decl.children.iter().filter(|(_, c)| c.required).map(|(n, _)| n);
        for name in missing_fields.chain(missing_children) {
            if !seen.contains_key(name.as_str()) {
                out.raise(
                    element.line,
                    format!("not enough elements to match content model '{decl_name}': missing '{name}'"),
                );
            }
        }
    }
}

fn check_text(field: &XmlElement, kind: SimpleType, required: bool, out: &mut IssueCollector) {
    let text = field.text.as_deref().unwrap_or("").trim();
    if text.is_empty() {
        if required && kind != SimpleType::String {
            out.raise(field.line, format!("element '{}' must not be empty", field.name));
        }
        return;
    }
    let ok = match kind {
        SimpleType::String => true,
        SimpleType::Decimal => text.parse::<f64>().is_ok(),
        SimpleType::Integer => text.parse::<i64>().is_ok(),
        SimpleType::Boolean => parse_bool(text).is_some(),
        SimpleType::Date => parse_datetime(text).is_some(),
    };
    if !ok {
        let type_name = match kind {
            SimpleType::String => "string",
            SimpleType::Decimal => "decimal",
            SimpleType::Integer => "integer",
            SimpleType::Boolean => "boolean",
            SimpleType::Date => "date",
        };
        out.raise(
            field.line,
            format!("value '{text}' of element '{}' is not a valid {type_name}", field.name),
        );
    }
}

/// Inserts the wrapper start tag on its own line after the first line (or
/// before everything if the first line is not an XML declaration) and
/// returns the wrapped text with the line the wrapper landed on.
fn wrap(text: &str) -> (String, usize) {
    let mut wrapped = String::with_capacity(text.len() + 2 * WRAPPER_TAG.len() + 8);
    let wrapper_line = if text.trim_start().starts_with("<?xml") {
        let (first, rest) = match text.find('\n') {
            Some(i) => text.split_at(i + 1),
            None => (text, ""),
        };
        wrapped.push_str(first);
        if !first.ends_with('\n') {
            wrapped.push('\n');
        }
        wrapped.push_str(&format!("<{WRAPPER_TAG}>\n"));
        wrapped.push_str(rest);
        2
    } else {
        wrapped.push_str(&format!("<{WRAPPER_TAG}>\n"));
        wrapped.push_str(text);
        1
    };
    wrapped.push_str(&format!("\n</{WRAPPER_TAG}>"));
    (wrapped, wrapper_line)
}

struct IssueCollector<'a> {
    ignorable: &'a [Regex],
    wrapper_line: usize,
    report: ValidationReport,
}

impl IssueCollector<'_> {
    fn correct_line(&self, line: usize) -> usize {
        if line > self.wrapper_line {
            line - 1
        } else {
            line
        }
    }

    fn raise(&mut self, wrapped_line: usize, message: String) {
        let issue = ValidationIssue {
            line: self.correct_line(wrapped_line),
            message,
        };
        if self.ignorable.iter().any(|p| p.is_match(&issue.message)) {
            tracing::warn!(
                "IGNORING parse error at line {} on the assumption it is a non-standard tag: {}",
                issue.line,
                issue.message
            );
            self.report.ignored.push(issue);
        } else {
            tracing::error!("Validation error at line {}: {}", issue.line, issue.message);
            self.report.fatal.push(issue);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn validator() -> Validator {
        Validator::new().expect("embedded grammar loads")
    }

    const HOP_DOC: &str = "<?xml version=\"1.0\" encoding=\"ISO-8859-1\"?>
<HOPS>
  <HOP>
    <NAME>Cascade</NAME>
    <VERSION>1</VERSION>
    <ALPHA>5.5</ALPHA>
    <FOO>bar</FOO>
  </HOP>
</HOPS>
";

    #[test]
    fn unknown_tags_are_ignored_with_original_line() {
        let report = validator().validate(HOP_DOC.as_bytes());
        assert!(report.is_valid(), "{:?}", report.fatal);
        assert_eq!(report.ignored.len(), 1);
        assert_eq!(report.ignored[0].message, "no declaration found for element 'FOO'");
        assert_eq!(report.ignored[0].line, 7);
    }

    #[test]
    fn known_tag_in_wrong_place_is_ignored() {
        let doc = "<?xml version=\"1.0\"?>\n<HOPS><HOP><NAME>x</NAME><VERSION>1</VERSION><MASH_STEPS/></HOP></HOPS>";
        let report = validator().validate(doc.as_bytes());
        assert!(report.is_valid());
        assert!(report.ignored[0]
            .message
            .starts_with("element 'MASH_STEPS' is not allowed for content model"));
    }

    #[test]
    fn bad_decimal_is_fatal() {
        let doc = HOP_DOC.replace("<ALPHA>5.5</ALPHA>", "<ALPHA>five</ALPHA>");
        let report = validator().validate(doc.as_bytes());
        assert!(!report.is_valid());
        assert_eq!(report.fatal[0].line, 6);
        assert!(report.fatal[0].message.contains("not a valid decimal"));
    }

    #[test]
    fn missing_required_name_is_fatal() {
        let doc = HOP_DOC.replace("<NAME>Cascade</NAME>", "");
        let report = validator().validate(doc.as_bytes());
        assert_eq!(report.fatal.len(), 1);
        assert!(report.fatal[0].message.contains("missing 'NAME'"));
        assert_eq!(report.fatal[0].line, 3);
    }

    #[test]
    fn malformed_xml_is_fatal() {
        let doc = "<?xml version=\"1.0\"?>\n<HOPS>\n<HOP>\n</HOPS>\n";
        let report = validator().validate(doc.as_bytes());
        assert!(!report.is_valid());
        assert!(report.fatal[0].message.starts_with("malformed document"));
    }

    #[test]
    fn documents_without_declaration_are_wrapped_first() {
        let doc = "<HOP><NAME>x</NAME><VERSION>1</VERSION><ALPHA>oops</ALPHA></HOP>";
        let report = validator().validate(doc.as_bytes());
        assert_eq!(report.fatal.len(), 1);
        assert_eq!(report.fatal[0].line, 1);
    }

    #[test]
    fn latin1_documents_are_decoded_before_checking() {
        let mut doc = HOP_DOC.as_bytes().to_vec();
        let at = HOP_DOC.find("Cascade").unwrap() + 1;
        doc[at] = 0xFC;
        let report = validator().validate(&doc);
        assert!(report.is_valid(), "{:?}", report.fatal);
    }

    #[test]
    fn undecodable_bytes_are_fatal_on_their_line() {
        let doc = b"<?xml version=\"1.0\"?>\n<HOPS>\n<HOP><NAME>\xFC</NAME></HOP>\n</HOPS>\n";
        let report = validator().validate(doc);
        assert!(!report.is_valid());
        assert_eq!(report.fatal[0].line, 3);
        assert!(report.fatal[0].message.contains("UTF-8"));
    }

    #[test]
    fn wrap_inserts_one_line() {
        let (wrapped, line) = wrap("<?xml version=\"1.0\"?>\n<HOPS/>\n");
        assert_eq!(line, 2);
        assert_eq!(wrapped, "<?xml version=\"1.0\"?>\n<BEER_XML>\n<HOPS/>\n\n</BEER_XML>");
    }
}
