//! Wrapper types for the BeerXML grammar file.
//!
//! The grammar describes, per element, which typed text fields and which
//! nested elements it may contain. Siblings may appear in any order.

use serde::Deserialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SimpleType {
    String,
    Decimal,
    Integer,
    Boolean,
    Date,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FieldDecl {
    #[serde(rename = "type")]
    pub field_type: SimpleType,
    #[serde(default)]
    pub required: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChildDecl {
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub repeated: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ElementDecl {
    #[serde(default)]
    pub fields: BTreeMap<String, FieldDecl>,
    #[serde(default)]
    pub children: BTreeMap<String, ChildDecl>,
}

#[derive(Debug, Deserialize)]
pub struct GrammarFile {
    pub schema_version: String,
    pub root: String,
    pub elements: BTreeMap<String, ElementDecl>,
}
