//! Minimal XML element tree for structured device output.
//!
//! Devices render show commands as XML with `| format`. The decoders only
//! need element names, text content and nesting, so the token stream from
//! `maybe_xml` is folded into a small owned [`Element`] tree. Namespace
//! prefixes are dropped from element names; attributes, comments and
//! processing instructions are ignored. CDATA sections contribute their
//! content verbatim. Character data has the predefined and numeric
//! character references resolved; any other entity is an error.

use std::io::BufReader;

use maybe_xml::eval::bufread::BufReadEvaluator;
use maybe_xml::token::owned::Token;

use crate::error::{ParseError, Result};

const CDATA_OPEN: &str = "<![CDATA[";
const CDATA_CLOSE: &str = "]]>";

/// Name of the synthetic element that holds the document's top-level
/// elements.
pub const DOCUMENT: &str = "#document";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub name: String,
    pub text: String,
    pub children: Vec<Element>,
}

impl Element {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            text: String::new(),
            children: Vec::new(),
        }
    }

    /// First direct child called `name`.
    pub fn child(&self, name: &str) -> Option<&Element> {
        self.children.iter().find(|child| child.name == name)
    }

    /// Every direct child called `name`, in document order.
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> + 'a {
        self.children.iter().filter(move |child| child.name == name)
    }

    /// Follows a path of child names.
    pub fn find(&self, path: &[&str]) -> Option<&Element> {
        path.iter().try_fold(self, |element, name| element.child(name))
    }

    /// Trimmed text of the child called `name`.
    pub fn child_text(&self, name: &str) -> Option<&str> {
        self.child(name).map(|child| child.text.trim())
    }
}

/// Parses `xml` into a tree rooted at a synthetic [`DOCUMENT`] element.
///
/// # Errors
///
/// Returns [`ParseError::Xml`] for non-UTF-8 names or text, for end tags
/// that do not close the innermost open element, and for entities other
/// than the predefined and numeric character references.
pub fn parse_document(xml: &str) -> Result<Element> {
    let reader = BufReader::new(xml.as_bytes());
    let evaluator = BufReadEvaluator::from_reader(reader);
    let mut stack = vec![Element::new(DOCUMENT)];

    for token in evaluator.into_iter() {
        match token {
            Token::StartTag(tag) => {
                let name = tag.name();
                let name = name.to_str().map_err(invalid_utf8)?;
                stack.push(Element::new(local_name(name)));
            }
            Token::EmptyElementTag(tag) => {
                let name = tag.name();
                let name = name.to_str().map_err(invalid_utf8)?;
                innermost(&mut stack)?
                    .children
                    .push(Element::new(local_name(name)));
            }
            Token::EndTag(tag) => {
                let name = tag.name();
                let name = local_name(name.to_str().map_err(invalid_utf8)?);
                let open = if stack.len() > 1 { stack.pop() } else { None };
                let Some(element) = open else {
                    return Err(ParseError::Xml(format!("unexpected closing tag </{name}>")));
                };
                if element.name != name {
                    return Err(ParseError::Xml(format!(
                        "closing tag </{name}> does not match <{}>",
                        element.name
                    )));
                }
                innermost(&mut stack)?.children.push(element);
            }
            Token::Characters(chars) => {
                let text = chars.to_str().map_err(invalid_utf8)?;
                let text = decode_entities(text)?;
                innermost(&mut stack)?.text.push_str(&text);
            }
            Token::Cdata(cdata) => {
                let raw = cdata.to_str().map_err(invalid_utf8)?;
                let content = raw
                    .strip_prefix(CDATA_OPEN)
                    .and_then(|rest| rest.strip_suffix(CDATA_CLOSE))
                    .ok_or_else(|| ParseError::Xml(format!("malformed CDATA section `{raw}`")))?;
                innermost(&mut stack)?.text.push_str(content);
            }
            Token::Eof => break,
            _ => {}
        }
    }

    if stack.len() > 1 {
        let open: Vec<&str> = stack[1..].iter().map(|e| e.name.as_str()).collect();
        return Err(ParseError::Xml(format!("unclosed elements: {}", open.join(" > "))));
    }
    stack
        .pop()
        .ok_or_else(|| ParseError::Xml("empty element stack".to_string()))
}

fn innermost(stack: &mut [Element]) -> Result<&mut Element> {
    stack
        .last_mut()
        .ok_or_else(|| ParseError::Xml("empty element stack".to_string()))
}

fn local_name(name: &str) -> &str {
    name.rsplit_once(':').map_or(name, |(_, local)| local)
}

fn invalid_utf8(err: std::str::Utf8Error) -> ParseError {
    ParseError::Xml(format!("invalid UTF-8: {err}"))
}

fn decode_entities(text: &str) -> Result<String> {
    if !text.contains('&') {
        return Ok(text.to_string());
    }

    let mut decoded = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(start) = rest.find('&') {
        decoded.push_str(&rest[..start]);
        let after = &rest[start + 1..];
        let Some(end) = after.find(';') else {
            return Err(ParseError::Xml(format!("unterminated entity in `{text}`")));
        };
        decoded.push(resolve_entity(&after[..end])?);
        rest = &after[end + 1..];
    }
    decoded.push_str(rest);
    Ok(decoded)
}

fn resolve_entity(entity: &str) -> Result<char> {
    let code = match entity {
        "lt" => return Ok('<'),
        "gt" => return Ok('>'),
        "amp" => return Ok('&'),
        "quot" => return Ok('"'),
        "apos" => return Ok('\''),
        _ => match entity.strip_prefix("#x").or_else(|| entity.strip_prefix("#X")) {
            Some(hex) => u32::from_str_radix(hex, 16).ok(),
            None => entity.strip_prefix('#').and_then(|dec| dec.parse::<u32>().ok()),
        },
    };
    code.and_then(char::from_u32)
        .ok_or_else(|| ParseError::Xml(format!("unsupported entity `&{entity};`")))
}
