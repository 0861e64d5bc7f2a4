use serde::Deserialize;
use std::collections::{BTreeMap, BTreeSet};
use std::convert::TryFrom;
use std::error::Error;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum TemplateError {
    InvalidPlaceholder { template: String, position: usize },
    MissingBinding { template: String, key: String },
}
pub type Result<T> = std::result::Result<T, TemplateError>;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Placeholder(String),
}

/// A name template with `$key` or `${key}` placeholders (`$$` is a literal dollar sign).
///
/// Templates are parsed once, when the QC specification is loaded. Substituting bindings
/// into a parsed template can then only fail because of a missing binding, never because
/// of a syntax error.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub struct Template {
    source: String,
    segments: Vec<Segment>,
}

impl Template {
    pub fn parse(source: &str) -> Result<Template> {
        let invalid = |position| TemplateError::InvalidPlaceholder {
            template: source.to_string(),
            position,
        };

        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut chars = source.char_indices().peekable();
        while let Some((position, c)) = chars.next() {
            if c != '$' {
                literal.push(c);
                continue;
            }

            let key = match chars.peek() {
                Some(&(_, '$')) => {
                    chars.next();
                    literal.push('$');
                    continue;
                }
                Some(&(_, '{')) => {
                    chars.next();
                    let mut key = String::new();
                    loop {
                        match chars.next() {
                            Some((_, '}')) => break,
                            Some((_, c)) => key.push(c),
                            None => return Err(invalid(position)),
                        }
                    }
                    key
                }
                _ => {
                    let mut key = String::new();
                    while let Some(&(_, c)) = chars.peek() {
                        if c.is_ascii_alphanumeric() || c == '_' {
                            key.push(c);
                            chars.next();
                        } else {
                            break;
                        }
                    }
                    key
                }
            };

            if !is_identifier(&key) {
                return Err(invalid(position));
            }
            if !literal.is_empty() {
                segments.push(Segment::Literal(std::mem::replace(&mut literal, String::new())));
            }
            segments.push(Segment::Placeholder(key));
        }
        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        Ok(Template {
            source: source.to_string(),
            segments,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// All keys the template needs bindings for.
    pub fn placeholders(&self) -> BTreeSet<&str> {
        self.segments
            .iter()
            .filter_map(|segment| match segment {
                Segment::Placeholder(key) => Some(key.as_str()),
                Segment::Literal(_) => None,
            })
            .collect()
    }

    /// Substitutes all placeholders with their bound values.
    /// Bindings the template does not reference are ignored.
    pub fn resolve(&self, bindings: &BTreeMap<String, String>) -> Result<String> {
        let mut result = String::with_capacity(self.source.len());
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => result.push_str(text),
                Segment::Placeholder(key) => match bindings.get(key) {
                    Some(value) => result.push_str(value),
                    None => {
                        return Err(TemplateError::MissingBinding {
                            template: self.source.clone(),
                            key: key.clone(),
                        })
                    }
                },
            }
        }

        Ok(result)
    }

    /// Same as resolve, but only considers the bindings for the given keys.
    /// Used for row names, whose template may only see the declared row entities.
    pub fn resolve_restricted(
        &self,
        bindings: &BTreeMap<String, String>,
        allowed_keys: &[String],
    ) -> Result<String> {
        let restricted: BTreeMap<String, String> = bindings
            .iter()
            .filter(|(key, _)| allowed_keys.contains(*key))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();

        self.resolve(&restricted)
    }
}

fn is_identifier(key: &str) -> bool {
    let mut chars = key.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

impl TryFrom<String> for Template {
    type Error = TemplateError;

    fn try_from(source: String) -> Result<Self> {
        Template::parse(&source)
    }
}

impl fmt::Display for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.source)
    }
}

// Error Boilerplate (Error display, conversion and source)
impl fmt::Display for TemplateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidPlaceholder { template, position } => write!(
                f,
                "Invalid placeholder at position {} in template '{}'",
                position, template
            ),
            Self::MissingBinding { template, key } => write!(
                f,
                "Template '{}' references '{}', which has no value",
                template, key
            ),
        }
    }
}
impl Error for TemplateError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn bindings(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn resolves_both_placeholder_styles() {
        let template = Template::parse("sub-$subject/ses-${session}_x").unwrap();
        let name = template
            .resolve(&bindings(&[("subject", "01"), ("session", "A"), ("run", "1")]))
            .unwrap();
        assert_eq!(name, "sub-01/ses-A_x");

        let keys: Vec<_> = template.placeholders().into_iter().collect();
        assert_eq!(keys, vec!["session", "subject"]);
    }

    #[test]
    fn dollar_escape_and_plain_text() {
        let template = Template::parse("cost $$5 for ${desc}").unwrap();
        assert_eq!(
            template.resolve(&bindings(&[("desc", "T1")])).unwrap(),
            "cost $5 for T1"
        );
        assert_eq!(Template::parse("plain").unwrap().placeholders().len(), 0);
    }

    #[test]
    fn rejects_malformed_placeholders() {
        for source in &["$", "a $ b", "${unclosed", "${1abc}", "$-x", "${}"] {
            match Template::parse(source) {
                Err(TemplateError::InvalidPlaceholder { .. }) => (),
                other => panic!("'{}' must not parse, got {:?}", source, other),
            }
        }
    }

    #[test]
    fn missing_binding_is_reported() {
        let template = Template::parse("sub-${subject}_${desc}").unwrap();
        match template.resolve(&bindings(&[("subject", "01")])) {
            Err(TemplateError::MissingBinding { key, .. }) => assert_eq!(key, "desc"),
            other => panic!("Must report the missing key, got {:?}", other),
        }
    }

    #[test]
    fn restricted_resolution_hides_other_keys() {
        let template = Template::parse("${subject}_${session}").unwrap();
        let values = bindings(&[("subject", "01"), ("session", "A")]);

        assert_eq!(
            template
                .resolve_restricted(&values, &["subject".to_string(), "session".to_string()])
                .unwrap(),
            "01_A"
        );
        assert!(template
            .resolve_restricted(&values, &["subject".to_string()])
            .is_err());
    }

    #[test]
    fn deserializes_from_json_string() {
        let template: Template = serde_json::from_str("\"sub-${subject}\"").unwrap();
        assert_eq!(template.as_str(), "sub-${subject}");
        assert!(serde_json::from_str::<Template>("\"sub-$\"").is_err());
    }
}
