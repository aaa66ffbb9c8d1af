//! HTTP path template compiler.
//!
//! # Responsibilities
//! - Parse a path template string into a structured `UriTemplate`
//! - Reject malformed templates with a precise `ParseError`
//! - Classify templates by specificity for route ordering
//! - Render templates back to canonical form and to anchored regexes
//!
//! # Grammar
//! ```text
//! Template = "/" [ Segments ] [ ":" Verb ]
//! Segments = Segment { "/" Segment }
//! Segment  = "*" | "**" | LITERAL | Variable
//! Variable = "{" NAME [ "=" ( "*" | "**" ) ] "}"
//! ```
//!
//! # Design Decisions
//! - Segments are a sum type, never a regex string
//! - `{x}` and `{x=*}` compile to the same value
//! - A multi-segment construct may only appear last
//! - Missing leading `/` is added before parsing

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};
use thiserror::Error;

/// Errors produced while compiling a path template.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("path template is empty")]
    Empty,

    #[error("unbalanced braces in path template {template:?}")]
    UnbalancedBraces { template: String },

    #[error("nested braces in path template {template:?}")]
    NestedBraces { template: String },

    #[error("empty segment in path template {template:?}")]
    EmptySegment { template: String },

    #[error("invalid variable {variable:?} in path template {template:?}")]
    InvalidVariable { template: String, variable: String },

    #[error("variable {name:?} bound more than once in path template {template:?}")]
    DuplicateVariable { template: String, name: String },

    #[error("invalid literal segment {segment:?} in path template {template:?}")]
    InvalidLiteral { template: String, segment: String },

    #[error("more than one multi-segment wildcard in path template {template:?}")]
    MultipleMultiSegment { template: String },

    #[error("multi-segment wildcard must be the last segment in path template {template:?}")]
    MultiSegmentNotLast { template: String },

    #[error("invalid verb {verb:?} in path template {template:?}")]
    InvalidVerb { template: String, verb: String },
}

/// One `/`-separated piece of a template.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Segment {
    /// Matched verbatim.
    Literal(String),
    /// `*`: exactly one segment, not captured.
    Wildcard,
    /// `**`: one or more trailing segments, not captured.
    MultiWildcard,
    /// `{name}` or `{name=*}`.
    Variable { name: String },
    /// `{name=**}`.
    MultiVariable { name: String },
}

impl Segment {
    pub fn is_multi_segment(&self) -> bool {
        matches!(self, Segment::MultiWildcard | Segment::MultiVariable { .. })
    }

    pub fn is_single_segment_capture(&self) -> bool {
        matches!(self, Segment::Wildcard | Segment::Variable { .. })
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Literal(lit) => f.write_str(lit),
            Segment::Wildcard => f.write_str("*"),
            Segment::MultiWildcard => f.write_str("**"),
            Segment::Variable { name } => write!(f, "{{{}}}", name),
            Segment::MultiVariable { name } => write!(f, "{{{}=**}}", name),
        }
    }
}

/// How specific a template is. Lower sorts first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Specificity {
    /// Only literal segments.
    Literal,
    /// At least one `*` or `{name}`, no multi-segment construct.
    SingleSegment,
    /// Ends in `**` or `{name=**}`.
    MultiSegment,
}

/// A compiled path template.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UriTemplate {
    segments: Vec<Segment>,
    verb: Option<String>,
}

impl UriTemplate {
    /// Compile a raw path template.
    pub fn parse(raw: &str) -> Result<Self, ParseError> {
        if raw.is_empty() {
            return Err(ParseError::Empty);
        }

        let template = if raw.starts_with('/') {
            raw.to_string()
        } else {
            format!("/{}", raw)
        };

        let body = &template[1..];
        if body.is_empty() {
            return Ok(Self {
                segments: Vec::new(),
                verb: None,
            });
        }

        let (raw_segments, verb) = split_body(body, &template)?;

        let mut segments = Vec::with_capacity(raw_segments.len());
        for raw_segment in raw_segments {
            segments.push(parse_segment(raw_segment, &template)?);
        }

        validate_segments(&segments, &template)?;

        Ok(Self {
            segments,
            verb: verb.map(str::to_string),
        })
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn verb(&self) -> Option<&str> {
        self.verb.as_deref()
    }

    /// Names of all captured variables, in order.
    pub fn variables(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|s| match s {
            Segment::Variable { name } | Segment::MultiVariable { name } => Some(name.as_str()),
            _ => None,
        })
    }

    pub fn specificity(&self) -> Specificity {
        if self.segments.iter().any(Segment::is_multi_segment) {
            Specificity::MultiSegment
        } else if self.segments.iter().any(Segment::is_single_segment_capture) {
            Specificity::SingleSegment
        } else {
            Specificity::Literal
        }
    }

    /// The same template with every capture replaced by its anonymous
    /// wildcard. Templates with equal shapes match exactly the same paths.
    pub fn shape(&self) -> UriTemplate {
        let segments = self
            .segments
            .iter()
            .map(|s| match s {
                Segment::Variable { .. } => Segment::Wildcard,
                Segment::MultiVariable { .. } => Segment::MultiWildcard,
                other => other.clone(),
            })
            .collect();
        UriTemplate {
            segments,
            verb: self.verb.clone(),
        }
    }

    pub fn is_literal(&self) -> bool {
        self.specificity() == Specificity::Literal
    }

    /// Anchored regex matching every request path this template accepts.
    ///
    /// With `disallow_colon` set, single-segment captures do not match `:`
    /// so that a trailing verb cannot be swallowed by a wildcard.
    pub fn to_regex(&self, disallow_colon: bool) -> String {
        let single = if disallow_colon { "[^/:]+" } else { "[^/]+" };

        let mut out = String::from("^");
        if self.segments.is_empty() {
            out.push('/');
        }
        for segment in &self.segments {
            out.push('/');
            match segment {
                Segment::Literal(lit) => out.push_str(&regex::escape(lit)),
                Segment::Wildcard | Segment::Variable { .. } => out.push_str(single),
                Segment::MultiWildcard | Segment::MultiVariable { .. } => out.push_str(".+"),
            }
        }
        if let Some(verb) = &self.verb {
            out.push_str(&regex::escape(&format!(":{}", verb)));
        }
        out.push('$');
        out
    }
}

impl fmt::Display for UriTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            f.write_str("/")?;
        }
        for segment in &self.segments {
            write!(f, "/{}", segment)?;
        }
        if let Some(verb) = &self.verb {
            write!(f, ":{}", verb)?;
        }
        Ok(())
    }
}

impl FromStr for UriTemplate {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for UriTemplate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Split the template body (after the leading `/`) into raw segments and an
/// optional verb. Only `/` and `:` outside braces are significant.
fn split_body<'a>(
    body: &'a str,
    template: &str,
) -> Result<(Vec<&'a str>, Option<&'a str>), ParseError> {
    let mut segments = Vec::new();
    let mut start = 0;
    let mut end = body.len();
    let mut in_braces = false;
    let mut verb = None;

    for (i, c) in body.char_indices() {
        match c {
            '{' => {
                if in_braces {
                    return Err(ParseError::NestedBraces {
                        template: template.to_string(),
                    });
                }
                in_braces = true;
            }
            '}' => {
                if !in_braces {
                    return Err(ParseError::UnbalancedBraces {
                        template: template.to_string(),
                    });
                }
                in_braces = false;
            }
            '/' if !in_braces => {
                segments.push(&body[start..i]);
                start = i + 1;
            }
            ':' if !in_braces => {
                end = i;
                verb = Some(&body[i + 1..]);
                break;
            }
            _ => {}
        }
    }

    if in_braces {
        return Err(ParseError::UnbalancedBraces {
            template: template.to_string(),
        });
    }

    if let Some(v) = verb {
        if v.is_empty() || v.contains(['/', '{', '}', ':']) {
            return Err(ParseError::InvalidVerb {
                template: template.to_string(),
                verb: v.to_string(),
            });
        }
    }

    segments.push(&body[start..end]);
    Ok((segments, verb))
}

fn parse_segment(raw: &str, template: &str) -> Result<Segment, ParseError> {
    match raw {
        "" => Err(ParseError::EmptySegment {
            template: template.to_string(),
        }),
        "*" => Ok(Segment::Wildcard),
        "**" => Ok(Segment::MultiWildcard),
        _ if raw.starts_with('{') => parse_variable(raw, template),
        _ if raw.contains(['{', '}', '*']) => Err(ParseError::InvalidLiteral {
            template: template.to_string(),
            segment: raw.to_string(),
        }),
        _ => Ok(Segment::Literal(raw.to_string())),
    }
}

fn parse_variable(raw: &str, template: &str) -> Result<Segment, ParseError> {
    let invalid = || ParseError::InvalidVariable {
        template: template.to_string(),
        variable: raw.to_string(),
    };

    let inner = raw
        .strip_prefix('{')
        .and_then(|s| s.strip_suffix('}'))
        .ok_or_else(invalid)?;

    let (name, assignment) = match inner.split_once('=') {
        Some((name, assignment)) => (name, Some(assignment)),
        None => (inner, None),
    };

    if !is_field_path(name) {
        return Err(invalid());
    }

    let name = name.to_string();
    match assignment {
        None | Some("*") => Ok(Segment::Variable { name }),
        Some("**") => Ok(Segment::MultiVariable { name }),
        Some(_) => Err(invalid()),
    }
}

/// `a`, `a_b`, `message.field`.
fn is_field_path(name: &str) -> bool {
    !name.is_empty()
        && name
            .split('.')
            .all(|part| !part.is_empty() && part.chars().all(|c| c.is_ascii_alphanumeric() || c == '_'))
}

fn validate_segments(segments: &[Segment], template: &str) -> Result<(), ParseError> {
    let multi_count = segments.iter().filter(|s| s.is_multi_segment()).count();
    if multi_count > 1 {
        return Err(ParseError::MultipleMultiSegment {
            template: template.to_string(),
        });
    }
    if let Some(pos) = segments.iter().position(Segment::is_multi_segment) {
        if pos != segments.len() - 1 {
            return Err(ParseError::MultiSegmentNotLast {
                template: template.to_string(),
            });
        }
    }

    let mut seen = HashSet::new();
    for segment in segments {
        if let Segment::Variable { name } | Segment::MultiVariable { name } = segment {
            if !seen.insert(name.as_str()) {
                return Err(ParseError::DuplicateVariable {
                    template: template.to_string(),
                    name: name.clone(),
                });
            }
        }
    }

    Ok(())
}
