//! Placeholder templates, compiled once at catalogue load time.
//!
//! A template like `/users/{user_id}` is scanned into a list of literal and
//! placeholder segments. Rendering walks the segments, so per-call work never
//! involves string replacement, and "does every placeholder have a declared
//! parameter" is answered exactly once, when the catalogue loads.
//!
//! Only a well-formed `{identifier}` token is a placeholder (letters, digits,
//! `_`, `-`). Any other `{` is literal text; body templates are frequently
//! JSON, where bare braces are everywhere.

use std::fmt;

/// Which of an endpoint's templates a diagnostic refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateKind {
    Url,
    Body,
}

impl fmt::Display for TemplateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TemplateKind::Url => f.write_str("URL"),
            TemplateKind::Body => f.write_str("body"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Param(String),
}

/// A compiled template: the original source plus its segment list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    source: String,
    segments: Vec<Segment>,
}

fn is_placeholder_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'-'
}

impl Template {
    /// Scan `source` into literal and placeholder segments.
    ///
    /// Scanning is total: a `{` that does not open a `{identifier}` token is
    /// kept as literal text, matching exact-token substitution semantics.
    #[must_use]
    pub fn parse(source: &str) -> Self {
        let mut segments: Vec<Segment> = Vec::new();
        let mut literal = String::new();
        let mut rest = source;

        while let Some(open) = rest.find('{') {
            literal.push_str(&rest[..open]);
            let after = &rest[open + 1..];

            let token_len = after
                .bytes()
                .take_while(|b| is_placeholder_byte(*b))
                .count();

            if token_len > 0 && after.as_bytes().get(token_len) == Some(&b'}') {
                if !literal.is_empty() {
                    segments.push(Segment::Literal(std::mem::take(&mut literal)));
                }
                segments.push(Segment::Param(after[..token_len].to_string()));
                rest = &after[token_len + 1..];
            } else {
                literal.push('{');
                rest = after;
            }
        }
        literal.push_str(rest);
        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        Self {
            source: source.to_string(),
            segments,
        }
    }

    /// The template text as written in the catalogue.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Placeholder names in order of appearance (duplicates included).
    pub fn param_names(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|s| match s {
            Segment::Param(name) => Some(name.as_str()),
            Segment::Literal(_) => None,
        })
    }

    #[must_use]
    pub fn has_params(&self) -> bool {
        self.param_names().next().is_some()
    }

    /// Render by substituting each placeholder with `lookup(name)`.
    ///
    /// A `None` substitutes the empty string; callers that cannot tolerate
    /// that (path templates) guarantee presence beforehand.
    pub fn render<F>(&self, mut lookup: F) -> String
    where
        F: FnMut(&str) -> Option<String>,
    {
        let mut out = String::with_capacity(self.source.len());
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Param(name) => {
                    if let Some(value) = lookup(name) {
                        out.push_str(&value);
                    }
                }
            }
        }
        out
    }
}
