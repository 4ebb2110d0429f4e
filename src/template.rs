//! Test command template.
//!
//! Arguments may reference cluster endpoints as `{WTF_HOST}`,
//! `{HYPERDEX_PORT}` and so on; `{{` and `}}` stand for literal braces.
//! Templates are parsed before bring-up so a typo fails fast, and rendered
//! once the cluster is up.

use std::collections::BTreeMap;

use crate::Result;
use crate::TemplateError;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Token(String),
}

/// Values substituted into a [`CommandTemplate`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Bindings(BTreeMap<String, String>);

impl Bindings {
    pub fn insert(
        &mut self,
        token: impl Into<String>,
        value: impl Into<String>,
    ) {
        self.0.insert(token.into(), value.into());
    }

    /// Binds `<LAYER>_HOST` and `<LAYER>_PORT`.
    pub fn bind_endpoint(
        &mut self,
        layer: &str,
        host: &str,
        port: u16,
    ) {
        let prefix = layer.to_ascii_uppercase();
        self.insert(format!("{prefix}_HOST"), host);
        self.insert(format!("{prefix}_PORT"), port.to_string());
    }

    pub fn get(
        &self,
        token: &str,
    ) -> Option<&str> {
        self.0.get(token).map(String::as_str)
    }
}

#[derive(Debug, Clone)]
pub struct CommandTemplate {
    raw: Vec<String>,
    args: Vec<Vec<Segment>>,
}

impl CommandTemplate {
    pub fn parse(raw: Vec<String>) -> Result<Self> {
        if raw.is_empty() {
            return Err(TemplateError::Empty.into());
        }
        let args = raw.iter().map(|arg| parse_arg(arg)).collect::<Result<Vec<_>>>()?;
        Ok(Self { raw, args })
    }

    /// Fails on the first placeholder `bindings` cannot resolve.
    pub fn check(
        &self,
        bindings: &Bindings,
    ) -> Result<()> {
        for (raw, segments) in self.raw.iter().zip(&self.args) {
            for segment in segments {
                if let Segment::Token(name) = segment {
                    if bindings.get(name).is_none() {
                        return Err(TemplateError::UnknownToken {
                            token: name.clone(),
                            arg: raw.clone(),
                        }
                        .into());
                    }
                }
            }
        }
        Ok(())
    }

    pub fn render(
        &self,
        bindings: &Bindings,
    ) -> Result<Vec<String>> {
        self.check(bindings)?;
        let rendered = self
            .args
            .iter()
            .map(|segments| {
                segments
                    .iter()
                    .map(|segment| match segment {
                        Segment::Literal(text) => text.as_str(),
                        Segment::Token(name) => bindings.get(name).unwrap_or_default(),
                    })
                    .collect::<String>()
            })
            .collect();
        Ok(rendered)
    }
}

fn parse_arg(arg: &str) -> Result<Vec<Segment>> {
    let mut segments = Vec::new();
    let mut literal = String::new();
    let mut chars = arg.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '{' if chars.peek() == Some(&'{') => {
                chars.next();
                literal.push('{');
            }
            '}' if chars.peek() == Some(&'}') => {
                chars.next();
                literal.push('}');
            }
            '{' => {
                let mut name = String::new();
                loop {
                    match chars.next() {
                        Some('}') => break,
                        Some('{') | None => {
                            return Err(TemplateError::Unterminated(arg.to_string()).into());
                        }
                        Some(c) => name.push(c),
                    }
                }
                if name.is_empty() {
                    return Err(TemplateError::UnknownToken {
                        token: name,
                        arg: arg.to_string(),
                    }
                    .into());
                }
                if !literal.is_empty() {
                    segments.push(Segment::Literal(std::mem::take(&mut literal)));
                }
                segments.push(Segment::Token(name));
            }
            '}' => return Err(TemplateError::UnmatchedBrace(arg.to_string()).into()),
            c => literal.push(c),
        }
    }
    if !literal.is_empty() || segments.is_empty() {
        segments.push(Segment::Literal(literal));
    }
    Ok(segments)
}
