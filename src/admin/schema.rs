use std::fmt;

use config::ConfigError;
use serde::Deserialize;
use serde::Serialize;

use crate::Error;
use crate::Result;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AttributeType {
    String,
    Int,
    Float,
    Document,
}

impl fmt::Display for AttributeType {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        let name = match self {
            AttributeType::String => "string",
            AttributeType::Int => "int",
            AttributeType::Float => "float",
            AttributeType::Document => "document",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Attribute {
    #[serde(rename = "type")]
    pub kind: AttributeType,
    pub name: String,
}

/// Declarative space definition: a key field and an ordered list of typed
/// attributes. `Display` yields the text accepted by `add-space`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct SpaceSchema {
    pub name: String,
    pub key: String,
    pub attributes: Vec<Attribute>,
}

impl SpaceSchema {
    /// Metadata space the WTF daemons and coordinator expect to find.
    pub fn wtf_metadata() -> Self {
        let attr = |kind, name: &str| Attribute {
            kind,
            name: name.to_string(),
        };
        Self {
            name: "wtf".to_string(),
            key: "path".to_string(),
            attributes: vec![
                attr(AttributeType::String, "blockmap"),
                attr(AttributeType::Int, "directory"),
                attr(AttributeType::Int, "mode"),
                attr(AttributeType::String, "owner"),
                attr(AttributeType::String, "group"),
            ],
        }
    }

    pub fn validate(&self) -> Result<()> {
        let mut names = std::collections::HashSet::new();
        names.insert(self.key.as_str());
        for name in std::iter::once(&self.name)
            .chain(std::iter::once(&self.key))
            .chain(self.attributes.iter().map(|a| &a.name))
        {
            if name.is_empty() || name.contains(char::is_whitespace) || name.contains(',') {
                return Err(invalid(format!("invalid identifier {name:?} in admin.space")));
            }
        }
        for attr in &self.attributes {
            if !names.insert(attr.name.as_str()) {
                return Err(invalid(format!(
                    "attribute {} declared twice in space {}",
                    attr.name, self.name
                )));
            }
        }
        Ok(())
    }
}

impl fmt::Display for SpaceSchema {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(f, "space {} key {}", self.name, self.key)?;
        if self.attributes.is_empty() {
            return Ok(());
        }
        f.write_str(" attributes ")?;
        for (i, attr) in self.attributes.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{} {}", attr.kind, attr.name)?;
        }
        Ok(())
    }
}

fn invalid(msg: String) -> Error {
    Error::Config(ConfigError::Message(msg))
}
