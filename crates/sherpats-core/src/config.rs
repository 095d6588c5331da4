//! Generator configuration types

use serde::{Deserialize, Serialize};

use crate::error::{GenerateError, GenerateResult};
use crate::naming::is_reserved;

/// Options that change the shape of the generated module
///
/// The options are independent and can be combined freely.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateOptions {
    /// Wrap the whole module in `export namespace <name> { ... }`
    #[serde(default)]
    pub namespace: Option<String>,

    /// Render every array type as also nullable
    ///
    /// Mirrors servers where an absent or empty list is indistinguishable
    /// from null.
    #[serde(default)]
    pub slices_nullable: bool,

    /// Render struct members whose type is nullable as optional (`name?:`)
    ///
    /// With `slices_nullable`, array members become optional as well.
    #[serde(default)]
    pub nullable_optional: bool,
}

impl GenerateOptions {
    /// Create options with every toggle off
    pub fn new() -> Self {
        Self::default()
    }

    /// Create options from JSON bytes
    pub fn from_json(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        if bytes.is_empty() {
            return Ok(Self::default());
        }
        serde_json::from_slice(bytes)
    }

    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    pub fn with_slices_nullable(mut self, enabled: bool) -> Self {
        self.slices_nullable = enabled;
        self
    }

    pub fn with_nullable_optional(mut self, enabled: bool) -> Self {
        self.nullable_optional = enabled;
        self
    }

    /// Check that the options can be rendered as valid TypeScript.
    ///
    /// A namespace is one or more dot-separated ASCII identifiers, none of
    /// them a reserved word.
    pub fn validate(&self) -> GenerateResult<()> {
        let Some(namespace) = &self.namespace else {
            return Ok(());
        };
        let invalid = |reason| GenerateError::InvalidNamespace {
            name: namespace.clone(),
            reason,
        };
        if namespace.is_empty() {
            return Err(invalid("empty name"));
        }
        for segment in namespace.split('.') {
            if !is_identifier(segment) {
                return Err(invalid("not a valid identifier"));
            }
            if is_reserved(segment) {
                return Err(invalid("reserved word"));
            }
        }
        Ok(())
    }

    /// Whether a struct member with these typewords is rendered optional
    pub fn is_optional_member(&self, typewords: &[String]) -> bool {
        if !self.nullable_optional {
            return false;
        }
        match typewords.first().map(String::as_str) {
            Some("nullable") => true,
            Some("[]") => self.slices_nullable,
            _ => false,
        }
    }
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

/// Where the generated client sends its calls
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BaseUrl {
    /// A fixed URL, used as is
    Explicit(String),

    /// An API name, resolved at runtime relative to the current page location
    ApiName(String),
}

impl BaseUrl {
    /// Interpret a command line target.
    ///
    /// Anything containing a slash is a URL, anything else is an API name.
    pub fn parse(target: &str) -> Self {
        if target.contains('/') {
            BaseUrl::Explicit(target.to_string())
        } else {
            BaseUrl::ApiName(target.to_string())
        }
    }
}
