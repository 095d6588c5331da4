//! Sherpadoc document model
//!
//! A sherpadoc document is a tree of [`Section`]s. Each section holds its own
//! structs, enums and functions plus nested sections. The JSON encoding uses
//! PascalCase keys and may carry `null` for empty lists.

use serde::{Deserialize, Deserializer};

use crate::error::{GenerateError, GenerateResult};

/// The only sherpadoc version this generator understands.
pub const SHERPADOC_VERSION: i64 = 1;

/// A named grouping of declarations, the root of a sherpadoc document.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Section {
    pub name: String,

    #[serde(default)]
    pub docs: String,

    #[serde(default, deserialize_with = "null_as_empty")]
    pub functions: Vec<Function>,

    #[serde(default, deserialize_with = "null_as_empty")]
    pub sections: Vec<Section>,

    #[serde(default, deserialize_with = "null_as_empty")]
    pub structs: Vec<Struct>,

    #[serde(default, deserialize_with = "null_as_empty")]
    pub ints: Vec<IntEnum>,

    #[serde(default, deserialize_with = "null_as_empty")]
    pub strings: Vec<StringEnum>,

    /// API version, only present on the root section
    #[serde(default)]
    pub version: Option<String>,

    /// Sherpa protocol version, only present on the root section
    #[serde(default)]
    pub sherpa_version: Option<i64>,

    /// Document format version, only meaningful on the root section
    #[serde(default)]
    pub sherpadoc_version: i64,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Function {
    pub name: String,

    #[serde(default)]
    pub docs: String,

    #[serde(default, deserialize_with = "null_as_empty")]
    pub params: Vec<Arg>,

    #[serde(default, deserialize_with = "null_as_empty")]
    pub returns: Vec<Arg>,
}

/// A function parameter or return value.
///
/// Return values may be unnamed.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Arg {
    #[serde(default)]
    pub name: String,

    #[serde(default, deserialize_with = "null_as_empty")]
    pub typewords: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Struct {
    pub name: String,

    #[serde(default)]
    pub docs: String,

    #[serde(default, deserialize_with = "null_as_empty")]
    pub fields: Vec<Field>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Field {
    pub name: String,

    #[serde(default)]
    pub docs: String,

    #[serde(default, deserialize_with = "null_as_empty")]
    pub typewords: Vec<String>,
}

/// Enum whose values are integers.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct IntEnum {
    pub name: String,

    #[serde(default)]
    pub docs: String,

    #[serde(default, deserialize_with = "null_as_empty")]
    pub values: Vec<EnumValue<i64>>,
}

/// Enum whose values are strings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct StringEnum {
    pub name: String,

    #[serde(default)]
    pub docs: String,

    #[serde(default, deserialize_with = "null_as_empty")]
    pub values: Vec<EnumValue<String>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct EnumValue<T> {
    pub name: String,

    pub value: T,

    #[serde(default)]
    pub docs: String,
}

impl Section {
    /// Parse a sherpadoc document and check its format version.
    pub fn from_json(bytes: &[u8]) -> GenerateResult<Self> {
        let doc: Section = serde_json::from_slice(bytes)
            .map_err(|err| GenerateError::InvalidSchema(err.to_string()))?;
        doc.check_version()?;
        Ok(doc)
    }

    /// Fail unless this document uses the supported sherpadoc version.
    pub fn check_version(&self) -> GenerateResult<()> {
        if self.sherpadoc_version != SHERPADOC_VERSION {
            return Err(GenerateError::SchemaVersionMismatch {
                found: self.sherpadoc_version,
                expected: SHERPADOC_VERSION,
            });
        }
        Ok(())
    }

    /// Visit this section and all nested sections, depth-first in source order.
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a Section)) {
        visit(self);
        for section in &self.sections {
            section.walk(visit);
        }
    }
}

/// Split documentation into lines, trimming surrounding whitespace.
///
/// Empty documentation yields no lines.
pub fn doc_lines(docs: &str) -> Vec<&str> {
    let docs = docs.trim();
    if docs.is_empty() {
        return Vec::new();
    }
    docs.lines().collect()
}

/// Go encodes empty slices as `null`; treat that the same as `[]`.
fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}
