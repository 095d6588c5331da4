//! Type grammar for sherpadoc typewords.
//!
//! A type is written as a sequence of tokens in prefix notation:
//!
//! ```text
//! Type := "any" | "bool" | "int8" | "uint8" | "int16" | "uint16"
//!       | "int32" | "uint32" | "int64" | "uint64" | "int64s" | "uint64s"
//!       | "float32" | "float64" | "string" | "timestamp"
//!       | "nullable" Type | "[]" Type | "{}" Type | Identifier
//! ```
//!
//! So `["nullable", "[]", "string"]` is a nullable array of strings.
//!
//! # Two renderings, one table
//!
//! Every base token is described once in [`BASE_TYPES`]. The static
//! TypeScript type ([`TypeNode::render_static`]) and the kind checked by the
//! generated runtime validator ([`render_runtime_table`]) are both read from
//! that table, so the type a caller sees and the values the client accepts at
//! runtime cannot drift apart.
//!
//! | Token | Static type | Runtime kind |
//! |-------|-------------|--------------|
//! | `any` | `any` | `any` |
//! | `bool` | `boolean` | `boolean` |
//! | `int8` .. `uint64` | `number` | `integer` |
//! | `int64s`, `uint64s` | `string` | `string` |
//! | `float32`, `float64` | `number` | `number` |
//! | `string` | `string` | `string` |
//! | `timestamp` | `Date` | `timestamp` |

use crate::config::GenerateOptions;
use crate::error::{GenerateError, GenerateResult, TypeContext};
use crate::naming::IdentScope;

/// Base types of the grammar.
///
/// Variants are declared in the same order as [`BASE_TYPES`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BaseType {
    Any,
    Bool,
    Int8,
    Uint8,
    Int16,
    Uint16,
    Int32,
    Uint32,
    Int64,
    Uint64,
    Int64s,
    Uint64s,
    Float32,
    Float64,
    String,
    Timestamp,
}

/// How the generated runtime validator checks a base value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuntimeKind {
    /// Accepts every value.
    Any,
    /// `typeof v === 'boolean'`.
    Boolean,
    /// A number without fractional part.
    Integer,
    /// Any number.
    Number,
    /// `typeof v === 'string'`.
    String,
    /// A `Date` towards the server, an ISO-8601 string from the server.
    Timestamp,
}

impl RuntimeKind {
    /// Name of the kind as understood by the runtime library
    pub fn as_str(self) -> &'static str {
        match self {
            RuntimeKind::Any => "any",
            RuntimeKind::Boolean => "boolean",
            RuntimeKind::Integer => "integer",
            RuntimeKind::Number => "number",
            RuntimeKind::String => "string",
            RuntimeKind::Timestamp => "timestamp",
        }
    }
}

/// One row of the canonical base type table.
#[derive(Debug)]
pub struct BaseTypeInfo {
    pub base: BaseType,
    pub token: &'static str,
    pub static_type: &'static str,
    pub runtime: RuntimeKind,
}

const fn row(
    base: BaseType,
    token: &'static str,
    static_type: &'static str,
    runtime: RuntimeKind,
) -> BaseTypeInfo {
    BaseTypeInfo {
        base,
        token,
        static_type,
        runtime,
    }
}

/// The canonical base type table.
pub const BASE_TYPES: &[BaseTypeInfo] = &[
    row(BaseType::Any, "any", "any", RuntimeKind::Any),
    row(BaseType::Bool, "bool", "boolean", RuntimeKind::Boolean),
    row(BaseType::Int8, "int8", "number", RuntimeKind::Integer),
    row(BaseType::Uint8, "uint8", "number", RuntimeKind::Integer),
    row(BaseType::Int16, "int16", "number", RuntimeKind::Integer),
    row(BaseType::Uint16, "uint16", "number", RuntimeKind::Integer),
    row(BaseType::Int32, "int32", "number", RuntimeKind::Integer),
    row(BaseType::Uint32, "uint32", "number", RuntimeKind::Integer),
    row(BaseType::Int64, "int64", "number", RuntimeKind::Integer),
    row(BaseType::Uint64, "uint64", "number", RuntimeKind::Integer),
    // Beyond 2^53 a JavaScript number loses precision, so these travel as strings.
    row(BaseType::Int64s, "int64s", "string", RuntimeKind::String),
    row(BaseType::Uint64s, "uint64s", "string", RuntimeKind::String),
    row(BaseType::Float32, "float32", "number", RuntimeKind::Number),
    row(BaseType::Float64, "float64", "number", RuntimeKind::Number),
    row(BaseType::String, "string", "string", RuntimeKind::String),
    row(BaseType::Timestamp, "timestamp", "Date", RuntimeKind::Timestamp),
];

impl BaseType {
    /// Look up a base type by its token
    pub fn from_token(token: &str) -> Option<Self> {
        BASE_TYPES
            .iter()
            .find(|info| info.token == token)
            .map(|info| info.base)
    }

    /// The table row describing this base type
    pub fn info(self) -> &'static BaseTypeInfo {
        &BASE_TYPES[self as usize]
    }

    pub fn token(self) -> &'static str {
        self.info().token
    }

    pub fn static_type(self) -> &'static str {
        self.info().static_type
    }

    pub fn runtime_kind(self) -> RuntimeKind {
        self.info().runtime
    }
}

/// Parsed form of a typewords sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeNode {
    Base(BaseType),
    Nullable(Box<TypeNode>),
    Array(Box<TypeNode>),
    /// Object with string keys and values of the inner type.
    Map(Box<TypeNode>),
    /// Reference to a declared struct or enum.
    Named(String),
}

/// Static type text plus whether it already admits `null`.
struct StaticType {
    text: String,
    nullable: bool,
}

impl TypeNode {
    /// Parse a complete typewords sequence.
    ///
    /// All tokens must be consumed: a base type or identifier followed by more
    /// tokens is an error, and so is a sequence that ends before a terminal.
    pub fn parse(tokens: &[String], context: &TypeContext) -> GenerateResult<TypeNode> {
        Self::parse_from(tokens, 0, context)
    }

    fn parse_from(tokens: &[String], pos: usize, context: &TypeContext) -> GenerateResult<TypeNode> {
        let Some(token) = tokens.get(pos) else {
            return Err(GenerateError::malformed(
                context,
                "need at least one element",
                tokens,
            ));
        };

        match token.as_str() {
            "nullable" => Ok(TypeNode::Nullable(Box::new(Self::parse_from(
                tokens,
                pos + 1,
                context,
            )?))),
            "[]" => Ok(TypeNode::Array(Box::new(Self::parse_from(
                tokens,
                pos + 1,
                context,
            )?))),
            "{}" => Ok(TypeNode::Map(Box::new(Self::parse_from(
                tokens,
                pos + 1,
                context,
            )?))),
            terminal => {
                let base = BaseType::from_token(terminal);
                let leftover = &tokens[pos + 1..];
                if !leftover.is_empty() {
                    let reason = if base.is_some() {
                        "leftover tokens after base type"
                    } else {
                        "leftover tokens after identifier type"
                    };
                    return Err(GenerateError::malformed(context, reason, leftover));
                }
                Ok(match base {
                    Some(base) => TypeNode::Base(base),
                    None => TypeNode::Named(terminal.to_string()),
                })
            }
        }
    }

    /// Collect the names of all declared types this type references.
    pub fn named_refs(&self) -> Vec<&str> {
        match self {
            TypeNode::Base(_) => Vec::new(),
            TypeNode::Nullable(inner) | TypeNode::Array(inner) | TypeNode::Map(inner) => {
                inner.named_refs()
            }
            TypeNode::Named(name) => vec![name.as_str()],
        }
    }

    /// Render as a TypeScript type.
    ///
    /// Named types are resolved through `names`, the top-level identifier
    /// scope, so a declaration renamed for colliding with a keyword is
    /// referenced by its new name.
    pub fn render_static(&self, options: &GenerateOptions, names: &mut IdentScope) -> String {
        self.render(options, names).text
    }

    fn render(&self, options: &GenerateOptions, names: &mut IdentScope) -> StaticType {
        match self {
            TypeNode::Base(base) => StaticType {
                text: base.static_type().to_string(),
                nullable: false,
            },
            TypeNode::Nullable(inner) => {
                let inner = inner.render(options, names);
                if inner.nullable {
                    inner
                } else {
                    StaticType {
                        text: format!("{} | null", inner.text),
                        nullable: true,
                    }
                }
            }
            TypeNode::Array(inner) => {
                let element = inner.render(options, names);
                let element = if element.nullable {
                    format!("({})", element.text)
                } else {
                    element.text
                };
                if options.slices_nullable {
                    StaticType {
                        text: format!("{element}[] | null"),
                        nullable: true,
                    }
                } else {
                    StaticType {
                        text: format!("{element}[]"),
                        nullable: false,
                    }
                }
            }
            TypeNode::Map(inner) => {
                let value = inner.render(options, names);
                StaticType {
                    text: format!("{{ [key: string]: {} }}", value.text),
                    nullable: false,
                }
            }
            TypeNode::Named(name) => StaticType {
                text: names.resolve(name),
                nullable: false,
            },
        }
    }
}

/// Render the runtime validator's base kind table as a TypeScript object literal.
///
/// Keys are base tokens, values the [`RuntimeKind`] names, in table order.
pub fn render_runtime_table() -> GenerateResult<String> {
    let mut entries = Vec::with_capacity(BASE_TYPES.len());
    for info in BASE_TYPES {
        entries.push(format!(
            "{}: {}",
            serde_json::to_string(info.token)?,
            serde_json::to_string(info.runtime.as_str())?
        ));
    }
    Ok(format!("{{ {} }}", entries.join(", ")))
}
