//! Identifier collision handling for generated TypeScript.
//!
//! Sherpadoc names come from another language and may be TypeScript keywords.
//! Such names get the smallest numeric suffix that is not yet used within the
//! same [`IdentScope`]:
//!
//! | Name | First resolve | Second resolve |
//! |------|---------------|----------------|
//! | `Account` | `Account` | `Account` |
//! | `type` | `type0` | `type0` |
//! | `class` | `class0` | `class0` |
//!
//! A scope can reserve additional names, for identifiers the generated code
//! declares itself in that scope.

use std::collections::{BTreeMap, BTreeSet};

/// TypeScript reserved words, including contextual keywords.
pub const RESERVED_WORDS: &[&str] = &[
    "break",
    "case",
    "catch",
    "class",
    "const",
    "continue",
    "debugger",
    "default",
    "delete",
    "do",
    "else",
    "enum",
    "export",
    "extends",
    "false",
    "finally",
    "for",
    "function",
    "if",
    "import",
    "in",
    "instanceof",
    "new",
    "null",
    "return",
    "super",
    "switch",
    "this",
    "throw",
    "true",
    "try",
    "typeof",
    "var",
    "void",
    "while",
    "with",
    "implements",
    "interface",
    "let",
    "package",
    "private",
    "protected",
    "public",
    "static",
    "yield",
    "any",
    "boolean",
    "number",
    "string",
    "symbol",
    "abstract",
    "as",
    "async",
    "await",
    "constructor",
    "declare",
    "from",
    "get",
    "is",
    "module",
    "namespace",
    "of",
    "require",
    "set",
    "type",
];

/// Check whether a name is a TypeScript reserved word.
pub fn is_reserved(name: &str) -> bool {
    RESERVED_WORDS.contains(&name)
}

/// One lexical scope of renamed identifiers.
///
/// Renames are memoized, so resolving the same name twice yields the same
/// result for the lifetime of the scope.
#[derive(Debug, Clone, Default)]
pub struct IdentScope {
    reserved: BTreeSet<String>,
    renames: BTreeMap<String, String>,
    taken: BTreeSet<String>,
}

impl IdentScope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a scope in which `words` are renamed like reserved words.
    pub fn with_reserved(words: &[&str]) -> Self {
        Self {
            reserved: words.iter().map(|w| w.to_string()).collect(),
            ..Self::default()
        }
    }

    fn needs_rename(&self, name: &str) -> bool {
        is_reserved(name) || self.reserved.contains(name)
    }

    /// Return the identifier to use for `name` in this scope.
    pub fn resolve(&mut self, name: &str) -> String {
        if !self.needs_rename(name) {
            return name.to_string();
        }
        if let Some(renamed) = self.renames.get(name) {
            return renamed.clone();
        }

        let mut suffix = 0usize;
        let candidate = loop {
            let candidate = format!("{name}{suffix}");
            if !self.taken.contains(&candidate) && !self.needs_rename(&candidate) {
                break candidate;
            }
            suffix += 1;
        };

        self.renames.insert(name.to_string(), candidate.clone());
        self.taken.insert(candidate.clone());
        candidate
    }

    /// Number of names renamed in this scope
    pub fn renamed_count(&self) -> usize {
        self.renames.len()
    }
}
