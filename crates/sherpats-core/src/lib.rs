//! sherpats-core - TypeScript client generation for sherpa APIs
//!
//! Turns a sherpadoc document (the machine-readable documentation of a sherpa
//! API) into a single TypeScript module with:
//! - an interface or enum per documented struct and enum
//! - a `Client` class with one typed async method per function
//! - runtime validators that check parameters and results against the same
//!   types at call time
//!
//! # Pipeline
//!
//! ```text
//! sherpadoc JSON
//!     ↓
//!  [schema]     Section tree, version gate
//!     ↓
//!  [check]      unique names, resolvable types, well-formed typewords
//!     ↓
//!  [emit]       declarations, type table, client  ← [typewords], [naming]
//!     ↓
//!  [runtime]    fixed library with base URL and toggles applied
//!     ↓
//! TypeScript module
//! ```
//!
//! Generation is all or nothing: the module is assembled in memory and only
//! returned when every step succeeded.
//!
//! # Example
//!
//! ```
//! use sherpats_core::{BaseUrl, GenerateOptions, Section, generate};
//!
//! let doc = Section::from_json(br#"{
//!     "Name": "Example",
//!     "Docs": "Example API.",
//!     "Functions": [{"Name": "Echo", "Docs": "", "Params": [{"Name": "text", "Typewords": ["string"]}], "Returns": [{"Name": "", "Typewords": ["string"]}]}],
//!     "SherpadocVersion": 1
//! }"#).unwrap();
//!
//! let module = generate(&doc, &BaseUrl::parse("example"), &GenerateOptions::default()).unwrap();
//! assert!(module.contains("async Echo(text: string): Promise<string>"));
//! ```

pub mod check;
pub mod config;
pub mod emit;
pub mod error;
pub mod naming;
pub mod runtime;
pub mod schema;
pub mod typewords;

pub use check::{CheckSummary, check};
pub use config::{BaseUrl, GenerateOptions};
pub use emit::Emitter;
pub use error::{GenerateError, GenerateResult, TypeContext};
pub use naming::IdentScope;
pub use schema::Section;
pub use typewords::{BaseType, TypeNode};

use tracing::info;

/// Generate the TypeScript client module for a sherpadoc document.
///
/// The document is checked completely before any text is produced; on error
/// nothing is returned but the error.
pub fn generate(
    doc: &Section,
    base_url: &BaseUrl,
    options: &GenerateOptions,
) -> GenerateResult<String> {
    doc.check_version()?;
    let summary = check(doc)?;
    let module = Emitter::new(options).emit_module(doc, base_url)?;

    info!(
        api = %doc.name,
        types = summary.types,
        functions = summary.functions,
        bytes = module.len(),
        "generated typescript client"
    );
    Ok(module)
}

/// Parse a sherpadoc document and generate its client module.
pub fn generate_from_json(
    bytes: &[u8],
    base_url: &BaseUrl,
    options: &GenerateOptions,
) -> GenerateResult<String> {
    let doc = Section::from_json(bytes)?;
    generate(&doc, base_url, options)
}

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        BaseUrl, GenerateError, GenerateOptions, GenerateResult, Section, generate,
        generate_from_json,
    };
}
