//! Whole-document validation, run before anything is emitted.

use std::collections::HashMap;

use tracing::debug;

use crate::error::{GenerateError, GenerateResult, TypeContext};
use crate::schema::Section;
use crate::typewords::TypeNode;

/// Counts gathered while checking a document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CheckSummary {
    pub sections: usize,
    pub types: usize,
    pub functions: usize,
}

/// Verify the invariants the emitter relies on.
///
/// - type names are unique across the whole tree (structs and enums share
///   one namespace, regardless of section)
/// - function names are unique across the whole tree
/// - every typewords sequence parses completely
/// - every referenced type is declared somewhere in the tree
pub fn check(doc: &Section) -> GenerateResult<CheckSummary> {
    let mut summary = CheckSummary::default();
    let mut types: HashMap<&str, &str> = HashMap::new();
    let mut functions: HashMap<&str, &str> = HashMap::new();
    let mut first_error: Option<GenerateError> = None;

    doc.walk(&mut |section| {
        summary.sections += 1;
        let declared = section
            .structs
            .iter()
            .map(|s| s.name.as_str())
            .chain(section.ints.iter().map(|e| e.name.as_str()))
            .chain(section.strings.iter().map(|e| e.name.as_str()));
        for name in declared {
            summary.types += 1;
            if let Some(first) = types.insert(name, section.name.as_str()) {
                first_error.get_or_insert(GenerateError::DuplicateTypeName {
                    name: name.to_string(),
                    first: first.to_string(),
                    second: section.name.clone(),
                });
            }
        }
        for function in &section.functions {
            summary.functions += 1;
            if let Some(first) = functions.insert(function.name.as_str(), section.name.as_str()) {
                first_error.get_or_insert(GenerateError::DuplicateFunctionName {
                    name: function.name.clone(),
                    first: first.to_string(),
                    second: section.name.clone(),
                });
            }
        }
    });
    if let Some(err) = first_error {
        return Err(err);
    }

    let mut usages: Vec<(TypeContext, &[String])> = Vec::new();
    doc.walk(&mut |section| {
        for s in &section.structs {
            for field in &s.fields {
                usages.push((
                    TypeContext::field(&s.name, &field.name),
                    field.typewords.as_slice(),
                ));
            }
        }
        for function in &section.functions {
            for param in &function.params {
                usages.push((
                    TypeContext::param(&function.name, &param.name),
                    param.typewords.as_slice(),
                ));
            }
            for (index, ret) in function.returns.iter().enumerate() {
                usages.push((
                    TypeContext::return_value(&function.name, index),
                    ret.typewords.as_slice(),
                ));
            }
        }
    });

    for (context, typewords) in &usages {
        let node = TypeNode::parse(typewords, context)?;
        for name in node.named_refs() {
            if !types.contains_key(name) {
                return Err(GenerateError::UnknownReferencedType {
                    context: context.clone(),
                    name: name.to_string(),
                });
            }
        }
    }

    debug!(
        sections = summary.sections,
        types = summary.types,
        functions = summary.functions,
        typewords = usages.len(),
        "sherpadoc checked"
    );
    Ok(summary)
}
