//! TypeScript module emission from a checked sherpadoc document.
//!
//! The emitter walks the section tree depth-first in source order. Sections
//! only group documentation: every declaration lands in the same module
//! scope, optionally wrapped in one `export namespace`.
//!
//! # Output layout
//!
//! ```text
//! // NOTE: GENERATED by sherpats, DO NOT MODIFY
//! export interface / export enum ...   one per struct and enum
//! export const types: TypenameMap      named types for runtime validation
//! // section documentation
//! export class Client { ... }          one async method per function
//! runtime library                      see crate::runtime
//! ```

use serde::Serialize;
use tracing::debug;

use crate::config::{BaseUrl, GenerateOptions};
use crate::error::{GenerateResult, TypeContext};
use crate::naming::IdentScope;
use crate::runtime::RuntimeLibrary;
use crate::schema::{Function, IntEnum, Section, StringEnum, Struct, doc_lines};
use crate::typewords::TypeNode;

/// First line of every generated module.
pub const GENERATED_HEADER: &str = "// NOTE: GENERATED by sherpats, DO NOT MODIFY\n";

/// Names declared by the module itself at top level or on the client class.
const MODULE_NAMES: &[&str] = &[
    "Client",
    "ClientOptions",
    "Failure",
    "IntsType",
    "NamedType",
    "StringsType",
    "StructField",
    "StructType",
    "TypenameMap",
    "defaultBaseURL",
    "types",
    "baseURL",
    "options",
    "withOptions",
];

/// Locals of every client method body.
const METHOD_LOCALS: &[&str] = &["fn", "paramTypes", "returnTypes", "params", "_sherpaCall"];

/// Entry of the `types` table, documentation stripped.
#[derive(Serialize)]
#[serde(tag = "Kind")]
enum TypeTableEntry<'a> {
    #[serde(rename = "struct")]
    Struct(StructEntry<'a>),
    #[serde(rename = "ints")]
    Ints(EnumEntry<'a, i64>),
    #[serde(rename = "strings")]
    Strings(EnumEntry<'a, &'a str>),
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct StructEntry<'a> {
    name: &'a str,
    fields: Vec<FieldEntry<'a>>,
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct FieldEntry<'a> {
    name: &'a str,
    /// Member name in the generated interface.
    ident: String,
    typewords: &'a [String],
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct EnumEntry<'a, T> {
    name: &'a str,
    values: Vec<ValueEntry<'a, T>>,
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct ValueEntry<'a, T> {
    name: &'a str,
    value: T,
}

/// Renders one TypeScript module.
///
/// Holds the top-level identifier scope, shared by structs, enums and
/// functions for the whole run. Names the module declares itself are
/// reserved in it.
pub struct Emitter<'a> {
    options: &'a GenerateOptions,
    names: IdentScope,
    code: String,
}

impl<'a> Emitter<'a> {
    pub fn new(options: &'a GenerateOptions) -> Self {
        Self {
            options,
            names: IdentScope::with_reserved(MODULE_NAMES),
            code: String::new(),
        }
    }

    /// Emit the complete module for `doc`, consuming the emitter.
    pub fn emit_module(mut self, doc: &Section, base_url: &BaseUrl) -> GenerateResult<String> {
        self.options.validate()?;
        self.code.push_str(GENERATED_HEADER);
        self.code.push('\n');

        if let Some(namespace) = &self.options.namespace {
            self.code
                .push_str(&format!("export namespace {namespace} {{\n\n"));
        }

        self.emit_types(doc)?;
        self.emit_type_table(doc)?;
        self.emit_section_docs(doc, true);
        self.emit_client(doc)?;

        let library = RuntimeLibrary::new(base_url, self.options);
        self.code.push('\n');
        self.code.push_str(&library.render()?);

        if self.options.namespace.is_some() {
            self.code.push_str("}\n");
        }

        debug!(
            renamed = self.names.renamed_count(),
            bytes = self.code.len(),
            "module emitted"
        );
        Ok(self.code)
    }

    fn emit_types(&mut self, section: &Section) -> GenerateResult<()> {
        for s in &section.structs {
            self.emit_struct(s)?;
        }
        for e in &section.ints {
            self.emit_int_enum(e);
        }
        for e in &section.strings {
            self.emit_string_enum(e)?;
        }
        for subsection in &section.sections {
            self.emit_types(subsection)?;
        }
        Ok(())
    }

    fn emit_struct(&mut self, s: &Struct) -> GenerateResult<()> {
        push_doc_block(&mut self.code, "", &s.docs);
        let name = self.names.resolve(&s.name);
        debug!(name = %s.name, ident = %name, fields = s.fields.len(), "emitting struct");
        self.code.push_str(&format!("export interface {name} {{\n"));

        for (field, ident) in s.fields.iter().zip(field_idents(s)) {
            let context = TypeContext::field(&s.name, &field.name);
            let ty = TypeNode::parse(&field.typewords, &context)?
                .render_static(self.options, &mut self.names);
            let member = if self.options.is_optional_member(&field.typewords) {
                format!("{ident}?: {ty}")
            } else {
                format!("{ident}: {ty}")
            };
            push_member(&mut self.code, &member, &field.docs);
        }

        self.code.push_str("}\n\n");
        Ok(())
    }

    fn emit_int_enum(&mut self, e: &IntEnum) {
        push_doc_block(&mut self.code, "", &e.docs);
        let name = self.names.resolve(&e.name);
        debug!(name = %e.name, ident = %name, values = e.values.len(), "emitting int enum");
        self.code.push_str(&format!("export enum {name} {{\n"));

        let mut members = IdentScope::new();
        for value in &e.values {
            let ident = members.resolve(&value.name);
            push_member(
                &mut self.code,
                &format!("{ident} = {},", value.value),
                &value.docs,
            );
        }

        self.code.push_str("}\n\n");
    }

    fn emit_string_enum(&mut self, e: &StringEnum) -> GenerateResult<()> {
        push_doc_block(&mut self.code, "", &e.docs);
        let name = self.names.resolve(&e.name);
        debug!(name = %e.name, ident = %name, values = e.values.len(), "emitting string enum");
        self.code.push_str(&format!("export enum {name} {{\n"));

        let mut members = IdentScope::new();
        for value in &e.values {
            let ident = members.resolve(&value.name);
            let literal = serde_json::to_string(&value.value)?;
            push_member(&mut self.code, &format!("{ident} = {literal},"), &value.docs);
        }

        self.code.push_str("}\n\n");
        Ok(())
    }

    /// Emit the `types` table used by the runtime validator.
    ///
    /// Keyed by wire name, not by the possibly renamed identifier. Struct
    /// fields carry both, the runtime maps between them.
    fn emit_type_table(&mut self, doc: &Section) -> GenerateResult<()> {
        let mut entries: Vec<(&str, TypeTableEntry<'_>)> = Vec::new();
        doc.walk(&mut |section| {
            for s in &section.structs {
                let fields = s
                    .fields
                    .iter()
                    .zip(field_idents(s))
                    .map(|(f, ident)| FieldEntry {
                        name: &f.name,
                        ident,
                        typewords: &f.typewords,
                    })
                    .collect();
                entries.push((
                    s.name.as_str(),
                    TypeTableEntry::Struct(StructEntry {
                        name: &s.name,
                        fields,
                    }),
                ));
            }
            for e in &section.ints {
                let values = e
                    .values
                    .iter()
                    .map(|v| ValueEntry {
                        name: &v.name,
                        value: v.value,
                    })
                    .collect();
                entries.push((
                    e.name.as_str(),
                    TypeTableEntry::Ints(EnumEntry {
                        name: &e.name,
                        values,
                    }),
                ));
            }
            for e in &section.strings {
                let values = e
                    .values
                    .iter()
                    .map(|v| ValueEntry {
                        name: &v.name,
                        value: v.value.as_str(),
                    })
                    .collect();
                entries.push((
                    e.name.as_str(),
                    TypeTableEntry::Strings(EnumEntry {
                        name: &e.name,
                        values,
                    }),
                ));
            }
        });

        self.code.push_str("export const types: TypenameMap = {\n");
        for (name, entry) in &entries {
            self.code.push_str(&format!(
                "\t{}: {},\n",
                serde_json::to_string(name)?,
                serde_json::to_string(entry)?
            ));
        }
        self.code.push_str("}\n\n");
        Ok(())
    }

    fn emit_section_docs(&mut self, section: &Section, root: bool) {
        if !root {
            self.code.push_str("//\n");
            self.code.push_str(&format!("// # {}\n", section.name));
        }
        push_doc_block(&mut self.code, "", &section.docs);
        for subsection in &section.sections {
            self.emit_section_docs(subsection, false);
        }
    }

    fn emit_client(&mut self, doc: &Section) -> GenerateResult<()> {
        self.code.push_str(
            "export class Client {
	private baseURL: string
	public options: ClientOptions

	constructor(baseURL: string = defaultBaseURL, options?: ClientOptions) {
		this.baseURL = baseURL
		this.options = options || {}
	}

	withOptions(options: ClientOptions): Client {
		return new Client(this.baseURL, { ...this.options, ...options })
	}
",
        );
        self.emit_functions(doc, true)?;
        self.code.push_str("}\n");
        Ok(())
    }

    fn emit_functions(&mut self, section: &Section, root: bool) -> GenerateResult<()> {
        if !root && !section.functions.is_empty() {
            self.code.push('\n');
            self.code.push_str(&format!("\t// # {}\n", section.name));
        }
        for function in &section.functions {
            self.code.push('\n');
            self.emit_function(function)?;
        }
        for subsection in &section.sections {
            self.emit_functions(subsection, false)?;
        }
        Ok(())
    }

    fn emit_function(&mut self, function: &Function) -> GenerateResult<()> {
        let mut params = IdentScope::with_reserved(METHOD_LOCALS);
        let mut param_decls = Vec::with_capacity(function.params.len());
        let mut param_names = Vec::with_capacity(function.params.len());
        for param in &function.params {
            let context = TypeContext::param(&function.name, &param.name);
            let ty = TypeNode::parse(&param.typewords, &context)?
                .render_static(self.options, &mut self.names);
            let ident = params.resolve(&param.name);
            param_decls.push(format!("{ident}: {ty}"));
            param_names.push(ident);
        }

        let mut return_types = Vec::with_capacity(function.returns.len());
        for (index, ret) in function.returns.iter().enumerate() {
            let context = TypeContext::return_value(&function.name, index);
            return_types.push(
                TypeNode::parse(&ret.typewords, &context)?
                    .render_static(self.options, &mut self.names),
            );
        }
        let return_type = match return_types.len() {
            0 => "void".to_string(),
            1 => return_types.remove(0),
            _ => format!("[{}]", return_types.join(", ")),
        };

        let param_typewords: Vec<&[String]> =
            function.params.iter().map(|p| p.typewords.as_slice()).collect();
        let return_typewords: Vec<&[String]> = function
            .returns
            .iter()
            .map(|r| r.typewords.as_slice())
            .collect();

        let name = self.names.resolve(&function.name);
        debug!(name = %function.name, ident = %name, params = param_names.len(), "emitting function");

        push_doc_block(&mut self.code, "\t", &function.docs);
        self.code.push_str(&format!(
            "\tasync {name}({}): Promise<{return_type}> {{\n",
            param_decls.join(", ")
        ));
        self.code.push_str(&format!(
            "\t\tconst fn: string = {}\n",
            serde_json::to_string(&function.name)?
        ));
        self.code.push_str(&format!(
            "\t\tconst paramTypes: string[][] = {}\n",
            serde_json::to_string(&param_typewords)?
        ));
        self.code.push_str(&format!(
            "\t\tconst returnTypes: string[][] = {}\n",
            serde_json::to_string(&return_typewords)?
        ));
        self.code.push_str(&format!(
            "\t\tconst params: any[] = [{}]\n",
            param_names.join(", ")
        ));
        self.code.push_str(&format!(
            "\t\treturn await _sherpaCall(this.baseURL, {{ ...this.options }}, paramTypes, returnTypes, fn, params) as {return_type}\n"
        ));
        self.code.push_str("\t}\n");
        Ok(())
    }
}

/// Member identifiers of a struct, in field order, from a fresh scope.
fn field_idents(s: &Struct) -> Vec<String> {
    let mut scope = IdentScope::new();
    s.fields.iter().map(|f| scope.resolve(&f.name)).collect()
}

/// Write documentation as `//` comment lines.
fn push_doc_block(code: &mut String, indent: &str, docs: &str) {
    for line in doc_lines(docs) {
        if line.is_empty() {
            code.push_str(&format!("{indent}//\n"));
        } else {
            code.push_str(&format!("{indent}// {line}\n"));
        }
    }
}

/// Write one interface or enum member.
///
/// Single-line documentation trails the member, longer documentation goes above it.
fn push_member(code: &mut String, member: &str, docs: &str) {
    let lines = doc_lines(docs);
    if lines.len() == 1 {
        code.push_str(&format!("\t{member}  // {}\n", lines[0]));
        return;
    }
    push_doc_block(code, "\t", docs);
    code.push_str(&format!("\t{member}\n"));
}
