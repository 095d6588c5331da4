//! The runtime library appended to every generated module.
//!
//! The library body is a fixed asset (`runtime/sherpa.ts`). It is not
//! generated per schema; what varies is passed in explicitly and rendered as
//! a short header of constants in front of the body:
//!
//! - `defaultBaseURL`, from the [`BaseUrl`] target
//! - `_slicesNullable` and `_nullableOptional`, mirroring [`GenerateOptions`]
//! - `_baseTypes`, the runtime kind per base token, from the canonical table
//!   in [`crate::typewords`]
//!
//! The body expects a `types` table of named types to be declared by the
//! generated part of the module.

use crate::config::{BaseUrl, GenerateOptions};
use crate::error::GenerateResult;
use crate::typewords::render_runtime_table;

/// Version of the runtime library asset, bumped on any change to its contract.
pub const RUNTIME_LIBRARY_VERSION: u32 = 5;

/// Library body, validators and the wire call.
pub const RUNTIME_LIBRARY: &str = include_str!("runtime/sherpa.ts");

/// Parameters for rendering the runtime library.
#[derive(Debug, Clone)]
pub struct RuntimeLibrary<'a> {
    pub base_url: &'a BaseUrl,
    pub slices_nullable: bool,
    pub nullable_optional: bool,
}

impl<'a> RuntimeLibrary<'a> {
    pub fn new(base_url: &'a BaseUrl, options: &GenerateOptions) -> Self {
        Self {
            base_url,
            slices_nullable: options.slices_nullable,
            nullable_optional: options.nullable_optional,
        }
    }

    /// TypeScript expression evaluating to the base URL of the API.
    ///
    /// An explicit URL becomes a string literal. An API name becomes an
    /// expression that takes the directory of the current page and appends
    /// the API name, so `https://example.com/app/index.html` with API name
    /// `example` calls `https://example.com/app/example/<function>`.
    pub fn base_url_expression(&self) -> GenerateResult<String> {
        match self.base_url {
            BaseUrl::Explicit(url) => Ok(serde_json::to_string(url)?),
            BaseUrl::ApiName(name) => {
                let segment = serde_json::to_string(&format!("{name}/"))?;
                Ok(format!(
                    "(function() {{
	let p = location.pathname
	if (p && p[p.length - 1] !== '/') {{
		let l = location.pathname.split('/')
		l = l.slice(0, l.length - 1)
		p = l.join('/') + '/'
	}}
	return location.protocol + '//' + location.host + p + {segment}
}})()"
                ))
            }
        }
    }

    /// Render the header constants followed by the library body.
    pub fn render(&self) -> GenerateResult<String> {
        let mut code = String::new();

        code.push_str(&format!(
            "// sherpats runtime library, version {RUNTIME_LIBRARY_VERSION}\n\n"
        ));
        code.push_str(&format!(
            "export const defaultBaseURL = {}\n\n",
            self.base_url_expression()?
        ));
        code.push_str(&format!(
            "const _slicesNullable: boolean = {}\n",
            self.slices_nullable
        ));
        code.push_str(&format!(
            "const _nullableOptional: boolean = {}\n",
            self.nullable_optional
        ));
        code.push_str(&format!(
            "const _baseTypes: {{ [token: string]: string }} = {}\n\n",
            render_runtime_table()?
        ));
        code.push_str(RUNTIME_LIBRARY);

        Ok(code)
    }
}
