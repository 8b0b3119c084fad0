//! Read-merge-write cycle for one generated endpoint.
//!
//! This is the only place in the pipeline that touches the output
//! directory. Everything it merges is computed by the pure functions in
//! [`crate::merge`] before either file is written.

use std::fs;
use std::path::{Path, PathBuf};

use gogen_common::{Config, DEFAULT_REQUEST_MODULE};
use tracing::debug;

use crate::error::{GenError, Result};
use crate::merge::{apply_prefix, merge_api, merge_types};
use crate::naming::upper_first;
use crate::path_guard::validate_path;
use crate::request_fn::{HttpMethod, RequestFunction};

pub const TYPES_FILE: &str = "types.ts";
pub const API_FILE: &str = "api.ts";

/// Inputs for [`write_files`].
#[derive(Debug, Clone)]
pub struct WriteRequest {
    /// Directory the `<api_name>/` folder is created in.
    pub base_dir: PathBuf,
    pub api_name: String,
    /// Root declaration name in `types_content`.
    pub type_name: String,
    pub url: String,
    /// Generated declarations, response type first.
    pub types_content: String,
    pub method: HttpMethod,
    /// The blob also declares `<type_name>Request` and the function takes `data`.
    pub has_request_body: bool,
    pub request_module: String,
    pub type_prefix: String,
    pub api_prefix: String,
}

impl WriteRequest {
    pub fn new(
        base_dir: impl Into<PathBuf>,
        api_name: impl Into<String>,
        type_name: impl Into<String>,
        url: impl Into<String>,
        types_content: impl Into<String>,
    ) -> Self {
        Self {
            base_dir: base_dir.into(),
            api_name: api_name.into(),
            type_name: type_name.into(),
            url: url.into(),
            types_content: types_content.into(),
            method: HttpMethod::Get,
            has_request_body: false,
            request_module: DEFAULT_REQUEST_MODULE.to_string(),
            type_prefix: String::new(),
            api_prefix: String::new(),
        }
    }

    /// Take the request module and name prefixes from `config`.
    pub fn with_config(mut self, config: &Config) -> Self {
        self.request_module.clone_from(&config.request_module);
        self.type_prefix.clone_from(&config.type_prefix);
        self.api_prefix.clone_from(&config.api_prefix);
        self
    }
}

/// What [`write_files`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteOutcome {
    pub output_dir: PathBuf,
    /// The output directory existed, so this was an incremental write.
    pub dir_existed: bool,
    /// Response type referenced from `api.ts`.
    pub final_type_name: String,
    pub function_name: String,
    /// Names given to declarations renamed to avoid a conflict.
    pub renamed_types: Vec<String>,
    pub type_conflict: bool,
    /// Every new declaration already existed; `types.ts` is unchanged.
    pub type_skipped: bool,
    /// A function with the same name already existed; `api.ts` is unchanged.
    pub api_skipped: bool,
}

impl WriteOutcome {
    /// Nothing new was written to either file.
    pub fn is_noop(&self) -> bool {
        self.type_skipped && self.api_skipped
    }
}

/// Generate or incrementally update `<base_dir>/<api_name>/{types,api}.ts`.
pub fn write_files(request: &WriteRequest) -> Result<WriteOutcome> {
    let base_dir = validate_path(&request.base_dir)?;
    let output_dir = validate_path(base_dir.join(&request.api_name))?;
    // An absolute or `..` api name must not escape the chosen base.
    if output_dir == base_dir || !output_dir.starts_with(&base_dir) {
        return Err(GenError::UnsafePath(output_dir));
    }
    let dir_existed = output_dir.is_dir();

    debug!(
        output_dir = %output_dir.display(),
        dir_existed,
        "Resolved output directory."
    );

    fs::create_dir_all(&output_dir).map_err(|err| {
        GenError::io(format!("Failed to create {}", output_dir.display()), err)
    })?;

    let types_path = output_dir.join(TYPES_FILE);
    let api_path = output_dir.join(API_FILE);

    let types_content = if request.type_prefix.is_empty() {
        request.types_content.clone()
    } else {
        apply_prefix(&request.types_content, &request.type_prefix)
    };
    let prefixed_type_name = format!("{}{}", request.type_prefix, upper_first(&request.type_name));
    let request_type_name = format!("{prefixed_type_name}Request");

    let mut outcome = WriteOutcome {
        output_dir: output_dir.clone(),
        dir_existed,
        final_type_name: prefixed_type_name.clone(),
        function_name: format!("{}{}", request.api_prefix, request.api_name),
        renamed_types: Vec::new(),
        type_conflict: false,
        type_skipped: false,
        api_skipped: false,
    };

    let mut final_request_type_name = request_type_name.clone();
    let types_out = match read_existing(&types_path)? {
        Some(existing) => {
            let merge = merge_types(&existing, &types_content, &prefixed_type_name);
            debug!(
                final_type_name = %merge.final_type_name,
                has_conflict = merge.has_conflict,
                is_duplicate = merge.is_duplicate,
                "Merged types."
            );
            final_request_type_name = merge.renames.resolve(&request_type_name).to_string();
            outcome.final_type_name.clone_from(&merge.final_type_name);
            outcome.type_conflict = merge.has_conflict;
            outcome.type_skipped = merge.is_duplicate;
            outcome.renamed_types = merge.renamed_types;
            merge.merged
        }
        None => types_content,
    };
    write_file(&types_path, &types_out)?;

    let mut function = RequestFunction::new(
        outcome.function_name.clone(),
        outcome.final_type_name.clone(),
        request.url.clone(),
    );
    function.method = request.method;
    function.request_module.clone_from(&request.request_module);
    if request.has_request_body {
        function.request_type_name = Some(final_request_type_name);
    }
    let api_content = function.render();

    let api_out = match read_existing(&api_path)? {
        Some(existing) => {
            let merge = merge_api(&existing, &api_content, &outcome.function_name);
            debug!(is_duplicate = merge.is_duplicate, "Merged api.");
            outcome.api_skipped = merge.is_duplicate;
            merge.merged
        }
        None => api_content,
    };
    write_file(&api_path, &api_out)?;

    Ok(outcome)
}

fn read_existing(path: &Path) -> Result<Option<String>> {
    if !path.is_file() {
        return Ok(None);
    }
    fs::read_to_string(path)
        .map(Some)
        .map_err(|err| GenError::io(format!("Failed to read {}", path.display()), err))
}

fn write_file(path: &Path, content: &str) -> Result<()> {
    fs::write(path, content)
        .map_err(|err| GenError::io(format!("Failed to write {}", path.display()), err))?;
    debug!(path = %path.display(), bytes = content.len(), "Wrote file.");
    Ok(())
}
