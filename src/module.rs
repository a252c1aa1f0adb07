//! Parsed module: everything the pipeline needs from one module file

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::debug;

use crate::error::ScriptError;
use crate::header::{header_line, module_name, ModuleSource};
use crate::schema::{build_schema, OptionSpec, INPUT_ARG};

pub const PREREQ_TAG: &str = "prereq:";
pub const OUTPUT_TAG: &str = "output:";

/// A pipeline stage, immutable once parsed
#[derive(Debug, Clone, Serialize)]
pub struct Module {
    /// Basename, used as the invocation name
    pub name: String,
    #[serde(skip)]
    pub path: Option<PathBuf>,
    pub prerequisites: Vec<String>,
    pub output: Option<String>,
    /// Positional argument names from the line keyed by `name`
    pub arguments: Vec<String>,
    pub schema: Vec<OptionSpec>,
    #[serde(skip)]
    pub header: Vec<String>,
    #[serde(skip)]
    pub body: Vec<String>,
}

impl Module {
    pub fn load(path: &Path) -> Result<Self, ScriptError> {
        let contents = std::fs::read_to_string(path)?;
        let mut module = Self::parse(&module_name(path), &contents)?;
        module.path = Some(path.to_path_buf());
        Ok(module)
    }

    /// Parse module text; `name` is the module's basename.
    pub fn parse(name: &str, contents: &str) -> Result<Self, ScriptError> {
        let ModuleSource { header, body } = ModuleSource::parse(name, contents)?;

        let prerequisites = header_line(&header, PREREQ_TAG).unwrap_or_default();

        let output = match header_line(&header, OUTPUT_TAG) {
            None => None,
            Some(mut outputs) if outputs.len() == 1 => outputs.pop(),
            Some(outputs) => {
                return Err(ScriptError::MultipleOutputs {
                    module: name.to_string(),
                    outputs,
                })
            }
        };

        let arguments = header_line(&header, name);
        if let Some(args) = &arguments {
            if args.iter().filter(|a| a.as_str() == INPUT_ARG).count() > 1 {
                return Err(ScriptError::MultipleInputs {
                    module: name.to_string(),
                });
            }
        }

        let schema = build_schema(name, &header, arguments.as_deref())?;
        debug!(
            module = name,
            prerequisites = prerequisites.len(),
            options = schema.len(),
            "parsed module header"
        );

        Ok(Self {
            name: name.to_string(),
            path: None,
            prerequisites,
            output,
            arguments: arguments.unwrap_or_default(),
            schema,
            header,
            body,
        })
    }

    /// Whether the module consumes the latest upstream output
    pub fn takes_input(&self) -> bool {
        self.arguments.iter().any(|a| a == INPUT_ARG)
    }

    /// Description line of an option, without its `name:` key
    pub fn describe(&self, option: &str) -> Option<String> {
        header_line(&self.header, &format!("{}:", option)).map(|fields| fields.join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::TypeTag;

    const SMOOTH: &str = "#!/bin/bash
#
# prereq: init_*
# output: smooth
# dm_smooth input fwhm mode
#
# fwhm: FWHM of the kernel in mm [float]
# mode: how to smooth [list: fast slow ?]
#
3dBlurInMask -input ${1} -FWHM ${2} -mode $3
";

    #[test]
    fn test_parse_full_header() {
        let module = Module::parse("dm_smooth", SMOOTH).unwrap();
        assert_eq!(module.prerequisites, vec!["init_*"]);
        assert_eq!(module.output.as_deref(), Some("smooth"));
        assert_eq!(module.arguments, vec!["input", "fwhm", "mode"]);
        assert!(module.takes_input());
        assert_eq!(module.schema.len(), 2);
        assert_eq!(module.schema[0].tag, TypeTag::Float);
        assert_eq!(module.body.len(), 1);
    }

    #[test]
    fn test_describe_option() {
        let module = Module::parse("dm_smooth", SMOOTH).unwrap();
        assert_eq!(
            module.describe("fwhm").as_deref(),
            Some("FWHM of the kernel in mm [float]")
        );
    }

    #[test]
    fn test_module_without_header_lines() {
        let module = Module::parse("init_basic", "#!/bin/bash\necho hi\n").unwrap();
        assert!(module.prerequisites.is_empty());
        assert!(module.output.is_none());
        assert!(!module.takes_input());
        assert!(module.schema.is_empty());
    }

    #[test]
    fn test_two_outputs_is_schema_error() {
        let err = Module::parse("m", "#!/bin/bash\n# output: a b\n").unwrap_err();
        assert!(matches!(err, ScriptError::MultipleOutputs { .. }));
    }

    #[test]
    fn test_two_inputs_is_schema_error() {
        let err = Module::parse("m", "#!/bin/bash\n# m input input\n").unwrap_err();
        assert!(matches!(err, ScriptError::MultipleInputs { .. }));
    }

    #[test]
    fn test_name_sharing_prefix_with_output_key() {
        let module = Module::parse("out", "#!/bin/bash\n# output: x\n# out input\n").unwrap();
        assert_eq!(module.output.as_deref(), Some("x"));
        assert_eq!(module.arguments, vec!["input"]);
    }

    #[test]
    fn test_malformed_option_fails_at_parse_time() {
        let err = Module::parse("m", "#!/bin/bash\n# m n\n# n: count [text]\n").unwrap_err();
        assert!(matches!(err, ScriptError::MalformedOption { .. }));
    }
}
