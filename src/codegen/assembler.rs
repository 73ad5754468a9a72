//! Final output assembly: header, import section, body, optional footer

use super::context::{GenerationContext, ImportDescriptor};

/// Trailer line appended when the footer is enabled
pub const FOOTER: &str = "\n// Generated by block-codegen\n";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OutputAssembler {
    footer: bool,
}

impl OutputAssembler {
    pub fn new(footer: bool) -> Self {
        Self { footer }
    }

    pub fn has_footer(&self) -> bool {
        self.footer
    }

    pub fn assemble(&self, body: &str, context: &GenerationContext) -> String {
        let mut out = header(&context.license, &context.version);
        out.push_str(&import_section(&context.imports));
        out.push_str(body);
        if self.footer {
            out.push_str(FOOTER);
        }
        out
    }
}

/// License and pragma lines followed by one blank line
pub fn header(license: &str, version: &str) -> String {
    format!(
        "// SPDX-License-Identifier: {}\npragma solidity {};\n\n",
        license, version
    )
}

/// One line per import with a non-empty path, then a blank line.
/// Empty when nothing survives the filter.
pub fn import_section(imports: &[ImportDescriptor]) -> String {
    let lines: Vec<String> = imports
        .iter()
        .filter(|import| !import.path.is_empty())
        .map(import_line)
        .collect();
    if lines.is_empty() {
        String::new()
    } else {
        format!("{}\n\n", lines.join("\n"))
    }
}

fn import_line(import: &ImportDescriptor) -> String {
    let path = import.path.replace('\\', "\\\\").replace('"', "\\\"");
    match import.alias.as_deref().filter(|a| !a.is_empty()) {
        Some(alias) => format!("import \"{}\" as {};", path, alias),
        None => format!("import \"{}\";", path),
    }
}
