/*!
 * Project document assembly
 */

use std::borrow::Cow;
use std::path::Path;

use crate::error::Result;
use crate::template::{has_marker, inject, Placeholder};
use crate::types::{Escaping, EvbOptions};
use crate::utils::absolute_path;

/// Fill the project template with executable paths, wrapper flags and the rendered tree.
///
/// Relative executable paths are resolved against the current directory since
/// the wrapper only accepts absolute paths. Values are injected verbatim.
pub fn assemble(
    project_template: &str,
    input_exe: &Path,
    output_exe: &Path,
    rendered_files: &str,
    evb_options: &EvbOptions,
) -> Result<String> {
    assemble_escaped(
        project_template,
        input_exe,
        output_exe,
        rendered_files,
        evb_options,
        Escaping::None,
    )
}

/// Same as [`assemble`], escaping the executable paths as requested
pub fn assemble_escaped(
    project_template: &str,
    input_exe: &Path,
    output_exe: &Path,
    rendered_files: &str,
    evb_options: &EvbOptions,
    escaping: Escaping,
) -> Result<String> {
    for placeholder in [Placeholder::InputExe, Placeholder::OutputExe, Placeholder::Files] {
        if !has_marker(project_template, placeholder) {
            log::warn!("Project template has no {} marker", placeholder);
        }
    }

    let input_exe = absolute_path(input_exe)?;
    let output_exe = absolute_path(output_exe)?;

    let mut document = inject(
        project_template,
        Placeholder::InputExe,
        &escape(&input_exe.to_string_lossy(), escaping),
    );
    document = inject(
        &document,
        Placeholder::OutputExe,
        &escape(&output_exe.to_string_lossy(), escaping),
    );

    for (placeholder, value) in flag_values(evb_options) {
        document = inject(&document, placeholder, flag(value));
    }

    // The tree goes in last so markers inside file names are never re-matched
    Ok(inject(&document, Placeholder::Files, rendered_files))
}

fn flag_values(options: &EvbOptions) -> [(Placeholder, bool); 5] {
    [
        (
            Placeholder::DeleteExtractedOnExit,
            options.delete_extracted_on_exit,
        ),
        (Placeholder::CompressFiles, options.compress_files),
        (Placeholder::ShareVirtualSystem, options.share_virtual_system),
        (
            Placeholder::MapExecutableWithTemporaryFile,
            options.map_executable_with_temporary_file,
        ),
        (
            Placeholder::AllowRunningOfVirtualExeFiles,
            options.allow_running_of_virtual_exe_files,
        ),
    ]
}

fn flag(value: bool) -> &'static str {
    if value {
        "true"
    } else {
        "false"
    }
}

fn escape(value: &str, escaping: Escaping) -> Cow<'_, str> {
    match escaping {
        Escaping::None => Cow::Borrowed(value),
        Escaping::Xml => quick_xml::escape::escape(value),
    }
}
