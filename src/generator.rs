/*!
 * Project generation entry point
 *
 * Loads the three templates, captures the pack directory, renders it and
 * writes the filled project file. Any failure aborts the run before the
 * output is touched.
 */

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use indicatif::ProgressBar;

use crate::assembler::assemble_escaped;
use crate::error::{EvbError, Result};
use crate::filter::{AcceptAll, EntryFilter};
use crate::render::Renderer;
use crate::template::{load_source, resolve_template, TemplateKind};
use crate::tree::TreeReader;
use crate::types::{Escaping, EvbOptions, RenderStats, TemplatePaths};
use crate::utils::{absolute_path, count_nodes};
use crate::writer::ProjectWriter;

/// Options for a single generation run
pub struct Options {
    /// Decides which files and directories are packed
    pub filter: Box<dyn EntryFilter>,
    /// Template overrides
    pub template_path: TemplatePaths,
    /// Wrapper behaviour flags
    pub evb_options: EvbOptions,
    /// Escaping applied to injected names and paths
    pub escaping: Escaping,
    /// Sort siblings by name instead of keeping listing order
    pub sort_entries: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            filter: Box::new(AcceptAll),
            template_path: TemplatePaths::default(),
            evb_options: EvbOptions::default(),
            escaping: Escaping::None,
            sort_entries: false,
        }
    }
}

impl Options {
    pub fn with_filter(mut self, filter: impl EntryFilter + 'static) -> Self {
        self.filter = Box::new(filter);
        self
    }
}

impl fmt::Debug for Options {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Options")
            .field("template_path", &self.template_path)
            .field("evb_options", &self.evb_options)
            .field("escaping", &self.escaping)
            .field("sort_entries", &self.sort_entries)
            .finish_non_exhaustive()
    }
}

/// Result of a completed run
#[derive(Debug, Clone)]
pub struct Summary {
    /// Absolute path of the written project file
    pub output_file: PathBuf,
    /// Bytes written to the project file
    pub bytes_written: u64,
    pub stats: RenderStats,
}

/// Builds and writes project files
pub struct Generator {
    options: Options,
    /// Progress bar
    pub progress: Arc<ProgressBar>,
}

impl Generator {
    /// Create a new generator
    pub fn new(options: Options, progress: Arc<ProgressBar>) -> Self {
        Self { options, progress }
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Build the project document for `path_to_pack` without writing it
    pub fn build_document(
        &self,
        input_exe: &Path,
        output_exe: &Path,
        path_to_pack: &Path,
    ) -> Result<(String, RenderStats)> {
        let paths = &self.options.template_path;
        let project_source = resolve_template(paths, TemplateKind::Project)?;
        let dir_source = resolve_template(paths, TemplateKind::Dir)?;
        let file_source = resolve_template(paths, TemplateKind::File)?;
        log::debug!(
            "Templates: project={}, dir={}, file={}",
            project_source,
            dir_source,
            file_source
        );

        let project_template = load_source(&project_source)?;
        let dir_template = load_source(&dir_source)?;
        let file_template = load_source(&file_source)?;

        let pack_root = absolute_path(path_to_pack)?;
        self.progress
            .set_message(format!("Reading {}", pack_root.display()));
        let tree = TreeReader::new()
            .sort_entries(self.options.sort_entries)
            .read(&pack_root)
            .map_err(|source| EvbError::TreeRead {
                root: pack_root.clone(),
                source,
            })?;

        self.progress.set_length(count_nodes(&tree));
        self.progress.set_message("Rendering tree");
        let rendered = Renderer::new(&dir_template, &file_template)
            .with_filter(&*self.options.filter)
            .with_escaping(self.options.escaping)
            .with_progress(Arc::clone(&self.progress))
            .render(&pack_root, &tree);
        log::info!(
            "Rendered {} files and {} directories ({} skipped)",
            rendered.stats.files,
            rendered.stats.dirs,
            rendered.stats.skipped
        );

        let document = assemble_escaped(
            &project_template,
            input_exe,
            output_exe,
            &rendered.xml,
            &self.options.evb_options,
            self.options.escaping,
        )?;
        Ok((document, rendered.stats))
    }

    /// Generate the project and write it to `project_name`
    pub fn generate(
        &self,
        project_name: &Path,
        input_exe: &Path,
        output_exe: &Path,
        path_to_pack: &Path,
    ) -> Result<Summary> {
        let (document, stats) = self.build_document(input_exe, output_exe, path_to_pack)?;

        let output_file = absolute_path(project_name)?;
        self.progress
            .set_message(format!("Writing {}", output_file.display()));
        let bytes_written = ProjectWriter::new(&output_file).write(&document)?;

        Ok(Summary {
            output_file,
            bytes_written,
            stats,
        })
    }
}

/// Generate an Enigma Virtual Box project at `project_name` packing `path_to_pack`
pub fn generate(
    project_name: impl AsRef<Path>,
    input_exe: impl AsRef<Path>,
    output_exe: impl AsRef<Path>,
    path_to_pack: impl AsRef<Path>,
    options: Options,
) -> Result<()> {
    Generator::new(options, Arc::new(ProgressBar::hidden())).generate(
        project_name.as_ref(),
        input_exe.as_ref(),
        output_exe.as_ref(),
        path_to_pack.as_ref(),
    )?;
    Ok(())
}
