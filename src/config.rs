/*!
 * Configuration handling for evbgen
 */

use std::path::{Path, PathBuf};

use clap::{ArgAction, Parser};
use clap_complete::Shell;

use crate::ensure;
use crate::error::Result;
use crate::filter::PatternFilter;
use crate::generator::Options;
use crate::types::{Escaping, EvbOptions, TemplatePaths};

/// Command-line arguments for evbgen
#[derive(Parser, Debug, Clone)]
#[clap(
    name = "evbgen",
    version = env!("CARGO_PKG_VERSION"),
    about = "Generate Enigma Virtual Box project files from a directory tree",
    long_about = "Walks a directory and writes an Enigma Virtual Box project (.evb) that packs every file and folder in it into a copy of the input executable."
)]
pub struct Args {
    /// Project file to generate (e.g. build/app.evb)
    #[clap(required_unless_present = "generate")]
    pub project_file: Option<String>,

    /// Executable the files are packed into
    #[clap(required_unless_present = "generate")]
    pub input_exe: Option<String>,

    /// Where the packed executable is saved
    #[clap(required_unless_present = "generate")]
    pub output_exe: Option<String>,

    /// Directory whose contents are packed
    #[clap(required_unless_present = "generate")]
    pub pack_dir: Option<String>,

    /// Custom project template (UTF-16LE)
    #[clap(long)]
    pub project_template: Option<String>,

    /// Custom directory template (UTF-16LE)
    #[clap(long)]
    pub dir_template: Option<String>,

    /// Custom file template (UTF-16LE)
    #[clap(long)]
    pub file_template: Option<String>,

    /// Comma-separated list of patterns to exclude
    #[clap(long, value_delimiter = ',')]
    pub exclude: Vec<String>,

    /// Comma-separated list of patterns to include (if specified, only matching files are packed)
    #[clap(long, value_delimiter = ',')]
    pub include: Vec<String>,

    /// Sort entries by name instead of directory listing order
    #[clap(long)]
    pub sort: bool,

    /// Escape XML special characters in names and paths
    #[clap(long)]
    pub escape_xml: bool,

    /// Delete extracted files when the packed executable exits
    #[clap(long, action = ArgAction::Set, default_value_t = true, value_name = "BOOL")]
    pub delete_extracted_on_exit: bool,

    /// Compress packed files
    #[clap(long, action = ArgAction::Set, default_value_t = true, value_name = "BOOL")]
    pub compress_files: bool,

    /// Share the virtual system with child processes
    #[clap(long, action = ArgAction::Set, default_value_t = false, value_name = "BOOL")]
    pub share_virtual_system: bool,

    /// Map the executable with a temporary file
    #[clap(long, action = ArgAction::Set, default_value_t = true, value_name = "BOOL")]
    pub map_executable_with_temporary_file: bool,

    /// Allow running executables from the virtual file system
    #[clap(long, action = ArgAction::Set, default_value_t = true, value_name = "BOOL")]
    pub allow_running_of_virtual_exe_files: bool,

    /// Enable debug logging
    #[clap(short, long)]
    pub verbose: bool,

    /// Generate shell completions
    #[clap(long = "generate", value_enum)]
    pub generate: Option<Shell>,
}

/// Application configuration
#[derive(Clone, Debug)]
pub struct Config {
    /// Project file to write
    pub project_file: PathBuf,

    /// Executable the files are packed into
    pub input_exe: PathBuf,

    /// Packed executable destination
    pub output_exe: PathBuf,

    /// Directory to pack
    pub pack_dir: PathBuf,

    /// Template overrides
    pub template_path: TemplatePaths,

    /// Patterns to exclude
    pub exclude_patterns: Vec<String>,

    /// Patterns to include (if empty, include all)
    pub include_patterns: Vec<String>,

    /// Wrapper behaviour flags
    pub evb_options: EvbOptions,

    /// Escaping of injected values
    pub escaping: Escaping,

    /// Whether to sort entries by name
    pub sort_entries: bool,

    /// Debug logging
    pub verbose: bool,
}

impl Config {
    /// Create configuration from command-line arguments
    pub fn from_args(args: Args) -> Self {
        let path = |value: Option<String>| PathBuf::from(value.unwrap_or_default());

        Self {
            project_file: path(args.project_file),
            input_exe: path(args.input_exe),
            output_exe: path(args.output_exe),
            pack_dir: path(args.pack_dir),
            template_path: TemplatePaths {
                project: args.project_template.map(PathBuf::from),
                dir: args.dir_template.map(PathBuf::from),
                file: args.file_template.map(PathBuf::from),
            },
            exclude_patterns: args.exclude,
            include_patterns: args.include,
            evb_options: EvbOptions {
                delete_extracted_on_exit: args.delete_extracted_on_exit,
                compress_files: args.compress_files,
                share_virtual_system: args.share_virtual_system,
                map_executable_with_temporary_file: args.map_executable_with_temporary_file,
                allow_running_of_virtual_exe_files: args.allow_running_of_virtual_exe_files,
            },
            escaping: if args.escape_xml {
                Escaping::Xml
            } else {
                Escaping::None
            },
            sort_entries: args.sort,
            verbose: args.verbose,
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        for (label, value) in [
            ("project file", &self.project_file),
            ("input executable", &self.input_exe),
            ("output executable", &self.output_exe),
            ("directory to pack", &self.pack_dir),
        ] {
            ensure!(!value.as_os_str().is_empty(), Config, "missing {}", label);
        }

        ensure!(
            self.pack_dir.is_dir(),
            Config,
            "Directory to pack not found: {}",
            self.pack_dir.display()
        );

        if let Some(parent) = self.project_file.parent() {
            ensure!(
                parent == Path::new("") || parent.is_dir(),
                Config,
                "Project file directory not found: {}",
                parent.display()
            );
        }

        let overrides = [
            &self.template_path.project,
            &self.template_path.dir,
            &self.template_path.file,
        ];
        for template in overrides.into_iter().flatten() {
            ensure!(
                template.is_file(),
                Config,
                "Template file not found: {}",
                template.display()
            );
        }

        Ok(())
    }

    /// Library options for this configuration
    pub fn to_options(&self) -> Options {
        let mut options = Options {
            template_path: self.template_path.clone(),
            evb_options: self.evb_options,
            escaping: self.escaping,
            sort_entries: self.sort_entries,
            ..Options::default()
        };
        if !self.exclude_patterns.is_empty() || !self.include_patterns.is_empty() {
            options = options.with_filter(PatternFilter::new(
                self.exclude_patterns.clone(),
                self.include_patterns.clone(),
            ));
        }
        options
    }
}
