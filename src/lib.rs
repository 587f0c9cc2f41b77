/*!
 * evbgen - Generate Enigma Virtual Box project files from a directory tree
 *
 * The pack directory is captured into an in-memory tree, every node is
 * rendered through a small XML template, and the result is injected into a
 * project template together with the executable paths and wrapper flags.
 */

pub mod assembler;
pub mod config;
pub mod error;
pub mod filter;
pub mod generator;
pub mod render;
pub mod report;
pub mod template;
pub mod tree;
pub mod types;
pub mod utils;
pub mod writer;


// Re-export main components for easier access
pub use assembler::assemble;
pub use config::Config;
pub use error::{EvbError, FilesystemError, Result};
pub use filter::{AcceptAll, EntryFilter, PatternFilter};
pub use generator::{generate, Generator, Options, Summary};
pub use render::{render, Renderer};
pub use report::{GenerateReport, ReportFormat, Reporter};
pub use template::{
    inject, inject_all, load_template, substitute, Placeholder, TemplateKind, TemplateSource,
};
pub use tree::{read_tree, TreeReader};
pub use types::{DirEntry, Escaping, EvbOptions, FileEntry, RenderStats, TemplatePaths, TreeNode};
pub use writer::ProjectWriter;

/// Version of the library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
