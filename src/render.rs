/*!
 * Tree to XML rendering
 *
 * Each node becomes a fragment built from the directory or file template.
 * Fragments are concatenated in traversal order with no separator, and a
 * directory's fragment wraps the concatenation of its children. All markers of
 * a template are filled in one pass, so names that contain marker text stay
 * where they were injected.
 */

use std::borrow::Cow;
use std::path::{Path, PathBuf};
use std::slice;
use std::sync::Arc;

use indicatif::ProgressBar;

use crate::filter::{AcceptAll, EntryFilter};
use crate::template::{inject_all, Placeholder};
use crate::types::{Escaping, RenderStats, TreeNode};
use crate::utils::count_nodes;

/// Output of a render pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Rendered {
    /// Concatenated fragments for the `files` placeholder
    pub xml: String,
    pub stats: RenderStats,
}

/// Renders captured trees with a directory and a file template
pub struct Renderer<'a> {
    dir_template: &'a str,
    file_template: &'a str,
    filter: &'a dyn EntryFilter,
    escaping: Escaping,
    progress: Arc<ProgressBar>,
}

// A directory whose children are still being rendered
struct Frame<'t> {
    base: PathBuf,
    nodes: slice::Iter<'t, TreeNode>,
    parts: Vec<String>,
    // Injected directory name, `None` for the root level
    dir_name: Option<String>,
}

impl<'a> Renderer<'a> {
    /// Create a renderer that accepts every node and injects values verbatim
    pub fn new(dir_template: &'a str, file_template: &'a str) -> Self {
        Self {
            dir_template,
            file_template,
            filter: &AcceptAll,
            escaping: Escaping::None,
            progress: Arc::new(ProgressBar::hidden()),
        }
    }

    pub fn with_filter(mut self, filter: &'a dyn EntryFilter) -> Self {
        self.filter = filter;
        self
    }

    pub fn with_escaping(mut self, escaping: Escaping) -> Self {
        self.escaping = escaping;
        self
    }

    /// Progress bar ticked once per node, skipped subtrees included
    pub fn with_progress(mut self, progress: Arc<ProgressBar>) -> Self {
        self.progress = progress;
        self
    }

    /// Render `tree`, whose nodes live directly under `base`
    pub fn render(&self, base: &Path, tree: &[TreeNode]) -> Rendered {
        let mut stats = RenderStats::default();
        let mut stack = vec![Frame {
            base: base.to_path_buf(),
            nodes: tree.iter(),
            parts: Vec::new(),
            dir_name: None,
        }];

        while let Some(frame) = stack.last_mut() {
            let node = match frame.nodes.next() {
                Some(node) => node,
                None => {
                    let Some(Frame {
                        parts, dir_name, ..
                    }) = stack.pop()
                    else {
                        break;
                    };
                    let inner = parts.concat();
                    match (dir_name, stack.last_mut()) {
                        (Some(dir_name), Some(parent)) => {
                            parent.parts.push(inject_all(
                                self.dir_template,
                                &[
                                    (Placeholder::DirName, dir_name.as_str()),
                                    (Placeholder::Files, inner.as_str()),
                                ],
                            ));
                        }
                        _ => return Rendered { xml: inner, stats },
                    }
                    continue;
                }
            };

            self.progress.inc(1);
            let full_path = frame.base.join(node.name());
            if !self.filter.accept(&full_path, node.name(), node.is_dir()) {
                log::debug!("Filtered out {}", full_path.display());
                stats.skipped += 1;
                if let TreeNode::Dir(dir) = node {
                    // the subtree is never visited, count it as done
                    self.progress.inc(count_nodes(&dir.children));
                }
                continue;
            }

            match node {
                TreeNode::File(file) => {
                    stats.files += 1;
                    let file_path = full_path.to_string_lossy();
                    let name = self.escape(&file.name);
                    let path = self.escape(&file_path);
                    let part = inject_all(
                        self.file_template,
                        &[(Placeholder::FileName, &*name), (Placeholder::FilePath, &*path)],
                    );
                    frame.parts.push(part);
                }
                TreeNode::Dir(dir) => {
                    stats.dirs += 1;
                    let dir_name = self.escape(&dir.name).into_owned();
                    stack.push(Frame {
                        base: full_path,
                        nodes: dir.children.iter(),
                        parts: Vec::new(),
                        dir_name: Some(dir_name),
                    });
                }
            }
        }

        Rendered {
            xml: String::new(),
            stats,
        }
    }

    fn escape<'v>(&self, value: &'v str) -> Cow<'v, str> {
        match self.escaping {
            Escaping::None => Cow::Borrowed(value),
            Escaping::Xml => quick_xml::escape::escape(value),
        }
    }
}

/// Render `tree` under `base` with the given templates and filter
pub fn render(
    base: &Path,
    tree: &[TreeNode],
    dir_template: &str,
    file_template: &str,
    filter: &dyn EntryFilter,
) -> String {
    Renderer::new(dir_template, file_template)
        .with_filter(filter)
        .render(base, tree)
        .xml
}
