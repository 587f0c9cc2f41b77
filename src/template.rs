/*!
 * Placeholder substitution and template loading
 *
 * Templates are small UTF-16LE text files carrying markers of the form
 * `<!-- inject: key -->`. Markers are matched case-insensitively and may carry
 * arbitrary whitespace inside the comment.
 */

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use regex::{NoExpand, Regex};

use crate::error::{EvbError, Result};
use crate::types::TemplatePaths;
use crate::utils::absolute_path;

/// Named markers recognised inside templates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Placeholder {
    DirName,
    Files,
    FileName,
    FilePath,
    InputExe,
    OutputExe,
    DeleteExtractedOnExit,
    CompressFiles,
    ShareVirtualSystem,
    MapExecutableWithTemporaryFile,
    AllowRunningOfVirtualExeFiles,
}

impl Placeholder {
    /// Every placeholder, in declaration order
    pub const ALL: [Placeholder; 11] = [
        Placeholder::DirName,
        Placeholder::Files,
        Placeholder::FileName,
        Placeholder::FilePath,
        Placeholder::InputExe,
        Placeholder::OutputExe,
        Placeholder::DeleteExtractedOnExit,
        Placeholder::CompressFiles,
        Placeholder::ShareVirtualSystem,
        Placeholder::MapExecutableWithTemporaryFile,
        Placeholder::AllowRunningOfVirtualExeFiles,
    ];

    /// Key written inside the marker
    pub fn key(self) -> &'static str {
        match self {
            Placeholder::DirName => "dirName",
            Placeholder::Files => "files",
            Placeholder::FileName => "fileName",
            Placeholder::FilePath => "filePath",
            Placeholder::InputExe => "inputExe",
            Placeholder::OutputExe => "outputExe",
            Placeholder::DeleteExtractedOnExit => "deleteExtractedOnExit",
            Placeholder::CompressFiles => "compressFiles",
            Placeholder::ShareVirtualSystem => "shareVirtualSystem",
            Placeholder::MapExecutableWithTemporaryFile => "mapExecutableWithTemporaryFile",
            Placeholder::AllowRunningOfVirtualExeFiles => "allowRunningOfVirtualExeFiles",
        }
    }

    /// Look a placeholder up by key, ignoring case
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|p| p.key().eq_ignore_ascii_case(key.trim()))
    }

    fn pattern(self) -> &'static Regex {
        &INJECT_PATTERNS[self as usize]
    }
}

impl fmt::Display for Placeholder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<!-- inject: {} -->", self.key())
    }
}

// Indexed by `Placeholder as usize`, so must follow `Placeholder::ALL`
static INJECT_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    Placeholder::ALL
        .iter()
        .map(|p| {
            Regex::new(&format!(
                r"(?i)<!--\s*?inject\s*?:\s*?{}\s*?-->",
                regex::escape(p.key())
            ))
            .expect("placeholder pattern is valid")
        })
        .collect()
});

static PRE_TAG_INDENTS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^\s+?<").expect("indent pattern is valid"));

/// Replace the first marker for `placeholder` with `value`.
///
/// The value is inserted literally (no `$` group expansion, no escaping).
/// A template without the marker is returned unchanged.
pub fn inject(template: &str, placeholder: Placeholder, value: &str) -> String {
    let pattern = placeholder.pattern();
    if !pattern.is_match(template) {
        log::debug!("Template has no {} marker, leaving it unchanged", placeholder);
        return template.to_string();
    }
    pattern.replacen(template, 1, NoExpand(value)).into_owned()
}

/// Replace the first marker of each placeholder in a single pass.
///
/// Markers are located in `template` before anything is inserted, so a value
/// that happens to contain marker text is never mistaken for a marker.
pub fn inject_all(template: &str, values: &[(Placeholder, &str)]) -> String {
    let mut spans: Vec<(usize, usize, &str)> = values
        .iter()
        .filter_map(|&(placeholder, value)| match placeholder.pattern().find(template) {
            Some(m) => Some((m.start(), m.end(), value)),
            None => {
                log::debug!("Template has no {} marker, leaving it unchanged", placeholder);
                None
            }
        })
        .collect();
    spans.sort_by_key(|&(start, _, _)| start);

    let mut out = String::with_capacity(template.len());
    let mut copied = 0;
    for (start, end, value) in spans {
        // same placeholder listed twice
        if start < copied {
            continue;
        }
        out.push_str(&template[copied..start]);
        out.push_str(value);
        copied = end;
    }
    out.push_str(&template[copied..]);
    out
}

/// Key-based variant of [`inject`]; fails on keys outside the known set
pub fn substitute(template: &str, key: &str, value: &str) -> Result<String> {
    match Placeholder::from_key(key) {
        Some(placeholder) => Ok(inject(template, placeholder, value)),
        None => crate::bail!(InvalidArgument, "unknown placeholder key '{}'", key),
    }
}

/// Whether the template still carries a marker for `placeholder`
pub fn has_marker(template: &str, placeholder: Placeholder) -> bool {
    placeholder.pattern().is_match(template)
}

/// The three template roles
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateKind {
    Project,
    Dir,
    File,
}

impl TemplateKind {
    /// File name of the bundled template for this role
    pub fn default_file_name(self) -> &'static str {
        match self {
            TemplateKind::Project => "project-template.xml",
            TemplateKind::Dir => "dir-template.xml",
            TemplateKind::File => "file-template.xml",
        }
    }

    // Compiled into the binary so installed copies need no template directory
    fn bundled_bytes(self) -> &'static [u8] {
        match self {
            TemplateKind::Project => include_bytes!("../templates/project-template.xml"),
            TemplateKind::Dir => include_bytes!("../templates/dir-template.xml"),
            TemplateKind::File => include_bytes!("../templates/file-template.xml"),
        }
    }

    fn override_path(self, paths: &TemplatePaths) -> Option<&Path> {
        match self {
            TemplateKind::Project => paths.project.as_deref(),
            TemplateKind::Dir => paths.dir.as_deref(),
            TemplateKind::File => paths.file.as_deref(),
        }
    }
}

/// Where a template's text comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateSource {
    /// Compiled-in default
    Bundled(TemplateKind),
    /// User-supplied file, as an absolute path
    File(PathBuf),
}

impl fmt::Display for TemplateSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TemplateSource::Bundled(kind) => write!(f, "<bundled>/{}", kind.default_file_name()),
            TemplateSource::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Pick the override for `kind` if any, else the bundled default
pub fn resolve_template(paths: &TemplatePaths, kind: TemplateKind) -> Result<TemplateSource> {
    match kind.override_path(paths) {
        Some(path) => Ok(TemplateSource::File(absolute_path(path)?)),
        None => Ok(TemplateSource::Bundled(kind)),
    }
}

/// Load the text of `source`
pub fn load_source(source: &TemplateSource) -> Result<String> {
    match source {
        TemplateSource::File(path) => load_template(path),
        TemplateSource::Bundled(kind) => load_bundled(*kind),
    }
}

/// Decode the compiled-in template for `kind`
pub fn load_bundled(kind: TemplateKind) -> Result<String> {
    let text = decode_utf16le(kind.bundled_bytes()).map_err(|reason| EvbError::TemplateDecode {
        path: PathBuf::from(TemplateSource::Bundled(kind).to_string()),
        reason,
    })?;
    Ok(strip_tag_indents(&text))
}

/// Read a UTF-16LE template and strip the indentation in front of tags
pub fn load_template(path: &Path) -> Result<String> {
    let bytes = fs::read(path).map_err(|source| EvbError::TemplateLoad {
        path: path.to_path_buf(),
        source,
    })?;
    let text = decode_utf16le(&bytes).map_err(|reason| EvbError::TemplateDecode {
        path: path.to_path_buf(),
        reason,
    })?;
    Ok(strip_tag_indents(&text))
}

/// Remove leading whitespace before `<` at the start of every line
pub fn strip_tag_indents(text: &str) -> String {
    PRE_TAG_INDENTS.replace_all(text, "<").into_owned()
}

/// Decode UTF-16LE bytes, dropping a leading byte-order mark
pub fn decode_utf16le(bytes: &[u8]) -> std::result::Result<String, String> {
    if bytes.len() % 2 != 0 {
        return Err(format!(
            "odd byte length {} is not valid UTF-16LE",
            bytes.len()
        ));
    }
    let units: Vec<u16> = bytes
        .chunks_exact(2)
        .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
        .collect();
    let units = units.strip_prefix(&[0xFEFF]).unwrap_or(&units);
    String::from_utf16(units).map_err(|e| e.to_string())
}

/// Encode text as UTF-16LE without a byte-order mark
pub fn encode_utf16le(text: &str) -> Vec<u8> {
    text.encode_utf16().flat_map(u16::to_le_bytes).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_inject_matches_loose_marker() {
        let template = "<Name><!--   INJECT :dirname\t--></Name>";
        assert_eq!(
            inject(template, Placeholder::DirName, "bin"),
            "<Name>bin</Name>"
        );
    }

    #[test]
    fn test_inject_replaces_first_occurrence_only() {
        let template = "<!-- inject: fileName -->|<!-- inject: fileName -->";
        assert_eq!(
            inject(template, Placeholder::FileName, "a.txt"),
            "a.txt|<!-- inject: fileName -->"
        );
    }

    #[test]
    fn test_inject_keys_are_independent() {
        let template = "<N><!-- inject: fileName --></N><P><!-- inject: filePath --></P>";
        let out = inject(template, Placeholder::FileName, "a.txt");
        let out = inject(&out, Placeholder::FilePath, "/tmp/a.txt");
        assert_eq!(out, "<N>a.txt</N><P>/tmp/a.txt</P>");
    }

    #[test]
    fn test_inject_value_is_literal() {
        let template = "<N><!-- inject: fileName --></N>";
        assert_eq!(
            inject(template, Placeholder::FileName, "$0 & ${1}<x>"),
            "<N>$0 & ${1}<x></N>"
        );
    }

    #[test]
    fn test_inject_missing_marker_is_noop() {
        let template = "<File><!-- inject: other --></File>";
        assert_eq!(inject(template, Placeholder::Files, "x"), template);
        assert!(!has_marker(template, Placeholder::Files));
    }

    #[test]
    fn test_inject_all_ignores_markers_inside_values() {
        let template = "[<!-- inject: dirName -->|<!-- inject: files -->]";
        let out = inject_all(
            template,
            &[
                (Placeholder::DirName, "<!-- inject: files -->"),
                (Placeholder::Files, "(child)"),
            ],
        );
        assert_eq!(out, "[<!-- inject: files -->|(child)]");
    }

    #[test]
    fn test_inject_all_follows_template_order() {
        let template = "<P><!-- inject: filePath --></P><N><!-- inject: FILENAME --></N>";
        let out = inject_all(
            template,
            &[(Placeholder::FileName, "a$1"), (Placeholder::FilePath, "/x/a$1")],
        );
        assert_eq!(out, "<P>/x/a$1</P><N>a$1</N>");
        assert_eq!(inject_all(template, &[(Placeholder::Files, "z")]), template);
    }

    #[test]
    fn test_substitute_by_key() {
        let out = substitute("<!-- inject: outputExe -->", "OUTPUTEXE", "/out.exe").unwrap();
        assert_eq!(out, "/out.exe");
        assert!(substitute("x", "bogus", "y").is_err());
    }

    #[test]
    fn test_strip_tag_indents() {
        let text = "<a>\r\n    <b>text</b>\n\t\t<c/>\n  plain\n";
        assert_eq!(strip_tag_indents(text), "<a>\r\n<b>text</b>\n<c/>\n  plain\n");
    }

    #[test]
    fn test_decode_utf16le() {
        let mut bytes = vec![0xFF, 0xFE];
        bytes.extend(encode_utf16le("<a>é</a>"));
        assert_eq!(decode_utf16le(&bytes).unwrap(), "<a>é</a>");
        assert!(decode_utf16le(&[0x3C]).is_err());
        // lone surrogate
        assert!(decode_utf16le(&[0x00, 0xD8]).is_err());
    }

    #[test]
    fn test_load_template_reports_path() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("missing-template.xml");
        let err = load_template(&missing).unwrap_err();
        assert!(matches!(err, EvbError::TemplateLoad { .. }));
        assert!(err.to_string().contains("missing-template.xml"));
    }

    #[test]
    fn test_load_template_decodes_and_strips() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("dir-template.xml");
        fs::write(&path, encode_utf16le("<File>\n    <Name/>\n</File>")).unwrap();
        assert_eq!(load_template(&path).unwrap(), "<File>\n<Name/>\n</File>");
    }

    #[test]
    fn test_resolve_template_prefers_override() {
        let paths = TemplatePaths {
            dir: Some(PathBuf::from("/custom/dir.xml")),
            ..Default::default()
        };
        assert_eq!(
            resolve_template(&paths, TemplateKind::Dir).unwrap(),
            TemplateSource::File(absolute_path(Path::new("/custom/dir.xml")).unwrap())
        );
        assert_eq!(
            resolve_template(&paths, TemplateKind::File).unwrap(),
            TemplateSource::Bundled(TemplateKind::File)
        );
    }

    #[test]
    fn test_override_is_read_from_disk() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("file.xml");
        fs::write(&path, encode_utf16le("<Custom/>")).unwrap();
        let paths = TemplatePaths {
            file: Some(path),
            ..Default::default()
        };
        let source = resolve_template(&paths, TemplateKind::File).unwrap();
        assert_eq!(load_source(&source).unwrap(), "<Custom/>");
    }

    #[test]
    fn test_bundled_templates_load() {
        for kind in [TemplateKind::Project, TemplateKind::Dir, TemplateKind::File] {
            let text = load_source(&TemplateSource::Bundled(kind)).unwrap();
            assert!(text.starts_with('<'), "{:?} template: {}", kind, text);
        }
        let project = load_bundled(TemplateKind::Project).unwrap();
        for placeholder in [
            Placeholder::InputExe,
            Placeholder::OutputExe,
            Placeholder::Files,
            Placeholder::CompressFiles,
        ] {
            assert!(has_marker(&project, placeholder), "missing {}", placeholder);
        }
        assert!(has_marker(&load_bundled(TemplateKind::Dir).unwrap(), Placeholder::DirName));
        assert!(has_marker(&load_bundled(TemplateKind::File).unwrap(), Placeholder::FilePath));
    }

    #[test]
    fn test_bundled_source_display() {
        assert_eq!(
            TemplateSource::Bundled(TemplateKind::Project).to_string(),
            "<bundled>/project-template.xml"
        );
    }
}
