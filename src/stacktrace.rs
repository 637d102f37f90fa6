//! Symbolication of stack traces against a set of sourcemaps.
use std::borrow::Cow;
use std::collections::btree_map;
use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use crate::errors::{Error, Result};
use crate::types::SourceMap;
use crate::utils::ends_with_path;

/// A single frame of a JavaScript stack trace.
///
/// Lines are 1-based, columns are used as given.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct StackFrame {
    #[serde(rename = "file")]
    pub generated_file: String,
    #[serde(rename = "lineNumber")]
    pub generated_line: u32,
    #[serde(rename = "column")]
    pub generated_column: u32,
    #[serde(rename = "methodName", default)]
    pub function_name: String,
    #[serde(default)]
    pub arguments: Vec<String>,
}

impl StackFrame {
    /// Parses a stack trace from its JSON array form.
    pub fn parse_trace(json: &str) -> Result<Vec<StackFrame>> {
        Ok(serde_json::from_str(json)?)
    }
}

impl fmt::Display for StackFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "at {} ({}:{}:{})",
            self.function_name, self.generated_file, self.generated_line, self.generated_column
        )
    }
}

/// A stack frame after symbolication.
///
/// If the frame was mapped, file, line, column and function name hold the
/// original values and `sourcemap` names the map that was used.
#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub struct ResolvedFrame {
    #[serde(flatten)]
    pub frame: StackFrame,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sourcemap: Option<String>,
}

impl ResolvedFrame {
    fn unchanged(frame: &StackFrame) -> ResolvedFrame {
        ResolvedFrame {
            frame: frame.clone(),
            sourcemap: None,
        }
    }

    /// Returns `true` if a sourcemap matched the frame.
    pub fn is_mapped(&self) -> bool {
        self.sourcemap.is_some()
    }
}

impl fmt::Display for ResolvedFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.frame, f)
    }
}

/// Strips the scheme and host from URL style frame locations.
fn generated_path(file: &str) -> Cow<'_, str> {
    match Url::parse(file) {
        Ok(url) if matches!(url.scheme(), "http" | "https" | "file") => {
            Cow::Owned(url.path().trim_start_matches('/').to_owned())
        }
        _ => Cow::Borrowed(file),
    }
}

/// Checks if the generated file a map was keyed by is the file a frame
/// refers to.
///
/// Either path may be the longer one, they match if one ends with the
/// other on a path component boundary.
pub fn matches_generated_file(key: &str, file: &str) -> bool {
    let key = key.trim_start_matches("./");
    let file = generated_path(file);
    let file = file.trim_start_matches("./");
    if key.is_empty() || file.is_empty() {
        return false;
    }
    key == file || ends_with_path(key, file) || ends_with_path(file, key)
}

/// A set of sourcemaps keyed by the generated file they describe.
///
/// Keys are kept sorted so that the first match for a frame does not
/// depend on insertion order.  The set is meant to be built once and
/// then shared between readers.
#[derive(Clone, Debug, Default)]
pub struct MapSet {
    maps: BTreeMap<String, SourceMap>,
}

impl MapSet {
    pub fn new() -> MapSet {
        MapSet::default()
    }

    /// Adds a sourcemap for the generated file `key`.
    pub fn insert<S: Into<String>>(&mut self, key: S, sm: SourceMap) -> Option<SourceMap> {
        self.maps.insert(key.into(), sm)
    }

    /// Adds a sourcemap by the path of its `.map` file.
    ///
    /// The key is the path with the `.map` suffix removed.
    pub fn insert_map_file(&mut self, path: &str, sm: SourceMap) -> Option<SourceMap> {
        let key = path.strip_suffix(".map").unwrap_or(path);
        self.insert(key, sm)
    }

    pub fn get(&self, key: &str) -> Option<&SourceMap> {
        self.maps.get(key)
    }

    pub fn len(&self) -> usize {
        self.maps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.maps.is_empty()
    }

    /// Iterates over keys and sourcemaps in key order.
    pub fn iter(&self) -> btree_map::Iter<'_, String, SourceMap> {
        self.maps.iter()
    }

    /// Finds the sourcemap for a generated file.
    pub fn find_for_file(&self, file: &str) -> Option<(&str, &SourceMap)> {
        self.maps
            .iter()
            .find(|(key, _)| matches_generated_file(key, file))
            .map(|(key, sm)| (key.as_str(), sm))
    }

    /// Symbolicates a single frame.
    ///
    /// Frames no sourcemap matches are returned unchanged, as are frames
    /// that land on generated-only code.  A frame that matches a sourcemap
    /// but falls outside of its mappings fails with
    /// `Error::UnresolvableFrame`.
    pub fn resolve_frame(&self, frame: &StackFrame) -> Result<ResolvedFrame> {
        let (key, sm) = match self.find_for_file(&frame.generated_file) {
            Some(found) => found,
            None => return Ok(ResolvedFrame::unchanged(frame)),
        };

        let token = sm
            .lookup_token(frame.generated_line, frame.generated_column)
            .map_err(|err| Error::UnresolvableFrame {
                file: frame.generated_file.clone(),
                line: frame.generated_line,
                column: frame.generated_column,
                cause: Box::new(err),
            })?;
        debug!(
            file = %frame.generated_file,
            line = frame.generated_line,
            column = frame.generated_column,
            sourcemap = key,
            "found segment {:?}",
            token.get_segment()
        );

        let mut resolved = ResolvedFrame {
            frame: frame.clone(),
            sourcemap: Some(key.to_owned()),
        };
        let source = match token.get_source() {
            Some(source) => source,
            None => return Ok(resolved),
        };
        resolved.frame.generated_file = source.to_owned();
        resolved.frame.generated_line = token.get_src_line();
        resolved.frame.generated_column = token.get_src_col();
        if sm.has_names() {
            if let Some(name) = token.get_name() {
                resolved.frame.function_name = name.to_owned();
            }
        }
        Ok(resolved)
    }

    /// Symbolicates a stack trace, one output frame per input frame.
    ///
    /// The first unresolvable frame aborts the whole batch.
    pub fn resolve_all(&self, frames: &[StackFrame]) -> Result<Vec<ResolvedFrame>> {
        frames.iter().map(|frame| self.resolve_frame(frame)).collect()
    }
}

impl FromIterator<(String, SourceMap)> for MapSet {
    fn from_iter<I: IntoIterator<Item = (String, SourceMap)>>(iter: I) -> MapSet {
        MapSet {
            maps: iter.into_iter().collect(),
        }
    }
}

/// A reported exception with its stack trace.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Exception {
    pub name: String,
    pub message: String,
    pub trace: Vec<StackFrame>,
}

impl Exception {
    /// Parses an exception from JSON.
    pub fn from_json(json: &[u8]) -> Result<Exception> {
        Ok(serde_json::from_slice(json)?)
    }

    /// Symbolicates the trace of the exception.
    pub fn symbolicate(&self, maps: &MapSet) -> Result<SymbolicatedException> {
        Ok(SymbolicatedException {
            name: self.name.clone(),
            message: self.message.clone(),
            trace: maps.resolve_all(&self.trace)?,
        })
    }
}

/// An exception whose stack trace went through `MapSet::resolve_all`.
#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub struct SymbolicatedException {
    pub name: String,
    pub message: String,
    pub trace: Vec<ResolvedFrame>,
}

impl fmt::Display for SymbolicatedException {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.message)?;
        for frame in &self.trace {
            write!(f, "\n    {frame}")?;
        }
        Ok(())
    }
}
