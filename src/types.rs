use std::fmt;
use std::io::Read;

use crate::builder::build_table;
use crate::decoder::{decode, decode_slice};
use crate::errors::{Error, Result};
use crate::utils::{greatest_lower_bound, join_source_root};

/// The original position a segment points into.
#[derive(PartialEq, Eq, Copy, Clone, Debug)]
pub struct OriginalPosition {
    /// index into the `sources` of the owning sourcemap
    pub source_index: u32,
    /// the 1-based line in the original source
    pub line: u32,
    /// the 0-based column in the original source
    pub column: u32,
    /// index into the `names` of the owning sourcemap, if the segment had one
    pub name_index: Option<u32>,
}

/// A single decoded mapping entry.
///
/// Segments without an original position mark generated-only code.  They
/// still take part in column lookups.
#[derive(PartialEq, Eq, Copy, Clone, Debug)]
pub struct Segment {
    /// the 0-based column in the generated file
    pub generated_column: u32,
    /// where the segment maps to, `None` for generated-only code
    pub original: Option<OriginalPosition>,
}

impl Segment {
    /// Creates a segment that carries no source mapping.
    pub fn generated_only(generated_column: u32) -> Segment {
        Segment {
            generated_column,
            original: None,
        }
    }

    /// Returns `true` if the segment has no source mapping.
    pub fn is_generated_only(&self) -> bool {
        self.original.is_none()
    }
}

/// All segments of one generated line in encounter order.
#[derive(PartialEq, Eq, Clone, Debug)]
pub struct Line {
    line_number: u32,
    segments: Vec<Segment>,
}

impl Line {
    /// Creates a line record.  `segments` must be ordered by column.
    pub fn new(line_number: u32, segments: Vec<Segment>) -> Line {
        Line {
            line_number,
            segments,
        }
    }

    /// The 1-based generated line number.
    pub fn line_number(&self) -> u32 {
        self.line_number
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Finds the last segment starting at or before `column`.
    pub fn lookup_segment(&self, column: u32) -> Option<&Segment> {
        greatest_lower_bound(&self.segments, &column, |seg| seg.generated_column)
    }
}

impl fmt::Display for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Line #{}: ", self.line_number)?;
        for seg in &self.segments {
            match seg.original {
                Some(ref orig) => write!(
                    f,
                    " | {} => (#{})[{}, {}]",
                    seg.generated_column, orig.source_index, orig.line, orig.column
                )?,
                None => write!(f, " | {} => -", seg.generated_column)?,
            }
        }
        Ok(())
    }
}

/// The decoded `mappings` of a sourcemap.
///
/// There is one line record per `;` separated group, including empty
/// groups, so line numbers are contiguous starting at 1.
#[derive(PartialEq, Eq, Clone, Debug, Default)]
pub struct MappingTable {
    lines: Vec<Line>,
}

impl MappingTable {
    /// Builds a table from a raw `mappings` string.
    pub fn from_mappings(mappings: &str) -> Result<MappingTable> {
        build_table(mappings)
    }

    /// Creates a table from line records numbered `1..=lines.len()`.
    pub(crate) fn from_lines(lines: Vec<Line>) -> MappingTable {
        MappingTable { lines }
    }

    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    /// Returns the number of line records.
    pub fn line_count(&self) -> u32 {
        self.lines.len() as u32
    }

    /// Returns the total number of segments over all lines.
    pub fn segment_count(&self) -> usize {
        self.lines.iter().map(|line| line.segments.len()).sum()
    }

    /// Looks up the record of a 1-based generated line.
    pub fn get_line(&self, line: u32) -> Option<&Line> {
        let idx = line.checked_sub(1)?;
        self.lines.get(idx as usize)
    }

    /// Resolves a generated position to the segment that owns it.
    ///
    /// The result is the last segment on `line` whose column is not
    /// greater than `column`.
    pub fn lookup_segment(&self, line: u32, column: u32) -> Result<&Segment> {
        let record = self.get_line(line).ok_or(Error::NoMappingForLine(line))?;
        record
            .lookup_segment(column)
            .ok_or(Error::NoMappingForColumn { line, column })
    }
}

/// Represents a segment of a sourcemap together with the data it refers to.
#[derive(Copy, Clone)]
pub struct Token<'a> {
    line: u32,
    segment: &'a Segment,
    sm: &'a SourceMap,
}

impl<'a> Token<'a> {
    /// get the destination (generated) line number
    pub fn get_dst_line(&self) -> u32 {
        self.line
    }

    /// get the destination (generated) column number
    pub fn get_dst_col(&self) -> u32 {
        self.segment.generated_column
    }

    /// get the destination line and column
    pub fn get_dst(&self) -> (u32, u32) {
        (self.get_dst_line(), self.get_dst_col())
    }

    /// returns `true` if the token maps to an original source
    pub fn has_source(&self) -> bool {
        self.segment.original.is_some()
    }

    /// get the source path joined onto the source root, if any
    pub fn get_source(&self) -> Option<&'a str> {
        let orig = self.segment.original?;
        self.sm.get_source(orig.source_index)
    }

    /// get the source line number (1-based, `0` for generated-only code)
    pub fn get_src_line(&self) -> u32 {
        self.segment.original.map_or(0, |orig| orig.line)
    }

    /// get the source column number
    pub fn get_src_col(&self) -> u32 {
        self.segment.original.map_or(0, |orig| orig.column)
    }

    /// get the source line and column
    pub fn get_src(&self) -> (u32, u32) {
        (self.get_src_line(), self.get_src_col())
    }

    /// get the name if it exists as string
    pub fn get_name(&self) -> Option<&'a str> {
        let idx = self.segment.original?.name_index?;
        self.sm.get_name(idx)
    }

    /// returns `true` if a name exists, `false` otherwise
    pub fn has_name(&self) -> bool {
        self.get_name().is_some()
    }

    /// Converts the token into a debug tuple in the form
    /// `(source, src_line, src_col, name)`
    pub fn to_tuple(&self) -> (&'a str, u32, u32, Option<&'a str>) {
        (
            self.get_source().unwrap_or(""),
            self.get_src_line(),
            self.get_src_col(),
            self.get_name(),
        )
    }

    /// Get the underlying segment
    pub fn get_segment(&self) -> &'a Segment {
        self.segment
    }
}

impl<'a> fmt::Debug for Token<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<Token {self}>")
    }
}

impl<'a> fmt::Display for Token<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}",
            self.get_source().unwrap_or("<unknown>"),
            self.get_src_line(),
            self.get_src_col()
        )?;
        if let Some(name) = self.get_name() {
            write!(f, " name={name}")?;
        }
        Ok(())
    }
}

/// Represents a sourcemap in memory
///
/// The document is immutable once decoded.  Sources are stored joined onto
/// the `sourceRoot`, the root itself stays available through
/// `get_source_root`.
#[derive(Clone, Debug)]
pub struct SourceMap {
    version: u32,
    file: Option<String>,
    source_root: Option<String>,
    sources: Vec<String>,
    sources_content: Vec<Option<String>>,
    names: Vec<String>,
    table: MappingTable,
}

impl SourceMap {
    /// Creates a sourcemap from a reader over a JSON stream in UTF-8
    /// format.  Optionally a "garbage header" as defined by the
    /// sourcemap draft specification is supported.  Indexed sourcemaps
    /// are rejected.
    ///
    /// ```rust
    /// use stackmap::SourceMap;
    /// let input: &[_] = b"{
    ///     \"version\":3,
    ///     \"sources\":[\"coolstuff.js\"],
    ///     \"names\":[\"x\",\"alert\"],
    ///     \"mappings\":\"AAAA,GAAIA,GAAI,EACR,IAAIA,GAAK,EAAG,CACVC,MAAM\"
    /// }";
    /// let sm = SourceMap::from_reader(input).unwrap();
    /// assert_eq!(sm.lookup_token(1, 3).unwrap().get_name(), Some("x"));
    /// ```
    pub fn from_reader<R: Read>(rdr: R) -> Result<SourceMap> {
        decode(rdr)
    }

    /// Creates a sourcemap from a byte slice.
    pub fn from_slice(slice: &[u8]) -> Result<SourceMap> {
        decode_slice(slice)
    }

    /// Constructs a new sourcemap from its components.
    ///
    /// Every source and name index referenced by `table` is checked
    /// against `sources` and `names`.
    pub fn new(
        version: u32,
        file: Option<String>,
        source_root: Option<String>,
        sources: Vec<String>,
        sources_content: Vec<Option<String>>,
        names: Vec<String>,
        table: MappingTable,
    ) -> Result<SourceMap> {
        for orig in table
            .lines()
            .iter()
            .flat_map(|line| line.segments())
            .filter_map(|seg| seg.original.as_ref())
        {
            if orig.source_index as usize >= sources.len() {
                return Err(Error::BadSourceReference(orig.source_index));
            }
            if let Some(name_index) = orig.name_index {
                if !names.is_empty() && name_index as usize >= names.len() {
                    return Err(Error::BadNameReference(name_index));
                }
            }
        }

        let sources = match source_root {
            Some(ref root) => sources
                .iter()
                .map(|src| join_source_root(root, src).into_owned())
                .collect(),
            None => sources,
        };

        Ok(SourceMap {
            version,
            file,
            source_root,
            sources,
            sources_content,
            names,
            table,
        })
    }

    /// Returns the version of the sourcemap.
    pub fn get_version(&self) -> u32 {
        self.version
    }

    /// Returns the embedded filename in case there is one.
    pub fn get_file(&self) -> Option<&str> {
        self.file.as_deref()
    }

    /// Returns the source root in case there is one.
    pub fn get_source_root(&self) -> Option<&str> {
        self.source_root.as_deref()
    }

    /// Returns the number of sources in the sourcemap.
    pub fn get_source_count(&self) -> u32 {
        self.sources.len() as u32
    }

    /// Looks up a source for a specific index.
    pub fn get_source(&self, idx: u32) -> Option<&str> {
        self.sources.get(idx as usize).map(|x| &x[..])
    }

    /// Looks up the embedded contents of a source.
    pub fn get_source_contents(&self, idx: u32) -> Option<&str> {
        self.sources_content
            .get(idx as usize)
            .and_then(|x| x.as_deref())
    }

    /// Returns the number of names in the sourcemap.
    pub fn get_name_count(&self) -> u32 {
        self.names.len() as u32
    }

    /// Looks up a name for a specific index.
    pub fn get_name(&self, idx: u32) -> Option<&str> {
        self.names.get(idx as usize).map(|x| &x[..])
    }

    /// Returns `true` if the sourcemap carries a `names` table.
    pub fn has_names(&self) -> bool {
        !self.names.is_empty()
    }

    /// Returns the decoded mapping table.
    pub fn get_table(&self) -> &MappingTable {
        &self.table
    }

    /// Looks up the token owning a generated position.
    ///
    /// `line` is 1-based, `col` is 0-based.
    pub fn lookup_token(&self, line: u32, col: u32) -> Result<Token<'_>> {
        let segment = self.table.lookup_segment(line, col)?;
        Ok(Token {
            line,
            segment,
            sm: self,
        })
    }

    /// Returns an iterator over all tokens in table order.
    pub fn tokens(&self) -> impl Iterator<Item = Token<'_>> {
        self.table.lines().iter().flat_map(move |line| {
            line.segments().iter().map(move |segment| Token {
                line: line.line_number(),
                segment,
                sm: self,
            })
        })
    }
}
