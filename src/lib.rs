//! This library decodes JavaScript sourcemaps and uses them to
//! symbolicate stack traces.
//!
//! ## Basic Operation
//!
//! A sourcemap is decoded from its JSON form into a `SourceMap` which owns
//! a `MappingTable`: one record per generated line, each holding the
//! segments of that line with all delta encoded values resolved.  Lookups
//! pick the last segment starting at or before the queried column.
//!
//! Generated and original lines are 1-based, columns are 0-based.
//!
//! ```rust
//! use stackmap::SourceMap;
//! let input: &[_] = b"{
//!     \"version\":3,
//!     \"sources\":[\"coolstuff.js\"],
//!     \"names\":[\"x\",\"alert\"],
//!     \"mappings\":\"AAAA,GAAIA,GAAI,EACR,IAAIA,GAAK,EAAG,CACVC,MAAM\"
//! }";
//! let sm = SourceMap::from_reader(input).unwrap();
//! let token = sm.lookup_token(1, 5).unwrap();
//! println!("token: {}", token);
//! ```
//!
//! ## Stack Traces
//!
//! Sourcemaps are collected into a `MapSet` keyed by the generated file
//! they belong to, either by hand or with `find_sourcemaps`.  The set then
//! resolves whole stack traces:
//!
//! ```rust
//! use stackmap::{MapSet, SourceMap, StackFrame};
//! let input: &[_] = br#"{
//!     "version": 3,
//!     "sources": ["app.ts"],
//!     "names": ["render"],
//!     "mappings": "AAAAA"
//! }"#;
//! let mut maps = MapSet::new();
//! maps.insert_map_file("dist/app.js.map", SourceMap::from_reader(input).unwrap());
//!
//! let trace = StackFrame::parse_trace(
//!     r#"[{"file": "dist/app.js", "methodName": "r", "arguments": [],
//!          "lineNumber": 1, "column": 4}]"#,
//! ).unwrap();
//! let frames = maps.resolve_all(&trace).unwrap();
//! assert_eq!(frames[0].to_string(), "at render (app.ts:1:0)");
//! ```

pub use builder::{build_table, decode_line, DeltaState};
pub use decoder::{decode, decode_data_url, decode_slice};
pub use detector::{is_sourcemap, is_sourcemap_slice};
pub use discovery::{find_sourcemaps, load_sourcemap};
pub use errors::{Error, Result};
pub use stacktrace::{
    matches_generated_file, Exception, MapSet, ResolvedFrame, StackFrame, SymbolicatedException,
};
pub use types::{Line, MappingTable, OriginalPosition, Segment, SourceMap, Token};

mod builder;
mod decoder;
mod detector;
mod discovery;
mod errors;
mod jsontypes;
mod stacktrace;
mod types;
mod utils;
mod vlq;

#[doc(hidden)]
pub mod internals {
    pub use super::decoder::skip_xssi_prefix;
    pub use super::vlq::parse_vlq_segment;
}
