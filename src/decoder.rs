use std::io;
use std::io::Read;

use base64::Engine;
use serde_json::Value;

use crate::builder::build_table;
use crate::errors::{Error, Result};
use crate::jsontypes::RawSourceMap;
use crate::types::SourceMap;

const DATA_PREAMBLE: &str = "data:application/json;base64,";

fn is_xssi_byte(byte: u8) -> bool {
    matches!(byte, b')' | b']' | b'}' | b'\'')
}

/// Skips a leading XSSI protection line such as `)]}'`.
///
/// The protection line ends at the first newline, which may be written as
/// `\r\n`.  A lone `\r` is rejected.  Input that does not start with one of
/// the protection characters is returned as is.
pub fn skip_xssi_prefix(slice: &[u8]) -> io::Result<&[u8]> {
    if !slice.first().copied().is_some_and(is_xssi_byte) {
        return Ok(slice);
    }
    match slice.iter().position(|&b| b == b'\r' || b == b'\n') {
        None => Ok(&slice[slice.len()..]),
        Some(eol) if slice[eol] == b'\n' => Ok(&slice[eol..]),
        Some(eol) if slice.get(eol + 1) == Some(&b'\n') => Ok(&slice[eol + 1..]),
        Some(_) => Err(io::Error::new(
            io::ErrorKind::InvalidData,
            "xssi prefix not terminated by a newline",
        )),
    }
}

/// Reads a whole document and drops its XSSI prefix.
pub(crate) fn read_document<R: Read>(mut rdr: R) -> io::Result<Vec<u8>> {
    let mut buf = vec![];
    rdr.read_to_end(&mut buf)?;
    let start = buf.len() - skip_xssi_prefix(&buf)?.len();
    buf.drain(..start);
    Ok(buf)
}

pub(crate) fn decode_regular(rsm: RawSourceMap) -> Result<SourceMap> {
    if rsm.sections.is_some() {
        return Err(Error::IndexedSourcemap);
    }

    let mappings = rsm.mappings.unwrap_or_default();
    let table = build_table(&mappings)?;

    let sources = rsm
        .sources
        .unwrap_or_default()
        .into_iter()
        .map(Option::unwrap_or_default)
        .collect();

    // apparently we can encounter some non string types in real world
    // sourcemaps :(
    let names = rsm
        .names
        .unwrap_or_default()
        .into_iter()
        .map(|val| match val {
            Value::String(s) => s,
            Value::Number(num) => num.to_string(),
            _ => "".into(),
        })
        .collect();

    // file sometimes is not a string for unexplicable reasons
    let file = rsm.file.map(|val| match val {
        Value::String(s) => s,
        _ => "<invalid>".into(),
    });

    SourceMap::new(
        rsm.version.unwrap_or(0),
        file,
        rsm.source_root.filter(|root| !root.is_empty()),
        sources,
        rsm.sources_content.unwrap_or_default(),
        names,
        table,
    )
}

/// Decodes a sourcemap from a reader
///
/// Indexed sourcemaps are not supported and fail with
/// `Error::IndexedSourcemap`.
pub fn decode<R: Read>(rdr: R) -> Result<SourceMap> {
    let content = read_document(rdr)?;
    let rsm: RawSourceMap = serde_json::from_slice(&content)?;
    decode_regular(rsm)
}

/// Decodes a sourcemap from a byte slice
pub fn decode_slice(slice: &[u8]) -> Result<SourceMap> {
    let content = skip_xssi_prefix(slice)?;
    let rsm: RawSourceMap = serde_json::from_slice(content)?;
    decode_regular(rsm)
}

/// Loads a sourcemap from a data URL.
pub fn decode_data_url(url: &str) -> Result<SourceMap> {
    let data_b64 = url
        .strip_prefix(DATA_PREAMBLE)
        .ok_or(Error::InvalidDataUrl)?;
    let data = base64::engine::general_purpose::STANDARD
        .decode(data_b64)
        .map_err(|_| Error::InvalidDataUrl)?;
    decode_slice(&data[..])
}
