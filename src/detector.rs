use std::io::Read;

use crate::decoder::{read_document, skip_xssi_prefix};
use crate::errors::Result;
use crate::jsontypes::MinimalRawSourceMap;

fn is_sourcemap_common(rsm: MinimalRawSourceMap) -> bool {
    (rsm.version.is_some() || rsm.file.is_some())
        && ((rsm.sources.is_some()
            || rsm.source_root.is_some()
            || rsm.sources_content.is_some()
            || rsm.names.is_some())
            && rsm.mappings.is_some())
        || rsm.sections.is_some()
}

fn is_sourcemap_impl<R: Read>(rdr: R) -> Result<bool> {
    let content = read_document(rdr)?;
    let rsm: MinimalRawSourceMap = serde_json::from_slice(&content)?;
    Ok(is_sourcemap_common(rsm))
}

fn is_sourcemap_slice_impl(slice: &[u8]) -> Result<bool> {
    let content = skip_xssi_prefix(slice)?;
    let rsm: MinimalRawSourceMap = serde_json::from_slice(content)?;
    Ok(is_sourcemap_common(rsm))
}

/// Checks if a valid sourcemap can be read from the given reader
pub fn is_sourcemap<R: Read>(rdr: R) -> bool {
    is_sourcemap_impl(rdr).unwrap_or(false)
}

/// Checks if the given byte slice contains a sourcemap
///
/// Indexed sourcemaps count as sourcemaps here even though they cannot
/// be decoded.
pub fn is_sourcemap_slice(slice: &[u8]) -> bool {
    is_sourcemap_slice_impl(slice).unwrap_or(false)
}
