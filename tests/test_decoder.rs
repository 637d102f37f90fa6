use std::io;

use stackmap::internals::skip_xssi_prefix;
use stackmap::{decode, decode_data_url, decode_slice, Error, SourceMap};

const PLAIN: &str = r#"{"version":3,"sources":["a.js"],"names":[],"mappings":"AAAA"}"#;

#[test]
fn test_xssi_prefix_with_crlf() {
    let input = format!(")]}}'\r\n{PLAIN}");
    let sm = decode_slice(input.as_bytes()).unwrap();
    assert_eq!(sm.get_source(0), Some("a.js"));

    let sm = decode(input.as_bytes()).unwrap();
    assert_eq!(sm.get_table().segment_count(), 1);
}

#[test]
fn test_xssi_prefix_is_optional() {
    assert_eq!(skip_xssi_prefix(PLAIN.as_bytes()).unwrap(), PLAIN.as_bytes());
    assert_eq!(skip_xssi_prefix(b"").unwrap(), b"");
    assert_eq!(skip_xssi_prefix(b")]}'\n{}").unwrap(), b"\n{}");
    assert_eq!(skip_xssi_prefix(b")]}'").unwrap(), b"");
}

#[test]
fn test_xssi_prefix_with_lone_carriage_return() {
    let input = format!(")]}}'\r{PLAIN}");
    let err = skip_xssi_prefix(input.as_bytes()).unwrap_err();
    assert_eq!(err.kind(), io::ErrorKind::InvalidData);

    match decode(input.as_bytes()) {
        Err(Error::Io(err)) => assert_eq!(err.kind(), io::ErrorKind::InvalidData),
        other => panic!("unexpected result: {:?}", other.map(|sm| sm.get_version())),
    }
}

#[test]
fn test_document_fields() {
    let input: &[_] = br#")]}'
    {
        "version": 3,
        "file": "min.js",
        "sources": ["coolstuff.js", null],
        "sourcesContent": ["var x;", null],
        "names": ["x", 42, null],
        "mappings": "AAAA"
    }"#;
    let sm = decode_slice(input).unwrap();
    assert_eq!(sm.get_version(), 3);
    assert_eq!(sm.get_file(), Some("min.js"));
    assert_eq!(sm.get_source_root(), None);
    assert_eq!(sm.get_source_count(), 2);
    assert_eq!(sm.get_source(1), Some(""));
    assert_eq!(sm.get_source_contents(0), Some("var x;"));
    assert_eq!(sm.get_source_contents(1), None);
    assert_eq!(sm.get_name(1), Some("42"));
    assert_eq!(sm.get_name(2), Some(""));
}

#[test]
fn test_invalid_file_field() {
    let input: &[_] = br#"{"version":3,"file":17,"sources":[],"mappings":""}"#;
    let sm = SourceMap::from_slice(input).unwrap();
    assert_eq!(sm.get_file(), Some("<invalid>"));
}

#[test]
fn test_basic_sourcemap_with_root() {
    let input: &[_] = b"{
        \"version\":3,
        \"sources\":[\"coolstuff.js\", \"/abs/other.js\"],
        \"sourceRoot\":\"x/\",
        \"names\":[\"x\",\"alert\"],
        \"mappings\":\"AAAA,GAAIA,GAAI,EACR,IAAIA,GAAK,EAAG,CACVC,MAAM\"
    }";
    let sm = SourceMap::from_reader(input).unwrap();
    assert_eq!(sm.get_source_root(), Some("x/"));
    assert_eq!(sm.get_source(1), Some("/abs/other.js"));
    let mut iter = sm.tokens().filter(|t| t.has_name());
    assert_eq!(iter.next().unwrap().to_tuple(), ("x/coolstuff.js", 1, 4, Some("x")));
    assert_eq!(iter.next().unwrap().to_tuple(), ("x/coolstuff.js", 2, 4, Some("x")));
    assert_eq!(iter.next().unwrap().to_tuple(), ("x/coolstuff.js", 3, 2, Some("alert")));
    assert!(iter.next().is_none());
}

#[test]
fn test_empty_source_root() {
    let input: &[_] = br#"{"version":3,"sourceRoot":"","sources":["a.js"],"mappings":"AAAA"}"#;
    let sm = SourceMap::from_slice(input).unwrap();
    assert_eq!(sm.get_source_root(), None);
    assert_eq!(sm.lookup_token(1, 0).unwrap().get_source(), Some("a.js"));
}

#[test]
fn test_sourcemap_data_url() {
    let url = "data:application/json;base64,eyJ2ZXJzaW9uIjozLCJzb3VyY2VzIjpbImNvb2xzdHVmZi5qcyJdLCJzb3VyY2VSb290IjoieCIsIm5hbWVzIjpbIngiLCJhbGVydCJdLCJtYXBwaW5ncyI6IkFBQUEsR0FBSUEsR0FBSSxFQUNSLElBQUlBLEdBQUssRUFBRyxDQUNWQyxNQUFNIn0=";
    let sm = decode_data_url(url).unwrap();
    let mut iter = sm.tokens().filter(|t| t.has_name());
    assert_eq!(sm.get_version(), 3);
    assert_eq!(iter.next().unwrap().to_tuple(), ("x/coolstuff.js", 1, 4, Some("x")));
    assert_eq!(iter.next().unwrap().to_tuple(), ("x/coolstuff.js", 2, 4, Some("x")));
    assert_eq!(iter.next().unwrap().to_tuple(), ("x/coolstuff.js", 3, 2, Some("alert")));
    assert!(iter.next().is_none());
}

#[test]
fn test_bad_data_url() {
    assert!(matches!(
        decode_data_url("data:text/plain;base64,AAAA"),
        Err(Error::InvalidDataUrl)
    ));
    assert!(matches!(
        decode_data_url("data:application/json;base64,!!!"),
        Err(Error::InvalidDataUrl)
    ));
}

#[test]
fn test_indexed_sourcemap_is_rejected() {
    let input: &[_] = br#"{
        "version": 3,
        "file": "min.js",
        "sections": [{"offset": {"line": 0, "column": 0}, "url": "a.js.map"}]
    }"#;
    assert!(matches!(
        SourceMap::from_reader(input),
        Err(Error::IndexedSourcemap)
    ));
}

#[test]
fn test_bad_source_reference() {
    let input: &[_] = br#"{"version":3,"sources":["a.js"],"mappings":"ACAA"}"#;
    assert!(matches!(
        SourceMap::from_slice(input),
        Err(Error::BadSourceReference(1))
    ));

    let input: &[_] = br#"{"version":3,"sources":["a.js"],"names":["x"],"mappings":"AAAAC"}"#;
    assert!(matches!(
        SourceMap::from_slice(input),
        Err(Error::BadNameReference(1))
    ));
}

#[test]
fn test_bad_json() {
    let err = SourceMap::from_slice(b"{\"version\": 3,").unwrap_err();
    assert!(matches!(err, Error::BadJson(..)));
    assert_eq!(err.source_location().map(|(line, _)| line), Some(1));
}

#[test]
fn test_malformed_mappings() {
    let input: &[_] = br#"{"version":3,"sources":["a.js"],"mappings":"AAAA;AA%A"}"#;
    let err = SourceMap::from_slice(input).unwrap_err();
    assert!(matches!(err, Error::MalformedMapping { line: 2, segment: 0, .. }));
    assert_eq!(
        err.to_string(),
        "malformed mapping in line 2, segment 0: invalid vlq character '%'"
    );
}
