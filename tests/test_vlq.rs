use stackmap::internals::parse_vlq_segment;
use stackmap::Error;

#[test]
fn test_vlq_decode() {
    let rv = parse_vlq_segment("AAAA").unwrap();
    assert_eq!(rv, vec![0, 0, 0, 0]);
    let rv = parse_vlq_segment("GAAIA").unwrap();
    assert_eq!(rv, vec![3, 0, 0, 4, 0]);
}

#[test]
fn test_vlq_fixtures() {
    assert_eq!(parse_vlq_segment("EAAgB").unwrap(), vec![2, 0, 0, 16]);
    assert_eq!(parse_vlq_segment("mBAAD").unwrap(), vec![19, 0, 0, -1]);
    assert_eq!(parse_vlq_segment("SAAa").unwrap(), vec![9, 0, 0, 13]);
}

#[test]
fn test_vlq_long_continuation() {
    // three digit values use the full five bit stride per continuation
    assert_eq!(parse_vlq_segment("ggggB").unwrap(), vec![1 << 19]);
    assert_eq!(parse_vlq_segment("2Hw+B").unwrap(), vec![123, 1000]);
}

#[test]
fn test_empty_segment() {
    assert_eq!(parse_vlq_segment("").unwrap(), Vec::<i64>::new());
}

#[test]
fn test_invalid_character() {
    match parse_vlq_segment("AA*A") {
        Err(Error::VlqInvalidBase64(b'*')) => {}
        e => {
            panic!("Unexpected result: {:?}", e);
        }
    }
    assert!(parse_vlq_segment("AAÄA").is_err());
}

#[test]
fn test_truncated() {
    match parse_vlq_segment("AAg") {
        Err(Error::VlqLeftover) => {}
        e => {
            panic!("Unexpected result: {:?}", e);
        }
    }
}

#[test]
fn test_overflow() {
    match parse_vlq_segment("00000000000000") {
        Err(Error::VlqOverflow) => {}
        e => {
            panic!("Unexpected result: {:?}", e);
        }
    }
}
