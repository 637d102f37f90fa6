use std::borrow::Cow;

fn is_abs_path(s: &str) -> bool {
    if s.starts_with('/') {
        return true;
    } else if s.len() > 3 {
        let b = s.as_bytes();
        if b[1] == b':'
            && (b[2] == b'/' || b[2] == b'\\')
            && ((b[0] >= b'a' && b[0] <= b'z') || (b[0] >= b'A' && b[0] <= b'Z'))
        {
            return true;
        }
    }
    false
}

fn is_url(s: &str) -> bool {
    s.starts_with("http:") || s.starts_with("https:")
}

/// Joins a source path onto the `sourceRoot` of a sourcemap.
///
/// An empty root leaves the path alone, as do absolute paths and URLs.
pub fn join_source_root<'a>(source_root: &str, source: &'a str) -> Cow<'a, str> {
    if source_root.is_empty() || (!source.is_empty() && (is_abs_path(source) || is_url(source))) {
        return Cow::Borrowed(source);
    }
    let source_root = source_root.trim_end_matches('/');
    Cow::Owned(format!("{source_root}/{source}"))
}

/// Returns the last item whose key is not greater than `key`.
///
/// The slice must be sorted by `map`.  Among items with equal keys the
/// last one wins.
pub fn greatest_lower_bound<'a, T, K: Ord, F: Fn(&T) -> K>(
    slice: &'a [T],
    key: &K,
    map: F,
) -> Option<&'a T> {
    let idx = slice.partition_point(|item| map(item) <= *key);
    idx.checked_sub(1).map(|idx| &slice[idx])
}

/// Returns `true` if `path` ends with `suffix` on a path component boundary.
pub fn ends_with_path(path: &str, suffix: &str) -> bool {
    if suffix.is_empty() || !path.ends_with(suffix) {
        return false;
    }
    let head = &path[..path.len() - suffix.len()];
    head.is_empty()
        || head.ends_with('/')
        || head.ends_with('\\')
        || suffix.starts_with('/')
        || suffix.starts_with('\\')
}

#[test]
fn test_is_abs_path() {
    assert!(is_abs_path("C:\\foo.txt"));
    assert!(is_abs_path("d:/foo.txt"));
    assert!(!is_abs_path("foo.txt"));
    assert!(is_abs_path("/foo.txt"));
    assert!(is_abs_path("/"));
}

#[test]
fn test_join_source_root() {
    assert_eq!(join_source_root("", "foo.js"), "foo.js");
    assert_eq!(join_source_root("src", "foo.js"), "src/foo.js");
    assert_eq!(join_source_root("src/", "foo.js"), "src/foo.js");
    assert_eq!(join_source_root("src", "/abs/foo.js"), "/abs/foo.js");
    assert_eq!(
        join_source_root("src", "https://example.com/foo.js"),
        "https://example.com/foo.js"
    );
}

#[test]
fn test_greatest_lower_bound() {
    let items = [1, 3, 3, 7];
    assert_eq!(greatest_lower_bound(&items, &0, |x| *x), None);
    assert_eq!(greatest_lower_bound(&items, &1, |x| *x), Some(&1));
    assert_eq!(greatest_lower_bound(&items, &5, |x| *x), Some(&3));
    assert_eq!(greatest_lower_bound(&items, &100, |x| *x), Some(&7));

    let pairs = [(1, 'a'), (1, 'b'), (4, 'c')];
    assert_eq!(greatest_lower_bound(&pairs, &2, |x| x.0), Some(&(1, 'b')));
}

#[test]
fn test_ends_with_path() {
    assert!(ends_with_path("dist/main.js", "main.js"));
    assert!(ends_with_path("dist/main.js", "dist/main.js"));
    assert!(ends_with_path("/srv/dist/main.js", "/dist/main.js"));
    assert!(!ends_with_path("dist/xmain.js", "main.js"));
    assert!(!ends_with_path("dist/main.js", ""));
}
