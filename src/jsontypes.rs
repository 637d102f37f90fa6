use serde::de::IgnoredAny;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Serialize, Deserialize, PartialEq, Debug, Default)]
pub struct RawSourceMap {
    pub version: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<Value>,
    pub sources: Option<Vec<Option<String>>>,
    #[serde(rename = "sourceRoot", skip_serializing_if = "Option::is_none")]
    pub source_root: Option<String>,
    #[serde(rename = "sourcesContent", skip_serializing_if = "Option::is_none")]
    pub sources_content: Option<Vec<Option<String>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sections: Option<Vec<Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub names: Option<Vec<Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mappings: Option<String>,
}

#[derive(Deserialize)]
pub struct MinimalRawSourceMap {
    pub version: Option<u32>,
    pub file: Option<IgnoredAny>,
    pub sources: Option<IgnoredAny>,
    #[serde(rename = "sourceRoot")]
    pub source_root: Option<IgnoredAny>,
    #[serde(rename = "sourcesContent")]
    pub sources_content: Option<IgnoredAny>,
    pub sections: Option<IgnoredAny>,
    pub names: Option<IgnoredAny>,
    pub mappings: Option<IgnoredAny>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_sourcemap_reads_camel_case_fields() {
        let json = serde_json::json!({
            "version": 3,
            "sourceRoot": "src",
            "sources": ["a.js", null],
            "sourcesContent": [null, "x"],
            "mappings": "AAAA"
        });
        let raw: RawSourceMap = serde_json::from_value(json).expect("valid raw sourcemap");
        assert_eq!(raw.source_root.as_deref(), Some("src"));
        assert_eq!(raw.sources, Some(vec![Some("a.js".into()), None]));
        assert_eq!(raw.sources_content, Some(vec![None, Some("x".into())]));
        assert!(raw.names.is_none());
    }

    #[test]
    fn raw_sourcemap_skips_missing_fields_on_serialize() {
        let value = serde_json::to_value(RawSourceMap::default()).expect("serializable");
        let obj = value.as_object().expect("should be an object");
        assert!(obj.get("sourceRoot").is_none());
        assert!(obj.get("mappings").is_none());
        assert_eq!(obj.get("version"), Some(&Value::Null));
    }
}
