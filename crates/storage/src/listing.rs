//! `ListBucketResult` parsing.
//!
//! S3 answers `ListObjects` with a flat, well-known XML document. The fields
//! we need are pulled out with regular expressions rather than a full XML
//! parser.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::{Result, StorageError};

static CONTENTS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<Contents>(.*?)</Contents>").unwrap());
static COMMON_PREFIXES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<CommonPrefixes>(.*?)</CommonPrefixes>").unwrap());
static ERROR_CODE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<Code>(.*?)</Code>").unwrap());
static ERROR_MESSAGE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<Message>(.*?)</Message>").unwrap());

/// One object in a listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectSummary {
    pub key: String,
    pub last_modified: String,
    pub size: u64,
    pub etag: String,
}

/// A page of `ListObjects` results.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListResult {
    pub name: String,
    pub prefix: String,
    pub delimiter: String,
    pub marker: String,
    /// Only returned when a delimiter was given.
    pub next_marker: Option<String>,
    pub max_keys: u32,
    pub is_truncated: bool,
    pub contents: Vec<ObjectSummary>,
    pub common_prefixes: Vec<String>,
}

impl ListResult {
    /// Marker to request the page after this one, if there is one.
    ///
    /// Without a `NextMarker` this is the later of the page's last key and
    /// last common prefix.
    #[must_use]
    pub fn continuation_marker(&self) -> Option<&str> {
        if !self.is_truncated {
            return None;
        }
        self.next_marker.as_deref().or_else(|| {
            let last_key = self.contents.last().map(|o| o.key.as_str());
            let last_prefix = self.common_prefixes.last().map(String::as_str);
            last_key.max(last_prefix)
        })
    }

    /// Keys of all listed objects.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.contents.iter().map(|o| o.key.as_str())
    }
}

/// Parse a `ListBucketResult` document.
///
/// # Errors
///
/// Returns [`StorageError::Malformed`] if the document is not a listing or a
/// numeric field does not parse.
pub fn parse_list_result(xml: &str) -> Result<ListResult> {
    if !xml.contains("<ListBucketResult") {
        return Err(StorageError::Malformed(
            "missing ListBucketResult element".to_string(),
        ));
    }

    // Top-level fields come before the first entry; entries repeat `Prefix`.
    let header_end = xml
        .find("<Contents>")
        .into_iter()
        .chain(xml.find("<CommonPrefixes>"))
        .min()
        .unwrap_or(xml.len());
    let header = &xml[..header_end];

    let contents = CONTENTS
        .captures_iter(xml)
        .map(|caps| parse_object(&caps[1]))
        .collect::<Result<Vec<_>>>()?;

    let common_prefixes = COMMON_PREFIXES
        .captures_iter(xml)
        .filter_map(|caps| element(&caps[1], "Prefix"))
        .collect();

    let max_keys = match element(header, "MaxKeys") {
        Some(value) => value
            .parse()
            .map_err(|_| StorageError::Malformed(format!("invalid MaxKeys: {value}")))?,
        None => 0,
    };

    Ok(ListResult {
        name: element(header, "Name").unwrap_or_default(),
        prefix: element(header, "Prefix").unwrap_or_default(),
        delimiter: element(header, "Delimiter").unwrap_or_default(),
        marker: element(header, "Marker").unwrap_or_default(),
        next_marker: element(header, "NextMarker").filter(|m| !m.is_empty()),
        max_keys,
        is_truncated: element(header, "IsTruncated").is_some_and(|v| v == "true"),
        contents,
        common_prefixes,
    })
}

/// Pull `(code, message)` out of an S3 `<Error>` document.
#[must_use]
pub fn parse_error(xml: &str) -> Option<(String, String)> {
    let code = ERROR_CODE.captures(xml).map(|caps| decode_entities(&caps[1]))?;
    let message = ERROR_MESSAGE
        .captures(xml)
        .map(|caps| decode_entities(&caps[1]))
        .unwrap_or_default();
    Some((code, message))
}

fn parse_object(block: &str) -> Result<ObjectSummary> {
    let key = element(block, "Key")
        .ok_or_else(|| StorageError::Malformed("Contents entry without Key".to_string()))?;
    let size = match element(block, "Size") {
        Some(value) => value
            .parse()
            .map_err(|_| StorageError::Malformed(format!("invalid Size for {key}: {value}")))?,
        None => 0,
    };

    Ok(ObjectSummary {
        last_modified: element(block, "LastModified").unwrap_or_default(),
        etag: element(block, "ETag")
            .map(|e| e.trim_matches('"').to_string())
            .unwrap_or_default(),
        size,
        key,
    })
}

/// Text of the first `<tag>` element in `xml`, entity-decoded.
fn element(xml: &str, tag: &str) -> Option<String> {
    let open = format!("<{tag}>");
    let close = format!("</{tag}>");
    let start = xml.find(&open)? + open.len();
    let end = xml[start..].find(&close)? + start;
    Some(decode_entities(&xml[start..end]))
}

fn decode_entities(text: &str) -> String {
    text.replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}
