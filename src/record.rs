use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};

/// A raw field mapping as returned by Graph for a single item.
pub type RawRecord = Map<String, Value>;

static TOKEN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[\w\-!]+$").expect("valid token regex"));
static DIGIT_ID_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d[\w\-]+").expect("valid digit id regex"));
static HEX_ID_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9A-Fa-f\-]{20,}$").expect("valid hex id regex"));

/// Segment prefixes that are navigation noise, never identifiers.
const NOISE_PREFIXES: &[&str] = &["users", "$metadata", "metadata"];

/// Prefixes marking a display string as leaked protocol metadata.
const METADATA_PREFIXES: &[&str] = &["metadata#", "http"];

pub const ID_KEYS: &[&str] = &["id"];
pub const DISPLAY_NAME_KEYS: &[&str] = &["display_name", "displayName"];
pub const TITLE_KEYS: &[&str] = &["title"];
pub const SELF_URL_KEYS: &[&str] = &["self_url", "self"];
pub const SECTIONS_URL_KEYS: &[&str] = &["sections_url", "sectionsUrl"];
pub const PAGES_URL_KEYS: &[&str] = &["pages_url", "pagesUrl"];
pub const CONTENT_URL_KEYS: &[&str] = &["content_url", "contentUrl"];
pub const CREATED_KEYS: &[&str] = &["created_date_time", "createdDateTime"];
pub const MODIFIED_KEYS: &[&str] = &["last_modified_date_time", "lastModifiedDateTime"];

/// Return the first present, non-null scalar under any of `keys`, in order.
///
/// Numbers and booleans are rendered as text; objects and arrays are never a
/// field value here and are passed over.
pub fn lookup(record: &RawRecord, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| match record.get(*key)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    })
}

/// Like [`lookup`], falling back to an empty string.
pub fn lookup_or_empty(record: &RawRecord, keys: &[&str]) -> String {
    lookup(record, keys).unwrap_or_default()
}

/// Restrict `record` to the keys listed in `tables`.
pub fn retain_fields(record: &RawRecord, tables: &[&[&str]]) -> RawRecord {
    record
        .iter()
        .filter(|(key, _)| tables.iter().any(|keys| keys.contains(&key.as_str())))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}

fn is_clean_token(value: &str) -> bool {
    TOKEN_RE.is_match(value)
        && !value.contains("metadata#")
        && !value.contains('(')
        && !value.contains('/')
}

fn has_id_shape(segment: &str) -> bool {
    DIGIT_ID_RE.is_match(segment) || HEX_ID_RE.is_match(segment)
}

/// Extract the opaque identifier from a raw id value.
///
/// Clean tokens pass through. Composite OData references and URLs are split
/// on `/`, `#` and `)` and scanned from the end: the first segment with an
/// id shape wins, else the last valid token the scan reaches (the leftmost
/// one), else the input unchanged.
pub fn normalize_id(raw: &str) -> String {
    let raw = raw.trim();
    if is_clean_token(raw) {
        return raw.to_string();
    }

    let mut fallback: Option<&str> = None;
    for segment in raw.split(&['/', '#', ')'][..]).rev() {
        if segment.is_empty()
            || segment.contains('(')
            || NOISE_PREFIXES.iter().any(|p| segment.starts_with(p))
            || !TOKEN_RE.is_match(segment)
        {
            continue;
        }
        if has_id_shape(segment) {
            return segment.to_string();
        }
        fallback = Some(segment);
    }

    fallback.unwrap_or(raw).to_string()
}

/// Trim a display string, blanking it if it is leaked protocol metadata.
pub fn sanitize_display(raw: &str) -> String {
    let trimmed = raw.trim();
    if METADATA_PREFIXES.iter().any(|p| trimmed.starts_with(p)) {
        log::debug!("Dropping metadata display value: {}", trimmed);
        return String::new();
    }
    trimmed.to_string()
}

/// Keep a timestamp only if it parses as RFC 3339.
pub fn valid_timestamp(raw: Option<String>) -> Option<String> {
    let raw = raw?;
    match chrono::DateTime::parse_from_rfc3339(raw.trim()) {
        Ok(_) => Some(raw.trim().to_string()),
        Err(e) => {
            log::debug!("Dropping malformed timestamp {:?}: {}", raw, e);
            None
        }
    }
}
