use crate::error::{GatewayError, GatewayResult};
use crate::record::{
    self, RawRecord, CONTENT_URL_KEYS, CREATED_KEYS, DISPLAY_NAME_KEYS, ID_KEYS, MODIFIED_KEYS,
    PAGES_URL_KEYS, SECTIONS_URL_KEYS, SELF_URL_KEYS, TITLE_KEYS,
};

const NOTEBOOK_FIELDS: &[&[&str]] = &[
    ID_KEYS,
    DISPLAY_NAME_KEYS,
    SELF_URL_KEYS,
    SECTIONS_URL_KEYS,
    CREATED_KEYS,
    MODIFIED_KEYS,
];

const SECTION_FIELDS: &[&[&str]] = &[
    ID_KEYS,
    DISPLAY_NAME_KEYS,
    SELF_URL_KEYS,
    PAGES_URL_KEYS,
    CREATED_KEYS,
    MODIFIED_KEYS,
];

const PAGE_FIELDS: &[&[&str]] = &[
    ID_KEYS,
    TITLE_KEYS,
    CONTENT_URL_KEYS,
    SELF_URL_KEYS,
    CREATED_KEYS,
    MODIFIED_KEYS,
];

/// A OneNote notebook.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notebook {
    pub id: String,
    pub display_name: String,
    pub self_url: String,
    pub sections_url: String,
    pub created_date_time: Option<String>,
    pub last_modified_date_time: Option<String>,
}

/// A section within a notebook.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub id: String,
    pub display_name: String,
    pub self_url: String,
    pub pages_url: String,
    pub created_date_time: Option<String>,
    pub last_modified_date_time: Option<String>,
    pub notebook_id: Option<String>,
}

/// A OneNote page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub id: String,
    pub title: String,
    pub content_url: String,
    pub self_url: String,
    pub created_date_time: Option<String>,
    pub last_modified_date_time: Option<String>,
    pub section_id: Option<String>,
    pub notebook_id: Option<String>,
}

/// Normalized id of `data`, failing when none survives normalization.
fn record_id(data: &RawRecord, kind: &str) -> GatewayResult<String> {
    let id = record::lookup(data, ID_KEYS)
        .map(|raw| record::normalize_id(&raw))
        .filter(|id| !id.is_empty());
    id.ok_or_else(|| GatewayError::MalformedRecord(format!("{} without an id", kind)))
}

impl Notebook {
    pub fn from_graph(raw: &RawRecord) -> GatewayResult<Self> {
        let data = record::retain_fields(raw, NOTEBOOK_FIELDS);
        Ok(Self {
            id: record_id(&data, "notebook")?,
            display_name: record::sanitize_display(&record::lookup_or_empty(&data, DISPLAY_NAME_KEYS)),
            self_url: record::lookup_or_empty(&data, SELF_URL_KEYS),
            sections_url: record::lookup_or_empty(&data, SECTIONS_URL_KEYS),
            created_date_time: record::valid_timestamp(record::lookup(&data, CREATED_KEYS)),
            last_modified_date_time: record::valid_timestamp(record::lookup(&data, MODIFIED_KEYS)),
        })
    }
}

impl Section {
    pub fn from_graph(raw: &RawRecord, notebook_id: Option<&str>) -> GatewayResult<Self> {
        let data = record::retain_fields(raw, SECTION_FIELDS);
        Ok(Self {
            id: record_id(&data, "section")?,
            display_name: record::sanitize_display(&record::lookup_or_empty(&data, DISPLAY_NAME_KEYS)),
            self_url: record::lookup_or_empty(&data, SELF_URL_KEYS),
            pages_url: record::lookup_or_empty(&data, PAGES_URL_KEYS),
            created_date_time: record::valid_timestamp(record::lookup(&data, CREATED_KEYS)),
            last_modified_date_time: record::valid_timestamp(record::lookup(&data, MODIFIED_KEYS)),
            notebook_id: notebook_id.map(str::to_string),
        })
    }
}

impl Page {
    pub fn from_graph(
        raw: &RawRecord,
        section_id: Option<&str>,
        notebook_id: Option<&str>,
    ) -> GatewayResult<Self> {
        let data = record::retain_fields(raw, PAGE_FIELDS);
        Ok(Self {
            id: record_id(&data, "page")?,
            title: record::sanitize_display(&record::lookup_or_empty(&data, TITLE_KEYS)),
            content_url: record::lookup_or_empty(&data, CONTENT_URL_KEYS),
            self_url: record::lookup_or_empty(&data, SELF_URL_KEYS),
            created_date_time: record::valid_timestamp(record::lookup(&data, CREATED_KEYS)),
            last_modified_date_time: record::valid_timestamp(record::lookup(&data, MODIFIED_KEYS)),
            section_id: section_id.map(str::to_string),
            notebook_id: notebook_id.map(str::to_string),
        })
    }
}
