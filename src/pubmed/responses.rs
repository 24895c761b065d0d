use quick_xml::de::from_str;
use serde::Deserialize;

use crate::error::Result;

/// `<eSearchResult>` document returned by ESearch with `retmode=xml`
#[derive(Debug, Deserialize)]
pub(crate) struct ESearchResult {
    #[serde(rename = "Count")]
    pub count: Option<String>,
    #[serde(rename = "IdList")]
    pub id_list: Option<IdList>,
    #[serde(rename = "ERROR")]
    pub error: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct IdList {
    #[serde(rename = "Id", default)]
    pub ids: Vec<String>,
}

impl ESearchResult {
    pub fn from_xml(xml: &str) -> Result<Self> {
        Ok(from_str(xml)?)
    }

    /// PMIDs in response order; empty when the document has no `IdList`
    pub fn into_ids(self) -> Vec<String> {
        self.id_list.map(|list| list.ids).unwrap_or_default()
    }
}
