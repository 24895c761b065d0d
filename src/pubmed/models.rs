use std::collections::BTreeSet;

use serde::Serialize;

/// Placeholder written for absent title, date, or email
pub const NOT_AVAILABLE: &str = "N/A";

/// A PubMed article reduced to its company-affiliation facts
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaperRecord {
    /// PubMed ID
    pub pubmed_id: String,
    /// Article title, `"N/A"` when the record has none
    pub title: String,
    /// `YYYY[-MM[-DD]]`, `"N/A"` when no date element carries a component
    pub publication_date: String,
    /// Authors with at least one commercial affiliation, in document order
    pub non_academic_authors: Vec<String>,
    /// Distinct commercial affiliation strings as they appear in the record
    pub company_affiliations: BTreeSet<String>,
    /// First email found in any affiliation, `"N/A"` when none
    pub corresponding_author_email: String,
}

impl PaperRecord {
    /// Whether the paper has at least one company-affiliated author
    ///
    /// This is the predicate applied by the pipeline before export.
    pub fn has_company_authors(&self) -> bool {
        !self.non_academic_authors.is_empty() || !self.company_affiliations.is_empty()
    }
}

/// Keep only papers with at least one company-affiliated author
pub fn filter_company_papers(papers: Vec<PaperRecord>) -> Vec<PaperRecord> {
    papers
        .into_iter()
        .filter(PaperRecord::has_company_authors)
        .collect()
}
