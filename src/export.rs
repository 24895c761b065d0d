//! CSV export of filtered papers

use std::fs::File;
use std::io;
use std::path::Path;

use csv::WriterBuilder;
use tracing::{debug, instrument};

use crate::error::Result;
use crate::pubmed::models::PaperRecord;

/// Column names of the exported file
pub const CSV_HEADERS: [&str; 6] = [
    "PubmedID",
    "Title",
    "Publication Date",
    "Non-academic Author(s)",
    "Company Affiliation(s)",
    "Corresponding Author Email",
];

/// Separator for multi-valued columns
pub const LIST_SEPARATOR: &str = "; ";

/// Write papers as CSV to any writer, header first, one row per paper
pub fn write_csv<W: io::Write>(papers: &[PaperRecord], writer: W) -> Result<()> {
    let mut csv_writer = WriterBuilder::new().from_writer(writer);

    csv_writer.write_record(CSV_HEADERS)?;

    for paper in papers {
        let authors = paper.non_academic_authors.join(LIST_SEPARATOR);
        let affiliations = paper
            .company_affiliations
            .iter()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(LIST_SEPARATOR);

        csv_writer.write_record([
            paper.pubmed_id.as_str(),
            paper.title.as_str(),
            paper.publication_date.as_str(),
            authors.as_str(),
            affiliations.as_str(),
            paper.corresponding_author_email.as_str(),
        ])?;
    }

    csv_writer.flush()?;
    Ok(())
}

/// Write papers to `path`, replacing any existing file
///
/// An empty slice produces a header-only file.
///
/// # Errors
///
/// * `PubMedError::Io` - If the file cannot be created or written
/// * `PubMedError::Csv` - If a record cannot be serialized
#[instrument(skip(papers, path), fields(papers_count = papers.len(), output = %path.as_ref().display()))]
pub fn export_to_csv<P: AsRef<Path>>(papers: &[PaperRecord], path: P) -> Result<()> {
    let file = File::create(path.as_ref())?;
    write_csv(papers, file)?;
    debug!("CSV export written");
    Ok(())
}
