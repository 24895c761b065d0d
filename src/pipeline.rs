//! Search → batched fetch → filter → export
//!
//! [`Pipeline`] drives one run: a single ESearch call, EFetch calls in
//! batches of at most [`BATCH_SIZE`] PMIDs with a pause between batches,
//! the company-author filter, and a CSV export when anything survives.
//! Requests are issued strictly one after another.

use std::future::Future;
use std::path::Path;
use std::time::Duration;

use tracing::{info, instrument};

use crate::error::{PubMedError, Result};
use crate::export::export_to_csv;
use crate::pubmed::models::{PaperRecord, filter_company_papers};
use crate::rate_limit::{DEFAULT_BATCH_DELAY, Pause, TokioPause};

/// Maximum PMIDs per EFetch request
pub const BATCH_SIZE: usize = 200;

/// Where the pipeline gets PMIDs and article records from
///
/// Both operations are degraded: failures are reported as empty results.
pub trait PaperSource {
    fn search_ids(
        &self,
        query: &str,
        max_results: usize,
    ) -> impl Future<Output = Vec<String>> + Send;

    fn fetch_batch(&self, pmids: &[String]) -> impl Future<Output = Vec<PaperRecord>> + Send;
}

/// One configured fetch-and-filter run
pub struct Pipeline<S, P = TokioPause> {
    source: S,
    pause: P,
    batch_size: usize,
    batch_delay: Duration,
}

impl<S: PaperSource> Pipeline<S, TokioPause> {
    /// Create a pipeline that sleeps [`DEFAULT_BATCH_DELAY`] between batches
    ///
    /// # Example
    ///
    /// ```no_run
    /// use pubmed_paper_fetcher::{ClientConfig, Pipeline, PubMedClient};
    ///
    /// #[tokio::main]
    /// async fn main() -> Result<(), Box<dyn std::error::Error>> {
    ///     let client = PubMedClient::with_config(ClientConfig::new().with_email("me@lab.org"));
    ///     let papers = Pipeline::new(client)
    ///         .run("cancer immunotherapy", 100, "research_papers.csv")
    ///         .await?;
    ///     println!("{} papers with company authors", papers.len());
    ///     Ok(())
    /// }
    /// ```
    pub fn new(source: S) -> Self {
        Self {
            source,
            pause: TokioPause,
            batch_size: BATCH_SIZE,
            batch_delay: DEFAULT_BATCH_DELAY,
        }
    }
}

impl<S: PaperSource, P: Pause> Pipeline<S, P> {
    /// Replace the wait used between batches
    pub fn with_pause<Q: Pause>(self, pause: Q) -> Pipeline<S, Q> {
        Pipeline {
            source: self.source,
            pause,
            batch_size: self.batch_size,
            batch_delay: self.batch_delay,
        }
    }

    /// Set the number of PMIDs per EFetch request (clamped to at least 1)
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    pub fn with_batch_delay(mut self, batch_delay: Duration) -> Self {
        self.batch_delay = batch_delay;
        self
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Search, fetch in batches and keep papers with company authors
    ///
    /// Nothing is written here; see [`run`](Self::run).
    ///
    /// # Errors
    ///
    /// * `PubMedError::InvalidMaxResults` - If `max_results` is zero
    #[instrument(skip(self), fields(query = %query, max_results = max_results))]
    pub async fn collect(&self, query: &str, max_results: usize) -> Result<Vec<PaperRecord>> {
        if max_results == 0 {
            return Err(PubMedError::InvalidMaxResults { value: max_results });
        }

        info!("Searching for papers");
        let pmids = self.source.search_ids(query, max_results).await;

        if pmids.is_empty() {
            info!("No papers found for the given query");
            return Ok(Vec::new());
        }

        info!(found = pmids.len(), "Fetching paper details");
        let mut all_papers = Vec::with_capacity(pmids.len());
        let batch_count = pmids.len().div_ceil(self.batch_size);

        for (index, batch) in pmids.chunks(self.batch_size).enumerate() {
            if index > 0 {
                self.pause.pause(self.batch_delay).await;
            }

            let papers = self.source.fetch_batch(batch).await;
            info!(
                batch = index + 1,
                batches = batch_count,
                requested = batch.len(),
                parsed = papers.len(),
                "Fetched batch"
            );
            all_papers.extend(papers);
        }

        info!(fetched = all_papers.len(), "Fetched details");
        let filtered = filter_company_papers(all_papers);
        info!(
            matched = filtered.len(),
            "Found papers with pharmaceutical/biotech company authors"
        );

        Ok(filtered)
    }

    /// Run the pipeline and export surviving papers to `output_file`
    ///
    /// The file is written only when at least one paper survives the filter.
    ///
    /// # Errors
    ///
    /// * `PubMedError::InvalidMaxResults` - If `max_results` is zero
    /// * `PubMedError::Io` / `PubMedError::Csv` - If the export fails
    pub async fn run<Q: AsRef<Path>>(
        &self,
        query: &str,
        max_results: usize,
        output_file: Q,
    ) -> Result<Vec<PaperRecord>> {
        let papers = self.collect(query, max_results).await?;

        if !papers.is_empty() {
            let output_file = output_file.as_ref();
            export_to_csv(&papers, output_file)?;
            info!(path = %output_file.display(), "Results saved");
        }

        Ok(papers)
    }
}
