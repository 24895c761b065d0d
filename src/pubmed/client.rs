use reqwest::{Client, Response};
use tracing::{debug, info, instrument, warn};

use crate::config::ClientConfig;
use crate::error::{PubMedError, Result};
use crate::pipeline::PaperSource;
use crate::pubmed::models::PaperRecord;
use crate::pubmed::parser::parse_paper_records;
use crate::pubmed::responses::ESearchResult;

/// Client for the PubMed ESearch and EFetch endpoints
///
/// Every request is sent once; there is no retry. The degraded entry points
/// ([`search`](Self::search), [`fetch_details`](Self::fetch_details)) log
/// failures and return an empty result instead of an error.
#[derive(Clone)]
pub struct PubMedClient {
    client: Client,
    base_url: String,
    config: ClientConfig,
}

impl PubMedClient {
    /// Create a new PubMed client with default configuration
    ///
    /// # Example
    ///
    /// ```
    /// use pubmed_paper_fetcher::PubMedClient;
    ///
    /// let client = PubMedClient::new();
    /// ```
    pub fn new() -> Self {
        Self::with_config(ClientConfig::new())
    }

    /// Create a new PubMed client with custom configuration
    ///
    /// # Example
    ///
    /// ```
    /// use pubmed_paper_fetcher::{ClientConfig, PubMedClient};
    ///
    /// let config = ClientConfig::new()
    ///     .with_api_key("your_api_key_here")
    ///     .with_email("researcher@university.edu");
    ///
    /// let client = PubMedClient::with_config(config);
    /// ```
    pub fn with_config(config: ClientConfig) -> Self {
        let client = Client::builder()
            .user_agent(config.effective_user_agent())
            .timeout(config.timeout)
            .build()
            .unwrap_or_else(|e| {
                warn!(error = %e, "Failed to build configured HTTP client, using defaults");
                Client::new()
            });

        Self::with_client_and_config(client, config)
    }

    /// Create a PubMed client from an existing reqwest client
    pub fn with_client_and_config(client: Client, config: ClientConfig) -> Self {
        let base_url = config.effective_base_url().to_string();
        Self {
            client,
            base_url,
            config,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Search PubMed and return matching PMIDs, propagating failures
    ///
    /// # Errors
    ///
    /// * `PubMedError::RequestError` - If the HTTP request fails
    /// * `PubMedError::ApiError` - If NCBI answers with a non-success status
    /// * `PubMedError::XmlError` - If the ESearch document cannot be parsed
    #[instrument(skip(self), fields(query = %query, max_results = max_results))]
    pub async fn search_articles(&self, query: &str, max_results: usize) -> Result<Vec<String>> {
        if query.trim().is_empty() {
            debug!("Empty query provided, returning empty results");
            return Ok(Vec::new());
        }

        let url = format!(
            "{}/esearch.fcgi?db=pubmed&term={}&retmax={}&retmode=xml",
            self.base_url,
            urlencoding::encode(query),
            max_results
        );

        debug!("Making ESearch API request");
        let response = self.make_request(&url).await?;
        let xml_text = response.text().await?;

        let search_result = ESearchResult::from_xml(&xml_text)?;

        if let Some(error_msg) = &search_result.error {
            warn!(error = %error_msg, "NCBI ESearch returned an error element");
        }

        let total_count = search_result.count.clone();
        let pmids = search_result.into_ids();
        info!(
            results_found = pmids.len(),
            total_count = total_count.as_deref().unwrap_or("unknown"),
            "Search completed"
        );

        Ok(pmids)
    }

    /// Search PubMed, logging failures and returning no PMIDs on error
    ///
    /// # Example
    ///
    /// ```no_run
    /// use pubmed_paper_fetcher::PubMedClient;
    ///
    /// #[tokio::main]
    /// async fn main() {
    ///     let client = PubMedClient::new();
    ///     let pmids = client.search("CRISPR gene editing", 50).await;
    ///     println!("Found {} articles", pmids.len());
    /// }
    /// ```
    pub async fn search(&self, query: &str, max_results: usize) -> Vec<String> {
        match self.search_articles(query, max_results).await {
            Ok(pmids) => pmids,
            Err(e) => {
                warn!(error = %e, "Error searching papers");
                Vec::new()
            }
        }
    }

    /// Fetch and extract one batch of PMIDs with a single EFetch request
    ///
    /// Articles that fail extraction are skipped. An empty slice returns
    /// immediately without a request.
    ///
    /// # Errors
    ///
    /// * `PubMedError::RequestError` - If the HTTP request fails
    /// * `PubMedError::ApiError` - If NCBI answers with a non-success status
    /// * `PubMedError::XmlError` - If the EFetch document is not well-formed
    #[instrument(skip(self, pmids), fields(pmids_count = pmids.len()))]
    pub async fn try_fetch_details(&self, pmids: &[String]) -> Result<Vec<PaperRecord>> {
        if pmids.is_empty() {
            return Ok(Vec::new());
        }

        let url = format!(
            "{}/efetch.fcgi?db=pubmed&id={}&retmode=xml",
            self.base_url,
            urlencoding::encode(&pmids.join(","))
        );

        debug!(batch_size = pmids.len(), "Making batch EFetch API request");
        let response = self.make_request(&url).await?;
        let xml_text = response.text().await?;

        if xml_text.trim().is_empty() {
            return Ok(Vec::new());
        }

        let papers = parse_paper_records(&xml_text)?;
        info!(
            requested = pmids.len(),
            parsed = papers.len(),
            "Batch fetch completed"
        );

        Ok(papers)
    }

    /// Fetch one batch, logging failures and returning no records on error
    pub async fn fetch_details(&self, pmids: &[String]) -> Vec<PaperRecord> {
        match self.try_fetch_details(pmids).await {
            Ok(papers) => papers,
            Err(e) => {
                warn!(error = %e, "Error fetching paper details");
                Vec::new()
            }
        }
    }

    /// Send a GET request with the identification parameters appended
    pub(crate) async fn make_request(&self, url: &str) -> Result<Response> {
        let mut final_url = url.to_string();
        let api_params = self.config.build_api_params();

        if !api_params.is_empty() {
            let separator = if url.contains('?') { '&' } else { '?' };
            final_url.push(separator);

            let param_strings: Vec<String> = api_params
                .into_iter()
                .map(|(key, value)| format!("{}={}", key, urlencoding::encode(&value)))
                .collect();
            final_url.push_str(&param_strings.join("&"));
        }

        debug!("Making API request to: {}", final_url);
        let response = self.client.get(&final_url).send().await?;

        if !response.status().is_success() {
            warn!("API request failed with status: {}", response.status());
            return Err(PubMedError::ApiError {
                status: response.status().as_u16(),
                message: response
                    .status()
                    .canonical_reason()
                    .unwrap_or("Unknown error")
                    .to_string(),
            });
        }

        Ok(response)
    }
}

impl Default for PubMedClient {
    fn default() -> Self {
        Self::new()
    }
}

impl PaperSource for PubMedClient {
    async fn search_ids(&self, query: &str, max_results: usize) -> Vec<String> {
        self.search(query, max_results).await
    }

    async fn fetch_batch(&self, pmids: &[String]) -> Vec<PaperRecord> {
        self.fetch_details(pmids).await
    }
}
