//! # PubMed Paper Fetcher
//!
//! Finds PubMed papers with at least one author affiliated with a
//! pharmaceutical or biotech company and exports them as CSV.
//!
//! ## Pipeline
//!
//! 1. ESearch returns the PMIDs matching a query
//! 2. EFetch retrieves full records in batches of 200 PMIDs, pausing between batches
//! 3. Each article is reduced to a [`PaperRecord`]; author affiliations are
//!    classified by [`affiliation::is_company_affiliation`]
//! 4. Papers without company-affiliated authors are dropped
//! 5. The rest are written to a CSV file
//!
//! ## Quick Start
//!
//! ```no_run
//! use pubmed_paper_fetcher::{ClientConfig, Pipeline, PubMedClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ClientConfig::new().with_email("researcher@university.edu");
//!     let client = PubMedClient::with_config(config);
//!
//!     let papers = Pipeline::new(client)
//!         .run("CRISPR gene editing", 50, "results.csv")
//!         .await?;
//!
//!     for paper in &papers {
//!         println!("{}: {}", paper.pubmed_id, paper.title);
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod affiliation;
pub mod config;
pub mod error;
pub mod export;
pub mod pipeline;
pub mod pubmed;
pub mod rate_limit;

// Re-export main types for convenience
pub use config::ClientConfig;
pub use error::{PubMedError, Result};
pub use export::{export_to_csv, write_csv};
pub use pipeline::{BATCH_SIZE, PaperSource, Pipeline};
pub use pubmed::{PaperRecord, PubMedClient};
pub use rate_limit::{DEFAULT_BATCH_DELAY, NoPause, Pause, TokioPause};
