//! PubMed client for searching and fetching article records
//!
//! This module talks to the ESearch and EFetch E-utilities and turns EFetch
//! documents into [`PaperRecord`]s.

pub mod client;
pub mod models;
pub mod parser;
pub(crate) mod responses;

// Re-export public types
pub use client::PubMedClient;
pub use models::{NOT_AVAILABLE, PaperRecord, filter_company_papers};
pub use parser::parse_paper_records;
