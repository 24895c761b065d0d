use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result, bail};
use clap::Parser;
use pubmed_paper_fetcher::config::DEFAULT_EMAIL;
use pubmed_paper_fetcher::{ClientConfig, PaperRecord, Pipeline, PubMedClient, export_to_csv};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

const SAMPLE_SIZE: usize = 3;

#[derive(Parser, Debug)]
#[command(
    name = "pubmed-paper-fetcher",
    about = "Fetch research papers from PubMed with pharmaceutical/biotech company authors",
    after_help = "Examples:\n  pubmed-paper-fetcher \"cancer immunotherapy\"\n  pubmed-paper-fetcher \"CRISPR gene editing\" --max-results 50 --file results.csv\n  pubmed-paper-fetcher \"COVID-19 vaccine\" --debug --email user@example.com"
)]
struct Cli {
    /// Search query for PubMed (supports full PubMed query syntax)
    query: String,

    /// Output CSV filename
    #[arg(short, long, default_value = "research_papers.csv")]
    file: PathBuf,

    /// Print debug information during execution
    #[arg(short, long)]
    debug: bool,

    /// Maximum number of papers to fetch
    #[arg(long, default_value_t = 100)]
    max_results: usize,

    /// Email address for NCBI API identification
    #[arg(long, env = "NCBI_EMAIL", default_value = DEFAULT_EMAIL)]
    email: String,

    /// NCBI API key for increased rate limits
    #[arg(long, env = "NCBI_API_KEY")]
    api_key: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.debug { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .without_time()
                .with_writer(std::io::stderr),
        )
        .with(tracing_subscriber::EnvFilter::new(filter))
        .init();

    if cli.max_results == 0 {
        bail!("--max-results must be a positive integer");
    }

    if cli.debug {
        tracing::debug!(email = %cli.email, "Initializing PubMed fetcher");
        if let Some(key) = &cli.api_key {
            let prefix: String = key.chars().take(8).collect();
            tracing::debug!("Using API key: {}...", prefix);
        }
    }

    let mut config = ClientConfig::new().with_email(&cli.email);
    if let Some(key) = &cli.api_key {
        config = config.with_api_key(key);
    }
    let pipeline = Pipeline::new(PubMedClient::with_config(config));

    let papers = tokio::select! {
        result = pipeline.run(&cli.query, cli.max_results, &cli.file) => {
            result.context("Failed to fetch papers")?
        }
        _ = tokio::signal::ctrl_c() => {
            eprintln!("\nOperation cancelled by user.");
            process::exit(1);
        }
    };

    if papers.is_empty() {
        println!("\nNo papers found with pharmaceutical/biotech company authors.");
        if !cli.file.exists() {
            export_to_csv(&[], &cli.file)
                .with_context(|| format!("Failed to write {}", cli.file.display()))?;
            println!("Empty results file created: {}", cli.file.display());
        }
        return Ok(());
    }

    println!(
        "\nSuccessfully processed {} papers with company affiliations.",
        papers.len()
    );
    println!("Results saved to: {}", cli.file.display());

    if cli.debug {
        print_samples(&papers)?;
    }

    Ok(())
}

fn print_samples(papers: &[PaperRecord]) -> Result<()> {
    println!("\nSample results:");
    for paper in papers.iter().take(SAMPLE_SIZE) {
        println!("{}", serde_json::to_string_pretty(paper)?);
    }
    Ok(())
}
