//! Shared fixtures for mocked NCBI tests

#![allow(dead_code)]

use pubmed_paper_fetcher::{ClientConfig, PubMedClient};
use wiremock::MockServer;

/// ESearch XML response listing the given PMIDs
pub fn esearch_response(ids: &[String]) -> String {
    let id_elements: String = ids
        .iter()
        .map(|id| format!("        <Id>{}</Id>\n", id))
        .collect();

    format!(
        r#"<?xml version="1.0" encoding="UTF-8" ?>
<!DOCTYPE eSearchResult PUBLIC "-//NLM//DTD esearch 20060628//EN" "https://eutils.ncbi.nlm.nih.gov/eutils/dtd/20060628/esearch.dtd">
<eSearchResult>
    <Count>{}</Count>
    <RetMax>{}</RetMax>
    <RetStart>0</RetStart>
    <IdList>
{}    </IdList>
</eSearchResult>"#,
        ids.len(),
        ids.len(),
        id_elements
    )
}

/// One `<PubmedArticle>` with a single author carrying `affiliation`
pub fn pubmed_article(pmid: &str, affiliation: &str) -> String {
    format!(
        r#"    <PubmedArticle>
        <MedlineCitation Status="MEDLINE" Owner="NLM">
            <PMID Version="1">{pmid}</PMID>
            <Article PubModel="Print-Electronic">
                <Journal>
                    <JournalIssue CitedMedium="Internet">
                        <PubDate><Year>2023</Year><Month>7</Month></PubDate>
                    </JournalIssue>
                    <Title>Journal of Testing</Title>
                </Journal>
                <ArticleTitle>Article {pmid}</ArticleTitle>
                <AuthorList CompleteYN="Y">
                    <Author ValidYN="Y">
                        <LastName>Author{pmid}</LastName>
                        <ForeName>Test</ForeName>
                        <AffiliationInfo>
                            <Affiliation>{affiliation}</Affiliation>
                        </AffiliationInfo>
                    </Author>
                </AuthorList>
            </Article>
        </MedlineCitation>
    </PubmedArticle>
"#
    )
}

/// Wrap article fragments in a `PubmedArticleSet`
pub fn article_set(articles: &str) -> String {
    format!(
        r#"<?xml version="1.0" ?>
<!DOCTYPE PubmedArticleSet PUBLIC "-//NLM//DTD PubMedArticle, 1st January 2024//EN" "https://dtd.nlm.nih.gov/ncbi/pubmed/out/pubmed_240101.dtd">
<PubmedArticleSet>
{}</PubmedArticleSet>"#,
        articles
    )
}

/// Company affiliation for even PMIDs, academic for odd ones
pub fn affiliation_for(pmid: &str) -> &'static str {
    let even = pmid
        .chars()
        .last()
        .and_then(|c| c.to_digit(10))
        .is_some_and(|d| d % 2 == 0);

    if even {
        "Pfizer Inc., New York, NY, USA. contact@pfizer.com"
    } else {
        "Department of Biology, Harvard University, Cambridge, MA"
    }
}

/// EFetch document for the given PMIDs using [`affiliation_for`]
pub fn efetch_response(ids: &[&str]) -> String {
    let articles: String = ids
        .iter()
        .map(|id| pubmed_article(id, affiliation_for(id)))
        .collect();
    article_set(&articles)
}

/// PMIDs "1".."=count"
pub fn pmids(count: usize) -> Vec<String> {
    (1..=count).map(|i| i.to_string()).collect()
}

/// Client pointed at the mock server
pub fn create_mock_client(mock_server: &MockServer) -> PubMedClient {
    let config = ClientConfig::new()
        .with_base_url(mock_server.uri())
        .with_email("test@example.com");

    PubMedClient::with_config(config)
}

/// Value of a query parameter of a received request
pub fn query_value(request: &wiremock::Request, key: &str) -> Option<String> {
    request
        .url
        .query_pairs()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.into_owned())
}
