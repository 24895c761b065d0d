//! PubMedClient against a mocked NCBI server

mod common;

use common::{
    article_set, create_mock_client, efetch_response, esearch_response, pmids, pubmed_article,
    query_value,
};
use pubmed_paper_fetcher::{ClientConfig, PubMedClient, PubMedError};
use tracing_test::traced_test;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

#[tokio::test]
#[traced_test]
async fn test_search_returns_pmids_in_order() {
    let mock_server = MockServer::start().await;
    let ids = vec!["38000003".to_string(), "38000001".to_string(), "37999999".to_string()];

    Mock::given(method("GET"))
        .and(path("/esearch.fcgi"))
        .respond_with(ResponseTemplate::new(200).set_body_string(esearch_response(&ids)))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = create_mock_client(&mock_server);
    let result = client.search("cancer immunotherapy", 10).await;

    assert_eq!(result, ids);
}

#[tokio::test]
#[traced_test]
async fn test_search_sends_query_parameters() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/esearch.fcgi"))
        .and(query_param("db", "pubmed"))
        .and(query_param("term", "CRISPR gene editing"))
        .and(query_param("retmax", "50"))
        .and(query_param("retmode", "xml"))
        .and(query_param("email", "lab@university.edu"))
        .and(query_param("tool", "pubmed-paper-fetcher"))
        .and(query_param("api_key", "secret-key"))
        .respond_with(ResponseTemplate::new(200).set_body_string(esearch_response(&pmids(2))))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = ClientConfig::new()
        .with_base_url(mock_server.uri())
        .with_email("lab@university.edu")
        .with_api_key("secret-key");
    let client = PubMedClient::with_config(config);

    let result = client.search_articles("CRISPR gene editing", 50).await.unwrap();
    assert_eq!(result, vec!["1", "2"]);
}

#[tokio::test]
#[traced_test]
async fn test_search_without_api_key_omits_parameter() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/esearch.fcgi"))
        .respond_with(ResponseTemplate::new(200).set_body_string(esearch_response(&pmids(1))))
        .mount(&mock_server)
        .await;

    let client = create_mock_client(&mock_server);
    client.search("aspirin", 5).await;

    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert!(query_value(&requests[0], "api_key").is_none());
    assert_eq!(
        query_value(&requests[0], "email").as_deref(),
        Some("test@example.com")
    );
}

#[tokio::test]
#[traced_test]
async fn test_search_server_error_degrades_to_empty() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/esearch.fcgi"))
        .respond_with(ResponseTemplate::new(500))
        .expect(2)
        .mount(&mock_server)
        .await;

    let client = create_mock_client(&mock_server);

    let strict = client.search_articles("cancer", 10).await;
    assert!(matches!(strict, Err(PubMedError::ApiError { status: 500, .. })));

    assert!(client.search("cancer", 10).await.is_empty());
    assert!(logs_contain("Error searching papers"));
}

#[tokio::test]
#[traced_test]
async fn test_search_malformed_response_degrades_to_empty() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/esearch.fcgi"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<eSearchResult><IdList><Id>1"))
        .mount(&mock_server)
        .await;

    let client = create_mock_client(&mock_server);

    assert!(client.search("cancer", 10).await.is_empty());
}

#[tokio::test]
#[traced_test]
async fn test_search_with_no_matches() {
    let mock_server = MockServer::start().await;
    let body = r#"<?xml version="1.0" encoding="UTF-8" ?>
<eSearchResult>
    <Count>0</Count>
    <RetMax>0</RetMax>
    <RetStart>0</RetStart>
    <IdList/>
    <TranslationSet/>
    <ErrorList><PhraseNotFound>zzzxqqq</PhraseNotFound></ErrorList>
</eSearchResult>"#;

    Mock::given(method("GET"))
        .and(path("/esearch.fcgi"))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(&mock_server)
        .await;

    let client = create_mock_client(&mock_server);

    let result = client.search_articles("zzzxqqq", 10).await.unwrap();
    assert!(result.is_empty());
}

#[tokio::test]
#[traced_test]
async fn test_fetch_details_sends_comma_separated_ids() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/efetch.fcgi"))
        .and(query_param("db", "pubmed"))
        .and(query_param("id", "2,3,4"))
        .and(query_param("retmode", "xml"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(efetch_response(&["2", "3", "4"])),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = create_mock_client(&mock_server);
    let ids: Vec<String> = ["2", "3", "4"].iter().map(|s| s.to_string()).collect();

    let papers = client.fetch_details(&ids).await;

    let fetched: Vec<&str> = papers.iter().map(|p| p.pubmed_id.as_str()).collect();
    assert_eq!(fetched, vec!["2", "3", "4"]);

    let company = &papers[0];
    assert_eq!(company.title, "Article 2");
    assert_eq!(company.publication_date, "2023-07");
    assert_eq!(company.non_academic_authors, vec!["Test Author2"]);
    assert_eq!(company.corresponding_author_email, "contact@pfizer.com");
    assert!(company.has_company_authors());

    let academic = &papers[1];
    assert!(academic.non_academic_authors.is_empty());
    assert!(academic.company_affiliations.is_empty());
    assert_eq!(academic.corresponding_author_email, "N/A");
}

#[tokio::test]
#[traced_test]
async fn test_fetch_details_skips_article_without_pmid() {
    let mock_server = MockServer::start().await;
    let broken = pubmed_article("", "Genentech, South San Francisco, CA");
    let body = article_set(&format!(
        "{}{}",
        pubmed_article("11", "Roche Diagnostics GmbH, Penzberg, Germany"),
        broken
    ));

    Mock::given(method("GET"))
        .and(path("/efetch.fcgi"))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(&mock_server)
        .await;

    let client = create_mock_client(&mock_server);
    let papers = client
        .try_fetch_details(&["11".to_string(), "12".to_string()])
        .await
        .unwrap();

    assert_eq!(papers.len(), 1);
    assert_eq!(papers[0].pubmed_id, "11");
    assert!(logs_contain("Failed to extract article, skipping"));
}

#[tokio::test]
#[traced_test]
async fn test_fetch_details_server_error_degrades_to_empty() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/efetch.fcgi"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;

    let client = create_mock_client(&mock_server);
    let ids = pmids(3);

    assert!(matches!(
        client.try_fetch_details(&ids).await,
        Err(PubMedError::ApiError { status: 503, .. })
    ));
    assert!(client.fetch_details(&ids).await.is_empty());
    assert!(logs_contain("Error fetching paper details"));
}

#[tokio::test]
#[traced_test]
async fn test_fetch_details_malformed_xml() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/efetch.fcgi"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("<PubmedArticleSet><PubmedArticle><PMID>1</PMID>"),
        )
        .mount(&mock_server)
        .await;

    let client = create_mock_client(&mock_server);
    let ids = pmids(1);

    assert!(matches!(
        client.try_fetch_details(&ids).await,
        Err(PubMedError::XmlError(_))
    ));
    assert!(client.fetch_details(&ids).await.is_empty());
}

#[tokio::test]
#[traced_test]
async fn test_fetch_details_empty_ids_sends_no_request() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(|_: &Request| ResponseTemplate::new(500))
        .expect(0)
        .mount(&mock_server)
        .await;

    let client = create_mock_client(&mock_server);

    assert!(client.fetch_details(&[]).await.is_empty());
}
