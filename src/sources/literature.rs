//! PubMed E-utilities lead source.
//!
//! Endpoints used:
//!   esearch:  {base}/esearch.fcgi  (query -> PMIDs)
//!   esummary: {base}/esummary.fcgi (PMIDs -> authors, title, venue)
//!
//! The last listed author of each matched article is treated as the
//! corresponding author and becomes the lead.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Url;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;
use tokio_retry::{strategy::ExponentialBackoff, RetryIf};
use tracing::{debug, instrument, warn};

use super::contact::{display_name, email_address, linkedin_handle};
use super::{LeadSource, SourceError, SourceOutcome};
use crate::config::{LiteratureConfig, MAX_SUMMARY_IDS};
use crate::leads::LeadRecord;

const RESEARCHER_TITLE: &str = "Researcher (Corresponding Author)";
const DEFAULT_INSTITUTION: &str = "Academic Institution";
const UNKNOWN: &str = "Unknown";
const ACADEMIC_FUNDING: &str = "Academic/Grant funded";
const ACADEMIC_DOMAIN: &str = "research.edu";
const ACTIVITY_TITLE_CHARS: usize = 60;

/// Query terms implying the authors already work with liver or 3D models
const TECH_QUERY_TERMS: &[&str] = &["liver", "3d"];

#[derive(Debug, Default, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    esearchresult: SearchResult,
}

#[derive(Debug, Default, Deserialize)]
struct SearchResult {
    #[serde(default)]
    idlist: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
struct SummaryResponse {
    #[serde(default)]
    result: HashMap<String, serde_json::Value>,
}

/// Per-article metadata from esummary. Missing keys fall back to defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ArticleSummary {
    #[serde(default)]
    pub authors: Vec<ArticleAuthor>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub source: String, // Journal / venue
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ArticleAuthor {
    #[serde(default)]
    pub name: Option<String>,
}

/// Decode an esearch JSON body into its PMID list
pub fn parse_search_ids(body: &str) -> Result<Vec<String>, serde_json::Error> {
    let response: SearchResponse = serde_json::from_str(body)?;
    Ok(response.esearchresult.idlist)
}

/// Decode an esummary JSON body into summaries keyed by PMID.
///
/// The `result` object also carries a `uids` array and may hold entries
/// that are not article objects; those are skipped.
pub fn parse_summaries(body: &str) -> Result<HashMap<String, ArticleSummary>, serde_json::Error> {
    let response: SummaryResponse = serde_json::from_str(body)?;
    Ok(response
        .result
        .into_iter()
        .filter(|(key, _)| key != "uids")
        .filter_map(|(key, value)| {
            serde_json::from_value::<ArticleSummary>(value)
                .ok()
                .map(|summary| (key, summary))
        })
        .collect())
}

/// Whether a query implies relevant technology use
pub fn query_implies_technology(query: &str) -> bool {
    let query = query.to_lowercase();
    TECH_QUERY_TERMS.iter().any(|term| query.contains(term))
}

/// Build a lead from the article's corresponding (last listed) author.
/// Returns None when the article lists no authors.
pub fn article_lead(article: &ArticleSummary, query: &str) -> Option<LeadRecord> {
    let author = article.authors.last()?;
    let name = author
        .name
        .as_deref()
        .filter(|n| !n.trim().is_empty())
        .unwrap_or(UNKNOWN);

    let company = if article.source.trim().is_empty() {
        DEFAULT_INSTITUTION.to_string()
    } else {
        article.source.clone()
    };

    let short_title: String = article.title.chars().take(ACTIVITY_TITLE_CHARS).collect();

    Some(LeadRecord {
        name: display_name(name),
        title: RESEARCHER_TITLE.to_string(),
        company,
        location: UNKNOWN.to_string(),
        headquarters: UNKNOWN.to_string(),
        contact_identifier: email_address(name, ACADEMIC_DOMAIN),
        linkedin: linkedin_handle(name),
        funding_status: ACADEMIC_FUNDING.to_string(),
        uses_relevant_technology: query_implies_technology(query),
        has_recent_publication: true,
        has_any_publication: true,
        recent_activity_note: format!("Published: {}...", short_title),
    })
}

/// Thin E-utilities client: one search call and one summary call per query.
pub struct PubMedClient {
    client: reqwest::Client,
    base_url: String,
    max_results: usize,
    summary_limit: usize,
    request_delay: Duration,
}

impl PubMedClient {
    pub fn new(config: &LiteratureConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .build()
            .context("Failed to create HTTP client")?;

        let request_delay = config
            .request_delay()
            .with_context(|| format!("Invalid request_delay '{}'", config.request_delay))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            max_results: config.max_results,
            summary_limit: config.summary_limit.clamp(1, MAX_SUMMARY_IDS),
            request_delay,
        })
    }

    /// GET an endpoint and return the body text, retrying transient failures
    async fn get_text(
        &self,
        endpoint: &str,
        params: &[(&str, String)],
        context: &str,
    ) -> Result<String, SourceError> {
        let url = Url::parse_with_params(&format!("{}/{}", self.base_url, endpoint), params)
            .map_err(|e| SourceError::Http {
                context: context.to_string(),
                message: format!("invalid URL: {}", e),
            })?;

        // Up to 3 attempts, 200ms then 400ms apart
        let retry_strategy = ExponentialBackoff::from_millis(2)
            .factor(100)
            .max_delay(Duration::from_secs(1))
            .take(2);

        RetryIf::spawn(
            retry_strategy,
            move || {
                let url = url.clone();
                async move {
                    let response = self
                        .client
                        .get(url)
                        .send()
                        .await
                        .map_err(|e| SourceError::Http {
                            context: context.to_string(),
                            message: e.to_string(),
                        })?;

                    let status = response.status();
                    if !status.is_success() {
                        return Err(SourceError::Status {
                            context: context.to_string(),
                            status: status.as_u16(),
                        });
                    }

                    response.text().await.map_err(|e| SourceError::Http {
                        context: context.to_string(),
                        message: e.to_string(),
                    })
                }
            },
            SourceError::is_retryable,
        )
        .await
    }

    /// Search PubMed and return matched PMIDs, newest first.
    #[instrument(skip(self))]
    pub async fn esearch(&self, query: &str) -> Result<Vec<String>, SourceError> {
        let context = format!("esearch '{}'", query);
        let params = [
            ("db", "pubmed".to_string()),
            ("term", query.to_string()),
            ("retmax", self.max_results.to_string()),
            ("retmode", "json".to_string()),
            ("sort", "pub_date".to_string()),
        ];

        let body = self.get_text("esearch.fcgi", &params, &context).await?;
        let ids = parse_search_ids(&body).map_err(|e| SourceError::Decode {
            context,
            message: e.to_string(),
        })?;

        debug!(?ids, "PubMed esearch returned PMIDs");
        Ok(ids)
    }

    /// Fetch summaries for a batch of PMIDs (callers keep it within the limit)
    #[instrument(skip(self))]
    pub async fn esummary(
        &self,
        pmids: &[String],
    ) -> Result<HashMap<String, ArticleSummary>, SourceError> {
        if pmids.is_empty() {
            return Ok(HashMap::new());
        }

        let context = format!("esummary for {} ids", pmids.len());
        let params = [
            ("db", "pubmed".to_string()),
            ("id", pmids.join(",")),
            ("retmode", "json".to_string()),
        ];

        let body = self.get_text("esummary.fcgi", &params, &context).await?;
        parse_summaries(&body).map_err(|e| SourceError::Decode {
            context,
            message: e.to_string(),
        })
    }

    /// Run one query end to end: search, pause, summarize, build leads.
    pub async fn search_leads(&self, query: &str) -> Result<Vec<LeadRecord>, SourceError> {
        let pmids = self.esearch(query).await?;
        if pmids.is_empty() {
            return Ok(Vec::new());
        }

        let batch: Vec<String> = pmids.into_iter().take(self.summary_limit).collect();

        tokio::time::sleep(self.request_delay).await;
        let summaries = self.esummary(&batch).await?;

        // Keep search order, not map order
        let leads = batch
            .iter()
            .filter_map(|pmid| summaries.get(pmid))
            .filter_map(|article| article_lead(article, query))
            .collect();

        Ok(leads)
    }
}

/// Runs each configured query against PubMed, pausing between queries.
pub struct LiteratureSource {
    client: PubMedClient,
    queries: Vec<String>,
    query_pause: Duration,
}

impl LiteratureSource {
    pub fn new(config: &LiteratureConfig) -> Result<Self> {
        let query_pause = config
            .query_pause()
            .with_context(|| format!("Invalid query_pause '{}'", config.query_pause))?;

        Ok(Self {
            client: PubMedClient::new(config)?,
            queries: config.queries.clone(),
            query_pause,
        })
    }
}

#[async_trait]
impl LeadSource for LiteratureSource {
    fn name(&self) -> &str {
        "PubMed"
    }

    async fn collect(&self) -> SourceOutcome {
        let mut outcome = SourceOutcome::default();

        for query in &self.queries {
            match self.client.search_leads(query).await {
                Ok(leads) => {
                    debug!(query = %query, count = leads.len(), "PubMed query finished");
                    outcome.leads.extend(leads);
                }
                Err(e) => {
                    // A failed query contributes nothing; later queries still run
                    warn!(query = %query, error = %e, "PubMed query failed");
                    outcome.errors.push(e);
                }
            }
            tokio::time::sleep(self.query_pause).await;
        }

        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const SEARCH_BODY: &str = r#"{
        "header": {"type": "esearch", "version": "0.3"},
        "esearchresult": {
            "count": "1532",
            "retmax": "3",
            "idlist": ["39100001", "39100002", "39100003"]
        }
    }"#;

    const SUMMARY_BODY: &str = r#"{
        "header": {"type": "esummary", "version": "0.3"},
        "result": {
            "uids": ["39100001", "39100002", "39100003"],
            "39100001": {
                "uid": "39100001",
                "title": "Hepatic spheroids as a predictive model for drug-induced liver injury in early discovery",
                "source": "Toxicol Sci",
                "authors": [
                    {"name": "Nguyen T", "authtype": "Author"},
                    {"name": "Keller AB", "authtype": "Author"}
                ]
            },
            "39100002": {
                "uid": "39100002",
                "title": "Short note",
                "authors": [{"name": "Osei K"}]
            },
            "39100003": {
                "uid": "39100003",
                "title": "Editorial",
                "source": "Arch Toxicol",
                "authors": []
            }
        }
    }"#;

    fn install_crypto_provider() {
        // Ignore the error when another test already installed it
        let _ = rustls::crypto::ring::default_provider().install_default();
    }

    fn article(title: &str, source: &str, authors: &[&str]) -> ArticleSummary {
        ArticleSummary {
            authors: authors
                .iter()
                .map(|n| ArticleAuthor { name: Some(n.to_string()) })
                .collect(),
            title: title.to_string(),
            source: source.to_string(),
        }
    }

    #[test]
    fn test_parse_search_ids() {
        let ids = parse_search_ids(SEARCH_BODY).unwrap();
        assert_eq!(ids, vec!["39100001", "39100002", "39100003"]);
    }

    #[test]
    fn test_parse_search_ids_missing_result() {
        let ids = parse_search_ids(r#"{"header": {}}"#).unwrap();
        assert!(ids.is_empty());
    }

    #[test]
    fn test_parse_search_ids_invalid_json() {
        assert!(parse_search_ids("<html>Service unavailable</html>").is_err());
    }

    #[test]
    fn test_parse_summaries_skips_uids() {
        let summaries = parse_summaries(SUMMARY_BODY).unwrap();
        assert_eq!(summaries.len(), 3);
        assert!(!summaries.contains_key("uids"));
        assert_eq!(summaries["39100001"].source, "Toxicol Sci");
        assert_eq!(summaries["39100001"].authors.len(), 2);
        // Missing "source" defaults to empty
        assert_eq!(summaries["39100002"].source, "");
    }

    #[test]
    fn test_article_lead_uses_last_author() {
        let summaries = parse_summaries(SUMMARY_BODY).unwrap();
        let lead = article_lead(&summaries["39100001"], "hepatic spheroids toxicology").unwrap();
        assert_eq!(lead.name, "Dr. Keller AB");
        assert_eq!(lead.contact_identifier, "keller.ab@research.edu");
        assert_eq!(lead.linkedin, "linkedin.com/in/kellerab");
        assert_eq!(lead.company, "Toxicol Sci");
        assert_eq!(lead.title, "Researcher (Corresponding Author)");
        assert_eq!(lead.location, "Unknown");
        assert_eq!(lead.headquarters, "Unknown");
        assert_eq!(lead.funding_status, "Academic/Grant funded");
        assert!(lead.has_recent_publication);
        assert!(lead.has_any_publication);
    }

    #[test]
    fn test_article_lead_single_author() {
        let lead = article_lead(&article("Short note", "", &["Osei K"]), "organ-on-chip").unwrap();
        assert_eq!(lead.name, "Dr. Osei K");
        assert_eq!(lead.company, "Academic Institution");
    }

    #[test]
    fn test_article_lead_no_authors() {
        assert!(article_lead(&article("Editorial", "Arch Toxicol", &[]), "liver").is_none());
    }

    #[test]
    fn test_article_lead_missing_author_name() {
        let mut summary = article("Untitled", "J Hepatol", &[]);
        summary.authors.push(ArticleAuthor { name: None });
        let lead = article_lead(&summary, "liver").unwrap();
        assert_eq!(lead.name, "Dr. Unknown");
        assert_eq!(lead.contact_identifier, "unknown@research.edu");
    }

    #[test]
    fn test_activity_note_truncates_title() {
        let title = "A".repeat(80);
        let lead = article_lead(&article(&title, "Lab Chip", &["Ito M"]), "organ-on-chip").unwrap();
        assert_eq!(lead.recent_activity_note, format!("Published: {}...", "A".repeat(60)));
    }

    #[test]
    fn test_activity_note_short_title() {
        let lead = article_lead(&article("Liver chips", "Lab Chip", &["Ito M"]), "q").unwrap();
        assert_eq!(lead.recent_activity_note, "Published: Liver chips...");
    }

    #[test]
    fn test_query_implies_technology() {
        assert!(query_implies_technology("drug-induced liver injury DILI 3D"));
        assert!(query_implies_technology("organ-on-chip LIVER safety"));
        assert!(query_implies_technology("3D culture"));
        assert!(!query_implies_technology("hepatic spheroids toxicology"));
    }

    #[test]
    fn test_literature_lead_score() {
        use crate::scoring::calculate_score;
        let summary = article("t", "Toxicol Sci", &["Keller AB"]);

        let lead = article_lead(&summary, "organ-on-chip liver safety").unwrap();
        // Tech 15 + recent publication 40; researcher title and academic funding score nothing
        assert_eq!(calculate_score(&lead).score, 55);

        let lead = article_lead(&summary, "hepatic spheroids toxicology").unwrap();
        assert_eq!(calculate_score(&lead).score, 40);
    }

    #[test]
    fn test_client_clamps_summary_limit() {
        let config = LiteratureConfig {
            summary_limit: 500,
            base_url: "https://example.org/eutils/".to_string(),
            ..Default::default()
        };
        install_crypto_provider();
        let client = PubMedClient::new(&config).unwrap();
        assert_eq!(client.summary_limit, 20);
        assert_eq!(client.base_url, "https://example.org/eutils");
        assert_eq!(client.request_delay, Duration::from_millis(500));
    }

    #[test]
    fn test_source_rejects_bad_pause() {
        let config = LiteratureConfig {
            query_pause: "whenever".to_string(),
            ..Default::default()
        };
        install_crypto_provider();
        assert!(LiteratureSource::new(&config).is_err());
    }

    #[tokio::test]
    async fn test_esummary_empty_batch_skips_request() {
        let config = LiteratureConfig {
            base_url: "http://127.0.0.1:9".to_string(),
            ..Default::default()
        };
        install_crypto_provider();
        let client = PubMedClient::new(&config).unwrap();
        let summaries = client.esummary(&[]).await.unwrap();
        assert!(summaries.is_empty());
    }

    fn mock_config(server: &MockServer, queries: &[&str]) -> LiteratureConfig {
        LiteratureConfig {
            base_url: server.uri(),
            queries: queries.iter().map(|q| q.to_string()).collect(),
            max_results: 5,
            request_delay: "0s".to_string(),
            query_pause: "0s".to_string(),
            ..Default::default()
        }
    }

    fn search_json(ids: &[&str]) -> serde_json::Value {
        json!({ "esearchresult": { "count": ids.len().to_string(), "idlist": ids } })
    }

    /// esummary body for (pmid, title, last author) triples
    fn summary_json(articles: &[(&str, &str, &str)]) -> serde_json::Value {
        let mut result = serde_json::Map::new();
        let uids: Vec<&str> = articles.iter().map(|(pmid, _, _)| *pmid).collect();
        result.insert("uids".to_string(), json!(uids));
        for (pmid, title, last_author) in articles {
            result.insert(
                pmid.to_string(),
                json!({
                    "uid": pmid,
                    "title": title,
                    "source": "Toxicol Sci",
                    "authors": [{ "name": "Lab M" }, { "name": last_author }]
                }),
            );
        }
        json!({ "result": result })
    }

    async fn mount_search(server: &MockServer, term: &str, ids: &[&str]) {
        Mock::given(method("GET"))
            .and(path("/esearch.fcgi"))
            .and(query_param("term", term))
            .respond_with(ResponseTemplate::new(200).set_body_json(search_json(ids)))
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_search_leads_sends_params_and_keeps_search_order() {
        install_crypto_provider();
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/esearch.fcgi"))
            .and(query_param("db", "pubmed"))
            .and(query_param("term", "liver 3d"))
            .and(query_param("retmax", "5"))
            .and(query_param("retmode", "json"))
            .and(query_param("sort", "pub_date"))
            .respond_with(ResponseTemplate::new(200).set_body_json(search_json(&["202", "101"])))
            .expect(1)
            .mount(&server)
            .await;

        // Summary map lists the older article first
        Mock::given(method("GET"))
            .and(path("/esummary.fcgi"))
            .and(query_param("db", "pubmed"))
            .and(query_param("id", "202,101"))
            .respond_with(ResponseTemplate::new(200).set_body_json(summary_json(&[
                ("101", "Older liver study", "C D"),
                ("202", "Newer spheroid study", "E F"),
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let client = PubMedClient::new(&mock_config(&server, &["liver 3d"])).unwrap();
        let leads = client.search_leads("liver 3d").await.unwrap();

        let names: Vec<&str> = leads.iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, vec!["Dr. E F", "Dr. C D"]);
        assert_eq!(leads[0].recent_activity_note, "Published: Newer spheroid study...");
        assert!(leads.iter().all(|l| l.uses_relevant_technology));
    }

    #[tokio::test]
    async fn test_search_leads_caps_summary_batch() {
        install_crypto_provider();
        let server = MockServer::start().await;
        mount_search(&server, "hepatic", &["1", "2", "3"]).await;

        Mock::given(method("GET"))
            .and(path("/esummary.fcgi"))
            .and(query_param("id", "1,2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(summary_json(&[
                ("1", "First", "A B"),
                ("2", "Second", "G H"),
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let mut config = mock_config(&server, &["hepatic"]);
        config.summary_limit = 2;
        let client = PubMedClient::new(&config).unwrap();
        let leads = client.search_leads("hepatic").await.unwrap();
        assert_eq!(leads.len(), 2);
        assert!(leads.iter().all(|l| !l.uses_relevant_technology));
    }

    #[tokio::test]
    async fn test_search_leads_no_hits_skips_summary() {
        install_crypto_provider();
        let server = MockServer::start().await;
        mount_search(&server, "organ-on-chip", &[]).await;

        Mock::given(method("GET"))
            .and(path("/esummary.fcgi"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let client = PubMedClient::new(&mock_config(&server, &["organ-on-chip"])).unwrap();
        assert!(client.search_leads("organ-on-chip").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_collect_failed_query_does_not_stop_later_queries() {
        install_crypto_provider();
        let server = MockServer::start().await;

        // Server errors are retried before the query is given up
        Mock::given(method("GET"))
            .and(path("/esearch.fcgi"))
            .and(query_param("term", "hepatic"))
            .respond_with(ResponseTemplate::new(500).set_body_string("internal error"))
            .expect(3)
            .mount(&server)
            .await;
        mount_search(&server, "liver 3d", &["202", "101"]).await;
        Mock::given(method("GET"))
            .and(path("/esummary.fcgi"))
            .respond_with(ResponseTemplate::new(200).set_body_json(summary_json(&[
                ("101", "Older liver study", "C D"),
                ("202", "Newer spheroid study", "E F"),
            ])))
            .mount(&server)
            .await;

        let config = mock_config(&server, &["hepatic", "liver 3d"]);
        let source = LiteratureSource::new(&config).unwrap();
        let outcome = source.collect().await;

        let names: Vec<&str> = outcome.leads.iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, vec!["Dr. E F", "Dr. C D"]);
        assert_eq!(outcome.errors.len(), 1);
        assert!(matches!(
            outcome.errors[0],
            SourceError::Status { status: 500, .. }
        ));
        assert_eq!(
            outcome.errors[0].to_string(),
            "esearch 'hepatic': unexpected HTTP status 500"
        );
    }

    #[tokio::test]
    async fn test_client_error_is_not_retried() {
        install_crypto_provider();
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/esearch.fcgi"))
            .respond_with(ResponseTemplate::new(400).set_body_string("bad request"))
            .expect(1)
            .mount(&server)
            .await;

        let client = PubMedClient::new(&mock_config(&server, &["liver"])).unwrap();
        let err = client.search_leads("liver").await.unwrap_err();
        assert!(matches!(err, SourceError::Status { status: 400, .. }));
    }

    #[tokio::test]
    async fn test_rate_limit_is_retried() {
        install_crypto_provider();
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/esearch.fcgi"))
            .respond_with(ResponseTemplate::new(429))
            .up_to_n_times(1)
            .expect(1)
            .mount(&server)
            .await;
        mount_search(&server, "liver", &[]).await;

        let client = PubMedClient::new(&mock_config(&server, &["liver"])).unwrap();
        assert!(client.search_leads("liver").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_undecodable_search_body() {
        install_crypto_provider();
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/esearch.fcgi"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
            .expect(1)
            .mount(&server)
            .await;

        let client = PubMedClient::new(&mock_config(&server, &["liver"])).unwrap();
        let err = client.search_leads("liver").await.unwrap_err();
        assert!(matches!(err, SourceError::Decode { .. }));
    }
}
