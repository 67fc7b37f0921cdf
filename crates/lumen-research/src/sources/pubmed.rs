//! PubMed E-utilities client.
//!
//! Endpoints used:
//!   esearch:  https://eutils.ncbi.nlm.nih.gov/entrez/eutils/esearch.fcgi
//!   esummary: https://eutils.ncbi.nlm.nih.gov/entrez/eutils/esummary.fcgi
//!   efetch:   https://eutils.ncbi.nlm.nih.gov/entrez/eutils/efetch.fcgi

use std::collections::HashMap;

use async_trait::async_trait;
use lumen_common::SandboxClient as Client;
use quick_xml::events::Event;
use quick_xml::Reader;
use tracing::{debug, instrument, warn};

use crate::dates::parse_loose_date;
use crate::models::{ResearchPaper, Source};
use super::LiteratureSource;

const ESEARCH_URL:  &str = "https://eutils.ncbi.nlm.nih.gov/entrez/eutils/esearch.fcgi";
const ESUMMARY_URL: &str = "https://eutils.ncbi.nlm.nih.gov/entrez/eutils/esummary.fcgi";
const EFETCH_URL:   &str = "https://eutils.ncbi.nlm.nih.gov/entrez/eutils/efetch.fcgi";
const ARTICLE_URL:  &str = "https://pubmed.ncbi.nlm.nih.gov";

pub struct PubMedClient {
    client: Client,
    api_key: Option<String>,
}

impl PubMedClient {
    pub fn new(client: Client, api_key: Option<String>) -> Self {
        Self { client, api_key }
    }

    fn with_key(&self, mut params: Vec<(&'static str, String)>) -> Vec<(&'static str, String)> {
        if let Some(key) = &self.api_key {
            params.push(("api_key", key.clone()));
        }
        params
    }

    /// Search PubMed and return a list of PMIDs.
    #[instrument(skip(self))]
    pub async fn esearch(&self, query: &str, max: usize) -> anyhow::Result<Vec<String>> {
        let params = self.with_key(vec![
            ("db", "pubmed".to_string()),
            ("term", query.to_string()),
            ("retmax", max.to_string()),
            ("retmode", "json".to_string()),
        ]);

        let resp: serde_json::Value = self.client
            .get(ESEARCH_URL)?
            .query(&params)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let ids = resp["esearchresult"]["idlist"]
            .as_array()
            .map(|ids| ids.iter().filter_map(|v| v.as_str().map(String::from)).collect())
            .unwrap_or_default();

        debug!(?ids, "PubMed esearch returned PMIDs");
        Ok(ids)
    }

    /// Fetch summary metadata for a list of PMIDs.
    #[instrument(skip(self))]
    pub async fn esummary(&self, pmids: &[String]) -> anyhow::Result<Vec<ResearchPaper>> {
        if pmids.is_empty() {
            return Ok(vec![]);
        }
        let params = self.with_key(vec![
            ("db", "pubmed".to_string()),
            ("id", pmids.join(",")),
            ("retmode", "json".to_string()),
        ]);

        let resp: serde_json::Value = self.client
            .get(ESUMMARY_URL)?
            .query(&params)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(parse_esummary(&resp))
    }

    /// Fetch abstracts and keywords (efetch XML), keyed by PMID.
    #[instrument(skip(self))]
    pub async fn efetch_abstracts(&self, pmids: &[String]) -> anyhow::Result<HashMap<String, AbstractRecord>> {
        if pmids.is_empty() {
            return Ok(HashMap::new());
        }
        let params = self.with_key(vec![
            ("db", "pubmed".to_string()),
            ("id", pmids.join(",")),
            ("rettype", "abstract".to_string()),
            ("retmode", "xml".to_string()),
        ]);

        let xml = self.client
            .get(EFETCH_URL)?
            .query(&params)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        Ok(parse_pubmed_abstracts(&xml))
    }
}

#[async_trait]
impl LiteratureSource for PubMedClient {
    fn source(&self) -> Source {
        Source::PubMed
    }

    async fn search(&self, query: &str, max_results: usize) -> anyhow::Result<Vec<ResearchPaper>> {
        let pmids = self.esearch(query, max_results).await?;
        let mut papers = self.esummary(&pmids).await?;

        // Summaries alone are usable; abstracts are an enrichment.
        match self.efetch_abstracts(&pmids).await {
            Ok(mut abstracts) => {
                for paper in &mut papers {
                    if let Some(record) = abstracts.remove(&paper.id) {
                        paper.abstract_text = record.abstract_text;
                        paper.keywords = record.keywords;
                    }
                }
            }
            Err(e) => warn!(error = %e, "PubMed efetch failed, returning summaries without abstracts"),
        }

        Ok(papers)
    }
}

/// Map an esummary JSON document into papers, in `result.uids` order.
pub fn parse_esummary(resp: &serde_json::Value) -> Vec<ResearchPaper> {
    let result = &resp["result"];
    let uids = result["uids"].as_array().cloned().unwrap_or_default();

    uids.iter()
        .filter_map(|uid| uid.as_str())
        .filter_map(|uid| {
            let doc = &result[uid];
            if doc.is_null() || doc.get("error").is_some() {
                return None;
            }

            let mut paper = ResearchPaper::new(
                Source::PubMed,
                uid,
                doc["title"].as_str().unwrap_or("").trim(),
            );
            paper.pmid = Some(uid.to_string());
            paper.url = format!("{ARTICLE_URL}/{uid}/");
            paper.authors = doc["authors"]
                .as_array()
                .map(|authors| {
                    authors.iter()
                        .filter_map(|a| a["name"].as_str())
                        .map(String::from)
                        .collect()
                })
                .unwrap_or_default();
            paper.journal = doc["fulljournalname"]
                .as_str()
                .or_else(|| doc["source"].as_str())
                .unwrap_or("")
                .to_string();
            paper.published_date = doc["sortpubdate"]
                .as_str()
                .and_then(parse_loose_date)
                .or_else(|| doc["pubdate"].as_str().and_then(parse_loose_date));
            paper.doi = doc["articleids"]
                .as_array()
                .and_then(|ids| ids.iter().find(|id| id["idtype"].as_str() == Some("doi")))
                .and_then(|id| id["value"].as_str())
                .filter(|v| !v.is_empty())
                .map(String::from);

            Some(paper)
        })
        .collect()
}

/// Abstract text and author keywords for one PubMed article.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AbstractRecord {
    pub abstract_text: String,
    pub keywords: Vec<String>,
}

/// Parse PubMed efetch XML (abstract mode).
/// Handles the <PubmedArticleSet><PubmedArticle> structure; structured abstracts
/// with several <AbstractText> sections are joined.
pub fn parse_pubmed_abstracts(xml: &str) -> HashMap<String, AbstractRecord> {
    let mut records = HashMap::new();
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut pmid: Option<String> = None;
    let mut record = AbstractRecord::default();
    let mut in_pmid     = false;
    let mut in_abstract = false;
    let mut in_keyword  = false;
    let mut keyword     = String::new();
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => match e.name().as_ref() {
                b"PubmedArticle" => {
                    pmid = None;
                    record = AbstractRecord::default();
                }
                // Only the article's own PMID; later ones belong to cited references.
                b"PMID" if pmid.is_none() => in_pmid = true,
                b"AbstractText" => in_abstract = true,
                b"Keyword" => {
                    in_keyword = true;
                    keyword.clear();
                }
                _ => {}
            },
            Ok(Event::Text(ref e)) => {
                let text = e.unescape().unwrap_or_default();
                if in_pmid {
                    pmid = Some(text.to_string());
                }
                if in_abstract {
                    push_words(&mut record.abstract_text, &text);
                }
                if in_keyword {
                    push_words(&mut keyword, &text);
                }
            }
            Ok(Event::End(ref e)) => match e.name().as_ref() {
                b"PMID" => in_pmid = false,
                b"AbstractText" => in_abstract = false,
                b"Keyword" => {
                    in_keyword = false;
                    if !keyword.is_empty() {
                        record.keywords.push(std::mem::take(&mut keyword));
                    }
                }
                b"PubmedArticle" => {
                    if let Some(id) = pmid.take() {
                        records.insert(id, std::mem::take(&mut record));
                    }
                }
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => {
                warn!("XML parse error: {}", e);
                break;
            }
            _ => {}
        }
        buf.clear();
    }

    records
}

fn push_words(target: &mut String, text: &str) {
    if !target.is_empty() {
        target.push(' ');
    }
    target.push_str(text);
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_parse_esummary() {
        let resp = serde_json::json!({
            "result": {
                "uids": ["38000001", "38000002"],
                "38000001": {
                    "uid": "38000001",
                    "title": "Intraocular pressure and glaucoma progression.",
                    "authors": [{ "name": "Smith J" }, { "name": "Doe A" }],
                    "fulljournalname": "Ophthalmology",
                    "pubdate": "2023 Mar 15",
                    "sortpubdate": "2023/03/15 00:00",
                    "articleids": [
                        { "idtype": "pubmed", "value": "38000001" },
                        { "idtype": "doi", "value": "10.1016/j.ophtha.2023.01.001" }
                    ]
                },
                "38000002": {
                    "uid": "38000002",
                    "title": "Myopia control in children.",
                    "source": "Eye (Lond)",
                    "pubdate": "2022"
                }
            }
        });

        let papers = parse_esummary(&resp);
        assert_eq!(papers.len(), 2);
        assert_eq!(papers[0].pmid.as_deref(), Some("38000001"));
        assert_eq!(papers[0].doi.as_deref(), Some("10.1016/j.ophtha.2023.01.001"));
        assert_eq!(papers[0].authors, vec!["Smith J", "Doe A"]);
        assert_eq!(papers[0].published_date, NaiveDate::from_ymd_opt(2023, 3, 15));
        assert_eq!(papers[0].url, "https://pubmed.ncbi.nlm.nih.gov/38000001/");
        assert_eq!(papers[1].journal, "Eye (Lond)");
        assert_eq!(papers[1].doi, None);
        assert_eq!(papers[1].published_date, NaiveDate::from_ymd_opt(2022, 1, 1));
    }

    #[test]
    fn test_parse_esummary_skips_errors() {
        let resp = serde_json::json!({
            "result": { "uids": ["1"], "1": { "uid": "1", "error": "cannot get document summary" } }
        });
        assert!(parse_esummary(&resp).is_empty());
        assert!(parse_esummary(&serde_json::json!({})).is_empty());
    }

    #[test]
    fn test_parse_structured_abstract() {
        let xml = r#"<?xml version="1.0"?>
<PubmedArticleSet>
  <PubmedArticle>
    <MedlineCitation>
      <PMID>12345678</PMID>
      <Article>
        <ArticleTitle>Glaucoma screening with OCT</ArticleTitle>
        <Abstract>
          <AbstractText Label="BACKGROUND">Glaucoma is a leading cause of blindness.</AbstractText>
          <AbstractText Label="METHODS">We used <i>optical</i> coherence tomography.</AbstractText>
        </Abstract>
      </Article>
      <KeywordList><Keyword>glaucoma</Keyword><Keyword>OCT</Keyword></KeywordList>
      <CommentsCorrectionsList>
        <CommentsCorrections><PMID>999</PMID></CommentsCorrections>
      </CommentsCorrectionsList>
    </MedlineCitation>
  </PubmedArticle>
</PubmedArticleSet>"#;

        let records = parse_pubmed_abstracts(xml);
        assert_eq!(records.len(), 1);
        let r = &records["12345678"];
        assert_eq!(
            r.abstract_text,
            "Glaucoma is a leading cause of blindness. We used optical coherence tomography."
        );
        assert_eq!(r.keywords, vec!["glaucoma", "OCT"]);
    }

    #[test]
    fn test_parse_abstracts_malformed_is_empty() {
        assert!(parse_pubmed_abstracts("<PubmedArticleSet><PubmedArticle>").is_empty());
    }
}
