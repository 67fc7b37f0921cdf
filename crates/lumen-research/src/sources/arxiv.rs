//! arXiv export API client.
//!
//! Endpoint: http://export.arxiv.org/api/query
//! Responses are Atom feeds; each <entry> is one preprint.

use async_trait::async_trait;
use lumen_common::{LumenError, SandboxClient as Client};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use tracing::{debug, instrument, warn};

use crate::dates::parse_loose_date;
use crate::models::{ResearchPaper, Source};
use super::LiteratureSource;

const ARXIV_QUERY_URL: &str = "http://export.arxiv.org/api/query";

pub struct ArxivClient {
    client: Client,
}

impl ArxivClient {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl LiteratureSource for ArxivClient {
    fn source(&self) -> Source {
        Source::Arxiv
    }

    #[instrument(skip(self))]
    async fn search(&self, query: &str, max_results: usize) -> anyhow::Result<Vec<ResearchPaper>> {
        let search_query = search_query(query);
        let max = max_results.to_string();

        let xml = self.client
            .get(ARXIV_QUERY_URL)?
            .query(&[
                ("search_query", search_query.as_str()),
                ("start", "0"),
                ("max_results", max.as_str()),
            ])
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        let papers = parse_arxiv_atom(&xml)?;
        debug!(count = papers.len(), "arXiv search returned entries");
        Ok(papers)
    }
}

#[derive(Clone, Copy, PartialEq)]
enum Field {
    None,
    Id,
    Title,
    Summary,
    Published,
    AuthorName,
    Doi,
    JournalRef,
}

/// `all:` scopes a single term, so every word gets its own prefix.
/// `retinal vessel` → `all:retinal AND all:vessel`
fn search_query(query: &str) -> String {
    query
        .split_whitespace()
        .map(|term| format!("all:{term}"))
        .collect::<Vec<_>>()
        .join(" AND ")
}

/// Parse an arXiv Atom feed. Feed-level <title>/<id> are ignored; only <entry> content is read.
/// Malformed XML, or a feed that ends inside an <entry>, is an error.
pub fn parse_arxiv_atom(xml: &str) -> Result<Vec<ResearchPaper>, LumenError> {
    let mut papers = Vec::new();
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut current: Option<ResearchPaper> = None;
    let mut field = Field::None;
    let mut in_author = false;
    let mut text = String::new();
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => {
                let name = e.local_name();
                match name.as_ref() {
                    b"entry" => {
                        current = Some(ResearchPaper::new(Source::Arxiv, "", ""));
                        field = Field::None;
                    }
                    b"author" => in_author = true,
                    _ if current.is_some() => {
                        field = match name.as_ref() {
                            b"id"          => Field::Id,
                            b"title"       => Field::Title,
                            b"summary"     => Field::Summary,
                            b"published"   => Field::Published,
                            b"name" if in_author => Field::AuthorName,
                            b"doi"         => Field::Doi,
                            b"journal_ref" => Field::JournalRef,
                            _              => Field::None,
                        };
                        text.clear();
                    }
                    _ => {}
                }
            }
            Ok(Event::Empty(ref e)) => {
                if let Some(ref mut p) = current {
                    apply_empty_element(p, e);
                }
            }
            Ok(Event::Text(ref e)) => {
                if field != Field::None {
                    if !text.is_empty() {
                        text.push(' ');
                    }
                    text.push_str(&e.unescape().unwrap_or_default());
                }
            }
            Ok(Event::End(ref e)) => {
                let name = e.local_name();
                match name.as_ref() {
                    b"author" => in_author = false,
                    b"entry" => {
                        if let Some(p) = current.take() {
                            if p.title.is_empty() {
                                warn!("Skipping arXiv entry with empty title");
                            } else {
                                papers.push(p);
                            }
                        }
                    }
                    _ => {
                        if let Some(ref mut p) = current {
                            apply_field(p, field, &collapse_whitespace(&text));
                        }
                        field = Field::None;
                        text.clear();
                    }
                }
            }
            Ok(Event::Eof) => {
                if current.is_some() {
                    return Err(LumenError::Xml("arXiv feed ended inside an <entry>".to_string()));
                }
                break;
            }
            Err(e) => {
                return Err(LumenError::Xml(format!(
                    "arXiv feed at byte {}: {e}",
                    reader.buffer_position()
                )));
            }
            _ => {}
        }
        buf.clear();
    }

    Ok(papers)
}

fn apply_field(p: &mut ResearchPaper, field: Field, value: &str) {
    if value.is_empty() {
        return;
    }
    match field {
        Field::Id => {
            p.id = arxiv_id_from_url(value);
            if p.url.is_empty() {
                p.url = value.to_string();
            }
        }
        Field::Title      => p.title = value.to_string(),
        Field::Summary    => p.abstract_text = value.to_string(),
        Field::Published  => p.published_date = parse_loose_date(value),
        Field::AuthorName => p.authors.push(value.to_string()),
        Field::Doi        => p.doi = Some(value.to_string()),
        Field::JournalRef => p.journal = value.to_string(),
        Field::None       => {}
    }
}

/// `<link rel="alternate" href=".."/>` and `<category term=".."/>` carry data in attributes.
fn apply_empty_element(p: &mut ResearchPaper, e: &BytesStart) {
    match e.local_name().as_ref() {
        b"link" => {
            let rel = attr(e, b"rel");
            if rel.as_deref() == Some("alternate") {
                if let Some(href) = attr(e, b"href") {
                    p.url = href;
                }
            }
        }
        b"category" => {
            if let Some(term) = attr(e, b"term") {
                if !p.keywords.contains(&term) {
                    p.keywords.push(term);
                }
            }
        }
        _ => {}
    }
}

fn attr(e: &BytesStart, key: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|a| a.key.local_name().as_ref() == key)
        .and_then(|a| a.unescape_value().ok().map(|v| v.to_string()))
}

/// `http://arxiv.org/abs/2401.01234v2` → `2401.01234`
fn arxiv_id_from_url(url: &str) -> String {
    let id = url.rsplit_once("/abs/").map(|(_, id)| id).unwrap_or(url);
    match id.rfind('v') {
        Some(pos) if pos > 0 && id[pos + 1..].chars().all(|c| c.is_ascii_digit()) && pos + 1 < id.len() => {
            id[..pos].to_string()
        }
        _ => id.to_string(),
    }
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    const FEED: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<feed xmlns="http://www.w3.org/2005/Atom" xmlns:arxiv="http://arxiv.org/schemas/atom">
  <title type="html">ArXiv Query: search_query=all:retina</title>
  <id>http://arxiv.org/api/abc</id>
  <entry>
    <id>http://arxiv.org/abs/2401.01234v2</id>
    <published>2024-01-03T18:00:00Z</published>
    <title>Self-supervised
      retinal vessel segmentation</title>
    <summary>  We propose a method
      for fundus images.  </summary>
    <author><name>Grace Hopper</name></author>
    <author><name>Alan Turing</name><arxiv:affiliation>Bletchley</arxiv:affiliation></author>
    <arxiv:doi>10.1000/arxiv.test</arxiv:doi>
    <link href="http://arxiv.org/abs/2401.01234v2" rel="alternate" type="text/html"/>
    <link title="pdf" href="http://arxiv.org/pdf/2401.01234v2" rel="related" type="application/pdf"/>
    <arxiv:primary_category term="eess.IV" scheme="http://arxiv.org/schemas/atom"/>
    <category term="eess.IV" scheme="http://arxiv.org/schemas/atom"/>
    <category term="cs.CV" scheme="http://arxiv.org/schemas/atom"/>
  </entry>
  <entry>
    <id>http://arxiv.org/abs/cond-mat/0102536v1</id>
    <published>2001-02-28T20:12:09Z</published>
    <title>Older preprint</title>
    <summary>Short.</summary>
  </entry>
</feed>"#;

    #[test]
    fn test_parse_arxiv_feed() {
        let papers = parse_arxiv_atom(FEED).unwrap();
        assert_eq!(papers.len(), 2);

        let p = &papers[0];
        assert_eq!(p.id, "2401.01234");
        assert_eq!(p.title, "Self-supervised retinal vessel segmentation");
        assert_eq!(p.abstract_text, "We propose a method for fundus images.");
        assert_eq!(p.authors, vec!["Grace Hopper", "Alan Turing"]);
        assert_eq!(p.doi.as_deref(), Some("10.1000/arxiv.test"));
        assert_eq!(p.url, "http://arxiv.org/abs/2401.01234v2");
        assert_eq!(p.keywords, vec!["eess.IV", "cs.CV"]);
        assert_eq!(p.published_date, NaiveDate::from_ymd_opt(2024, 1, 3));

        assert_eq!(papers[1].id, "cond-mat/0102536");
        assert_eq!(papers[1].url, "http://arxiv.org/abs/cond-mat/0102536v1");
    }

    #[test]
    fn test_empty_feed() {
        let xml = r#"<feed xmlns="http://www.w3.org/2005/Atom"><title>none</title></feed>"#;
        assert!(parse_arxiv_atom(xml).unwrap().is_empty());
    }

    #[test]
    fn test_truncated_feed_is_error() {
        let cut = &FEED[..FEED.find("<author>").unwrap()];
        assert!(matches!(parse_arxiv_atom(cut), Err(LumenError::Xml(_))));
    }

    #[test]
    fn test_mismatched_tags_are_error() {
        let xml = r#"<feed><entry><title>Retina</summary></entry></feed>"#;
        assert!(matches!(parse_arxiv_atom(xml), Err(LumenError::Xml(_))));
    }

    #[test]
    fn test_every_term_scoped() {
        assert_eq!(search_query("  retinal   vessel segmentation "), "all:retinal AND all:vessel AND all:segmentation");
        assert_eq!(search_query("glaucoma"), "all:glaucoma");
    }

    #[test]
    fn test_arxiv_id_from_url() {
        assert_eq!(arxiv_id_from_url("http://arxiv.org/abs/2401.01234v12"), "2401.01234");
        assert_eq!(arxiv_id_from_url("http://arxiv.org/abs/2401.01234"), "2401.01234");
        assert_eq!(arxiv_id_from_url("http://arxiv.org/abs/solv-int/9901001v1"), "solv-int/9901001");
    }
}
