//! EFetch XML parsing and per-article extraction
//!
//! The parser streams over a `PubmedArticleSet` with quick-xml events and
//! collects, per `<PubmedArticle>`, only the elements needed to build a
//! [`PaperRecord`]: the first `PMID`, the first `ArticleTitle`, the first
//! `PubDate`/`ArticleDate`/`DateCompleted`, and the authors of the first
//! `AuthorList` with all of their `Affiliation` texts.
//!
//! Inline markup inside captured elements (`<i>`, `<sup>`, ...) is flattened
//! into the surrounding text.

use std::collections::BTreeSet;
use std::sync::OnceLock;

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use regex::Regex;
use tracing::{debug, instrument, warn};

use crate::affiliation::is_company_affiliation;
use crate::error::{PubMedError, Result};
use crate::pubmed::models::{NOT_AVAILABLE, PaperRecord};

/// Parse every `<PubmedArticle>` of an EFetch response into a [`PaperRecord`]
///
/// Articles that fail extraction (e.g. no `PMID`) are logged and skipped.
/// A document that is not well-formed XML fails as a whole.
///
/// # Example
///
/// ```
/// use pubmed_paper_fetcher::pubmed::parse_paper_records;
///
/// let xml = r#"<PubmedArticleSet>
///   <PubmedArticle>
///     <MedlineCitation>
///       <PMID Version="1">12345678</PMID>
///       <Article>
///         <ArticleTitle>Example</ArticleTitle>
///         <AuthorList>
///           <Author>
///             <LastName>Doe</LastName>
///             <ForeName>Jane</ForeName>
///             <AffiliationInfo><Affiliation>Pfizer Inc., New York</Affiliation></AffiliationInfo>
///           </Author>
///         </AuthorList>
///       </Article>
///     </MedlineCitation>
///   </PubmedArticle>
/// </PubmedArticleSet>"#;
///
/// let papers = parse_paper_records(xml)?;
/// assert_eq!(papers[0].non_academic_authors, vec!["Jane Doe"]);
/// # Ok::<(), pubmed_paper_fetcher::PubMedError>(())
/// ```
#[instrument(skip(xml), fields(xml_size = xml.len()))]
pub fn parse_paper_records(xml: &str) -> Result<Vec<PaperRecord>> {
    let articles = read_articles(xml)?;
    let total = articles.len();

    let papers: Vec<PaperRecord> = articles
        .into_iter()
        .enumerate()
        .filter_map(|(index, article)| match article.into_paper_record() {
            Ok(paper) => Some(paper),
            Err(e) => {
                warn!(index, error = %e, "Failed to extract article, skipping");
                None
            }
        })
        .collect();

    debug!(total, parsed = papers.len(), "Parsed EFetch document");
    Ok(papers)
}

/// Email pattern scanned across affiliation texts
fn email_regex() -> &'static Regex {
    static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
    EMAIL_REGEX.get_or_init(|| {
        Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b")
            .expect("Failed to compile email regex")
    })
}

/// Left-pad a date component with zeros to width 2; longer values are kept as-is
fn zero_pad(component: &str) -> String {
    format!("{:0>2}", component)
}

#[derive(Debug, Default)]
struct DateParts {
    year: Option<String>,
    month: Option<String>,
    day: Option<String>,
}

impl DateParts {
    /// `YYYY[-MM[-DD]]`, or `None` when no component is present
    fn format(&self) -> Option<String> {
        let mut parts = Vec::with_capacity(3);
        if let Some(year) = &self.year {
            parts.push(year.clone());
        }
        if let Some(month) = &self.month {
            parts.push(zero_pad(month));
        }
        if let Some(day) = &self.day {
            parts.push(zero_pad(day));
        }

        if parts.is_empty() {
            None
        } else {
            Some(parts.join("-"))
        }
    }
}

#[derive(Debug, Default)]
struct AuthorXml {
    last_name: Option<String>,
    fore_name: Option<String>,
    affiliations: Vec<String>,
}

impl AuthorXml {
    /// "Fore Last", "Last", or nothing when the last name is missing
    fn display_name(&self) -> Option<String> {
        let last = self.last_name.as_deref()?;
        match self.fore_name.as_deref() {
            Some(fore) => Some(format!("{} {}", fore, last)),
            None => Some(last.to_string()),
        }
    }
}

#[derive(Debug, Default)]
struct ArticleXml {
    pmid: Option<String>,
    title: Option<String>,
    pub_date: Option<DateParts>,
    article_date: Option<DateParts>,
    date_completed: Option<DateParts>,
    author_list_seen: bool,
    authors: Vec<AuthorXml>,
}

impl ArticleXml {
    fn into_paper_record(self) -> Result<PaperRecord> {
        let pubmed_id = self
            .pmid
            .ok_or(PubMedError::MissingField { field: "PMID" })?;

        let title = self.title.unwrap_or_else(|| NOT_AVAILABLE.to_string());

        let publication_date = [&self.pub_date, &self.article_date, &self.date_completed]
            .into_iter()
            .flatten()
            .find_map(DateParts::format)
            .unwrap_or_else(|| NOT_AVAILABLE.to_string());

        let mut non_academic_authors = Vec::new();
        let mut company_affiliations = BTreeSet::new();

        for author in &self.authors {
            let Some(name) = author.display_name() else {
                continue;
            };

            let mut is_non_academic = false;
            for affiliation in &author.affiliations {
                if is_company_affiliation(affiliation) {
                    is_non_academic = true;
                    company_affiliations.insert(affiliation.clone());
                }
            }

            if is_non_academic {
                non_academic_authors.push(name);
            }
        }

        // Unnamed authors still contribute to the email scan
        let corresponding_author_email = self
            .authors
            .iter()
            .flat_map(|author| author.affiliations.iter())
            .find_map(|affiliation| email_regex().find(affiliation))
            .map(|m| m.as_str().to_string())
            .unwrap_or_else(|| NOT_AVAILABLE.to_string());

        Ok(PaperRecord {
            pubmed_id,
            title,
            publication_date,
            non_academic_authors,
            company_affiliations,
            corresponding_author_email,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DateKind {
    Published,
    Article,
    Completed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DatePart {
    Year,
    Month,
    Day,
}

/// Element whose text is currently being collected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Target {
    Pmid,
    Title,
    Date(DateKind, DatePart),
    LastName,
    ForeName,
    Affiliation,
}

#[derive(Debug)]
struct Capture {
    target: Target,
    depth: usize,
    text: String,
}

/// Streaming state for one EFetch document
#[derive(Default)]
struct ArticleSetReader {
    depth: usize,
    articles: Vec<ArticleXml>,
    article: Option<(ArticleXml, usize)>,
    date: Option<(DateKind, usize)>,
    author_list_depth: Option<usize>,
    author: Option<(AuthorXml, usize)>,
    capture: Option<Capture>,
}

fn read_articles(xml: &str) -> Result<Vec<ArticleXml>> {
    let mut reader = Reader::from_str(xml);
    let mut state = ArticleSetReader::default();

    loop {
        match reader.read_event()? {
            Event::Start(ref e) => {
                state.depth += 1;
                state.open(e);
            }
            Event::Empty(ref e) => {
                state.depth += 1;
                state.open(e);
                state.close(e.name().as_ref());
                state.depth -= 1;
            }
            Event::End(ref e) => {
                if state.depth == 0 {
                    return Err(PubMedError::XmlError(
                        "Unexpected closing tag at document root".to_string(),
                    ));
                }
                state.close(e.name().as_ref());
                state.depth -= 1;
            }
            Event::Text(ref e) => {
                if let Some(capture) = state.capture.as_mut() {
                    capture.text.push_str(&e.unescape()?);
                }
            }
            Event::CData(ref e) => {
                if let Some(capture) = state.capture.as_mut() {
                    capture.text.push_str(&String::from_utf8_lossy(e));
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if state.depth != 0 {
        return Err(PubMedError::XmlError(
            "Unexpected end of document inside an open element".to_string(),
        ));
    }

    Ok(state.articles)
}

impl ArticleSetReader {
    fn open(&mut self, e: &BytesStart) {
        let depth = self.depth;
        let name = e.name();
        let name = name.as_ref();

        if name == b"PubmedArticle" && self.article.is_none() {
            self.article = Some((ArticleXml::default(), depth));
            return;
        }

        let Some((article, _)) = self.article.as_mut() else {
            return;
        };

        if self.capture.is_some() {
            return;
        }

        let target = match name {
            b"PMID" if article.pmid.is_none() => Some(Target::Pmid),
            b"ArticleTitle" if article.title.is_none() => Some(Target::Title),
            b"PubDate" | b"ArticleDate" | b"DateCompleted" if self.date.is_none() => {
                let (kind, slot) = match name {
                    b"PubDate" => (DateKind::Published, &mut article.pub_date),
                    b"ArticleDate" => (DateKind::Article, &mut article.article_date),
                    _ => (DateKind::Completed, &mut article.date_completed),
                };
                if slot.is_none() {
                    *slot = Some(DateParts::default());
                    self.date = Some((kind, depth));
                }
                None
            }
            b"Year" | b"Month" | b"Day" => match self.date {
                Some((kind, date_depth)) if depth == date_depth + 1 => {
                    let part = match name {
                        b"Year" => DatePart::Year,
                        b"Month" => DatePart::Month,
                        _ => DatePart::Day,
                    };
                    Some(Target::Date(kind, part))
                }
                _ => None,
            },
            b"AuthorList" if !article.author_list_seen => {
                article.author_list_seen = true;
                self.author_list_depth = Some(depth);
                None
            }
            b"Author" if self.author_list_depth == Some(depth - 1) => {
                self.author = Some((AuthorXml::default(), depth));
                None
            }
            b"LastName" | b"ForeName" => match self.author {
                Some((_, author_depth)) if depth == author_depth + 1 => {
                    if name == b"LastName" {
                        Some(Target::LastName)
                    } else {
                        Some(Target::ForeName)
                    }
                }
                _ => None,
            },
            b"Affiliation" if self.author.is_some() => Some(Target::Affiliation),
            _ => None,
        };

        if let Some(target) = target {
            self.capture = Some(Capture {
                target,
                depth,
                text: String::new(),
            });
        }
    }

    fn close(&mut self, name: &[u8]) {
        let depth = self.depth;

        if self
            .capture
            .as_ref()
            .is_some_and(|capture| capture.depth == depth)
        {
            if let Some(capture) = self.capture.take() {
                self.finish_capture(capture);
            }
            return;
        }

        if self.date.is_some_and(|(_, date_depth)| date_depth == depth) {
            self.date = None;
        }

        if self.author_list_depth == Some(depth) {
            self.author_list_depth = None;
        }

        if self
            .author
            .as_ref()
            .is_some_and(|(_, author_depth)| *author_depth == depth)
        {
            if let (Some((author, _)), Some((article, _))) =
                (self.author.take(), self.article.as_mut())
            {
                article.authors.push(author);
            }
        }

        if name == b"PubmedArticle"
            && self
                .article
                .as_ref()
                .is_some_and(|(_, article_depth)| *article_depth == depth)
        {
            if let Some((article, _)) = self.article.take() {
                self.articles.push(article);
            }
            self.date = None;
            self.author_list_depth = None;
            self.author = None;
        }
    }

    fn finish_capture(&mut self, capture: Capture) {
        let Some((article, _)) = self.article.as_mut() else {
            return;
        };

        let text = capture.text.trim();
        let value = (!text.is_empty()).then(|| text.to_string());

        match capture.target {
            Target::Pmid => article.pmid = value,
            Target::Title => article.title = value,
            Target::Date(kind, part) => {
                let slot = match kind {
                    DateKind::Published => article.pub_date.as_mut(),
                    DateKind::Article => article.article_date.as_mut(),
                    DateKind::Completed => article.date_completed.as_mut(),
                };
                if let Some(date) = slot {
                    let field = match part {
                        DatePart::Year => &mut date.year,
                        DatePart::Month => &mut date.month,
                        DatePart::Day => &mut date.day,
                    };
                    if field.is_none() {
                        *field = value;
                    }
                }
            }
            Target::LastName | Target::ForeName | Target::Affiliation => {
                let Some((author, _)) = self.author.as_mut() else {
                    return;
                };
                match capture.target {
                    Target::LastName if author.last_name.is_none() => author.last_name = value,
                    Target::ForeName if author.fore_name.is_none() => author.fore_name = value,
                    Target::Affiliation => author.affiliations.extend(value),
                    _ => {}
                }
            }
        }
    }
}
