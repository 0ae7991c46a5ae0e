//! PubMed XML parser using quick-xml
//!
//! Pull parser over a whole `PubmedArticleSet` document. Only the fields the
//! reports need are extracted; every other subtree is skipped unread.
//!
//! A file is all-or-nothing: a syntax error, a missing root element, or end
//! of input inside an open element fails the whole document.

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use pmscan_core::ScanError;

/// One `<PubmedArticle>` record
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PubmedArticle {
    pub pmid: Option<String>,
    pub title: Option<String>,
    pub journal_title: Option<String>,
    pub pub_date: PubDate,
    pub abstract_text: Option<String>,
    pub authors: Vec<Author>,
    /// From `ELocationID EIdType="doi"`
    pub doi: Option<String>,
    /// `None` when the record has no `ArticleIdList`
    pub article_ids: Option<Vec<ArticleId>>,
}

/// Journal issue publication date, kept as written
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PubDate {
    pub year: Option<String>,
    pub month: Option<String>,
    pub day: Option<String>,
    pub medline_date: Option<String>,
}

impl PubDate {
    /// `Year-Month-Day` from the parts present, else the `MedlineDate`.
    pub fn display(&self) -> Option<String> {
        let parts: Vec<&str> = [&self.year, &self.month, &self.day]
            .into_iter()
            .filter_map(|p| p.as_deref())
            .filter(|p| !p.is_empty())
            .collect();
        if !parts.is_empty() {
            Some(parts.join("-"))
        } else {
            self.medline_date.clone().filter(|d| !d.is_empty())
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Author {
    pub last_name: Option<String>,
    pub fore_name: Option<String>,
    pub initials: Option<String>,
    pub collective_name: Option<String>,
}

impl Author {
    /// `Last, Fore`, or whichever part exists, or the collective name.
    pub fn display(&self) -> Option<String> {
        let last = self.last_name.as_deref().filter(|s| !s.is_empty());
        let fore = self.fore_name.as_deref().filter(|s| !s.is_empty());
        match (last, fore) {
            (Some(l), Some(f)) => Some(format!("{l}, {f}")),
            (Some(l), None) => Some(l.to_string()),
            (None, Some(f)) => Some(f.to_string()),
            (None, None) => self.collective_name.clone().filter(|c| !c.is_empty()),
        }
    }
}

/// One `<ArticleId IdType="...">` entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleId {
    pub id_type: String,
    pub value: Option<String>,
}

/// Parse all `<PubmedArticle>` records from XML content, in document order.
pub fn parse_pubmed_xml(xml: &str) -> Result<Vec<PubmedArticle>, ScanError> {
    let mut articles = Vec::new();
    walk_articles(xml, |reader, empty| {
        if empty {
            articles.push(PubmedArticle::default());
        } else {
            articles.push(parse_article(reader)?);
        }
        Ok(())
    })?;
    Ok(articles)
}

/// Count `<PubmedArticle>` records without extracting fields.
pub fn count_articles(xml: &str) -> Result<usize, ScanError> {
    let mut count = 0;
    walk_articles(xml, |reader, empty| {
        if !empty {
            skip_element(reader, b"PubmedArticle")?;
        }
        count += 1;
        Ok(())
    })?;
    Ok(count)
}

/// Drive the reader over the whole document, handing every `<PubmedArticle>`
/// to `on_article` (with the reader positioned just inside it).
///
/// Tracks the open element stack outside articles so truncated or rootless
/// documents are reported instead of silently yielding partial results.
fn walk_articles(
    xml: &str,
    mut on_article: impl FnMut(&mut Reader<&[u8]>, bool) -> Result<(), ScanError>,
) -> Result<(), ScanError> {
    let mut reader = Reader::from_str(xml);
    let mut buf = Vec::new();
    let mut open: Vec<Vec<u8>> = Vec::new();
    let mut seen_root = false;

    loop {
        match next_event(&mut reader, &mut buf)? {
            Event::Start(e) => {
                if open.is_empty() && seen_root {
                    return Err(junk_after_root(&reader));
                }
                seen_root = true;
                if e.name().as_ref() == b"PubmedArticle" {
                    on_article(&mut reader, false)?;
                } else {
                    open.push(e.name().as_ref().to_vec());
                }
            }
            Event::Empty(e) => {
                if open.is_empty() && seen_root {
                    return Err(junk_after_root(&reader));
                }
                seen_root = true;
                if e.name().as_ref() == b"PubmedArticle" {
                    on_article(&mut reader, true)?;
                }
            }
            Event::End(_) => {
                open.pop();
            }
            Event::Text(e) if open.is_empty() => {
                if e.iter().any(|b| !b.is_ascii_whitespace()) {
                    return Err(text_outside_root(&reader, seen_root));
                }
            }
            Event::CData(_) if open.is_empty() => {
                return Err(text_outside_root(&reader, seen_root));
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    if let Some(name) = open.last() {
        return Err(truncated(name));
    }
    if !seen_root {
        return Err(ScanError::Empty);
    }
    Ok(())
}

fn parse_article(reader: &mut Reader<&[u8]>) -> Result<PubmedArticle, ScanError> {
    let mut article = PubmedArticle::default();
    let mut buf = Vec::new();

    loop {
        match next_event(reader, &mut buf)? {
            Event::Start(e) => match e.name().as_ref() {
                b"MedlineCitation" => parse_medline_citation(reader, &mut article)?,
                b"PubmedData" => parse_pubmed_data(reader, &mut article)?,
                other => skip_element(reader, other)?,
            },
            Event::End(e) if e.name().as_ref() == b"PubmedArticle" => break,
            Event::Eof => return Err(truncated(b"PubmedArticle")),
            _ => {}
        }
        buf.clear();
    }

    Ok(article)
}

fn parse_medline_citation(
    reader: &mut Reader<&[u8]>,
    article: &mut PubmedArticle,
) -> Result<(), ScanError> {
    let mut buf = Vec::new();

    loop {
        match next_event(reader, &mut buf)? {
            Event::Start(e) => match e.name().as_ref() {
                b"PMID" => {
                    let pmid = read_text(reader, b"PMID")?;
                    if article.pmid.is_none() {
                        article.pmid = non_empty(pmid);
                    }
                }
                b"Article" => parse_article_element(reader, article)?,
                other => skip_element(reader, other)?,
            },
            Event::End(e) if e.name().as_ref() == b"MedlineCitation" => break,
            Event::Eof => return Err(truncated(b"MedlineCitation")),
            _ => {}
        }
        buf.clear();
    }

    Ok(())
}

fn parse_article_element(
    reader: &mut Reader<&[u8]>,
    article: &mut PubmedArticle,
) -> Result<(), ScanError> {
    let mut buf = Vec::new();

    loop {
        match next_event(reader, &mut buf)? {
            Event::Start(e) => match e.name().as_ref() {
                b"Journal" => parse_journal(reader, article)?,
                b"ArticleTitle" => article.title = non_empty(read_text(reader, b"ArticleTitle")?),
                b"Abstract" => article.abstract_text = parse_abstract(reader)?,
                b"AuthorList" => article.authors = parse_author_list(reader)?,
                b"ELocationID" => {
                    let is_doi = attr(&e, b"EIdType").as_deref() == Some("doi");
                    let value = read_text(reader, b"ELocationID")?;
                    if is_doi && article.doi.is_none() {
                        article.doi = non_empty(value);
                    }
                }
                other => skip_element(reader, other)?,
            },
            Event::End(e) if e.name().as_ref() == b"Article" => break,
            Event::Eof => return Err(truncated(b"Article")),
            _ => {}
        }
        buf.clear();
    }

    Ok(())
}

fn parse_journal(reader: &mut Reader<&[u8]>, article: &mut PubmedArticle) -> Result<(), ScanError> {
    let mut buf = Vec::new();

    loop {
        match next_event(reader, &mut buf)? {
            Event::Start(e) => match e.name().as_ref() {
                b"Title" => article.journal_title = non_empty(read_text(reader, b"Title")?),
                b"JournalIssue" => parse_journal_issue(reader, article)?,
                other => skip_element(reader, other)?,
            },
            Event::End(e) if e.name().as_ref() == b"Journal" => break,
            Event::Eof => return Err(truncated(b"Journal")),
            _ => {}
        }
        buf.clear();
    }

    Ok(())
}

fn parse_journal_issue(
    reader: &mut Reader<&[u8]>,
    article: &mut PubmedArticle,
) -> Result<(), ScanError> {
    let mut buf = Vec::new();

    loop {
        match next_event(reader, &mut buf)? {
            Event::Start(e) => match e.name().as_ref() {
                b"PubDate" => article.pub_date = parse_pub_date(reader)?,
                other => skip_element(reader, other)?,
            },
            Event::End(e) if e.name().as_ref() == b"JournalIssue" => break,
            Event::Eof => return Err(truncated(b"JournalIssue")),
            _ => {}
        }
        buf.clear();
    }

    Ok(())
}

fn parse_pub_date(reader: &mut Reader<&[u8]>) -> Result<PubDate, ScanError> {
    let mut date = PubDate::default();
    let mut buf = Vec::new();

    loop {
        match next_event(reader, &mut buf)? {
            Event::Start(e) => match e.name().as_ref() {
                b"Year" => date.year = non_empty(read_text(reader, b"Year")?),
                b"Month" => date.month = non_empty(read_text(reader, b"Month")?),
                b"Day" => date.day = non_empty(read_text(reader, b"Day")?),
                b"MedlineDate" => date.medline_date = non_empty(read_text(reader, b"MedlineDate")?),
                other => skip_element(reader, other)?,
            },
            Event::End(e) if e.name().as_ref() == b"PubDate" => break,
            Event::Eof => return Err(truncated(b"PubDate")),
            _ => {}
        }
        buf.clear();
    }

    Ok(date)
}

/// Structured abstracts: sections joined with a single space
fn parse_abstract(reader: &mut Reader<&[u8]>) -> Result<Option<String>, ScanError> {
    let mut buf = Vec::new();
    let mut text_parts = Vec::new();

    loop {
        match next_event(reader, &mut buf)? {
            Event::Start(e) => match e.name().as_ref() {
                b"AbstractText" => {
                    let part = read_text(reader, b"AbstractText")?;
                    if !part.is_empty() {
                        text_parts.push(part);
                    }
                }
                other => skip_element(reader, other)?,
            },
            Event::End(e) if e.name().as_ref() == b"Abstract" => break,
            Event::Eof => return Err(truncated(b"Abstract")),
            _ => {}
        }
        buf.clear();
    }

    Ok(non_empty(text_parts.join(" ")))
}

fn parse_author_list(reader: &mut Reader<&[u8]>) -> Result<Vec<Author>, ScanError> {
    let mut authors = Vec::new();
    let mut buf = Vec::new();

    loop {
        match next_event(reader, &mut buf)? {
            Event::Start(e) => match e.name().as_ref() {
                b"Author" => authors.push(parse_author(reader)?),
                other => skip_element(reader, other)?,
            },
            Event::End(e) if e.name().as_ref() == b"AuthorList" => break,
            Event::Eof => return Err(truncated(b"AuthorList")),
            _ => {}
        }
        buf.clear();
    }

    Ok(authors)
}

fn parse_author(reader: &mut Reader<&[u8]>) -> Result<Author, ScanError> {
    let mut author = Author::default();
    let mut buf = Vec::new();

    loop {
        match next_event(reader, &mut buf)? {
            Event::Start(e) => match e.name().as_ref() {
                b"LastName" => author.last_name = non_empty(read_text(reader, b"LastName")?),
                b"ForeName" => author.fore_name = non_empty(read_text(reader, b"ForeName")?),
                b"Initials" => author.initials = non_empty(read_text(reader, b"Initials")?),
                b"CollectiveName" => {
                    author.collective_name = non_empty(read_text(reader, b"CollectiveName")?)
                }
                other => skip_element(reader, other)?,
            },
            Event::End(e) if e.name().as_ref() == b"Author" => break,
            Event::Eof => return Err(truncated(b"Author")),
            _ => {}
        }
        buf.clear();
    }

    Ok(author)
}

fn parse_pubmed_data(
    reader: &mut Reader<&[u8]>,
    article: &mut PubmedArticle,
) -> Result<(), ScanError> {
    let mut buf = Vec::new();

    loop {
        match next_event(reader, &mut buf)? {
            // Only the article's own list; later lists (e.g. inside
            // ReferenceList) belong to cited works
            Event::Start(e) if e.name().as_ref() == b"ArticleIdList" => {
                if article.article_ids.is_none() {
                    article.article_ids = Some(parse_article_id_list(reader)?);
                } else {
                    skip_element(reader, b"ArticleIdList")?;
                }
            }
            Event::Empty(e) if e.name().as_ref() == b"ArticleIdList" => {
                article.article_ids.get_or_insert_with(Vec::new);
            }
            Event::Start(e) => skip_element(reader, e.name().as_ref())?,
            Event::End(e) if e.name().as_ref() == b"PubmedData" => break,
            Event::Eof => return Err(truncated(b"PubmedData")),
            _ => {}
        }
        buf.clear();
    }

    Ok(())
}

fn parse_article_id_list(reader: &mut Reader<&[u8]>) -> Result<Vec<ArticleId>, ScanError> {
    let mut ids = Vec::new();
    let mut buf = Vec::new();

    loop {
        match next_event(reader, &mut buf)? {
            Event::Start(e) if e.name().as_ref() == b"ArticleId" => {
                let id_type = id_type_of(&e);
                let value = non_empty(read_text(reader, b"ArticleId")?);
                ids.push(ArticleId { id_type, value });
            }
            Event::Empty(e) if e.name().as_ref() == b"ArticleId" => {
                ids.push(ArticleId {
                    id_type: id_type_of(&e),
                    value: None,
                });
            }
            Event::Start(e) => skip_element(reader, e.name().as_ref())?,
            Event::End(e) if e.name().as_ref() == b"ArticleIdList" => break,
            Event::Eof => return Err(truncated(b"ArticleIdList")),
            _ => {}
        }
        buf.clear();
    }

    Ok(ids)
}

fn id_type_of(e: &BytesStart) -> String {
    attr(e, b"IdType").unwrap_or_else(|| "unknown".to_string())
}

/// Skip past the end of the element whose start tag was just read
fn skip_element(reader: &mut Reader<&[u8]>, end_tag: &[u8]) -> Result<(), ScanError> {
    let mut buf = Vec::new();
    let mut depth = 1;

    loop {
        match next_event(reader, &mut buf)? {
            Event::Start(_) => depth += 1,
            Event::End(_) => {
                depth -= 1;
                if depth == 0 {
                    break;
                }
            }
            Event::Eof => return Err(truncated(end_tag)),
            _ => {}
        }
        buf.clear();
    }

    Ok(())
}

/// Text content of the element just opened, including text of nested
/// inline markup (`<i>`, `<sup>`, ...), trimmed at both ends.
fn read_text(reader: &mut Reader<&[u8]>, end_tag: &[u8]) -> Result<String, ScanError> {
    let mut buf = Vec::new();
    let mut text = String::new();
    let mut depth = 1;

    loop {
        match next_event(reader, &mut buf)? {
            Event::Text(e) => {
                let unescaped = e.unescape().map_err(|err| xml_error(reader, err))?;
                text.push_str(&unescaped);
            }
            Event::CData(e) => text.push_str(&String::from_utf8_lossy(&e)),
            Event::Start(_) => depth += 1,
            Event::End(_) => {
                depth -= 1;
                if depth == 0 {
                    break;
                }
            }
            Event::Eof => return Err(truncated(end_tag)),
            _ => {}
        }
        buf.clear();
    }

    Ok(text.trim().to_string())
}

fn attr(e: &BytesStart, key: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|a| a.key.as_ref() == key)
        .map(|a| match a.unescape_value() {
            Ok(value) => value.into_owned(),
            Err(_) => String::from_utf8_lossy(&a.value).into_owned(),
        })
}

fn next_event<'b>(
    reader: &mut Reader<&[u8]>,
    buf: &'b mut Vec<u8>,
) -> Result<Event<'b>, ScanError> {
    reader
        .read_event_into(buf)
        .map_err(|err| xml_error(reader, err))
}

fn xml_error(reader: &Reader<&[u8]>, err: quick_xml::Error) -> ScanError {
    ScanError::Xml {
        message: err.to_string(),
        position: reader.error_position(),
    }
}

fn junk_after_root(reader: &Reader<&[u8]>) -> ScanError {
    ScanError::Xml {
        message: "junk after document element".to_string(),
        position: reader.buffer_position(),
    }
}

fn text_outside_root(reader: &Reader<&[u8]>, seen_root: bool) -> ScanError {
    if seen_root {
        junk_after_root(reader)
    } else {
        ScanError::Xml {
            message: "text before document element".to_string(),
            position: reader.buffer_position(),
        }
    }
}

fn truncated(element: &[u8]) -> ScanError {
    ScanError::Truncated {
        element: String::from_utf8_lossy(element).into_owned(),
    }
}

fn non_empty(s: String) -> Option<String> {
    if s.is_empty() { None } else { Some(s) }
}
