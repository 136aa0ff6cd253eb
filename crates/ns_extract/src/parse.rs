use chrono::{DateTime, NaiveDate, Utc};
use ns_core::{Article, Error, Result};
use scraper::{Html, Selector};
use url::Url;

use crate::jsonld;

pub fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| Error::Extraction(format!("Invalid selector {}: {:?}", css, e)))
}

/// Builds an `Article` out of a fetched HTML page.
pub fn parse_article(url: &Url, html: &str) -> Result<Article> {
    let document = Html::parse_document(html);

    let content = extract_content(&document)?;
    if content.trim().is_empty() {
        return Err(Error::Extraction(format!("No article text found at {}", url)));
    }

    Ok(Article {
        url: url.to_string(),
        title: extract_title(&document)?,
        content,
        authors: extract_authors(&document)?,
        published_at: extract_publish_date(&document)?,
        top_image: meta_content(&document, "meta[property='og:image']")?
            .and_then(|src| url.join(&src).ok())
            .map(|src| src.to_string()),
        keywords: meta_content(&document, "meta[name='keywords']")?
            .map(|raw| split_list(&raw))
            .unwrap_or_default(),
        tags: meta_contents(&document, "meta[property='article:tag']")?,
    })
}

fn extract_title(document: &Html) -> Result<String> {
    if let Some(title) = meta_content(document, "meta[property='og:title']")? {
        return Ok(title);
    }
    for css in ["h1", "title"] {
        if let Some(text) = first_text(document, css)? {
            return Ok(text);
        }
    }
    Ok(String::new())
}

fn extract_content(document: &Html) -> Result<String> {
    for css in ["article p", "p"] {
        let paragraphs = texts(document, css)?;
        if !paragraphs.is_empty() {
            return Ok(paragraphs.join("\n\n"));
        }
    }
    Ok(String::new())
}

fn extract_authors(document: &Html) -> Result<Vec<String>> {
    let mut authors = jsonld::extract_authors(document);
    if authors.is_empty() {
        authors = meta_contents(document, "meta[name='author']")?;
    }

    let mut unique: Vec<String> = Vec::with_capacity(authors.len());
    for author in authors {
        if !unique.contains(&author) {
            unique.push(author);
        }
    }
    Ok(unique)
}

fn extract_publish_date(document: &Html) -> Result<Option<DateTime<Utc>>> {
    let raw = match meta_content(document, "meta[property='article:published_time']")? {
        Some(raw) => Some(raw),
        None => jsonld::extract_date_published(document),
    };
    Ok(raw.as_deref().and_then(parse_date))
}

fn parse_date(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(date) = DateTime::parse_from_rfc3339(raw) {
        return Some(date.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|date| date.and_utc())
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn meta_content(document: &Html, css: &str) -> Result<Option<String>> {
    Ok(meta_contents(document, css)?.into_iter().next())
}

fn meta_contents(document: &Html, css: &str) -> Result<Vec<String>> {
    let selector = selector(css)?;
    Ok(document
        .select(&selector)
        .filter_map(|el| el.value().attr("content"))
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect())
}

fn first_text(document: &Html, css: &str) -> Result<Option<String>> {
    Ok(texts(document, css)?.into_iter().next())
}

fn texts(document: &Html, css: &str) -> Result<Vec<String>> {
    let selector = selector(css)?;
    Ok(document
        .select(&selector)
        .map(|el| el.text().collect::<String>().trim().to_string())
        .filter(|text| !text.is_empty())
        .collect())
}
