// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

use crate::models::crawler::PageMetadata;
use reqwest::header::USER_AGENT;
use reqwest::{Client, StatusCode};
use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

static TITLE: LazyLock<Selector> = LazyLock::new(|| selector("title"));
static META_DESCRIPTION: LazyLock<Selector> =
    LazyLock::new(|| selector(r#"meta[name="description"]"#));
static H1: LazyLock<Selector> = LazyLock::new(|| selector("h1"));
static CANONICAL: LazyLock<Selector> = LazyLock::new(|| selector(r#"link[rel~="canonical"]"#));
static BODY: LazyLock<Selector> = LazyLock::new(|| selector("body"));

/// Elements whose text is not part of the visible page body
const NON_TEXT_ELEMENTS: [&str; 4] = ["script", "style", "noscript", "template"];

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("static selector must parse")
}

/// Reasons a page could not be fetched
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("Request timed out after {timeout:?}: {url}")]
    Timeout { url: String, timeout: Duration },
    #[error("Failed to fetch content: {0}")]
    Request(#[source] reqwest::Error),
    #[error("HTTP {status} for url: {url}")]
    Status { status: StatusCode, url: String },
    #[error("Failed to read response body: {0}")]
    Body(#[source] reqwest::Error),
}

/// Downloads a page and extracts its SEO metadata
#[derive(Clone, Default)]
pub struct MetadataFetcher {
    client: Client,
}

impl MetadataFetcher {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Fetch `url` with a single GET and parse its markup.
    /// Any non-2xx status is an error; missing elements are not.
    pub async fn fetch(
        &self,
        url: &str,
        user_agent: &str,
        timeout: Duration,
    ) -> Result<PageMetadata, FetchError> {
        url::Url::parse(url)?;

        let response = self
            .client
            .get(url)
            .header(USER_AGENT, user_agent)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| classify_reqwest_error(e, url, timeout, FetchError::Request))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status,
                url: url.to_string(),
            });
        }

        let html = response
            .text()
            .await
            .map_err(|e| classify_reqwest_error(e, url, timeout, FetchError::Body))?;

        debug!("Fetched {} ({} bytes)", url, html.len());
        Ok(parse_metadata(&html))
    }
}

fn classify_reqwest_error(
    error: reqwest::Error,
    url: &str,
    timeout: Duration,
    otherwise: fn(reqwest::Error) -> FetchError,
) -> FetchError {
    if error.is_timeout() {
        FetchError::Timeout {
            url: url.to_string(),
            timeout,
        }
    } else {
        otherwise(error)
    }
}

/// Extract title, description, first heading, canonical link and body text.
/// Each field is looked up independently and is empty when absent.
pub fn parse_metadata(html: &str) -> PageMetadata {
    let document = Html::parse_document(html);

    let title = document
        .select(&TITLE)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string())
        .unwrap_or_default();

    let meta_description = first_attr(&document, &META_DESCRIPTION, "content");
    let canonical = first_attr(&document, &CANONICAL, "href");

    let h1 = document
        .select(&H1)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string())
        .unwrap_or_default();

    let body = document
        .select(&BODY)
        .next()
        .map(|body| {
            let mut text = String::new();
            collect_text(body, &mut text);
            text
        })
        .unwrap_or_default();

    PageMetadata {
        title,
        meta_description,
        h1,
        canonical,
        body,
    }
}

fn first_attr(document: &Html, selector: &Selector, attr: &str) -> String {
    document
        .select(selector)
        .next()
        .and_then(|el| el.value().attr(attr))
        .unwrap_or_default()
        .to_string()
}

/// Append the visible text under `element`, whitespace collapsed to single spaces
fn collect_text(element: ElementRef<'_>, out: &mut String) {
    for child in element.children() {
        if let Some(text) = child.value().as_text() {
            for word in text.split_whitespace() {
                if !out.is_empty() {
                    out.push(' ');
                }
                out.push_str(word);
            }
        } else if let Some(child) = ElementRef::wrap(child) {
            if !NON_TEXT_ELEMENTS.contains(&child.value().name()) {
                collect_text(child, out);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Server;

    const AGENT: &str = "SEOPOCCrawlerBot/0.1";

    const PAGE: &str = r#"
        <html>
            <head>
                <title>  Best Toasters 2026  </title>
                <meta name="description" content="Reviews of kitchen toasters">
                <link rel="canonical" href="https://shop.example.com/toasters">
                <style>body { color: red; }</style>
            </head>
            <body>
                <h1>
                    Toasters
                </h1>
                <p>Our   favourite <b>toaster</b>
                   this year.</p>
                <script>var tracking = true;</script>
            </body>
        </html>
    "#;

    #[test]
    fn test_parse_full_page() {
        let metadata = parse_metadata(PAGE);

        assert_eq!(metadata.title, "Best Toasters 2026");
        assert_eq!(metadata.meta_description, "Reviews of kitchen toasters");
        assert_eq!(metadata.canonical, "https://shop.example.com/toasters");
        assert_eq!(metadata.h1, "Toasters");
        assert_eq!(metadata.body, "Toasters Our favourite toaster this year.");
    }

    #[test]
    fn test_parse_page_without_optional_elements() {
        let metadata = parse_metadata("<html><body><p>Just text</p></body></html>");

        assert_eq!(metadata.title, "");
        assert_eq!(metadata.meta_description, "");
        assert_eq!(metadata.canonical, "");
        assert_eq!(metadata.h1, "");
        assert_eq!(metadata.body, "Just text");
    }

    #[test]
    fn test_parse_uses_first_h1_and_multi_valued_rel() {
        let html = r#"
            <link rel="alternate canonical" href="/canonical">
            <h1>First</h1><h1>Second</h1>
        "#;
        let metadata = parse_metadata(html);
        assert_eq!(metadata.h1, "First");
        assert_eq!(metadata.canonical, "/canonical");
    }

    #[test]
    fn test_parse_malformed_markup_is_not_an_error() {
        let metadata = parse_metadata("<div><span>Hello</div> world</p></body></html></html>");
        assert_eq!(metadata.title, "");
        assert_eq!(metadata.h1, "");
        assert_eq!(metadata.body, "Hello world");
    }

    #[test]
    fn test_parse_non_ascii_body() {
        let metadata = parse_metadata("<body><p>Привет   мир</p></body>");
        assert_eq!(metadata.body, "Привет мир");
    }

    #[tokio::test]
    async fn test_fetch_sends_user_agent_and_parses() {
        let mut server = Server::new_async().await;
        let page = server
            .mock("GET", "/toasters")
            .match_header("user-agent", AGENT)
            .with_status(200)
            .with_header("content-type", "text/html")
            .with_body(PAGE)
            .expect(1)
            .create_async()
            .await;

        let fetcher = MetadataFetcher::default();
        let metadata = fetcher
            .fetch(
                &format!("{}/toasters", server.url()),
                AGENT,
                Duration::from_secs(5),
            )
            .await
            .unwrap();

        assert_eq!(metadata.title, "Best Toasters 2026");
        page.assert_async().await;
    }

    #[tokio::test]
    async fn test_fetch_not_found_is_error() {
        let mut server = Server::new_async().await;
        let _page = server
            .mock("GET", "/missing")
            .with_status(404)
            .create_async()
            .await;

        let result = MetadataFetcher::default()
            .fetch(
                &format!("{}/missing", server.url()),
                AGENT,
                Duration::from_secs(5),
            )
            .await;

        match result {
            Err(FetchError::Status { status, .. }) => assert_eq!(status, StatusCode::NOT_FOUND),
            other => panic!("expected status error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_fetch_server_error_is_error() {
        let mut server = Server::new_async().await;
        let _page = server
            .mock("GET", "/")
            .with_status(500)
            .create_async()
            .await;

        let result = MetadataFetcher::default()
            .fetch(&format!("{}/", server.url()), AGENT, Duration::from_secs(5))
            .await;

        let error = result.unwrap_err();
        assert!(error.to_string().contains("500"));
    }

    #[tokio::test]
    async fn test_fetch_invalid_url() {
        let result = MetadataFetcher::default()
            .fetch("not-a-valid-url", AGENT, Duration::from_secs(1))
            .await;
        assert!(matches!(result, Err(FetchError::InvalidUrl(_))));
    }

    #[tokio::test]
    async fn test_fetch_connection_refused() {
        let result = MetadataFetcher::default()
            .fetch("http://127.0.0.1:1/", AGENT, Duration::from_secs(2))
            .await;
        assert!(result.is_err());
    }
}
