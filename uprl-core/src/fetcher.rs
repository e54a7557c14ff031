use anyhow::{Context, Result};
use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;
use scraper::{Html, Selector};

/// Resolves the title of the page behind a URL
///
/// Every failure (bad URL, network, non-HTML body, missing title) is
/// reported as a plain error; callers do not distinguish sub-causes.
pub trait TitleFetcher: Send + Sync {
    fn fetch_title(&self, url: &str) -> Result<String>;
}

/// Fetches pages over HTTP(S) with a blocking client
///
/// One attempt per URL with the client's default timeout and redirect
/// policy.
pub struct HttpTitleFetcher {
    client: Client,
}

impl HttpTitleFetcher {
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("uprl/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self { client })
    }
}

impl TitleFetcher for HttpTitleFetcher {
    fn fetch_title(&self, url: &str) -> Result<String> {
        log::debug!("Fetching {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .with_context(|| format!("Failed to fetch {}", url))?
            .error_for_status()
            .with_context(|| format!("Server returned an error for {}", url))?;

        if let Some(content_type) = response.headers().get(CONTENT_TYPE) {
            let content_type = content_type.to_str().unwrap_or_default();
            if !content_type.to_ascii_lowercase().contains("html") {
                anyhow::bail!("Response from {} is not HTML ({})", url, content_type);
            }
        }

        let body = response
            .text()
            .with_context(|| format!("Failed to read response body from {}", url))?;

        extract_title(&body).with_context(|| format!("No <title> found at {}", url))
    }
}

/// Extracts the text of `<html><head><title>` from an HTML document
///
/// Entities are decoded by the parser; surrounding whitespace is trimmed.
/// Returns `None` when the document has no title element.
pub fn extract_title(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    let selector = Selector::parse("html > head > title").ok()?;

    document
        .select(&selector)
        .next()
        .map(|title| title.text().collect::<String>().trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_title() {
        let html = "<html><head><title>Example Domain</title></head><body></body></html>";
        assert_eq!(extract_title(html), Some("Example Domain".to_string()));
    }

    #[test]
    fn test_extract_title_decodes_entities_and_trims() {
        let html = "<html><head><title>\n   Q&amp;A Session  \n</title></head></html>";
        assert_eq!(extract_title(html), Some("Q&A Session".to_string()));
    }

    #[test]
    fn test_extract_title_without_explicit_head() {
        // The HTML parser places a leading <title> inside the implied <head>
        let html = "<title>Bare Title</title><p>Hello</p>";
        assert_eq!(extract_title(html), Some("Bare Title".to_string()));
    }

    #[test]
    fn test_extract_title_missing() {
        let html = "<html><head><meta charset=\"utf-8\"></head><body>No title</body></html>";
        assert_eq!(extract_title(html), None);
    }

    #[test]
    fn test_extract_title_first_title_wins() {
        let html = "<html><head><title>One</title><title>Two</title></head></html>";
        assert_eq!(extract_title(html), Some("One".to_string()));
    }

    #[test]
    fn test_malformed_url_is_a_fetch_error() -> Result<()> {
        let fetcher = HttpTitleFetcher::new()?;
        assert!(fetcher.fetch_title("not a url").is_err());
        assert!(fetcher.fetch_title("").is_err());
        Ok(())
    }
}
