use scraper::{Html, Selector};

use crate::extractor;

/// Returned when a page carries no `<title>` element.
pub const NO_TITLE_SENTINEL: &str = "No title found";

/// A fetched page: title, best-effort text, and outbound links.
///
/// Immutable after construction; discarded once its text has been merged
/// into the aggregate for a brochure request.
#[derive(Debug, Clone)]
pub struct Website {
    pub url: String,
    pub title: String,
    pub text: String,
    pub links: Vec<String>,
}

impl Website {
    pub fn from_html(url: &str, html: &str) -> Self {
        let doc = Html::parse_document(html);

        let title_selector = Selector::parse("title").unwrap();
        let title = doc
            .select(&title_selector)
            .next()
            .map(|t| t.text().collect::<String>().trim().to_string())
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| NO_TITLE_SENTINEL.to_string());

        // Every href in document order; no dedup, no normalization -
        // relative links pass through and the classifier is asked to
        // resolve them.
        let link_selector = Selector::parse("a").unwrap();
        let links = doc
            .select(&link_selector)
            .filter_map(|a| a.value().attr("href"))
            .map(|href| href.to_string())
            .collect();

        let text = extractor::extract_text(html, url);

        Self {
            url: url.to_string(),
            title,
            text,
            links,
        }
    }

    /// Render this page as one content block for prompt aggregation.
    pub fn contents(&self) -> String {
        format!(
            "Webpage Title:\n{}\nWebpage Contents:\n{}\n\n",
            self.title, self.text
        )
    }
}
