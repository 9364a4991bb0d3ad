use scraper::{ElementRef, Html, Selector};
use url::Url;

/// Returned when every extraction tier comes up empty.
pub const NO_TEXT_SENTINEL: &str = "No text extracted";

/// Tags whose subtrees carry no brochure-worthy prose.
const NOISE_TAGS: [&str; 7] = ["script", "style", "img", "input", "footer", "nav", "aside"];

/// Minimum word count for a paragraph to survive the fallback tier.
const MIN_PARAGRAPH_WORDS: usize = 5;

/// Extract the best available plain-text rendering of a page.
///
/// Webpage structure is too heterogeneous for a single strategy, so three
/// tiers are tried in order and the first non-empty result wins:
/// 1. readability article extraction
/// 2. full-document text rendering via html2text
/// 3. paragraph harvesting with noise-tag and short-paragraph filtering
pub fn extract_text(html: &str, url: &str) -> String {
    extract_article(html, url)
        .or_else(|| extract_rendered(html))
        .or_else(|| extract_paragraphs(html))
        .unwrap_or_else(|| NO_TEXT_SENTINEL.to_string())
}

/// Tier 1: readability-style main-content extraction.
fn extract_article(html: &str, url: &str) -> Option<String> {
    let base = Url::parse(url).ok()?;
    let product = readability::extractor::extract(&mut html.as_bytes(), &base).ok()?;
    let text = product.text.trim();
    if text.is_empty() {
        return None;
    }
    Some(text.to_string())
}

/// Tier 2: render the whole document to text.
fn extract_rendered(html: &str) -> Option<String> {
    let text = html2text::from_read(html.as_bytes(), 100);
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    Some(text.to_string())
}

/// Tier 3: collect body paragraphs, skipping noise-tag subtrees and
/// paragraphs too short to be meaningful sentences.
fn extract_paragraphs(html: &str) -> Option<String> {
    let doc = Html::parse_document(html);
    let paragraph_selector = Selector::parse("body p").unwrap();

    let paragraphs: Vec<String> = doc
        .select(&paragraph_selector)
        .filter(|p| !in_noise_subtree(p))
        .map(paragraph_text)
        .filter(|text| text.split_whitespace().count() > MIN_PARAGRAPH_WORDS)
        .collect();

    if paragraphs.is_empty() {
        return None;
    }
    Some(paragraphs.join("\n"))
}

fn in_noise_subtree(element: &ElementRef) -> bool {
    element
        .ancestors()
        .filter_map(ElementRef::wrap)
        .any(|ancestor| NOISE_TAGS.contains(&ancestor.value().name()))
}

fn paragraph_text(element: ElementRef) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
