use anyhow::Result;
use futures::{pin_mut, StreamExt};
use std::io::Write;

use crate::classifier;
use crate::fetcher::PageFetcher;
use crate::openai::OpenAiClient;

pub const BROCHURE_SYSTEM_PROMPT: &str = "You are an assistant that analyzes the contents of several relevant pages from a company website \
and creates a short brochure about the company for prospective customers, investors and recruits. Respond in markdown. \
Include details of company culture, customers and careers/jobs if you have the information.";

/// Byte budget for the user-facing composition prompt. The untruncated
/// aggregate is retained separately as the Q&A grounding text.
pub const PROMPT_LIMIT: usize = 5_000;

/// Fetch the landing page, classify its links, fetch each selected link,
/// and aggregate every page's content into one labeled block sequence.
/// Any fetch or classification failure aborts the whole request.
pub async fn gather_details(
    fetcher: &PageFetcher,
    openai: &OpenAiClient,
    url: &str,
) -> Result<String> {
    let landing = fetcher.fetch(url).await?;

    let mut details = String::from("Landing page:\n");
    details.push_str(&landing.contents());

    let selection = classifier::classify_links(openai, &landing).await?;

    for link in &selection.links {
        eprintln!("  ✓ {}: {}", link.label, link.url);
        let page = fetcher.fetch(&link.url).await?;
        details.push_str(&format!("\n\n{}\n", link.label));
        details.push_str(&page.contents());
    }

    Ok(details)
}

pub fn brochure_user_prompt(company_name: &str, details: &str) -> String {
    let mut prompt = format!("You are looking at a company called: {}\n", company_name);
    prompt.push_str(
        "Here are the contents of its landing page and other relevant pages; \
         use this information to build a short brochure of the company in markdown.\n",
    );
    prompt.push_str(details);
    truncate_on_char_boundary(&prompt, PROMPT_LIMIT).to_string()
}

/// Truncate to at most `limit` bytes, backing up to a UTF-8 boundary.
pub fn truncate_on_char_boundary(text: &str, limit: usize) -> &str {
    if text.len() <= limit {
        return text;
    }
    let mut end = limit;
    while end > 0 && !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}

/// Stream the brochure composition, fanning each chunk out to the visible
/// sink and an accumulator. Returns the full accumulated brochure.
pub async fn compose_brochure(
    openai: &OpenAiClient,
    company_name: &str,
    details: &str,
    sink: &mut dyn Write,
) -> Result<String> {
    let user_prompt = brochure_user_prompt(company_name, details);

    let stream = openai.chat_stream(BROCHURE_SYSTEM_PROMPT, &user_prompt);
    pin_mut!(stream);

    let mut brochure = String::new();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        write!(sink, "{}", chunk)?;
        sink.flush()?;
        brochure.push_str(&chunk);
    }

    Ok(brochure)
}
