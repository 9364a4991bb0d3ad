use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::openai::OpenAiClient;
use crate::website::Website;

pub const LINK_SYSTEM_PROMPT: &str = r#"You are provided with a list of links found on a webpage.
You are able to decide which of the links would be most relevant to include in a brochure about the company,
such as links to an About page, or a Company page, or Careers/Jobs pages.
You should respond in JSON as in this example:
{
    "links": [
        {"type": "about page", "url": "https://full.url/goes/here/about"},
        {"type": "careers page", "url": "https://another.full.url/careers"}
    ]
}
"#;

/// One link the model judged brochure-relevant. `label` is the model's
/// free-text category ("about page", "careers page", ...).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectedLink {
    #[serde(rename = "type")]
    pub label: String,
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkSelection {
    pub links: Vec<SelectedLink>,
}

pub fn links_user_prompt(site: &Website) -> String {
    let mut prompt = format!(
        "Here is the list of links on the website of {} - ",
        site.url
    );
    prompt.push_str(
        "please decide which of these are relevant web links for a brochure about the company, \
         respond with the full https URL in JSON format. \
         Do not include Terms of Service, Privacy, email links.\n",
    );
    prompt.push_str("Links (some might be relative links):\n");
    prompt.push_str(&site.links.join("\n"));
    prompt
}

/// Ask the model which outbound links belong in the brochure.
///
/// The response must be a JSON object of the documented shape; anything
/// else propagates as an error. No retry on malformed output.
pub async fn classify_links(openai: &OpenAiClient, site: &Website) -> Result<LinkSelection> {
    let raw = openai
        .chat_json(LINK_SYSTEM_PROMPT, &links_user_prompt(site))
        .await?;

    serde_json::from_str(&raw).context("Link classifier returned malformed JSON")
}
