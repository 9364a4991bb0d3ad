use anyhow::{Context, Result};
use clap::Parser;
use shared::{composer, session, Config, OpenAiClient, PageFetcher, Session};
use std::io::{self as stdio, Write};

#[derive(Parser)]
#[command(name = "brochure")]
#[command(about = "Generate a company brochure from its website, then answer questions about it")]
struct Args {
    /// Company name
    #[arg(short, long)]
    company: Option<String>,

    /// Company website URL
    #[arg(short, long)]
    url: Option<String>,

    /// OpenAI model to use
    #[arg(short, long, default_value = "gpt-5-nano")]
    model: String,
}

fn prompt_input(label: &str) -> Result<String> {
    print!("{}: ", label);
    stdio::stdout().flush()?;

    let mut input = String::new();
    stdio::stdin().read_line(&mut input)?;
    Ok(input.trim().to_string())
}

fn resolve_target(company: Option<String>, url: Option<String>) -> Result<(String, String)> {
    let company = match company {
        Some(name) => name,
        None => prompt_input("Enter the company name (e.g. HuggingFace)")?,
    };
    let url = match url {
        Some(url) => url,
        None => prompt_input("Enter the company website URL (e.g. https://huggingface.co)")?,
    };

    if company.trim().is_empty() || url.trim().is_empty() {
        anyhow::bail!("Please enter both company name and website URL.");
    }

    Ok((company.trim().to_string(), url.trim().to_string()))
}

async fn generate_brochure(
    fetcher: &PageFetcher,
    openai: &OpenAiClient,
    session: &mut Session,
    company: &str,
    url: &str,
) -> Result<()> {
    println!("\n🌐 Fetching {} and selecting relevant pages...", url);
    let details = composer::gather_details(fetcher, openai, url)
        .await
        .context("Failed to gather company details")?;

    println!("\n📋 Generating brochure for {}...\n", company);
    let mut stdout = stdio::stdout();
    let brochure = composer::compose_brochure(openai, company, &details, &mut stdout)
        .await
        .context("Failed to generate brochure")?;
    println!();

    session.store_brochure(brochure, details);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // The API key must be present before any network activity
    let config = Config::from_env()?;

    let (mut company, url) = resolve_target(args.company, args.url)?;

    let fetcher = PageFetcher::new()?;
    let openai = OpenAiClient::new(config.openai_api_key, args.model)?;
    let mut session = Session::new();

    generate_brochure(&fetcher, &openai, &mut session, &company, &url).await?;

    println!("\n💬 Company Q&A - answers come only from the pages just fetched.");
    println!("   Ask a question, '/new' for another company, or a blank line to quit.");

    loop {
        let input = prompt_input("\n❓ Question")?;

        if input.is_empty() {
            break;
        }

        if input == "/new" {
            let (next_company, next_url) = resolve_target(None, None)?;
            company = next_company;
            generate_brochure(&fetcher, &openai, &mut session, &company, &next_url).await?;
            continue;
        }

        if !session.is_ready() {
            println!("No brochure yet. Generate a brochure before asking questions.");
            continue;
        }

        let mut stdout = stdio::stdout();
        println!();
        session::answer_question(&openai, &mut session, &input, &mut stdout)
            .await
            .context("Failed to answer question")?;
        println!();
    }

    println!(
        "\n✅ Session over: {} question(s) answered about {}.",
        session.history().len(),
        company
    );

    Ok(())
}
