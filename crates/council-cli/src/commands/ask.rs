use anyhow::{bail, Result};
use clap::Args;
use cliclack::spinner;
use council::{
    council::{Council, FanOutResult},
    models::{message::Message, outcome::CallOutcome},
    providers::openrouter::OpenRouterProvider,
};
use serde::Serialize;
use std::future::Future;
use std::sync::Arc;
use tracing::warn;

use crate::configuration::{Settings, API_KEY_ENV};
use crate::render;

#[derive(Args, Debug)]
pub struct AskArgs {
    /// The question to put to the council
    pub question: String,

    /// Council member to ask, repeat for several (defaults to the configured members)
    #[arg(short, long = "model")]
    pub models: Vec<String>,

    /// Model that synthesizes the final answer (defaults to the configured chairman)
    #[arg(long)]
    pub chairman: Option<String>,

    /// Only collect the members' answers
    #[arg(long)]
    pub no_synthesis: bool,

    /// Print the outcome as json instead of formatted text
    #[arg(long)]
    pub json: bool,
}

#[derive(Serialize)]
struct AskReport<'a> {
    question: &'a str,
    responses: &'a FanOutResult,
    chairman: Option<&'a str>,
    synthesis: Option<&'a CallOutcome>,
}

pub async fn run(settings: &Settings, args: AskArgs) -> Result<()> {
    let question = args.question.trim();
    if question.is_empty() {
        bail!("The question must not be empty");
    }

    let members = if args.models.is_empty() {
        settings.members.clone()
    } else {
        args.models.clone()
    };
    let chairman = args
        .chairman
        .clone()
        .unwrap_or_else(|| settings.chairman.clone());

    let provider = OpenRouterProvider::new(settings.provider.to_config())?;
    if provider.config().api_key().is_none() {
        warn!(
            "No API key configured, set {} or COUNCIL_PROVIDER__API_KEY",
            API_KEY_ENV
        );
    }
    let council = Council::new(Arc::new(provider)).with_timeout(settings.provider.timeout());

    let conversation = vec![Message::user(question)];
    let show_progress = !args.json;

    let responses = with_spinner(
        show_progress,
        &format!("consulting {} council members", members.len()),
        council.dispatch(&members, &conversation),
    )
    .await;

    let synthesis = if args.no_synthesis {
        None
    } else {
        Some(
            with_spinner(
                show_progress,
                &format!("{} is synthesizing", chairman),
                council.synthesize(&chairman, question, &responses),
            )
            .await,
        )
    };

    if args.json {
        let report = AskReport {
            question,
            responses: &responses,
            chairman: synthesis.as_ref().map(|_| chairman.as_str()),
            synthesis: synthesis.as_ref(),
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", render::responses(&responses));
        if let Some(synthesis) = &synthesis {
            print!("{}", render::synthesis(&chairman, synthesis));
        }
    }

    if responses.successes().next().is_none() {
        bail!("Every council member failed to answer");
    }
    Ok(())
}

async fn with_spinner<F: Future>(enabled: bool, message: &str, future: F) -> F::Output {
    if !enabled {
        return future.await;
    }

    let spin = spinner();
    spin.start(message);
    let output = future.await;
    spin.stop("");
    output
}
