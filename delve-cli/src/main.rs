//! Thin command-line wrapper around the agent loop: assembles the real
//! clients from the environment, runs, prints the result. No algorithmic
//! content lives here.

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use delve_agent::{Agent, AgentConfig, RunOptions, ToolRegistry};
use delve_core::ReasoningEffort;
use delve_llm::OpenRouterClient;
use delve_tools::{ScrapeTool, SearchTool};

#[derive(Parser)]
#[command(name = "delve", about = "Run a deep-search agent on a task", version)]
struct Args {
    /// The task to investigate.
    task: String,

    /// Stop after this many rounds even if the task is not done.
    #[arg(long)]
    max_rounds: Option<u32>,

    /// Run a single round instead of looping to completion.
    #[arg(long)]
    once: bool,

    /// Reasoning effort requested from the model: low, medium or high.
    #[arg(long, default_value = "low")]
    effort: ReasoningEffort,

    /// Model identifier passed to the completion endpoint.
    #[arg(long)]
    model: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    let mut builder = OpenRouterClient::builder();
    if let Ok(api_key) = std::env::var("OPENROUTER_API_KEY") {
        builder = builder.api_key(api_key);
    }
    if let Some(model) = &args.model {
        builder = builder.model(model.clone());
    }
    let model = builder.build()?;

    let tools = ToolRegistry::new()
        .with(Arc::new(SearchTool::from_env()?))
        .with(Arc::new(ScrapeTool::from_env()?));

    let config = AgentConfig {
        reasoning_effort: args.effort,
        ..AgentConfig::default()
    };
    let mut agent = Agent::new(args.task, model, tools).with_config(config);

    let options = if args.once {
        RunOptions::once()
    } else {
        RunOptions::looping(args.max_rounds)
    };
    let report = agent.run(options).await;

    println!("{}", agent.workspace().to_text());
    println!("Stopped after {} round(s): {:?}", report.rounds, report.stop);
    if let Some(answer) = &report.answer {
        println!("\nAnswer:\n{answer}");
    }

    Ok(())
}
