use clap::Parser;
use skycall_agents::{
    config, logging,
    weather::WeatherService,
    weather_agent::{WeatherAgent, DEFAULT_PROMPT},
    Agent,
};
use skycall_llm_sdk::{client::ChatClient, openai::OpenAIClient};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(author, version, about = "Ask the chat model a question it can answer with a live weather lookup", long_about = None)]
struct Args {
    /// User prompt for the agent
    #[arg(short, long, default_value = DEFAULT_PROMPT)]
    prompt: String,

    /// Model to use (overrides config and OPENAI_MODEL)
    #[arg(short, long)]
    model: Option<String>,

    /// Path to TOML config file containing API keys and endpoints
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    logging::init_logging(args.verbose)?;

    let config = config::load_config(args.config.as_deref())?;
    let model = args.model.unwrap_or(config.openai.model);

    let client = OpenAIClient::new(config.openai.api_key)?.with_base_url(config.openai.base_url);
    let client: Arc<dyn ChatClient> = Arc::new(client);
    let weather = Arc::new(WeatherService::new(&config.weather)?);

    let agent = WeatherAgent::new(client, weather, model.clone())?;
    tracing::info!(model = %model, "{}", agent.objective());
    for tool in agent.tools() {
        tracing::debug!(tool = tool.name(), "{}", tool.description());
    }

    let answer = agent.execute(&args.prompt).await?;
    println!("{}", answer);

    Ok(())
}
