use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use ns_core::{InferenceConfig, PipelineConfig, Result, SummaryRequest, TtsRequest};
use ns_extract::HtmlArticleExtractor;
use ns_inference::{create_gateways, Orchestrator};
use ns_web::AppState;
use tracing::info;

mod duration;
mod logging;

use duration::HumanDuration;

#[derive(Parser, Debug)]
#[command(author, version, about = "Summarize web articles and estimate their sentiment", long_about = None)]
pub struct Cli {
    /// JSON file with pipeline limits; flags below override it
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long, default_value = "remote", help = "Model to use for inference. Available models: remote (default), dummy")]
    model: String,
    /// Base URL of the model server
    #[arg(long)]
    model_url: Option<String>,
    #[arg(long)]
    api_key: Option<String>,
    /// Per-request timeout (e.g. 90, 2m, 1h15m30s)
    #[arg(long)]
    timeout: Option<HumanDuration>,
    /// Maximum merge levels before summarization gives up
    #[arg(long)]
    max_merge_depth: Option<usize>,
    #[arg(short, long)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Run the HTTP API
    Serve {
        #[arg(long, default_value = "0.0.0.0:5000")]
        bind: SocketAddr,
        /// Requests allowed to use the models at once
        #[arg(long)]
        max_concurrent: Option<usize>,
    },
    /// Summarize a single article and print the JSON response
    Summarize {
        url: String,
        #[arg(long)]
        max_length: Option<i64>,
        #[arg(long)]
        num_beams: Option<i64>,
        #[arg(long)]
        lang: Option<String>,
    },
    /// Synthesize speech and print the audio file path
    Tts {
        text: String,
        #[arg(long)]
        lang: Option<String>,
    },
}

fn load_config(cli: &Cli) -> Result<PipelineConfig> {
    let mut config = match &cli.config {
        Some(path) => PipelineConfig::from_file(path)?,
        None => PipelineConfig::default(),
    };
    if let Some(timeout) = cli.timeout {
        config.request_timeout_secs = timeout.0.as_secs();
    }
    if let Some(depth) = cli.max_merge_depth {
        config.max_merge_depth = depth;
    }
    if let Commands::Serve {
        max_concurrent: Some(max_concurrent),
        ..
    } = cli.command
    {
        config.max_concurrent_requests = max_concurrent;
    }
    config.validate()?;
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose);

    let config = load_config(&cli)?;
    let inference_config = InferenceConfig {
        model: cli.model.clone(),
        model_url: cli.model_url.clone(),
        api_key: cli.api_key.clone(),
    };
    let gateways = create_gateways(&inference_config)?;
    info!("🧠 Inference model initialized successfully (using {})", gateways.summarizer.name());

    let extractor = Arc::new(HtmlArticleExtractor::new()?);
    let orchestrator = Arc::new(Orchestrator::new(config, &gateways, extractor));

    match cli.command {
        Commands::Serve { bind, .. } => {
            ns_web::serve(bind, AppState { orchestrator }).await?;
        }
        Commands::Summarize {
            url,
            max_length,
            num_beams,
            lang,
        } => {
            let request = SummaryRequest {
                url,
                max_length,
                min_length: None,
                num_beams,
                lang,
            };
            let envelope = orchestrator.handle_summarize(request).await?;
            println!("{}", serde_json::to_string_pretty(&envelope)?);
        }
        Commands::Tts { text, lang } => {
            let response = orchestrator.handle_tts(TtsRequest { text, lang }).await?;
            println!("{}", response.audio_path);
        }
    }

    drop(gateways);
    info!("🧹 Models released");
    Ok(())
}
