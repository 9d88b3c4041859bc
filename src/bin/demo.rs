use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use genai_gateway::{
    config,
    demo::{self, DemoClient},
    discovery::{self, PollPolicy, Workload},
};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Send demo prompts through the generation gateway", long_about = None)]
struct Cli {
    /// Path to the configuration file (only the parameter_store section is used)
    #[arg(short, long, env = "CONFIG_PATH", default_value = "config.yaml")]
    config: PathBuf,

    /// Request timeout in seconds
    #[arg(long, default_value_t = demo::DEFAULT_TIMEOUT.as_secs())]
    timeout: u64,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args)]
struct Target {
    /// Gateway URL; discovered from the parameter store when omitted
    #[arg(long, env = "GATEWAY_URL")]
    url: Option<String>,

    /// Model endpoint name; discovered from the parameter store when omitted
    #[arg(long, env = "ENDPOINT_NAME")]
    endpoint_name: Option<String>,
}

#[derive(Subcommand)]
enum Command {
    /// Ask a question about a conversation
    Text {
        #[command(flatten)]
        target: Target,

        /// File holding the conversation context
        #[arg(long)]
        context_file: PathBuf,

        #[arg(long, default_value = "write a summary")]
        query: String,
    },
    /// Generate an image from a description
    Image {
        #[command(flatten)]
        target: Target,

        #[arg(long, default_value = "Dog in superhero outfit")]
        prompt: String,

        /// Write the returned pixel array as JSON to this file
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

async fn resolve(
    config_path: &Path,
    target: Target,
    workload: Workload,
) -> Result<(String, String)> {
    if let (Some(url), Some(endpoint_name)) = (&target.url, &target.endpoint_name) {
        return Ok((url.clone(), endpoint_name.clone()));
    }

    let store_config = config::load_parameter_store(config_path)
        .await
        .with_context(|| format!("reading {}", config_path.display()))?;
    let store = discovery::store_from_config(&store_config)?;
    let names = [workload.api_key(), workload.endpoint_key()];

    info!("Retrieving configuration for {:?}", workload);
    let mut values = discovery::discover(
        store.as_ref(),
        &names,
        PollPolicy::from(&store_config),
    )
    .await?;

    let url = match target.url {
        Some(url) => url,
        None => values.remove(workload.api_key()).unwrap_or_default(),
    };
    let endpoint_name = match target.endpoint_name {
        Some(name) => name,
        None => values.remove(workload.endpoint_key()).unwrap_or_default(),
    };
    Ok((url, endpoint_name))
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let cli = Cli::parse();
    let client = DemoClient::new(std::time::Duration::from_secs(cli.timeout))?;

    match cli.command {
        Command::Text {
            target,
            context_file,
            query,
        } => {
            let context = tokio::fs::read_to_string(&context_file)
                .await
                .with_context(|| format!("reading {}", context_file.display()))?;
            let (url, endpoint_name) = resolve(&cli.config, target, Workload::Text).await?;
            let prompt = demo::compose_text_prompt(context.trim_end(), &query);

            let response = client.generate_text(&url, &endpoint_name, &prompt).await?;
            if response.was_truncated {
                eprintln!(
                    "note: prompt truncated from {} to {} characters",
                    response.original_prompt.chars().count(),
                    response.prompt.chars().count()
                );
            }
            println!("{}", response.generated_text);
        }
        Command::Image {
            target,
            prompt,
            output,
        } => {
            let (url, endpoint_name) = resolve(&cli.config, target, Workload::Image).await?;
            let response = client.generate_image(&url, &endpoint_name, &prompt).await?;

            match demo::image_dimensions(&response.image) {
                Some((height, width, channels)) => {
                    println!("Generated {}x{} image ({} channels)", width, height, channels)
                }
                None => println!("Generated image in an unrecognised layout"),
            }
            if let Some(path) = output {
                tokio::fs::write(&path, serde_json::to_vec(&response.image)?)
                    .await
                    .with_context(|| format!("writing {}", path.display()))?;
                println!("Pixel data written to {}", path.display());
            }
        }
    }

    Ok(())
}
