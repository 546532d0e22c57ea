use std::{num::NonZeroUsize, process::ExitCode, time::Duration};

use clap::{Parser, ValueEnum};
use stream_digest::{
    openai::OpenAIClient, tracing::init_tracing_subscriber, yt::parse_video_id,
    yt::scraper::YtClient, ArticlePipelineBuilder, ErrorKind, PipelineConfig,
};
use tokio_util::sync::CancellationToken;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Json,
    Markdown,
}

#[derive(Parser)]
#[command(
    name = "stream-digest",
    about = "Turns a YouTube video transcript into a structured article"
)]
struct Cli {
    /// Video id or YouTube URL
    video: String,

    /// OpenAI API key
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    openai_key: String,

    /// OpenAI-compatible API base URL
    #[arg(long, env = "OPENAI_BASE_URL")]
    openai_base_url: Option<String>,

    /// Model used for both chunk summaries and synthesis
    #[arg(long, env = "DIGEST_MODEL", default_value = PipelineConfig::DEFAULT_MODEL)]
    model: String,

    /// Words per transcript chunk
    #[arg(long, env = "DIGEST_UNIT_SIZE", default_value = "4000")]
    unit_size: NonZeroUsize,

    /// Maximum chunks per transcript; later words are dropped
    #[arg(long, env = "DIGEST_MAX_UNITS", default_value = "5")]
    max_units: NonZeroUsize,

    /// Chunk summarization calls in flight at once
    #[arg(long, env = "DIGEST_CONCURRENCY", default_value = "3")]
    concurrency: NonZeroUsize,

    #[arg(long, default_value = "0.3")]
    chunk_temperature: f32,

    #[arg(long, default_value = "0.7")]
    synthesis_temperature: f32,

    /// Timeout applied to each external request, in seconds
    #[arg(long, env = "DIGEST_TIMEOUT_SECS", default_value = "60")]
    timeout_secs: u64,

    /// Preferred caption language
    #[arg(long, env = "TRANSCRIPT_LANG", default_value = "en")]
    lang: String,

    #[arg(long, value_enum, default_value = "json")]
    format: OutputFormat,
}

fn exit_code(kind: ErrorKind) -> ExitCode {
    match kind {
        ErrorKind::MissingSource => ExitCode::from(3),
        ErrorKind::UpstreamFailure => ExitCode::from(4),
        ErrorKind::GenerationUnavailable => ExitCode::from(5),
        ErrorKind::Cancelled => ExitCode::from(130),
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<ExitCode> {
    let _ = dotenvy::dotenv();

    let _guard = sentry::init((
        std::env::var("SENTRY_DSN").unwrap_or_default(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: Some("production".into()),
            ..Default::default()
        },
    ));

    let cli = Cli::parse();
    init_tracing_subscriber()?;

    let video_id = parse_video_id(&cli.video)
        .ok_or_else(|| anyhow::anyhow!("Not a YouTube video id or URL: {}", cli.video))?;

    let mut openai = OpenAIClient::new(&cli.openai_key);
    if let Some(base_url) = cli.openai_base_url {
        openai = openai.with_base_url(base_url);
    }
    let yt = YtClient::default().with_language(&cli.lang);

    let pipeline = ArticlePipelineBuilder::new()
        .transcripts(yt.clone())
        .metadata(yt)
        .generator(openai)
        .model(cli.model)
        .with_chunking(cli.unit_size, cli.max_units)
        .concurrency_limit(cli.concurrency)
        .temperatures(cli.chunk_temperature, cli.synthesis_temperature)
        .request_timeout(Duration::from_secs(cli.timeout_secs))
        .build();
    tracing::debug!(config = ?pipeline.config(), "Pipeline configured");

    let cancel = CancellationToken::new();
    let ctrl_c_token = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Received Ctrl-C, cancelling");
            ctrl_c_token.cancel();
        }
    });

    let outcome = match pipeline.produce_article(&video_id, &cancel).await {
        Ok(outcome) => outcome,
        Err(e) => {
            tracing::error!(error = %e, kind = %e.kind(), "Failed to produce article");
            eprintln!("error: {e}");
            return Ok(exit_code(e.kind()));
        }
    };

    tracing::info!(
        source = ?outcome.source,
        truncated = outcome.truncated,
        chunks_total = outcome.chunks_total,
        chunks_failed = outcome.chunks_failed,
        "Article produced"
    );

    match cli.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&outcome)?),
        OutputFormat::Markdown => print!("{}", outcome.article.to_markdown()),
    }

    Ok(ExitCode::SUCCESS)
}
