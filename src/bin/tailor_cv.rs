use clap::Parser;
use std::path::PathBuf;

use cv_tailor::commands::{run_tailor, TailorOptions};
use cv_tailor::core::env_api_key;
use cv_tailor::logging::init_logging;

/// Tailor a Markdown CV to a job posting and write the resume JSON
#[derive(Parser)]
#[command(name = "tailor-cv")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// URL to fetch the job description text from
    job_url: String,

    /// Path to the base prompt template
    #[arg(long, default_value = "Prompt_Template.mkd")]
    prompt: PathBuf,

    /// Path to your Markdown CV
    #[arg(long, default_value = "fullcv.mkd")]
    cv: PathBuf,

    /// Model to use (overrides cvtailor.toml)
    #[arg(long)]
    model: Option<String>,

    /// OpenAI API key (overrides the environment)
    #[arg(long)]
    api_key: Option<String>,

    /// Path to a file containing the OpenAI API key
    #[arg(long)]
    api_key_file: Option<PathBuf>,

    /// Where to write the JSON output
    #[arg(long, default_value = "tailored_resume.json")]
    out: PathBuf,

    /// Override the API base URL
    #[arg(long)]
    base_url: Option<String>,

    /// Override the API timeout in seconds
    #[arg(long)]
    timeout: Option<u64>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let options = TailorOptions {
        job_url: cli.job_url,
        prompt: cli.prompt,
        cv: cli.cv,
        out: cli.out,
        model: cli.model,
        base_url: cli.base_url,
        timeout: cli.timeout,
        api_key: cli.api_key,
        api_key_file: cli.api_key_file,
        env_api_key: env_api_key(),
    };

    let result = match std::env::current_dir() {
        Ok(project_root) => run_tailor(&project_root, options).await,
        Err(e) => Err(e.into()),
    };

    if let Err(e) = result {
        eprintln!("{}", e.display_with_details());
        std::process::exit(e.exit_code());
    }
}
