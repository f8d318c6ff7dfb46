use clap::{Args, Parser};
use std::path::PathBuf;

use cv_tailor::commands::{run_update, UpdateOptions};
use cv_tailor::core::{env_api_key, ProfileSource};
use cv_tailor::logging::init_logging;

/// Update resume_data.json from a LinkedIn profile source
#[derive(Parser)]
#[command(name = "update-resume")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(flatten)]
    source: SourceArgs,

    /// Model to use (overrides cvtailor.toml)
    #[arg(long)]
    model: Option<String>,

    /// Output JSON path to write
    #[arg(long, default_value = "resume_data.json")]
    out: PathBuf,

    /// OpenAI API key (overrides the environment)
    #[arg(long)]
    api_key: Option<String>,

    /// Path to a file containing the OpenAI API key
    #[arg(long)]
    api_key_file: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Args)]
#[group(required = true, multiple = false)]
struct SourceArgs {
    /// Path to a LinkedIn profile PDF export
    #[arg(long)]
    pdf: Option<PathBuf>,

    /// Public URL containing your profile text
    #[arg(long)]
    url: Option<String>,

    /// Path to a plain text file with your profile text
    #[arg(long)]
    text: Option<PathBuf>,
}

impl SourceArgs {
    fn into_source(self) -> Option<ProfileSource> {
        self.pdf
            .map(ProfileSource::Pdf)
            .or(self.url.map(ProfileSource::Url))
            .or(self.text.map(ProfileSource::Text))
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let Some(source) = cli.source.into_source() else {
        eprintln!("Error: one of --pdf, --url or --text is required");
        std::process::exit(2);
    };

    let options = UpdateOptions {
        source,
        out: cli.out,
        model: cli.model,
        api_key: cli.api_key,
        api_key_file: cli.api_key_file,
        env_api_key: env_api_key(),
    };

    let result = match std::env::current_dir() {
        Ok(project_root) => run_update(&project_root, options).await,
        Err(e) => Err(e.into()),
    };

    if let Err(e) = result {
        eprintln!("{}", e.display_with_details());
        std::process::exit(e.exit_code());
    }
}
