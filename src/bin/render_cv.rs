use clap::Parser;
use std::path::PathBuf;

use cv_tailor::commands::{run_render, RenderOptions};
use cv_tailor::logging::init_logging;

/// Render resume JSON into a DOCX template as a timestamped document
#[derive(Parser)]
#[command(name = "render-cv")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// JSON data file (default: resume_data.json)
    #[arg(long)]
    data: Option<PathBuf>,

    /// DOCX template (default: CV_Template.docx)
    #[arg(long)]
    template: Option<PathBuf>,

    /// Directory to write the rendered document into
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let options = RenderOptions {
        data: cli.data,
        template: cli.template,
        output_dir: cli.output_dir,
    };

    let result = match std::env::current_dir() {
        Ok(project_root) => run_render(&project_root, options),
        Err(e) => Err(e.into()),
    };

    if let Err(e) = result {
        eprintln!("{}", e.display_with_details());
        std::process::exit(e.exit_code());
    }
}
