use clap::Parser;
use pageflip::core::config::{self, CliOverrides};
use pageflip::fetch::FetchMode;
use pageflip::tui;
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};
use std::fs::File;

#[derive(Parser)]
#[command(name = "pageflip", about = "Terminal browser for statically served page sites")]
struct Args {
    /// Site root pages are fetched from
    #[arg(long)]
    base_url: Option<String>,

    /// Where page markup lives: development or production
    #[arg(short, long)]
    mode: Option<FetchMode>,

    /// Path to open first
    #[arg(short, long)]
    path: Option<String>,
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let args = Args::parse();
    dotenv::dotenv().ok();

    // Initialize file logger - writes to pageflip.log in current directory
    let log_config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .build();

    if let Ok(log_file) = File::create("pageflip.log") {
        let _ = WriteLogger::init(LevelFilter::Debug, log_config, log_file);
    }

    let file_config = match config::load_config() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error loading config: {e}");
            std::process::exit(1);
        }
    };

    let cli = CliOverrides {
        base_url: args.base_url,
        mode: args.mode,
        start_path: args.path,
    };
    let resolved = config::resolve(&file_config, &cli);

    log::info!(
        "Pageflip starting up: base_url={} mode={:?} path={}",
        resolved.base_url,
        resolved.mode,
        resolved.start_path
    );

    tui::run(resolved)
}
