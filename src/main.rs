use std::io::Write;
use std::process::ExitCode;

use clap::Parser;
use palaver::{app, AppError, Cli, RunOptions};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let filter =
        EnvFilter::try_from_env("PALAVER_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    // Syntax definitions take a moment to load; warm them while the
    // request is in flight.
    let _ = std::thread::Builder::new()
        .name("highlight-prewarm".to_string())
        .spawn(palaver::prewarm_highlighting);

    let cli = Cli::parse();
    let mut stdout = std::io::stdout().lock();

    let result = dispatch(cli, &mut stdout).await;
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("palaver: {error}");
            ExitCode::from(error.exit_code() as u8)
        }
    }
}

async fn dispatch(cli: Cli, out: &mut impl Write) -> Result<(), AppError> {
    if cli.list {
        return app::list_conversations(out);
    }

    let options = RunOptions {
        prompt: cli.prompt_text(),
        search: cli.search,
        url: cli.url.clone(),
        new_conversation: cli.new,
    };
    app::run(options, out).await
}
