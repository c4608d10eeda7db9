// ABOUTME: Main entry point for the Linear CLI application
// ABOUTME: Parses arguments, sets up logging and exits with the code of the failure class

use anyhow::Result;
use clap::Parser;
use env_logger::Env;
use std::io::{self, BufReader, IsTerminal};

use linear_cli::app::{exit_code, report_error, App, Settings};
use linear_cli::cli::Cli;
use linear_cli::cli_output::CliOutput;
use linear_cli::config::Config;
use linear_cli::credentials::default_store;
use linear_cli::output::Renderer;

async fn run(cli: Cli) -> Result<()> {
    let config = Config::load()?;
    let settings = Settings::resolve(&cli.global, &config)?;
    let store = default_store()?;

    let interactive = !settings.no_input && io::stdin().is_terminal();
    let out = Renderer::new(settings.format, settings.use_color, io::stdout().lock());
    let input = Box::new(BufReader::new(io::stdin()));

    let mut app = App::new(settings, store, out, input).interactive(interactive);
    app.run(cli.command).await
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let level = if cli.global.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(Env::default().default_filter_or(level)).init();

    let output = match cli.global.no_color {
        true => CliOutput::with_color(false),
        false => CliOutput::new(),
    };
    let output = output.quiet(cli.global.quiet);

    let code = match run(cli).await {
        Ok(()) => 0,
        Err(err) => {
            report_error(&output, &err);
            exit_code(&err)
        }
    };
    std::process::exit(code);
}
