use colored::Colorize;
use seoreport::commands::command_argument_builder;
use seoreport::handlers::{handle_keywords, handle_projects, handle_run};
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() {
    init_tracing();

    let cmd = command_argument_builder();
    let chosen_command = cmd.get_matches();

    let result = match chosen_command.subcommand() {
        Some(("projects", primary_command)) => handle_projects(primary_command).await,
        Some(("keywords", primary_command)) => handle_keywords(primary_command).await,
        None => handle_run(&chosen_command).await,
        _ => unreachable!("clap should ensure we don't get here"),
    };

    if let Err(e) = result {
        eprintln!("{} {:#}", "✗".red().bold(), e);
        std::process::exit(1);
    }
}
