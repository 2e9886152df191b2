use std::io;
use std::process::ExitCode;
use std::sync::Arc;

use clap::error::ErrorKind;
use clap::{Parser, Subcommand};

use verdog::add::add_library;
use verdog::checker::{CheckReport, Checker};
use verdog::config::Config;
use verdog::extractor::HttpVersionSource;
use verdog::hook::ScriptHookRunner;
use verdog::notifier::{ConsoleNotifier, DesktopNotifier, Notifier};
use verdog::store::JsonFileStore;

#[derive(Parser)]
#[command(name = "verdog")]
#[command(version, about = "Watches upstream pages for new library versions")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Check every tracked library for a new upstream version
    Check,
    /// Interactively add a library to the registry
    Add,
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            e.exit()
        }
        Err(e) => {
            let _ = e.print();
            return ExitCode::FAILURE;
        }
    };

    let _guard = verdog::logging::init();
    let config = Config::from_env();

    println!("-- hello verdog v{} --\n", env!("CARGO_PKG_VERSION"));

    let result = match cli.command {
        Command::Check => check(&config),
        Command::Add => add(&config),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{:#}", e);
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn check(config: &Config) -> anyhow::Result<()> {
    println!("Checking library updates...");

    let notifier: Arc<dyn Notifier> = if config.desktop_notify {
        Arc::new(DesktopNotifier::new())
    } else {
        Arc::new(ConsoleNotifier)
    };
    let checker = Checker::new(
        Arc::new(JsonFileStore::new(&config.registry_path)),
        Arc::new(HttpVersionSource::new(config.fetch_timeout)?),
        notifier,
        Arc::new(ScriptHookRunner::new(&config.hooks_dir)),
    );

    let report = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(checker.run())?;

    print_report(&report);
    Ok(())
}

fn print_report(report: &CheckReport) {
    for (_, update) in report.updated() {
        if let Some(Ok(output)) = &update.hook_output {
            println!("{}", output);
        }
    }

    if !report.saved {
        println!("Nothing updated.");
    }

    for (name, e) in report.hook_failures() {
        eprintln!("Hook for `{}` failed: {}", name, e);
    }
    for (name, e) in report.failed() {
        eprintln!("Could not check `{}`: {}", name, e);
    }
}

fn add(config: &Config) -> anyhow::Result<()> {
    println!("Adding new library, please fill in the following information:");

    let store = JsonFileStore::new(&config.registry_path);
    add_library(&store, io::stdin().lock(), io::stdout())?;
    Ok(())
}
