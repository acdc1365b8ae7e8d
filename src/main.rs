//! Notiflow CLI entry point

use std::process::ExitCode;

use clap::Parser;

use notiflow::cli::{
    app::{load_merged_config, run_command, EXIT_ERROR},
    args::{Cli, Commands},
    config_cmd::handle_config_command,
    logging::init_logging,
    presenter::Presenter,
    watch::run_watch,
};
use notiflow::domain::config::AppConfig;
use notiflow::infrastructure::XdgConfigStore;

#[tokio::main(flavor = "multi_thread", worker_threads = 2)]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let presenter = Presenter::new();

    // Build CLI config from args
    let cli_config = AppConfig {
        store_dir: cli
            .store_dir
            .as_ref()
            .map(|dir| dir.to_string_lossy().to_string()),
        ..Default::default()
    };

    match cli.command {
        Commands::Config { action } => {
            let _guard = init_logging(&cli.log_level, None);
            let store = XdgConfigStore::new();
            if let Err(e) = handle_config_command(action, &store, &presenter).await {
                presenter.error(&e.to_string());
                return ExitCode::from(EXIT_ERROR);
            }
            ExitCode::SUCCESS
        }
        Commands::Watch(args) => {
            let config = load_merged_config(cli_config).await;
            let log_dir = config.store_dir_or_default().join("logs");
            let _guard = init_logging(&cli.log_level, Some(&log_dir));
            run_watch(args, config, cli.ephemeral).await
        }
        command => {
            let _guard = init_logging(&cli.log_level, None);
            let config = load_merged_config(cli_config).await;
            run_command(command, config, cli.ephemeral).await
        }
    }
}
