//! App runner for one-shot commands

use std::env;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use serde_json::Value;
use thiserror::Error;

use crate::application::ports::{ConfigStore, Notifier, RecordStore, SyncChannel, ToastSurface};
use crate::application::{ManagerConfig, NotificationManager};
use crate::domain::config::AppConfig;
use crate::domain::notification::{NewNotification, NotificationFilter, NotificationId};
use crate::domain::time::Duration;
use crate::infrastructure::notification::{create_notifier, NotifierBackend};
use crate::infrastructure::{
    JsonFileStore, MarkerFileSync, MemoryStore, NoOpNotifier, NoopSync, NullSurface,
    XdgConfigStore,
};

use super::args::{Commands, ListArgs, SendArgs, STORE_DIR_ENV};
use super::presenter::Presenter;

/// Exit codes
pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_ERROR: u8 = 1;
pub const EXIT_USAGE_ERROR: u8 = 2;

/// Manager wired with boxed adapters chosen at runtime
pub type CliManager = NotificationManager<
    Box<dyn RecordStore>,
    Box<dyn Notifier>,
    Box<dyn ToastSurface>,
    Box<dyn SyncChannel>,
>;

/// Failure of a one-shot command
#[derive(Debug, Error)]
pub enum CommandError {
    /// Bad input from the user
    #[error("{0}")]
    Usage(String),

    #[error("{0}")]
    Failed(String),
}

impl CommandError {
    pub fn exit_code(&self) -> ExitCode {
        match self {
            Self::Usage(_) => ExitCode::from(EXIT_USAGE_ERROR),
            Self::Failed(_) => ExitCode::from(EXIT_ERROR),
        }
    }
}

/// Load and merge configuration from file, env, and CLI
pub async fn load_merged_config(cli_config: AppConfig) -> AppConfig {
    let store = XdgConfigStore::new();
    let file_config = match store.load().await {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!("Ignoring config file: {}", e);
            AppConfig::empty()
        }
    };

    let env_config = AppConfig {
        store_dir: env::var(STORE_DIR_ENV).ok().filter(|s| !s.is_empty()),
        ..Default::default()
    };

    // Merge: defaults < file < env < cli
    AppConfig::defaults()
        .merge(file_config)
        .merge(env_config)
        .merge(cli_config)
}

/// Record store for the configured directory, or memory when ephemeral
pub fn open_store(store_dir: &Path, ephemeral: bool) -> Box<dyn RecordStore> {
    if ephemeral {
        Box::new(MemoryStore::new())
    } else {
        Box::new(JsonFileStore::new(store_dir))
    }
}

/// Notifier backend from config, falling back to the default on bad values
pub fn notifier_backend(config: &AppConfig, presenter: &Presenter) -> NotifierBackend {
    match config.notifier_or_default().parse::<NotifierBackend>() {
        Ok(backend) => backend,
        Err(e) => {
            presenter.warn(&format!("{}; using {}", e, NotifierBackend::default()));
            NotifierBackend::default()
        }
    }
}

/// Run a one-shot command against the shared store
pub async fn run_command(command: Commands, config: AppConfig, ephemeral: bool) -> ExitCode {
    let presenter = Presenter::new();

    match execute(command, &config, ephemeral, &presenter).await {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(e) => {
            presenter.error(&e.to_string());
            e.exit_code()
        }
    }
}

async fn execute(
    command: Commands,
    config: &AppConfig,
    ephemeral: bool,
    presenter: &Presenter,
) -> Result<(), CommandError> {
    // Only `send` may pop up a native notification
    let notifier: Box<dyn Notifier> = match command {
        Commands::Send(_) => create_notifier(notifier_backend(config, presenter), None),
        _ => Box::new(NoOpNotifier::new()),
    };

    match command {
        Commands::Send(args) => {
            let input = new_notification_from_args(args)?;
            let manager = open_manager(config, ephemeral, notifier).await;
            let notification = manager.create(input).await;
            presenter.output(&notification.id.to_string());
            manager.shutdown();
        }
        Commands::List(args) => {
            let manager = open_manager(config, ephemeral, notifier).await;
            list(&manager, presenter, args).await?;
        }
        Commands::Read { id } => {
            let id = id
                .parse::<NotificationId>()
                .map_err(|e| CommandError::Usage(e.to_string()))?;
            let manager = open_manager(config, ephemeral, notifier).await;
            read(&manager, presenter, id).await?;
        }
        Commands::ReadAll => {
            let manager = open_manager(config, ephemeral, notifier).await;
            let changed = manager.mark_all_as_read().await;
            presenter.success(&format!("Marked {} notification(s) as read", changed));
        }
        Commands::Count => {
            let manager = open_manager(config, ephemeral, notifier).await;
            presenter.output(&manager.unread_count().await.to_string());
        }
        Commands::Cleanup => {
            let manager = open_manager(config, ephemeral, notifier).await;
            let removed = manager.cleanup().await;
            presenter.success(&format!("Removed {} old notification(s)", removed));
        }
        Commands::Export { output } => {
            let manager = open_manager(config, ephemeral, notifier).await;
            export(&manager, presenter, output).await?;
        }
        Commands::Watch(_) | Commands::Config { .. } => {
            return Err(CommandError::Failed("not a one-shot command".to_string()));
        }
    }

    Ok(())
}

/// Manager for a one-shot command: headless surface, no simulation
async fn open_manager(
    config: &AppConfig,
    ephemeral: bool,
    notifier: Box<dyn Notifier>,
) -> CliManager {
    let store_dir = config.store_dir_or_default();
    let sync: Box<dyn SyncChannel> = if ephemeral {
        Box::new(NoopSync::new())
    } else {
        Box::new(MarkerFileSync::new(&store_dir))
    };

    let mut manager_config = ManagerConfig::from_app_config(config);
    manager_config.simulation = None;

    let manager: CliManager = NotificationManager::new(
        open_store(&store_dir, ephemeral),
        notifier,
        Box::new(NullSurface::new()),
        sync,
        manager_config,
    );
    manager.init().await;
    manager
}

/// Build the creation input from `send` arguments
pub fn new_notification_from_args(args: SendArgs) -> Result<NewNotification, CommandError> {
    let mut input = NewNotification::new(args.title, args.message.unwrap_or_default())
        .persistent(args.persistent)
        .auto_close(!args.no_auto_close);

    if let Some(kind) = args.kind {
        input = input.kind(kind.into());
    }
    if let Some(icon) = args.icon {
        input = input.icon(icon);
    }
    if let Some(duration) = args.duration {
        let duration = duration
            .parse::<Duration>()
            .map_err(|e| CommandError::Usage(format!("Invalid duration: {}", e)))?;
        input = input.duration(duration);
    }
    for (key, raw) in args.data {
        // Accept JSON literals, fall back to plain strings
        let value = serde_json::from_str::<Value>(&raw).unwrap_or(Value::String(raw));
        input = input.data(key, value);
    }

    Ok(input)
}

/// Filter selected by `list` arguments
pub fn filter_from_args(args: &ListArgs) -> NotificationFilter {
    let mut filter = NotificationFilter::all();
    if args.unread {
        filter = filter.with_read(false);
    } else if args.read {
        filter = filter.with_read(true);
    }
    if let Some(kind) = args.kind {
        filter = filter.with_kind(kind.into());
    }
    if let Some(limit) = args.limit {
        filter = filter.with_limit(limit);
    }
    filter
}

async fn list(
    manager: &CliManager,
    presenter: &Presenter,
    args: ListArgs,
) -> Result<(), CommandError> {
    let notifications = manager.query(&filter_from_args(&args)).await;

    if args.json {
        let json = serde_json::to_string_pretty(&notifications)
            .map_err(|e| CommandError::Failed(e.to_string()))?;
        presenter.output(&json);
    } else {
        presenter.notification_list(&notifications);
    }
    Ok(())
}

async fn read(
    manager: &CliManager,
    presenter: &Presenter,
    id: NotificationId,
) -> Result<(), CommandError> {
    let Some(notification) = manager.get(id).await else {
        return Err(CommandError::Failed(format!("Notification not found: {}", id)));
    };

    if manager.mark_as_read(id).await {
        presenter.success(&format!("Marked \"{}\" as read", notification.title));
    } else {
        presenter.info(&format!("\"{}\" was already read", notification.title));
    }
    Ok(())
}

async fn export(
    manager: &CliManager,
    presenter: &Presenter,
    output: Option<PathBuf>,
) -> Result<(), CommandError> {
    let snapshot = manager.export().await;
    let json = snapshot
        .to_json_pretty()
        .map_err(|e| CommandError::Failed(e.to_string()))?;

    let Some(output) = output else {
        presenter.output(&json);
        return Ok(());
    };

    let path = if output.is_dir() {
        output.join(snapshot.file_name())
    } else {
        output
    };

    tokio::fs::write(&path, json)
        .await
        .map_err(|e| CommandError::Failed(format!("Failed to write {}: {}", path.display(), e)))?;

    presenter.success(&format!(
        "Exported {} notification(s) to {}",
        snapshot.total,
        path.display()
    ));
    Ok(())
}
