//! Long-running watch mode
//!
//! Shows toasts in the terminal, pops native notifications when the
//! terminal is not focused, follows changes made by other instances and
//! optionally simulates activity. Runs until SIGINT/SIGTERM.

use std::process::ExitCode;

use tokio::sync::mpsc;

use crate::application::ports::SyncChannel;
use crate::application::{ManagerConfig, NotificationManager, SimulationSettings};
use crate::domain::config::AppConfig;
use crate::domain::notification::NotificationId;
use crate::domain::time::Duration;
use crate::infrastructure::notification::create_notifier;
use crate::infrastructure::{MarkerFileSync, NoopSync, TerminalSurface};

use super::app::{notifier_backend, open_store, CliManager, EXIT_ERROR, EXIT_SUCCESS, EXIT_USAGE_ERROR};
use super::args::WatchArgs;
use super::presenter::Presenter;
use super::signals::{WatchSignal, WatchSignalHandler};

/// Simulation settings from CLI flags layered over config
pub fn simulation_settings(
    config: &AppConfig,
    args: &WatchArgs,
) -> Result<Option<SimulationSettings>, String> {
    if !(args.simulate || config.simulate_or_default()) {
        return Ok(None);
    }

    let interval = match args.interval.as_deref() {
        Some(s) => s
            .parse::<Duration>()
            .map_err(|e| format!("Invalid interval: {}", e))?,
        None => config.simulate_interval_or_default(),
    };

    Ok(Some(SimulationSettings {
        interval,
        probability: config.simulate_probability_or_default(),
    }))
}

/// Run watch mode
pub async fn run_watch(args: WatchArgs, config: AppConfig, ephemeral: bool) -> ExitCode {
    let presenter = Presenter::new();

    let simulation = match simulation_settings(&config, &args) {
        Ok(simulation) => simulation,
        Err(e) => {
            presenter.error(&e);
            return ExitCode::from(EXIT_USAGE_ERROR);
        }
    };

    let mut signals = match WatchSignalHandler::new().await {
        Ok(signals) => signals,
        Err(e) => {
            presenter.error(&format!("Failed to setup signal handler: {}", e));
            return ExitCode::from(EXIT_ERROR);
        }
    };

    let store_dir = config.store_dir_or_default();
    let (click_tx, mut click_rx) = mpsc::unbounded_channel();
    let notifier = create_notifier(notifier_backend(&config, &presenter), Some(click_tx));
    let surface = TerminalSurface::new(args.focused || config.assume_focused_or_default());

    let sync: Box<dyn SyncChannel> = if ephemeral {
        Box::new(NoopSync::new())
    } else {
        let sync = MarkerFileSync::new(&store_dir);
        sync.watch().await;
        Box::new(sync)
    };

    let mut manager_config = ManagerConfig::from_app_config(&config);
    manager_config.simulation = simulation;

    let manager: CliManager = NotificationManager::new(
        open_store(&store_dir, ephemeral),
        notifier,
        Box::new(surface),
        sync,
        manager_config,
    );

    manager.init().await;
    manager.spawn_sync_listener();
    manager.add_listener(|event| {
        tracing::info!(
            event = event.as_str(),
            id = ?event.notification().map(|n| n.id),
            "Notification event"
        );
        Ok(())
    });

    presenter.info(&format!(
        "Watching {} ({} unread). Press Ctrl+C to stop.",
        if ephemeral {
            "in-memory notifications".to_string()
        } else {
            store_dir.display().to_string()
        },
        manager.unread_count().await
    ));
    if let Some(simulation) = simulation {
        presenter.info(&format!(
            "Simulating activity every {} (p = {})",
            simulation.interval, simulation.probability
        ));
    }

    watch_loop(&manager, &mut signals, &mut click_rx).await;

    manager.shutdown();
    presenter.success("Stopped watching");
    ExitCode::from(EXIT_SUCCESS)
}

async fn watch_loop(
    manager: &CliManager,
    signals: &mut WatchSignalHandler,
    clicks: &mut mpsc::UnboundedReceiver<NotificationId>,
) {
    loop {
        tokio::select! {
            Some(id) = clicks.recv() => {
                manager.handle_native_click(id).await;
            }
            signal = signals.recv() => match signal {
                Some(WatchSignal::Reload) => {
                    tracing::info!("Reloading notifications");
                    manager.handle_sync().await;
                }
                Some(WatchSignal::Shutdown) | None => break,
            },
        }
    }
}
