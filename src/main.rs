#![allow(dead_code, clippy::similar_names)]
#![warn(clippy::shadow_reuse, clippy::shadow_same, clippy::builtin_type_shadow)]
mod config;
mod fleet;
mod http_handler;
mod logger;
mod orbit;
mod viewer;

use crate::config::FleetConfig;
use crate::fleet::{FleetRegistry, FleetSnapshot, ProximityEvaluator, TrackOutcome, TrackingCoordinator};
use crate::http_handler::HTTPClient;
use crate::logger::JsonDump;
use crate::orbit::Sgp4Propagator;
use crate::viewer::{LogViewer, Viewer};
use chrono::Utc;
use std::sync::Arc;
use tokio::sync::{broadcast::error::RecvError, watch};
use tokio_util::sync::CancellationToken;

#[tokio::main(flavor = "multi_thread", worker_threads = 2)]
async fn main() {
    let config = FleetConfig::from_env().unwrap_or_else(|e| fatal!("Invalid configuration: {e:?}"));
    let cancel = CancellationToken::new();
    {
        let cancel_clone = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("Shutdown requested");
            }
            cancel_clone.cancel();
        });
    }

    let mut registry = init(&config).await;
    if config.dump_snapshots {
        let rx = registry.subscribe();
        let cancel_clone = cancel.clone();
        tokio::spawn(async move { dump_snapshots(rx, cancel_clone).await });
    }
    run(&mut registry, &config, &cancel).await;
    info!("Stopped with {} objects known", registry.objects().len());
}

async fn init(config: &FleetConfig) -> FleetRegistry {
    let client = HTTPClient::new(&config.base_url, config.http_timeout)
        .unwrap_or_else(|e| fatal!("Could not build HTTP client: {e}"));
    info!("Fetching {} sources from {}", config.sources.len(), client.url());

    let mut registry = FleetRegistry::new(
        Arc::new(Sgp4Propagator),
        Arc::new(client),
        Arc::new(LogViewer::new()),
        TrackingCoordinator::new(ProximityEvaluator::new(config.nearby_km)),
    );
    registry.set_enabled_components(config.components.clone());
    registry.set_enabled_tags(config.enabled_tags.iter().cloned());
    registry.set_enabled_names(config.enabled_names.iter().cloned());
    if let Some(station) = config.ground_station {
        registry.set_ground_station(station);
        registry.focus_ground_station();
    }
    // parked as pending when the sources have not delivered the target yet
    if let Some(name) = &config.track {
        request_track(&mut registry, name);
    }

    let sources: Vec<(&str, Vec<String>)> =
        config.sources.iter().map(|s| (s.address.as_str(), s.tags.clone())).collect();
    let report = registry.ingest_batch(&sources).await;
    info!(
        "Ingested {} objects from {}/{} sources ({} merged, {} degraded, {} rejected)",
        report.records.added,
        report.sources_ok,
        report.sources_ok + report.sources_failed,
        report.records.merged,
        report.records.degraded,
        report.records.rejected
    );
    registry.set_monitored_names(config.monitored_names.iter().cloned());
    let sampled = registry.refresh_positions(Utc::now());
    log!("{sampled} of {} visible objects have a position", registry.visible_objects().count());
    registry
}

fn request_track(registry: &mut FleetRegistry, name: &str) {
    match registry.request_track(Some(name)) {
        Ok(TrackOutcome::Tracked { key, nearby }) => info!("Tracking {key}, {} objects nearby", nearby.len()),
        Ok(TrackOutcome::Pending(pending)) => info!("Tracking of {pending} is pending"),
        Ok(TrackOutcome::Untracked) => (),
        Err(e) => warn!("Could not track {name}: {e:?}"),
    }
}

/// Ticks positions and applies viewer notifications until `cancel` fires.
async fn run(registry: &mut FleetRegistry, config: &FleetConfig, cancel: &CancellationToken) {
    let mut viewer_events = registry.viewer().subscribe();
    let mut interval = tokio::time::interval(config.tick);
    loop {
        tokio::select! {
            () = cancel.cancelled() => break,
            _ = interval.tick() => {
                let now = Utc::now();
                registry.refresh_positions(now);
                if let Some(sample) = registry.tracked_object().and_then(|o| o.sample()) {
                    event!("Tracked object at {} ({})", sample.position(), sample.at().format("%H:%M:%S%.3f"));
                }
                for (name, distance) in registry.nearby_tracked(now) {
                    event!("{name} is {distance:.1} km from the tracked object");
                }
            }
            res = viewer_events.recv() => match res {
                Ok(event) => registry.on_viewer_event(&event),
                Err(RecvError::Lagged(skipped)) => warn!("Skipped {skipped} viewer events"),
                Err(RecvError::Closed) => break,
            }
        }
    }
}

/// Writes every published snapshot to disk.
async fn dump_snapshots(mut rx: watch::Receiver<FleetSnapshot>, cancel: CancellationToken) {
    loop {
        tokio::select! {
            () = cancel.cancelled() => break,
            res = rx.changed() => {
                if res.is_err() {
                    break;
                }
                let snapshot = rx.borrow_and_update().clone();
                snapshot.dump_json();
            }
        }
    }
}
