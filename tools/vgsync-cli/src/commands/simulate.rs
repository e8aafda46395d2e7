//! Play a project on the simulated transport.
//!
//! Drives an [`EditingSession`] from a tokio interval at the configured
//! skip-tick rate and prints every session event as a JSON line.

use std::path::PathBuf;
use std::time::Duration;

use vgsync_common::clock::SessionClock;
use vgsync_common::config::AppConfig;
use vgsync_edit_core::{EditEvent, EditingSession, MediaTransport, SimulatedTransport};

use super::load_project;

pub async fn run(
    path: PathBuf,
    rate: f64,
    from: Option<f64>,
    max_secs: Option<f64>,
    config: &AppConfig,
) -> anyhow::Result<()> {
    if !(rate > 0.0) {
        anyhow::bail!("Playback rate must be positive, got {rate}");
    }

    let project = load_project(&path)?;
    let total = project.project.total_duration();

    let transport = SimulatedTransport::new(total).with_rate(rate);
    let mut session = EditingSession::new(transport, config.playback.clone())
        .map_err(|e| anyhow::anyhow!("Invalid playback configuration: {e}"))?
        .with_cuts(project.project.cuts.clone())
        .with_sink(|event: &EditEvent| match serde_json::to_string(event) {
            Ok(line) => println!("{line}"),
            Err(e) => tracing::warn!(%e, "Failed to serialize event"),
        });
    session.set_keyframes(project.keyframes.clone());

    let start = from.unwrap_or_else(|| session.start_position());
    session.seek(start)?;
    session.play();

    println!(
        "Simulating '{}' ({:.3}s raw, {:.3}s final) at {rate}x from {:.3}s",
        project.project.name,
        total,
        session.final_duration(),
        session.transport().current_position_s()
    );

    let clock = SessionClock::start();
    let tick_period = Duration::from_millis(config.playback.skip_tick_ms.max(1));
    let mut ticker = tokio::time::interval(tick_period);
    let mut last_ms = clock.now_ms();
    let mut skips = 0usize;

    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            _ = tokio::signal::ctrl_c() => {
                println!("Interrupted.");
                break;
            }
        }

        let now = clock.now_ms();
        session
            .transport_mut()
            .advance(SessionClock::ms_to_secs(now.saturating_sub(last_ms)));
        last_ms = now;

        if session.tick(now).is_some() {
            skips += 1;
        }

        if !session.transport().is_playing() && session.pending_resume_checks() == 0 {
            break;
        }
        if max_secs.is_some_and(|limit| clock.elapsed_secs() >= limit) {
            break;
        }
    }

    session.pause();
    println!(
        "Stopped at global {:.3}s (final {:.3}s) after {skips} skip(s).",
        session.transport().current_position_s(),
        session.final_position()
    );

    Ok(())
}
