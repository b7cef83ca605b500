//! Pushes session changes to the host as JSON-RPC notifications.

use bevy::prelude::*;

use crate::engine::simulation::narration::{LogEntry, NarrationLog};
use crate::engine::simulation::{SessionReset, SimulationSession, StepChanged};

use super::web_rpc::WebRpcInterface;

/// What the host has already been told.
#[derive(Default)]
pub struct ForwardedState {
    appended_seen: u64,
    processing: bool,
}

/// Entries appended since `seen`, paired with their running sequence number.
/// Lines that were appended and already evicted are skipped.
pub fn entries_since(log: &NarrationLog, seen: u64) -> impl Iterator<Item = (u64, &LogEntry)> {
    let fresh = log.appended_total().saturating_sub(seen);
    let shown = fresh.min(log.len() as u64);
    let first_index = log.appended_total() - shown;
    log.entries()
        .skip(log.len() - shown as usize)
        .enumerate()
        .map(move |(offset, entry)| (first_index + offset as u64, entry))
}

pub fn forward_session_events(
    session: Res<SimulationSession>,
    mut rpc_interface: ResMut<WebRpcInterface>,
    mut step_changes: EventReader<StepChanged>,
    mut resets: EventReader<SessionReset>,
    mut forwarded: Local<ForwardedState>,
) {
    for _ in resets.read() {
        rpc_interface.send_notification("session_reset", serde_json::json!({}));
    }

    for change in step_changes.read() {
        rpc_interface.send_notification(
            "step_changed",
            serde_json::json!({
                "from": change.from.value(),
                "to": change.to.value(),
            }),
        );
    }

    let processing = session.is_processing();
    if processing != forwarded.processing {
        rpc_interface.send_notification(
            "processing_changed",
            serde_json::json!({ "processing": processing }),
        );
        forwarded.processing = processing;
    }

    let log = session.log();
    for (index, entry) in entries_since(log, forwarded.appended_seen) {
        rpc_interface.send_notification(
            "log_appended",
            serde_json::json!({
                "index": index,
                "message": entry.message,
                "time": entry.time_label(),
            }),
        );
    }
    forwarded.appended_seen = log.appended_total();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::simulation::{RequestSource, SessionRequest, SessionUpdate, SimulationPlugin};
    use std::time::Duration;

    fn methods(app: &App) -> Vec<String> {
        app.world()
            .resource::<WebRpcInterface>()
            .pending_notifications()
            .iter()
            .map(|n| n.method.clone())
            .collect()
    }

    #[test]
    fn entries_since_skips_seen_and_evicted_lines() {
        let mut log = NarrationLog::with_capacity(3);
        for line in ["a", "b", "c", "d", "e"] {
            log.append(line);
        }

        let fresh: Vec<(u64, &str)> = entries_since(&log, 3)
            .map(|(i, e)| (i, e.message.as_str()))
            .collect();
        assert_eq!(fresh, vec![(3, "d"), (4, "e")]);

        // Everything new but only three survive.
        let fresh: Vec<u64> = entries_since(&log, 0).map(|(i, _)| i).collect();
        assert_eq!(fresh, vec![2, 3, 4]);

        assert_eq!(entries_since(&log, 5).count(), 0);
    }

    #[test]
    fn session_changes_become_notifications() {
        let mut app = App::new();
        app.init_resource::<Time>()
            .init_resource::<WebRpcInterface>()
            .add_plugins(SimulationPlugin)
            .add_systems(Update, forward_session_events.after(SessionUpdate));

        app.update();
        // Bootstrap lines are announced once.
        assert_eq!(methods(&app), vec!["log_appended", "log_appended"]);

        app.world_mut().send_event(SessionRequest::advance(RequestSource::Rpc));
        app.update();
        app.world_mut()
            .resource_mut::<Time>()
            .advance_by(Duration::from_secs(1));
        app.update();

        let sent = methods(&app);
        assert!(sent.contains(&"step_changed".to_string()));
        assert_eq!(
            sent.iter().filter(|m| *m == "processing_changed").count(),
            2
        );
        // Two bootstrap lines and the two lines of the first script.
        assert_eq!(sent.iter().filter(|m| *m == "log_appended").count(), 4);
    }
}
