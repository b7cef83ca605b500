//! Step state machine, narration log and the systems that drive them.
//!
//! Every visual in the scene and the UI is derived from
//! [`SimulationSession`]. Requests to change it arrive as events so the
//! button, keyboard shortcuts and the host bridge share one path.

pub mod error;
pub mod narration;
pub mod session;
pub mod step_machine;

use bevy::prelude::*;

pub use session::SimulationSession;
pub use step_machine::{SessionStatus, Step};

/// Where a session request came from, for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestSource {
    Ui,
    Keyboard,
    Rpc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionRequestKind {
    Advance,
    Reset,
}

/// A request to change the session. Requests queued in one frame are
/// applied in the order they were written.
#[derive(Event, Debug, Clone, Copy)]
pub struct SessionRequest {
    pub kind: SessionRequestKind,
    pub source: RequestSource,
}

impl SessionRequest {
    pub fn advance(source: RequestSource) -> Self {
        Self {
            kind: SessionRequestKind::Advance,
            source,
        }
    }

    pub fn reset(source: RequestSource) -> Self {
        Self {
            kind: SessionRequestKind::Reset,
            source,
        }
    }
}

/// Fired when a narration script finishes and the new step is committed.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepChanged {
    pub from: Step,
    pub to: Step,
}

/// Fired after the session has been put back to idle.
#[derive(Event, Debug, Clone, Copy)]
pub struct SessionReset;

/// Ordering for systems that react to the session within the same frame.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionUpdate;

pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<SimulationSession>()
            .add_event::<SessionRequest>()
            .add_event::<StepChanged>()
            .add_event::<SessionReset>()
            .add_systems(
                Update,
                handle_session_requests
                    .pipe(drive_session)
                    .in_set(SessionUpdate),
            );
    }
}

/// Apply queued requests in arrival order; a rejected advance is a no-op.
/// Returns whether the script left in flight was started this frame.
pub fn handle_session_requests(
    mut session: ResMut<SimulationSession>,
    mut requests: EventReader<SessionRequest>,
    mut reset_events: EventWriter<SessionReset>,
) -> bool {
    let mut started = false;
    for request in requests.read() {
        match request.kind {
            SessionRequestKind::Reset => {
                info!("Reset requested via {:?}", request.source);
                session.reset();
                reset_events.write(SessionReset);
                started = false;
            }
            SessionRequestKind::Advance => match session.advance() {
                Ok(target) => {
                    debug!("Advance to {target} accepted via {:?}", request.source);
                    started = true;
                }
                Err(err) => debug!("Advance via {:?} ignored: {err}", request.source),
            },
        }
    }
    started
}

/// Tick the in-flight narration script by the frame delta. A script started
/// this frame waits for the next delta.
pub fn drive_session(
    In(started_this_frame): In<bool>,
    time: Res<Time>,
    mut session: ResMut<SimulationSession>,
    mut changes: EventWriter<StepChanged>,
) {
    if started_this_frame || !session.is_processing() {
        return;
    }
    if let Some(transition) = session.tick(time.delta()) {
        changes.write(StepChanged {
            from: transition.from,
            to: transition.to,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use constants::narration::BOOTSTRAP_LINES;
    use std::time::Duration;

    fn headless_app() -> App {
        let mut app = App::new();
        app.init_resource::<Time>().add_plugins(SimulationPlugin);
        app
    }

    fn step_frame(app: &mut App, delta: Duration) {
        app.world_mut().resource_mut::<Time>().advance_by(delta);
        app.update();
    }

    fn step_changes(app: &App) -> Vec<StepChanged> {
        let events = app.world().resource::<Events<StepChanged>>();
        events.get_cursor().read(events).copied().collect()
    }

    #[test]
    fn advance_request_commits_after_script_delay() {
        let mut app = headless_app();
        app.world_mut().send_event(SessionRequest::advance(RequestSource::Ui));
        step_frame(&mut app, Duration::ZERO);

        let session = app.world().resource::<SimulationSession>();
        assert!(session.is_processing());
        assert_eq!(session.current_step(), Step::IDLE);

        step_frame(&mut app, Duration::from_millis(300));
        assert!(app.world().resource::<SimulationSession>().is_processing());

        step_frame(&mut app, Duration::from_millis(300));
        let session = app.world().resource::<SimulationSession>();
        assert!(!session.is_processing());
        assert_eq!(session.current_step().value(), 1);
        assert_eq!(
            step_changes(&app),
            vec![StepChanged {
                from: Step::IDLE,
                to: session.current_step()
            }]
        );
    }

    #[test]
    fn burst_of_advances_yields_one_transition() {
        let mut app = headless_app();
        for _ in 0..3 {
            app.world_mut()
                .send_event(SessionRequest::advance(RequestSource::Keyboard));
        }
        step_frame(&mut app, Duration::ZERO);
        step_frame(&mut app, Duration::from_secs(1));

        let session = app.world().resource::<SimulationSession>();
        assert_eq!(session.current_step().value(), 1);
        assert_eq!(session.log().len(), 4);
    }

    #[test]
    fn reset_request_cancels_in_flight_script() {
        let mut app = headless_app();
        app.world_mut().send_event(SessionRequest::advance(RequestSource::Rpc));
        step_frame(&mut app, Duration::from_millis(100));
        app.world_mut().send_event(SessionRequest::reset(RequestSource::Rpc));
        step_frame(&mut app, Duration::from_millis(100));
        step_frame(&mut app, Duration::from_secs(2));

        let session = app.world().resource::<SimulationSession>();
        assert_eq!(session.current_step(), Step::IDLE);
        assert!(!session.is_processing());
        assert_eq!(session.log().messages(), BOOTSTRAP_LINES.to_vec());
        assert!(step_changes(&app).is_empty());
    }

    #[test]
    fn reset_after_advance_in_one_frame_leaves_session_idle() {
        let mut app = headless_app();
        app.world_mut().send_event(SessionRequest::advance(RequestSource::Rpc));
        app.world_mut().send_event(SessionRequest::reset(RequestSource::Ui));
        step_frame(&mut app, Duration::from_millis(16));
        step_frame(&mut app, Duration::from_secs(2));

        let session = app.world().resource::<SimulationSession>();
        assert_eq!(session.current_step(), Step::IDLE);
        assert!(!session.is_processing());
        assert_eq!(session.log().messages(), BOOTSTRAP_LINES.to_vec());
        assert!(step_changes(&app).is_empty());
    }

    #[test]
    fn advance_after_reset_in_one_frame_starts_fresh_script() {
        let mut app = headless_app();
        app.world_mut().send_event(SessionRequest::advance(RequestSource::Ui));
        step_frame(&mut app, Duration::ZERO);
        app.world_mut().send_event(SessionRequest::reset(RequestSource::Rpc));
        app.world_mut().send_event(SessionRequest::advance(RequestSource::Rpc));
        step_frame(&mut app, Duration::from_millis(16));

        let session = app.world().resource::<SimulationSession>();
        assert!(session.is_processing());
        assert_eq!(session.current_step(), Step::IDLE);
        assert_eq!(session.log().len(), BOOTSTRAP_LINES.len() + 1);
    }

    #[test]
    fn first_wait_is_not_shortened_by_the_request_frame() {
        let mut app = headless_app();
        app.world_mut().send_event(SessionRequest::advance(RequestSource::Ui));
        // Time that passed before the request must not count toward the script.
        step_frame(&mut app, Duration::from_millis(250));
        step_frame(&mut app, Duration::from_millis(400));
        assert!(app.world().resource::<SimulationSession>().is_processing());

        step_frame(&mut app, Duration::from_millis(200));
        let session = app.world().resource::<SimulationSession>();
        assert!(!session.is_processing());
        assert_eq!(session.current_step().value(), 1);
    }
}
