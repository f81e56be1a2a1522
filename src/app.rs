//! Application core: owns the session and drives polling and redraws.

use std::io::{self, Write};
use std::ops::ControlFlow;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use chrono::Local;
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::constants::REFRESH_CHANNEL_CAPACITY;
use crate::input::{self, RefreshRequest};
use crate::status::{PollOutcome, StatusClient};
use crate::terminal::{terminal_size, ModeGuard, PlatformMode, ResizeEvents, ShutdownSignals};
use crate::ui::{self, Screen, SessionState};

/// Everything that can wake the event loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LoopSignal {
    Tick,
    Resize,
    Refresh,
    Quit,
}

/// Main application state.
pub struct App<W: Write = io::Stdout> {
    client: StatusClient,
    session: SessionState,
    screen: Screen<W>,
    poll_interval: Duration,
    shutdown: CancellationToken,
    poll_pending: bool,
    resize_pending: bool,
}

impl App {
    pub fn new(config: &Config, watch: bool) -> Self {
        Self::with_screen(config, watch, Screen::stdout(watch))
    }
}

impl<W: Write> App<W> {
    fn with_screen(config: &Config, watch: bool, screen: Screen<W>) -> Self {
        Self {
            client: StatusClient::new(&config.api_url),
            session: SessionState::new(watch),
            screen,
            poll_interval: Duration::from_secs(config.poll_interval_secs),
            shutdown: CancellationToken::new(),
            poll_pending: false,
            resize_pending: false,
        }
    }

    /// Poll once and print, or keep polling until quit in watch mode.
    pub async fn run(mut self) -> Result<()> {
        if self.session.watch {
            self.run_watch().await
        } else {
            self.run_once().await
        }
    }

    async fn run_once(&mut self) -> Result<()> {
        self.poll_pending = true;
        self.process_pending().await?;

        match &self.session.error {
            Some(err) => bail!("{}", err),
            None => Ok(()),
        }
    }

    async fn run_watch(&mut self) -> Result<()> {
        let mut signals = ShutdownSignals::new().context("installing interrupt handlers")?;
        let mut resize = ResizeEvents::new().context("installing resize handler")?;

        // Restored on every exit path, panics included.
        let _mode = ModeGuard::enter(PlatformMode::default())
            .context("switching terminal to single-keystroke input")?;

        let (refresh_tx, mut refresh_rx) = mpsc::channel(REFRESH_CHANNEL_CAPACITY);
        input::spawn(refresh_tx, self.shutdown.clone()).context("starting keyboard listener")?;

        // SIGINT/SIGTERM funnel into the same token as the quit key, so an
        // in-flight poll is abandoned either way.
        let shutdown = self.shutdown.clone();
        tokio::spawn(async move {
            signals.recv().await;
            info!("interrupt received");
            shutdown.cancel();
        });

        info!(interval_secs = self.poll_interval.as_secs(), "watch mode started");
        self.event_loop(&mut refresh_rx, &mut resize).await?;

        self.screen.leave()?;
        info!("watch mode stopped");
        Ok(())
    }

    /// Wait for the next signal, act on it, repeat until the token is cancelled.
    async fn event_loop(
        &mut self,
        refresh_rx: &mut mpsc::Receiver<RefreshRequest>,
        resize: &mut ResizeEvents,
    ) -> io::Result<()> {
        let shutdown = self.shutdown.clone();

        // First tick fires immediately and doubles as the initial poll.
        let mut ticker = tokio::time::interval(self.poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            let signal = tokio::select! {
                _ = shutdown.cancelled() => LoopSignal::Quit,
                _ = resize.recv() => LoopSignal::Resize,
                _ = ticker.tick() => LoopSignal::Tick,
                Some(RefreshRequest) = refresh_rx.recv() => LoopSignal::Refresh,
            };

            if self.on_signal(signal).is_break() {
                return Ok(());
            }

            tokio::select! {
                result = self.process_pending() => result?,
                _ = shutdown.cancelled() => {
                    info!("quit while polling, request abandoned");
                    return Ok(());
                }
            }
        }
    }

    // ── Signal handling ──────────────────────────────────────────

    fn on_signal(&mut self, signal: LoopSignal) -> ControlFlow<()> {
        match signal {
            LoopSignal::Quit => {
                self.shutdown.cancel();
                return ControlFlow::Break(());
            }
            LoopSignal::Resize => {
                debug!("terminal resized");
                self.resize_pending = true;
            }
            LoopSignal::Tick | LoopSignal::Refresh => {
                if !self.session.watch {
                    debug!(?signal, "ignored outside watch mode");
                } else if self.poll_pending {
                    debug!(?signal, "poll already pending, dropping");
                } else {
                    self.poll_pending = true;
                }
            }
        }
        ControlFlow::Continue(())
    }

    /// Run the poll and/or redraw the signals asked for.
    async fn process_pending(&mut self) -> io::Result<()> {
        if self.poll_pending {
            let outcome = self.client.poll().await;
            self.poll_pending = false;
            self.record(outcome);
            self.draw()
        } else if self.resize_pending {
            self.draw()
        } else {
            Ok(())
        }
    }

    // ── Session updates ──────────────────────────────────────────

    fn record(&mut self, outcome: PollOutcome) {
        match &outcome {
            PollOutcome::Fresh(status) => info!(
                components = status.components.len(),
                incidents = status.incidents.len(),
                "status updated"
            ),
            PollOutcome::Unchanged => debug!("status not modified"),
            PollOutcome::Failure(e) => warn!(error = %e, "status poll failed"),
        }
        self.session.apply(outcome, Local::now());
    }

    fn draw(&mut self) -> io::Result<()> {
        let force = std::mem::take(&mut self.resize_pending);
        let frame = ui::render(&self.session, terminal_size());
        self.screen.present(&frame, force)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::client::StatusError;
    use crate::status::SystemStatus;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const SUMMARY: &str = r#"{
        "components": [
            {"id": "c1", "name": "Git Operations", "status": "operational"}
        ],
        "incidents": []
    }"#;

    fn config(api_url: &str) -> Config {
        Config {
            api_url: api_url.to_string(),
            ..Config::default()
        }
    }

    fn app(watch: bool) -> App<Vec<u8>> {
        App::with_screen(
            &config("http://127.0.0.1:9/summary.json"),
            watch,
            Screen::new(Vec::new(), watch),
        )
    }

    #[test]
    fn tick_schedules_poll_in_watch_mode() {
        let mut app = app(true);
        assert!(app.on_signal(LoopSignal::Tick).is_continue());
        assert!(app.poll_pending);
    }

    #[test]
    fn tick_and_refresh_ignored_in_one_shot_mode() {
        let mut app = app(false);
        let _ = app.on_signal(LoopSignal::Tick);
        let _ = app.on_signal(LoopSignal::Refresh);
        assert!(!app.poll_pending);
    }

    #[test]
    fn refresh_while_poll_pending_is_dropped() {
        let mut app = app(true);
        let _ = app.on_signal(LoopSignal::Tick);
        let _ = app.on_signal(LoopSignal::Refresh);
        assert!(app.poll_pending);
    }

    #[test]
    fn resize_marks_redraw() {
        let mut app = app(true);
        let _ = app.on_signal(LoopSignal::Resize);
        assert!(app.resize_pending);
        assert!(!app.poll_pending);
    }

    #[test]
    fn quit_breaks_and_cancels() {
        let mut app = app(true);
        assert!(app.on_signal(LoopSignal::Quit).is_break());
        assert!(app.shutdown.is_cancelled());
    }

    #[test]
    fn failure_keeps_last_snapshot() {
        let mut app = app(true);
        app.record(PollOutcome::Fresh(SystemStatus::default()));
        assert!(app.session.status.is_some());
        assert!(app.session.last_update.is_some());

        app.record(PollOutcome::Failure(StatusError::UnexpectedStatus(500)));
        assert!(app.session.status.is_some());
        assert!(app.session.has_error());

        app.record(PollOutcome::Unchanged);
        assert!(!app.session.has_error());
    }

    #[test]
    fn resize_redraws_even_when_frame_unchanged() {
        let mut app = app(true);
        app.draw().unwrap();
        let drawn = app.screen.into_inner().len();

        let mut app = self::app(true);
        app.draw().unwrap();
        app.resize_pending = true;
        app.draw().unwrap();
        assert!(!app.resize_pending);
        assert!(app.screen.into_inner().len() > drawn);
    }

    #[tokio::test]
    async fn resize_alone_does_not_poll() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string(SUMMARY))
            .expect(0)
            .mount(&server)
            .await;

        let mut app = App::with_screen(
            &config(&format!("{}/summary.json", server.uri())),
            true,
            Screen::new(Vec::new(), true),
        );
        let _ = app.on_signal(LoopSignal::Resize);
        app.process_pending().await.unwrap();
        assert!(app.session.status.is_none());
    }

    fn watch_app(server: &MockServer) -> App<Vec<u8>> {
        let config = Config {
            poll_interval_secs: 3600,
            ..config(&format!("{}/summary.json", server.uri()))
        };
        App::with_screen(&config, true, Screen::new(Vec::new(), true))
    }

    async fn wait_for_requests(server: &MockServer, count: usize) {
        while server.received_requests().await.map_or(0, |r| r.len()) < count {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    }

    #[tokio::test]
    async fn refresh_request_runs_exactly_one_poll() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/summary.json"))
            .respond_with(ResponseTemplate::new(200).set_body_string(SUMMARY))
            .expect(2)
            .mount(&server)
            .await;

        let mut app = watch_app(&server);
        let shutdown = app.shutdown.clone();
        let (refresh_tx, mut refresh_rx) = mpsc::channel(REFRESH_CHANNEL_CAPACITY);
        let mut resize = ResizeEvents::new().unwrap();

        // Initial tick polls once, the refresh polls once more, then quit.
        let driver = async {
            wait_for_requests(&server, 1).await;
            refresh_tx.send(RefreshRequest).await.unwrap();
            wait_for_requests(&server, 2).await;
            shutdown.cancel();
        };
        let (result, ()) = tokio::time::timeout(Duration::from_secs(10), async {
            tokio::join!(app.event_loop(&mut refresh_rx, &mut resize), driver)
        })
        .await
        .expect("event loop did not stop");

        result.unwrap();
        assert!(app.session.status.is_some());
        let out = String::from_utf8(app.screen.into_inner()).unwrap();
        assert!(out.contains("Git Operations"));
        assert!(out.contains("Press 'r' to refresh"));
    }

    #[tokio::test]
    async fn quit_abandons_hung_poll() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(SUMMARY)
                    .set_delay(Duration::from_secs(60)),
            )
            .mount(&server)
            .await;

        let mut app = watch_app(&server);
        let shutdown = app.shutdown.clone();
        let (_refresh_tx, mut refresh_rx) = mpsc::channel(REFRESH_CHANNEL_CAPACITY);
        let mut resize = ResizeEvents::new().unwrap();

        let driver = async {
            wait_for_requests(&server, 1).await;
            shutdown.cancel();
        };
        let (result, ()) = tokio::time::timeout(Duration::from_secs(5), async {
            tokio::join!(app.event_loop(&mut refresh_rx, &mut resize), driver)
        })
        .await
        .expect("quit did not interrupt the poll");

        result.unwrap();
        assert!(app.session.status.is_none());
    }

    #[tokio::test]
    async fn one_shot_prints_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/summary.json"))
            .respond_with(ResponseTemplate::new(200).set_body_string(SUMMARY))
            .expect(1)
            .mount(&server)
            .await;

        let mut app = App::with_screen(
            &config(&format!("{}/summary.json", server.uri())),
            false,
            Screen::new(Vec::new(), false),
        );
        app.run_once().await.unwrap();

        let out = String::from_utf8(app.screen.into_inner()).unwrap();
        assert!(out.contains("Last Updated"));
        assert!(out.contains("Git Operations"));
        assert!(out.ends_with('\n'));
    }

    #[tokio::test]
    async fn one_shot_failure_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let mut app = App::with_screen(
            &config(&format!("{}/summary.json", server.uri())),
            false,
            Screen::new(Vec::new(), false),
        );
        let err = app.run_once().await.unwrap_err();
        assert!(err.to_string().contains("but got 503"));

        let out = String::from_utf8(app.screen.into_inner()).unwrap();
        assert!(out.contains("Error:"));
    }
}
