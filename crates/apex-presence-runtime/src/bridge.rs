//! Bridge: wires Steam feed -> gating -> presence engine -> publisher.
//! Events are handled one at a time, in arrival order.

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use anyhow::Context;
use apex_presence_core::{ActivityPayload, PresenceEngine};
use apex_presence_discord::{ActivityPublisher, DiscordError, IpcClient};
use apex_presence_source_steam::{SourceAction, SourceConfig, SourceError, SourceState, parse_line};
use chrono::{DateTime, Utc};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

use crate::cli::RunOpts;

pub type BoxedPublisher = Box<dyn ActivityPublisher + Send>;

/// Prints each activity as one JSON line.
pub struct StdoutPublisher;

impl ActivityPublisher for StdoutPublisher {
    fn publish(&mut self, payload: &ActivityPayload) -> Result<(), DiscordError> {
        println!("{}", serde_json::to_string(payload)?);
        Ok(())
    }

    fn clear(&mut self) -> Result<(), DiscordError> {
        println!("null");
        Ok(())
    }
}

/// Bridge state. `connect` opens a publisher when the game starts.
pub struct Bridge<C> {
    source: SourceState,
    engine: PresenceEngine,
    connect: C,
    publisher: Option<BoxedPublisher>,
}

impl<C> Bridge<C>
where
    C: FnMut() -> Result<BoxedPublisher, DiscordError>,
{
    pub fn new(config: SourceConfig, connect: C) -> Self {
        Self {
            source: SourceState::new(config),
            engine: PresenceEngine::new(),
            connect,
            publisher: None,
        }
    }

    pub fn is_connected(&self) -> bool {
        self.publisher.is_some()
    }

    /// Parse and handle one feed line. Malformed lines are logged and skipped.
    pub fn handle_line(&mut self, line: &str, now: DateTime<Utc>) -> Option<ActivityPayload> {
        match parse_line(line) {
            Ok(event) => {
                tracing::debug!("steam event: {}", event.kind());
                let action = self.source.handle(event);
                self.handle_action(action, now)
            }
            Err(SourceError::Empty) => None,
            Err(e) => {
                tracing::warn!("skipping feed line: {e}");
                None
            }
        }
    }

    /// Apply one gated action. Returns the payload when one was composed.
    pub fn handle_action(
        &mut self,
        action: SourceAction,
        now: DateTime<Utc>,
    ) -> Option<ActivityPayload> {
        match action {
            SourceAction::Activate => {
                self.ensure_connected();
                None
            }
            SourceAction::Deactivate => {
                self.disconnect();
                self.engine.reset();
                None
            }
            SourceAction::Snapshot(snapshot) => {
                let payload = self.engine.process(&snapshot, now);
                self.ensure_connected();
                if let Some(publisher) = self.publisher.as_mut() {
                    if let Err(e) = publisher.publish(&payload) {
                        tracing::warn!("publish failed, dropping connection: {e}");
                        self.publisher = None;
                    }
                }
                Some(payload)
            }
            SourceAction::Ignore => None,
        }
    }

    /// Clear the activity and drop the publisher.
    pub fn disconnect(&mut self) {
        if let Some(mut publisher) = self.publisher.take() {
            if let Err(e) = publisher.clear() {
                tracing::debug!("clearing activity failed: {e}");
            }
            tracing::info!("discord presence cleared");
        }
    }

    fn ensure_connected(&mut self) {
        if self.publisher.is_some() {
            return;
        }
        match (self.connect)() {
            Ok(publisher) => self.publisher = Some(publisher),
            Err(e) => tracing::warn!("discord unavailable: {e}"),
        }
    }
}

/// Open the configured publisher.
fn connector(
    dry_run: bool,
    client_id: String,
    ipc_path: Option<PathBuf>,
) -> impl FnMut() -> Result<BoxedPublisher, DiscordError> + Send + 'static {
    move || {
        if dry_run {
            return Ok(Box::new(StdoutPublisher) as BoxedPublisher);
        }
        let client = IpcClient::connect(&client_id, ipc_path.as_deref())?;
        Ok(Box::new(client) as BoxedPublisher)
    }
}

/// How long shutdown waits for an in-flight Discord call.
pub const SHUTDOWN_GRACE: Duration = Duration::from_secs(3);

/// Run the bridge until the feed ends or ctrl-c.
pub async fn run_bridge(
    opts: RunOpts,
    config: SourceConfig,
    client_id: String,
    ipc_path: Option<PathBuf>,
) -> anyhow::Result<()> {
    let reader: Box<dyn AsyncBufRead + Unpin + Send> = match &opts.input {
        Some(path) => {
            let file = tokio::fs::File::open(path)
                .await
                .with_context(|| format!("failed opening {}", path.display()))?;
            Box::new(BufReader::new(file))
        }
        None => Box::new(BufReader::new(tokio::io::stdin())),
    };

    let bridge = Bridge::new(config, connector(opts.dry_run, client_id, ipc_path));
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!("ctrl-c handler unavailable: {e}");
            std::future::pending::<()>().await;
        }
    };
    drive(reader, bridge, ctrl_c, SHUTDOWN_GRACE).await
}

/// Feed lines into the bridge until EOF or `shutdown` resolves.
///
/// Discord IPC is blocking, so the bridge lives on a `spawn_blocking`
/// worker and this task only reads the feed. At EOF every queued line is
/// processed; on shutdown queued lines are dropped and an in-flight call
/// gets `grace` to finish.
async fn drive<R, C, F>(
    reader: R,
    mut bridge: Bridge<C>,
    shutdown: F,
    grace: Duration,
) -> anyhow::Result<()>
where
    R: AsyncBufRead + Unpin,
    C: FnMut() -> Result<BoxedPublisher, DiscordError> + Send + 'static,
    F: Future<Output = ()>,
{
    let (tx, mut rx) = mpsc::unbounded_channel::<(String, DateTime<Utc>)>();
    let stop = Arc::new(AtomicBool::new(false));

    let worker_stop = Arc::clone(&stop);
    let worker = tokio::task::spawn_blocking(move || {
        while let Some((line, received_at)) = rx.blocking_recv() {
            if worker_stop.load(Ordering::Relaxed) {
                break;
            }
            bridge.handle_line(&line, received_at);
        }
        bridge.disconnect();
    });

    let mut lines = reader.lines();
    tokio::pin!(shutdown);

    let (result, interrupted) = loop {
        tokio::select! {
            line = lines.next_line() => match line.context("reading event feed") {
                Ok(Some(line)) => {
                    if tx.send((line, Utc::now())).is_err() {
                        break (Err(anyhow::anyhow!("bridge worker stopped")), false);
                    }
                }
                Ok(None) => {
                    tracing::info!("event feed closed");
                    break (Ok(()), false);
                }
                Err(e) => break (Err(e), false),
            },
            _ = &mut shutdown => {
                tracing::info!("received ctrl-c, shutting down");
                break (Ok(()), true);
            }
        }
    };

    if interrupted {
        stop.store(true, Ordering::Relaxed);
    }
    drop(tx);
    if interrupted {
        match tokio::time::timeout(grace, worker).await {
            Ok(joined) => joined.context("bridge worker panicked")?,
            Err(_) => tracing::warn!("discord still busy after {grace:?}, not waiting"),
        }
    } else {
        worker.await.context("bridge worker panicked")?;
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use apex_presence_source_steam::source::APEX_LEGENDS_APP_ID;
    use chrono::TimeZone;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Log {
        published: Vec<String>,
        clears: usize,
        connects: usize,
    }

    struct Recorder(Arc<Mutex<Log>>);

    impl ActivityPublisher for Recorder {
        fn publish(&mut self, payload: &ActivityPayload) -> Result<(), DiscordError> {
            self.0.lock().expect("lock").published.push(payload.details.clone());
            Ok(())
        }

        fn clear(&mut self) -> Result<(), DiscordError> {
            self.0.lock().expect("lock").clears += 1;
            Ok(())
        }
    }

    fn recording_bridge(
        log: &Arc<Mutex<Log>>,
    ) -> Bridge<impl FnMut() -> Result<BoxedPublisher, DiscordError> + Send + 'static> {
        let log = Arc::clone(log);
        Bridge::new(SourceConfig::default(), move || {
            log.lock().expect("lock").connects += 1;
            Ok(Box::new(Recorder(Arc::clone(&log))) as BoxedPublisher)
        })
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 5, 1, 18, 0, 0)
            .single()
            .expect("valid datetime")
    }

    fn playing(app: u32) -> String {
        format!(r#"{{"event":"playing_state","playing_app":{app}}}"#)
    }

    const LOGIN: &str = r#"{"event":"logged_on","account_id":1}"#;

    const RANGE: &str = r##"{"event":"user","account_id":1,"rich_presence":[
        {"key":"status","value":"#PL_FIRINGRANGE"},{"key":"steam_player_group_size","value":"1"}]}"##;

    const FRIEND_MATCH: &str = r##"{"event":"user","account_id":2,"rich_presence":[
        {"key":"status","value":"#RICHPRESENCE_PLAYING_MULTIPLAYER_SHORT"}]}"##;

    #[test]
    fn full_session_publishes_and_clears() {
        let log = Arc::new(Mutex::new(Log::default()));
        let mut bridge = recording_bridge(&log);

        bridge.handle_line(LOGIN, now());
        assert!(bridge.handle_line(RANGE, now()).is_none(), "inactive before game");
        bridge.handle_line(&playing(APEX_LEGENDS_APP_ID), now());
        assert!(bridge.is_connected());

        let payload = bridge.handle_line(RANGE, now()).expect("payload");
        assert_eq!(payload.details, "Shooting Dummy in the Firing Range");
        assert_eq!(payload.start_timestamp, Some(now()));

        bridge.handle_line(&playing(0), now());
        assert!(!bridge.is_connected());

        let log = log.lock().expect("lock");
        assert_eq!(log.published, vec!["Shooting Dummy in the Firing Range"]);
        assert_eq!(log.clears, 1);
        assert_eq!(log.connects, 1);
    }

    #[test]
    fn friends_presence_is_not_published() {
        let log = Arc::new(Mutex::new(Log::default()));
        let mut bridge = recording_bridge(&log);

        bridge.handle_line(LOGIN, now());
        bridge.handle_line(&playing(APEX_LEGENDS_APP_ID), now());
        assert!(bridge.handle_line(FRIEND_MATCH, now()).is_none());
        assert!(log.lock().expect("lock").published.is_empty());
    }

    #[test]
    fn presence_before_login_is_not_published() {
        let log = Arc::new(Mutex::new(Log::default()));
        let mut bridge = recording_bridge(&log);

        bridge.handle_line(&playing(APEX_LEGENDS_APP_ID), now());
        assert!(bridge.handle_line(RANGE, now()).is_none());
        bridge.handle_line(LOGIN, now());
        assert!(bridge.handle_line(RANGE, now()).is_some());
    }

    #[test]
    fn stopping_the_game_resets_the_timer() {
        let log = Arc::new(Mutex::new(Log::default()));
        let mut bridge = recording_bridge(&log);
        let later = now() + chrono::Duration::minutes(30);

        bridge.handle_line(LOGIN, now());
        bridge.handle_line(&playing(APEX_LEGENDS_APP_ID), now());
        bridge.handle_line(RANGE, now());
        bridge.handle_line(&playing(0), now());
        bridge.handle_line(&playing(APEX_LEGENDS_APP_ID), later);
        let payload = bridge.handle_line(RANGE, later).expect("payload");
        assert_eq!(payload.start_timestamp, Some(later));
    }

    #[test]
    fn malformed_and_blank_lines_are_skipped() {
        let log = Arc::new(Mutex::new(Log::default()));
        let mut bridge = recording_bridge(&log);
        assert!(bridge.handle_line("", now()).is_none());
        assert!(bridge.handle_line("not json", now()).is_none());
        assert!(bridge.handle_line(r#"{"event":"nope"}"#, now()).is_none());
        assert_eq!(log.lock().expect("lock").connects, 0);
    }

    #[test]
    fn failed_connect_still_translates_and_retries_on_next_snapshot() {
        let attempts = Arc::new(Mutex::new(0usize));
        let counter = Arc::clone(&attempts);
        let mut bridge = Bridge::new(SourceConfig::default(), move || {
            *counter.lock().expect("lock") += 1;
            Err(DiscordError::NotRunning { tried: 20 })
        });

        bridge.handle_line(LOGIN, now());
        bridge.handle_line(&playing(APEX_LEGENDS_APP_ID), now());
        let payload = bridge.handle_line(RANGE, now()).expect("payload");
        assert_eq!(payload.details, "Shooting Dummy in the Firing Range");
        assert!(!bridge.is_connected());
        assert_eq!(*attempts.lock().expect("lock"), 2);
    }

    #[test]
    fn publish_failure_drops_connection() {
        struct Broken;
        impl ActivityPublisher for Broken {
            fn publish(&mut self, _payload: &ActivityPayload) -> Result<(), DiscordError> {
                Err(DiscordError::Timeout)
            }
            fn clear(&mut self) -> Result<(), DiscordError> {
                Ok(())
            }
        }

        let mut bridge = Bridge::new(SourceConfig::default(), || {
            Ok(Box::new(Broken) as BoxedPublisher)
        });
        bridge.handle_line(LOGIN, now());
        bridge.handle_line(&playing(APEX_LEGENDS_APP_ID), now());
        assert!(bridge.is_connected());
        assert!(bridge.handle_line(RANGE, now()).is_some());
        assert!(!bridge.is_connected());
    }

    // ─── Feed loop ────────────────────────────────────────────────────

    fn feed(lines: &[&str]) -> Vec<u8> {
        lines.iter().flat_map(|l| format!("{l}\n").into_bytes()).collect()
    }

    #[tokio::test]
    async fn feed_is_fully_processed_at_eof() {
        let log = Arc::new(Mutex::new(Log::default()));
        let bytes = feed(&[LOGIN, &playing(APEX_LEGENDS_APP_ID), RANGE, FRIEND_MATCH, RANGE]);

        drive(
            BufReader::new(bytes.as_slice()),
            recording_bridge(&log),
            std::future::pending::<()>(),
            Duration::from_millis(50),
        )
        .await
        .expect("drive");

        let log = log.lock().expect("lock");
        assert_eq!(log.published.len(), 2);
        assert_eq!(log.clears, 1, "presence cleared on exit");
    }

    /// Never answers until the test releases it.
    struct Stalled(std::sync::mpsc::Receiver<()>);

    impl ActivityPublisher for Stalled {
        fn publish(&mut self, _payload: &ActivityPayload) -> Result<(), DiscordError> {
            let _ = self.0.recv();
            Err(DiscordError::Timeout)
        }

        fn clear(&mut self) -> Result<(), DiscordError> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn shutdown_is_not_blocked_by_a_stalled_discord() {
        let (release, stalled) = std::sync::mpsc::channel::<()>();
        let mut stalled = Some(stalled);
        let bridge = Bridge::new(SourceConfig::default(), move || {
            let rx = stalled.take().ok_or(DiscordError::NotRunning { tried: 1 })?;
            Ok(Box::new(Stalled(rx)) as BoxedPublisher)
        });

        // The writer half stays open, so only shutdown can end the loop.
        let (mut writer, reader) = tokio::io::duplex(4096);
        let bytes = feed(&[LOGIN, &playing(APEX_LEGENDS_APP_ID), RANGE]);
        tokio::io::AsyncWriteExt::write_all(&mut writer, &bytes)
            .await
            .expect("write feed");

        let started = std::time::Instant::now();
        let result = tokio::time::timeout(
            Duration::from_secs(10),
            drive(
                BufReader::new(reader),
                bridge,
                tokio::time::sleep(Duration::from_millis(100)),
                Duration::from_millis(100),
            ),
        )
        .await
        .expect("drive returned while discord was stalled");
        assert!(result.is_ok());
        assert!(started.elapsed() < Duration::from_secs(5));

        drop(release);
        drop(writer);
    }
}
