//! One simulated client's full connect-through-disconnect lifecycle
//!
//! A session owns exactly one TCP connection, executes one behavior profile
//! against it and produces exactly one `SessionResult`, no matter which
//! terminal state it reaches. All I/O faults are classified here; nothing
//! propagates to the orchestrator as an error.

pub mod manager;

pub use manager::SessionManager;

use crate::common::SessionId;
use crate::constants::WELCOME_DRAIN_MS;
use crate::profile::BehaviorProfile;

use std::io::ErrorKind;
use std::time::{Duration, Instant};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::time::{sleep, timeout};
use tracing::{debug, info, warn};

/// Terminal classification of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionOutcome {
    /// The scripted sequence ran to its normal end
    Completed,
    /// The target refused the connection or the attempt timed out
    ConnectionRefused,
    /// A bounded receive missed its deadline and the profile treats that as
    /// fatal
    TimedOut,
    /// The peer closed or reset the connection mid-sequence
    Disconnected,
    /// Any other unclassified I/O fault
    UnexpectedError,
}

impl std::fmt::Display for SessionOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            SessionOutcome::Completed => "completed",
            SessionOutcome::ConnectionRefused => "connection refused",
            SessionOutcome::TimedOut => "timed out",
            SessionOutcome::Disconnected => "disconnected",
            SessionOutcome::UnexpectedError => "unexpected error",
        };
        write!(f, "{}", label)
    }
}

/// Immutable outcome record produced once per session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionResult {
    pub id: SessionId,
    pub connected: bool,
    pub messages_sent: u64,
    pub messages_received: u64,
    pub errors: u64,
    pub outcome: SessionOutcome,
    pub duration: Duration,
}

impl SessionResult {
    /// Result standing in for a session whose task crashed before it could
    /// report. Counted on the failed side so the connection partition still
    /// holds.
    pub(crate) fn crashed(id: SessionId, duration: Duration) -> Self {
        Self {
            id,
            connected: false,
            messages_sent: 0,
            messages_received: 0,
            errors: 1,
            outcome: SessionOutcome::UnexpectedError,
            duration,
        }
    }
}

/// Running tally of I/O observed while interpreting a profile
#[derive(Debug, Default, Clone, Copy)]
struct Tally {
    sent: u64,
    received: u64,
    errors: u64,
}

/// Structured outcome of one bounded receive
enum ReadEvent {
    /// A full line arrived
    Line(String),
    /// The peer closed or reset the connection
    Closed,
    /// Nothing arrived within the deadline
    TimedOut,
    /// Some other I/O fault
    Failed(std::io::Error),
}

/// One simulated client: a single connection driven through one profile
#[derive(Debug)]
pub struct Session {
    id: SessionId,
    addr: String,
    profile: BehaviorProfile,
    connect_timeout: Duration,
    response_timeout: Duration,
}

impl Session {
    pub fn new(
        id: SessionId,
        addr: String,
        profile: BehaviorProfile,
        connect_timeout: Duration,
        response_timeout: Duration,
    ) -> Self {
        Self {
            id,
            addr,
            profile,
            connect_timeout,
            response_timeout,
        }
    }

    /// Run the session to a terminal state. A single connect attempt, then
    /// the profile's step sequence; the socket is released on every exit
    /// path.
    pub async fn run(self) -> SessionResult {
        let started = Instant::now();

        let stream = match timeout(self.connect_timeout, TcpStream::connect(&self.addr)).await {
            Err(_elapsed) => {
                warn!("Session {} connect attempt timed out", self.id);
                return self.finish(started, false, Tally::default(), SessionOutcome::ConnectionRefused);
            }
            Ok(Err(e)) => {
                let outcome = match e.kind() {
                    ErrorKind::ConnectionRefused | ErrorKind::TimedOut => {
                        SessionOutcome::ConnectionRefused
                    }
                    _ => SessionOutcome::UnexpectedError,
                };
                warn!("Session {} failed to connect: {}", self.id, e);
                return self.finish(started, false, Tally::default(), outcome);
            }
            Ok(Ok(stream)) => stream,
        };

        debug!("Session {} connected to {}", self.id, self.addr);

        let (read_half, mut write_half) = stream.into_split();
        let mut reader = BufReader::new(read_half);

        let mut tally = Tally::default();
        let outcome = self.run_profile(&mut reader, &mut write_half, &mut tally).await;

        // Deterministic close regardless of how the script ended
        let _ = write_half.shutdown().await;

        self.finish(started, true, tally, outcome)
    }

    fn finish(
        &self,
        started: Instant,
        connected: bool,
        tally: Tally,
        outcome: SessionOutcome,
    ) -> SessionResult {
        debug!(
            "Session {} finished: {} ({} sent, {} received, {} errors)",
            self.id, outcome, tally.sent, tally.received, tally.errors
        );
        SessionResult {
            id: self.id,
            connected,
            messages_sent: tally.sent,
            messages_received: tally.received,
            errors: tally.errors,
            outcome,
            duration: started.elapsed(),
        }
    }

    /// Interpret the profile's step sequence over the open connection
    async fn run_profile(
        &self,
        reader: &mut BufReader<OwnedReadHalf>,
        writer: &mut OwnedWriteHalf,
        tally: &mut Tally,
    ) -> SessionOutcome {
        match self.profile.clone() {
            BehaviorProfile::EchoStress { message_count } => {
                self.run_echo_stress(reader, writer, tally, message_count).await
            }
            BehaviorProfile::ActiveHeartbeat {
                interval,
                total_duration,
            } => {
                self.run_heartbeat(reader, writer, tally, interval, total_duration)
                    .await
            }
            BehaviorProfile::ZombieIdle { idle_duration } => {
                self.run_zombie_idle(reader, writer, tally, idle_duration).await
            }
            BehaviorProfile::RoomJoiner {
                room_id,
                chat_message,
                linger,
            } => {
                self.run_room_joiner(reader, writer, tally, room_id, &chat_message, linger)
                    .await
            }
        }
    }

    /// Send numbered messages, waiting for the echo after each one. The
    /// first missed response aborts the rest of the sequence.
    async fn run_echo_stress(
        &self,
        reader: &mut BufReader<OwnedReadHalf>,
        writer: &mut OwnedWriteHalf,
        tally: &mut Tally,
        message_count: u32,
    ) -> SessionOutcome {
        for seq in 0..message_count {
            let message = format!("Client{}_Message{}\n", self.id, seq);
            if let Err(e) = writer.write_all(message.as_bytes()).await {
                tally.errors += 1;
                return classify_io(&e);
            }
            tally.sent += 1;

            match bounded_read(reader, self.response_timeout).await {
                ReadEvent::Line(_) => tally.received += 1,
                ReadEvent::TimedOut => {
                    tally.errors += 1;
                    warn!("Session {} echo response {} timed out", self.id, seq);
                    return SessionOutcome::TimedOut;
                }
                ReadEvent::Closed => {
                    tally.errors += 1;
                    return SessionOutcome::Disconnected;
                }
                ReadEvent::Failed(e) => {
                    tally.errors += 1;
                    warn!("Session {} read failed: {}", self.id, e);
                    return classify_io(&e);
                }
            }
        }

        SessionOutcome::Completed
    }

    /// Send a heartbeat every `interval` for `total_duration`. Missed echoes
    /// are tolerated; losing the connection is not.
    async fn run_heartbeat(
        &self,
        reader: &mut BufReader<OwnedReadHalf>,
        writer: &mut OwnedWriteHalf,
        tally: &mut Tally,
        interval: Duration,
        total_duration: Duration,
    ) -> SessionOutcome {
        let run_deadline = Instant::now() + total_duration;
        let mut seq: u64 = 0;

        while Instant::now() < run_deadline {
            let beat_started = Instant::now();

            let heartbeat = format!("Ping {}\n", seq);
            if let Err(e) = writer.write_all(heartbeat.as_bytes()).await {
                tally.errors += 1;
                warn!("Session {} lost connection mid-heartbeat: {}", self.id, e);
                return classify_io(&e);
            }
            tally.sent += 1;
            seq += 1;

            // The echo window doubles as the beat pacing; one missed
            // response is not fatal for this profile.
            match bounded_read(reader, interval).await {
                ReadEvent::Line(_) => tally.received += 1,
                ReadEvent::TimedOut => tally.errors += 1,
                ReadEvent::Closed => {
                    tally.errors += 1;
                    return SessionOutcome::Disconnected;
                }
                ReadEvent::Failed(e) => {
                    tally.errors += 1;
                    return classify_io(&e);
                }
            }

            let beat_elapsed = beat_started.elapsed();
            if beat_elapsed < interval {
                sleep(interval - beat_elapsed).await;
            }
        }

        SessionOutcome::Completed
    }

    /// Go silent past the server's idle timeout, then probe once. A peer
    /// close observed by the probe is this profile's passing outcome; still
    /// being alive is the anomaly.
    async fn run_zombie_idle(
        &self,
        reader: &mut BufReader<OwnedReadHalf>,
        writer: &mut OwnedWriteHalf,
        tally: &mut Tally,
        idle_duration: Duration,
    ) -> SessionOutcome {
        // Drain the welcome text if the server sends one; silence is fine.
        if let ReadEvent::Line(welcome) =
            bounded_read(reader, Duration::from_millis(WELCOME_DRAIN_MS)).await
        {
            debug!("Session {} drained welcome: {}", self.id, welcome.trim());
        }

        sleep(idle_duration).await;

        // A write into a freshly closed socket can still succeed because of
        // TCP buffering, so the probe is send-then-read.
        match writer.write_all(b"I am back!\n").await {
            Err(e) if is_peer_close(&e) => {
                info!("Session {} kicked by idle timeout as expected", self.id);
                return SessionOutcome::Disconnected;
            }
            Err(e) => {
                tally.errors += 1;
                warn!("Session {} probe write failed: {}", self.id, e);
                return classify_io(&e);
            }
            Ok(()) => tally.sent += 1,
        }

        match bounded_read(reader, self.response_timeout).await {
            ReadEvent::Closed => {
                info!("Session {} kicked by idle timeout as expected", self.id);
                SessionOutcome::Disconnected
            }
            ReadEvent::Line(_) => {
                // The server answered: the idle timeout was never enforced
                tally.received += 1;
                tally.errors += 1;
                warn!("Session {} survived the idle window", self.id);
                SessionOutcome::Completed
            }
            ReadEvent::TimedOut => {
                tally.errors += 1;
                warn!("Session {} survived the idle window", self.id);
                SessionOutcome::Completed
            }
            ReadEvent::Failed(e) => {
                if is_peer_close(&e) {
                    info!("Session {} kicked by idle timeout as expected", self.id);
                    SessionOutcome::Disconnected
                } else {
                    tally.errors += 1;
                    classify_io(&e)
                }
            }
        }
    }

    /// Read the welcome, join a room, chat once and linger for broadcasts.
    /// A missed confirmation is tolerated; a peer close is not.
    async fn run_room_joiner(
        &self,
        reader: &mut BufReader<OwnedReadHalf>,
        writer: &mut OwnedWriteHalf,
        tally: &mut Tally,
        room_id: u32,
        chat_message: &str,
        linger: Duration,
    ) -> SessionOutcome {
        // Welcome text is unsolicited and not counted as a response
        match bounded_read(reader, self.response_timeout).await {
            ReadEvent::Line(welcome) => {
                debug!("Session {} welcomed: {}", self.id, welcome.trim());
            }
            ReadEvent::TimedOut => tally.errors += 1,
            ReadEvent::Closed => {
                tally.errors += 1;
                return SessionOutcome::Disconnected;
            }
            ReadEvent::Failed(e) => {
                tally.errors += 1;
                return classify_io(&e);
            }
        }

        let join = format!("/join {}\n", room_id);
        if let Err(e) = writer.write_all(join.as_bytes()).await {
            tally.errors += 1;
            return classify_io(&e);
        }
        tally.sent += 1;

        match bounded_read(reader, self.response_timeout).await {
            ReadEvent::Line(confirm) => {
                tally.received += 1;
                debug!("Session {} joined room {}: {}", self.id, room_id, confirm.trim());
            }
            ReadEvent::TimedOut => tally.errors += 1,
            ReadEvent::Closed => {
                tally.errors += 1;
                return SessionOutcome::Disconnected;
            }
            ReadEvent::Failed(e) => {
                tally.errors += 1;
                return classify_io(&e);
            }
        }

        let chat = format!("{}\n", chat_message);
        if let Err(e) = writer.write_all(chat.as_bytes()).await {
            tally.errors += 1;
            return classify_io(&e);
        }
        tally.sent += 1;

        // Linger to collect whatever the room broadcasts; an empty window is
        // not an error.
        let linger_deadline = Instant::now() + linger;
        loop {
            let remaining = linger_deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                break;
            }

            match bounded_read(reader, remaining).await {
                ReadEvent::Line(_) => tally.received += 1,
                ReadEvent::TimedOut => break,
                ReadEvent::Closed => {
                    tally.errors += 1;
                    return SessionOutcome::Disconnected;
                }
                ReadEvent::Failed(e) => {
                    tally.errors += 1;
                    return classify_io(&e);
                }
            }
        }

        SessionOutcome::Completed
    }
}

/// One timeout-bounded line read, folded into a structured event
async fn bounded_read(reader: &mut BufReader<OwnedReadHalf>, limit: Duration) -> ReadEvent {
    let mut line = String::new();
    match timeout(limit, reader.read_line(&mut line)).await {
        Err(_elapsed) => ReadEvent::TimedOut,
        Ok(Ok(0)) => ReadEvent::Closed,
        Ok(Ok(_)) => ReadEvent::Line(line),
        Ok(Err(e)) if is_peer_close(&e) => ReadEvent::Closed,
        Ok(Err(e)) => ReadEvent::Failed(e),
    }
}

fn is_peer_close(e: &std::io::Error) -> bool {
    matches!(
        e.kind(),
        ErrorKind::ConnectionReset
            | ErrorKind::ConnectionAborted
            | ErrorKind::BrokenPipe
            | ErrorKind::UnexpectedEof
    )
}

/// Map a low-level I/O fault onto the session outcome taxonomy
fn classify_io(e: &std::io::Error) -> SessionOutcome {
    match e.kind() {
        ErrorKind::ConnectionRefused => SessionOutcome::ConnectionRefused,
        ErrorKind::ConnectionReset
        | ErrorKind::ConnectionAborted
        | ErrorKind::BrokenPipe
        | ErrorKind::UnexpectedEof => SessionOutcome::Disconnected,
        ErrorKind::TimedOut | ErrorKind::WouldBlock => SessionOutcome::TimedOut,
        _ => SessionOutcome::UnexpectedError,
    }
}
