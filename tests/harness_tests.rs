//! End-to-end harness tests against in-process mock chat servers
//!
//! Each mock server binds an ephemeral port and implements just enough of
//! the line-oriented chat contract (welcome text, /join confirmation, echo,
//! idle timeout) for sessions to run their full scripts with compressed
//! durations.

use flood::common::SessionId;
use flood::config::Config;
use flood::metrics::MetricsAggregator;
use flood::profile::{BehaviorProfile, ProfilePlan};
use flood::session::{Session, SessionManager, SessionOutcome};

use std::net::SocketAddr;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpListener;
use tokio::time::timeout;

/// Echo server: every received line is sent straight back
async fn spawn_echo_server() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");

    tokio::spawn(async move {
        loop {
            let Ok((stream, _)) = listener.accept().await else {
                break;
            };
            tokio::spawn(async move {
                let (read_half, mut write_half) = stream.into_split();
                let mut lines = BufReader::new(read_half).lines();
                while let Ok(Some(line)) = lines.next_line().await {
                    let reply = format!("{}\n", line);
                    if write_half.write_all(reply.as_bytes()).await.is_err() {
                        break;
                    }
                }
            });
        }
    });

    addr
}

/// Echo server that force-closes any connection silent for `idle`
async fn spawn_idle_timeout_server(idle: Duration) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");

    tokio::spawn(async move {
        loop {
            let Ok((stream, _)) = listener.accept().await else {
                break;
            };
            tokio::spawn(async move {
                let (read_half, mut write_half) = stream.into_split();
                let mut lines = BufReader::new(read_half).lines();
                loop {
                    match timeout(idle, lines.next_line()).await {
                        Ok(Ok(Some(line))) => {
                            let reply = format!("{}\n", line);
                            if write_half.write_all(reply.as_bytes()).await.is_err() {
                                break;
                            }
                        }
                        // Idle deadline hit or the client went away: drop
                        // the connection, which closes the socket.
                        _ => break,
                    }
                }
            });
        }
    });

    addr
}

/// Room server: welcome on connect, confirms /join, echoes chat lines back
/// prefixed with the room tag
async fn spawn_room_server() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");

    tokio::spawn(async move {
        loop {
            let Ok((stream, _)) = listener.accept().await else {
                break;
            };
            tokio::spawn(async move {
                let (read_half, mut write_half) = stream.into_split();
                let mut lines = BufReader::new(read_half).lines();
                if write_half
                    .write_all(b"Welcome to the chat server!\n")
                    .await
                    .is_err()
                {
                    return;
                }

                let mut room = String::from("lobby");
                while let Ok(Some(line)) = lines.next_line().await {
                    let reply = if let Some(requested) = line.strip_prefix("/join ") {
                        room = requested.trim().to_string();
                        format!("You moved to room {}.\n", room)
                    } else {
                        format!("[room {}] {}\n", room, line)
                    };
                    if write_half.write_all(reply.as_bytes()).await.is_err() {
                        break;
                    }
                }
            });
        }
    });

    addr
}

/// Server that accepts connections but never responds to anything
async fn spawn_silent_server() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");

    tokio::spawn(async move {
        let mut held = Vec::new();
        loop {
            let Ok((stream, _)) = listener.accept().await else {
                break;
            };
            held.push(stream);
        }
    });

    addr
}

fn compressed_config(addr: SocketAddr, clients: u32, profile: ProfilePlan) -> Config {
    let mut config = Config::preset(&addr.ip().to_string(), addr.port(), clients, profile);
    config.run.spawn_stagger = Duration::from_millis(5);
    config.run.connect_timeout = Duration::from_millis(500);
    config.run.response_timeout = Duration::from_secs(1);
    config
}

#[tokio::test]
async fn echo_stress_run_against_listening_target() {
    let addr = spawn_echo_server().await;
    let config = compressed_config(
        addr,
        10,
        ProfilePlan::EchoStress { message_count: 1 },
    );

    let report = SessionManager::new(config).run().await;

    assert_eq!(report.total_clients, 10);
    assert_eq!(report.connected_count, 10);
    assert_eq!(report.failed_connect_count, 0);
    assert_eq!(report.messages_sent_total, 10);
    assert_eq!(report.messages_received_total, 10);
    assert_eq!(report.errors_total, 0);
    assert!(report.messages_received_total <= report.messages_sent_total);
    assert!(report.success_rate() > 99.0);
}

#[tokio::test]
async fn all_connections_refused_when_target_is_down() {
    // Bind then drop to get a port with nothing listening
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    drop(listener);

    let config = compressed_config(addr, 5, ProfilePlan::EchoStress { message_count: 3 });
    let report = SessionManager::new(config).run().await;

    assert_eq!(report.total_clients, 5);
    assert_eq!(report.connected_count, 0);
    assert_eq!(report.failed_connect_count, 5);
    assert_eq!(report.messages_sent_total, 0);
    assert_eq!(report.success_rate(), 0.0);
    assert_eq!(report.throughput(), 0.0);
}

#[tokio::test]
async fn heartbeat_survives_while_zombie_gets_kicked() {
    // Server kicks after 400ms of silence; the heartbeat stays well under
    // that, the zombie sleeps well past it.
    let addr = spawn_idle_timeout_server(Duration::from_millis(400)).await;

    let heartbeat = Session::new(
        SessionId::new(0),
        addr.to_string(),
        BehaviorProfile::ActiveHeartbeat {
            interval: Duration::from_millis(100),
            total_duration: Duration::from_millis(1000),
        },
        Duration::from_millis(500),
        Duration::from_secs(1),
    );
    let zombie = Session::new(
        SessionId::new(1),
        addr.to_string(),
        BehaviorProfile::ZombieIdle {
            idle_duration: Duration::from_millis(900),
        },
        Duration::from_millis(500),
        Duration::from_secs(1),
    );

    let (heartbeat_result, zombie_result) = tokio::join!(heartbeat.run(), zombie.run());

    assert!(heartbeat_result.connected);
    assert_eq!(heartbeat_result.outcome, SessionOutcome::Completed);
    assert_eq!(heartbeat_result.errors, 0);
    assert!(heartbeat_result.messages_sent >= 5);

    assert!(zombie_result.connected);
    assert_eq!(zombie_result.outcome, SessionOutcome::Disconnected);
    assert_eq!(zombie_result.errors, 0);

    // Both fold cleanly into one aggregate
    let aggregator = MetricsAggregator::new();
    aggregator.merge(&heartbeat_result);
    aggregator.merge(&zombie_result);
    let report = aggregator.finalize(Duration::from_secs(2));
    assert_eq!(report.connected_count + report.failed_connect_count, 2);
    assert!(report.messages_received_total <= report.messages_sent_total);
}

#[tokio::test]
async fn zombie_survival_is_reported_as_anomaly() {
    // No idle timeout here, so the zombie's probe gets answered
    let addr = spawn_echo_server().await;

    let zombie = Session::new(
        SessionId::new(0),
        addr.to_string(),
        BehaviorProfile::ZombieIdle {
            idle_duration: Duration::from_millis(200),
        },
        Duration::from_millis(500),
        Duration::from_secs(1),
    );

    let result = zombie.run().await;
    assert_eq!(result.outcome, SessionOutcome::Completed);
    assert_eq!(result.errors, 1);
}

#[tokio::test]
async fn room_joiners_complete_and_collect_confirmations() {
    let addr = spawn_room_server().await;
    let config = compressed_config(
        addr,
        2,
        ProfilePlan::RoomJoiner {
            room_count: 2,
            linger: Duration::from_millis(300),
        },
    );

    let report = SessionManager::new(config).run().await;

    assert_eq!(report.total_clients, 2);
    assert_eq!(report.connected_count, 2);
    assert_eq!(report.errors_total, 0);
    // Each session sends /join plus one chat line
    assert_eq!(report.messages_sent_total, 4);
    // Join confirmation plus the chat echo within the linger window
    assert_eq!(report.messages_received_total, 4);
    assert!(report.messages_received_total <= report.messages_sent_total);
}

#[tokio::test]
async fn echo_stress_aborts_on_first_missed_response() {
    let addr = spawn_silent_server().await;

    let session = Session::new(
        SessionId::new(0),
        addr.to_string(),
        BehaviorProfile::EchoStress { message_count: 3 },
        Duration::from_millis(500),
        Duration::from_millis(100),
    );

    let result = session.run().await;
    assert!(result.connected);
    assert_eq!(result.outcome, SessionOutcome::TimedOut);
    assert_eq!(result.messages_sent, 1);
    assert_eq!(result.messages_received, 0);
    assert_eq!(result.errors, 1);
}
