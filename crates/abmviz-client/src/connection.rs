use std::io;
use std::net::TcpStream;

use abmviz_core::state::Applied;
use abmviz_core::RenderState;
use thiserror::Error;
use tungstenite::stream::MaybeTlsStream;
use tungstenite::{Message, WebSocket};

type ClientSocket = WebSocket<MaybeTlsStream<TcpStream>>;

/// Frames read per [`RenderFeed::pump`] call unless overridden.
pub const DEFAULT_FRAME_BUDGET: usize = 64;

// ── Errors ────────────────────────────────────────────────────────────

#[derive(Error, Debug)]
pub enum ConnectionError {
    #[error("WebSocket connect to {url} failed: {source}")]
    Connect {
        url: String,
        source: tungstenite::Error,
    },

    #[error("WebSocket transport error: {0}")]
    Transport(#[from] tungstenite::Error),

    #[error("Socket setup failed: {0}")]
    Io(#[from] io::Error),
}

// ── State ─────────────────────────────────────────────────────────────

/// `Disconnected -> Connecting -> Open -> (Closed | Errored)`.
///
/// `Closed` and `Errored` are terminal: there is no reconnect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Open,
    Closed,
    Errored,
}

impl ConnectionState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, ConnectionState::Closed | ConnectionState::Errored)
    }
}

/// Counters for everything read off the socket.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConnectionStats {
    pub frames: u64,
    pub applied: u64,
    pub ignored: u64,
    pub malformed: u64,
}

/// Something that writes inbound render data into a [`RenderState`].
pub trait RenderFeed {
    /// Apply what is available right now without blocking, up to a
    /// per-call frame cap. Returns the number of frames read.
    fn pump(&mut self, state: &mut RenderState) -> usize;

    fn connection_state(&self) -> ConnectionState;
}

// ── Connection ────────────────────────────────────────────────────────

pub struct Connection {
    url: String,
    max_message_bytes: usize,
    frame_budget: usize,
    socket: Option<ClientSocket>,
    state: ConnectionState,
    stats: ConnectionStats,
}

impl Connection {
    pub fn new(url: &str, max_message_bytes: usize) -> Self {
        Self {
            url: url.to_string(),
            max_message_bytes,
            frame_budget: DEFAULT_FRAME_BUDGET,
            socket: None,
            state: ConnectionState::Disconnected,
            stats: ConnectionStats::default(),
        }
    }

    /// Create and connect in one step.
    pub fn open(url: &str, max_message_bytes: usize) -> Result<Self, ConnectionError> {
        let mut connection = Self::new(url, max_message_bytes);
        connection.connect()?;
        Ok(connection)
    }

    /// Cap on frames read by a single `pump`. Zero is treated as one.
    pub fn with_frame_budget(mut self, frames: usize) -> Self {
        self.frame_budget = frames.max(1);
        self
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    pub fn stats(&self) -> ConnectionStats {
        self.stats
    }

    /// Perform the handshake. Only valid from `Disconnected`; calling it in
    /// any other state is a no-op.
    pub fn connect(&mut self) -> Result<(), ConnectionError> {
        if self.state != ConnectionState::Disconnected {
            return Ok(());
        }
        self.state = ConnectionState::Connecting;
        log::debug!("Connecting to {}", self.url);

        let (mut socket, _response) = match tungstenite::connect(self.url.as_str()) {
            Ok(pair) => pair,
            Err(source) => {
                let err = ConnectionError::Connect {
                    url: self.url.clone(),
                    source,
                };
                log::error!("{}", err);
                self.state = ConnectionState::Errored;
                return Err(err);
            }
        };

        if let Err(err) = set_nonblocking(&mut socket) {
            let err = ConnectionError::Io(err);
            log::error!("{}", err);
            self.state = ConnectionState::Errored;
            return Err(err);
        }

        self.socket = Some(socket);
        self.state = ConnectionState::Open;
        log::info!("WebSocket connection to {} ready", self.url);
        Ok(())
    }

    fn handle_text(&mut self, text: &str, state: &mut RenderState) {
        match state.apply_text(text, self.max_message_bytes) {
            Ok(Applied::Replaced { .. }) => self.stats.applied += 1,
            Ok(Applied::Ignored { .. }) => self.stats.ignored += 1,
            Err(err) => {
                self.stats.malformed += 1;
                log::warn!("Discarding message: {}", err);
            }
        }
    }

    fn close(&mut self, code: u16, reason: &str) {
        if let Some(mut socket) = self.socket.take() {
            // Best effort: push out the queued close reply.
            let _ = socket.flush();
        }
        self.state = ConnectionState::Closed;
        log::info!("WebSocket connection closed ({}): {}", code, reason);
    }

    fn fail(&mut self, err: ConnectionError) {
        log::error!("{}", err);
        self.socket = None;
        self.state = ConnectionState::Errored;
    }
}

impl RenderFeed for Connection {
    fn pump(&mut self, state: &mut RenderState) -> usize {
        if self.state != ConnectionState::Open {
            return 0;
        }

        let mut frames = 0;
        while frames < self.frame_budget {
            let Some(socket) = self.socket.as_mut() else {
                break;
            };

            let message = match socket.read() {
                Ok(message) => message,
                Err(tungstenite::Error::Io(err)) if err.kind() == io::ErrorKind::WouldBlock => {
                    break;
                }
                Err(tungstenite::Error::ConnectionClosed)
                | Err(tungstenite::Error::AlreadyClosed) => {
                    self.close(1000, "connection closed");
                    break;
                }
                Err(err) => {
                    self.fail(ConnectionError::Transport(err));
                    break;
                }
            };

            frames += 1;
            self.stats.frames += 1;
            match message {
                Message::Text(text) => self.handle_text(&text, state),
                Message::Binary(bytes) => {
                    log::debug!("Ignoring {} byte binary frame", bytes.len());
                }
                Message::Close(frame) => {
                    let (code, reason) = frame
                        .map(|f| (u16::from(f.code), f.reason.to_string()))
                        .unwrap_or((1005, String::new()));
                    self.close(code, &reason);
                    break;
                }
                // Pings are answered by the transport.
                Message::Ping(_) | Message::Pong(_) | Message::Frame(_) => {}
            }
        }
        frames
    }

    fn connection_state(&self) -> ConnectionState {
        self.state
    }
}

fn set_nonblocking(socket: &mut ClientSocket) -> io::Result<()> {
    match socket.get_mut() {
        MaybeTlsStream::Plain(stream) => stream.set_nonblocking(true),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use abmviz_core::{Colour, Point};
    use std::net::TcpListener;
    use std::thread::{self, JoinHandle};
    use std::time::{Duration, Instant};

    const LIMIT: usize = 1 << 20;

    fn render_json(x: f64, y: f64, colour: Colour, bg: Colour) -> String {
        serde_json::json!({
            "type": "render",
            "data": {
                "cpp": [{"position": {"x": x, "y": y}, "colour": colour}],
                "vp": [{"agents": 1}],
                "bg": bg,
            }
        })
        .to_string()
    }

    /// One-shot server: accepts a single client, sends `frames`, then closes.
    fn serve(frames: Vec<Message>) -> (String, JoinHandle<()>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = thread::spawn(move || {
            let (stream, _) = listener.accept().unwrap();
            let mut ws = tungstenite::accept(stream).unwrap();
            for frame in frames {
                ws.send(frame).unwrap();
            }
            let _ = ws.close(None);
            while ws.read().is_ok() {}
        });
        (format!("ws://{}/ws", addr), handle)
    }

    fn pump_until_done(connection: &mut Connection, state: &mut RenderState) {
        let deadline = Instant::now() + Duration::from_secs(5);
        while connection.state() == ConnectionState::Open && Instant::now() < deadline {
            connection.pump(state);
            thread::sleep(Duration::from_millis(5));
        }
    }

    #[test]
    fn test_new_connection_is_disconnected() {
        let mut connection = Connection::new("ws://127.0.0.1:1/ws", LIMIT);
        let mut state = RenderState::default();
        assert_eq!(connection.state(), ConnectionState::Disconnected);
        assert_eq!(connection.pump(&mut state), 0);
        assert_eq!(state, RenderState::default());
    }

    #[test]
    fn test_connect_refused_is_errored() {
        let addr = {
            let listener = TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap()
        };
        let mut connection = Connection::new(&format!("ws://{}/ws", addr), LIMIT);
        let err = connection.connect().unwrap_err();
        assert!(matches!(err, ConnectionError::Connect { .. }));
        assert_eq!(connection.state(), ConnectionState::Errored);
        assert!(connection.state().is_terminal());
    }

    #[test]
    fn test_render_frames_update_state() {
        let red = Colour::new(255, 0, 0);
        let (url, server) = serve(vec![
            Message::text(render_json(1.0, 1.0, Colour::WHITE, Colour::WHITE)),
            Message::text(render_json(10.0, 20.0, red, Colour::BLACK)),
        ]);

        let mut connection = Connection::open(&url, LIMIT).unwrap();
        assert_eq!(connection.state(), ConnectionState::Open);

        let mut state = RenderState::default();
        pump_until_done(&mut connection, &mut state);
        server.join().unwrap();

        assert_eq!(connection.state(), ConnectionState::Closed);
        assert_eq!(state.points, vec![Point::new(10.0, 20.0, red)]);
        assert_eq!(state.viewport_meta, vec![serde_json::json!({"agents": 1})]);
        assert_eq!(state.background, Colour::BLACK);
        assert_eq!(connection.stats().applied, 2);
    }

    #[test]
    fn test_bad_frames_do_not_close_connection() {
        let blue = Colour::new(0, 0, 255);
        let (url, server) = serve(vec![
            Message::text("{definitely not json"),
            Message::binary(vec![1, 2, 3]),
            Message::text(r#"{"type":"ping"}"#),
            Message::text(r#"{"type":"render"}"#),
            Message::text(render_json(5.0, 6.0, blue, Colour::new(9, 9, 9))),
        ]);

        let mut connection = Connection::open(&url, LIMIT).unwrap();
        let mut state = RenderState::default();
        pump_until_done(&mut connection, &mut state);
        server.join().unwrap();

        let stats = connection.stats();
        assert_eq!(stats.malformed, 2);
        assert_eq!(stats.ignored, 1);
        assert_eq!(stats.applied, 1);
        assert_eq!(state.points, vec![Point::new(5.0, 6.0, blue)]);
        assert_eq!(state.background, Colour::new(9, 9, 9));
    }

    #[test]
    fn test_oversized_frame_discarded() {
        let (url, server) = serve(vec![Message::text(render_json(
            1.0,
            2.0,
            Colour::WHITE,
            Colour::WHITE,
        ))]);

        let mut connection = Connection::open(&url, 16).unwrap();
        let mut state = RenderState::default();
        pump_until_done(&mut connection, &mut state);
        server.join().unwrap();

        assert_eq!(connection.stats().malformed, 1);
        assert_eq!(state, RenderState::default());
    }

    #[test]
    fn test_pump_after_close_is_noop() {
        let (url, server) = serve(Vec::new());
        let mut connection = Connection::open(&url, LIMIT).unwrap();
        let mut state = RenderState::default();
        pump_until_done(&mut connection, &mut state);
        server.join().unwrap();

        assert_eq!(connection.state(), ConnectionState::Closed);
        assert_eq!(connection.pump(&mut state), 0);
        connection.connect().unwrap();
        assert_eq!(connection.state(), ConnectionState::Closed);
    }

    #[test]
    fn test_pump_returns_while_server_keeps_sending() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!("ws://{}/ws", listener.local_addr().unwrap());
        let frame = render_json(3.0, 4.0, Colour::WHITE, Colour::BLACK);
        let server = thread::spawn(move || {
            let (stream, _) = listener.accept().unwrap();
            let mut ws = tungstenite::accept(stream).unwrap();
            // Sends until the client goes away.
            while ws.send(Message::text(frame.clone())).is_ok() {}
        });

        let (tx, rx) = std::sync::mpsc::channel();
        let client = thread::spawn(move || {
            let mut connection = Connection::open(&url, LIMIT).unwrap().with_frame_budget(8);
            thread::sleep(Duration::from_millis(200));
            let mut state = RenderState::default();
            let frames = connection.pump(&mut state);
            tx.send((frames, connection.state(), state.points.len())).unwrap();
        });

        let (frames, state, points) = rx
            .recv_timeout(Duration::from_secs(5))
            .expect("pump did not return while frames kept arriving");
        assert_eq!(frames, 8);
        assert_eq!(state, ConnectionState::Open);
        assert_eq!(points, 1);

        client.join().unwrap();
        server.join().unwrap();
    }

    #[test]
    fn test_dropped_stream_is_errored() {
        let blue = Colour::new(0, 0, 255);
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!("ws://{}/ws", listener.local_addr().unwrap());
        let frame = render_json(7.0, 8.0, blue, Colour::WHITE);
        let server = thread::spawn(move || {
            let (stream, _) = listener.accept().unwrap();
            let mut ws = tungstenite::accept(stream).unwrap();
            ws.send(Message::text(frame)).unwrap();
            // Drop the TCP stream without a close frame.
            drop(ws);
        });

        let mut connection = Connection::open(&url, LIMIT).unwrap();
        server.join().unwrap();

        let mut state = RenderState::default();
        pump_until_done(&mut connection, &mut state);

        assert_eq!(connection.state(), ConnectionState::Errored);
        assert_eq!(connection.pump(&mut state), 0);
        assert_eq!(state.points, vec![Point::new(7.0, 8.0, blue)]);
        assert_eq!(state.background, Colour::WHITE);
        assert_eq!(connection.stats().applied, 1);
    }
}
