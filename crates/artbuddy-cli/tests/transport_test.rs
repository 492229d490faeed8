use std::sync::Arc;
use std::time::Duration;

use artbuddy_application::{SessionDirectory, SessionSettings};
use artbuddy_cli::{serve_connection, serve_tcp};
use artbuddy_interaction::DryrunAgent;
use futures::StreamExt;
use serde_json::{Value, json};
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt, DuplexStream, ReadHalf, WriteHalf};
use tokio::net::{TcpListener, TcpStream};
use tokio_util::codec::{FramedRead, LinesCodec};

const PNG_BASE64: &str = "iVBORw0KGgo=";

struct Client<R, W> {
    lines: FramedRead<R, LinesCodec>,
    writer: W,
}

impl<R: AsyncRead + Unpin, W: AsyncWrite + Unpin> Client<R, W> {
    fn new(reader: R, writer: W) -> Self {
        Self {
            lines: FramedRead::new(reader, LinesCodec::new()),
            writer,
        }
    }

    async fn send(&mut self, message: Value) {
        self.send_raw(&message.to_string()).await;
    }

    async fn send_raw(&mut self, line: &str) {
        self.writer.write_all(line.as_bytes()).await.unwrap();
        self.writer.write_all(b"\n").await.unwrap();
        self.writer.flush().await.unwrap();
    }

    async fn send_bytes(&mut self, bytes: &[u8]) {
        self.writer.write_all(bytes).await.unwrap();
        self.writer.flush().await.unwrap();
    }

    async fn next(&mut self) -> Value {
        let line = tokio::time::timeout(Duration::from_secs(5), self.lines.next())
            .await
            .expect("timed out waiting for a server line")
            .expect("server closed the stream")
            .unwrap();
        serde_json::from_str(&line).unwrap()
    }

    /// Skips messages until one matches.
    async fn until(&mut self, predicate: impl Fn(&Value) -> bool) -> Value {
        loop {
            let message = self.next().await;
            if predicate(&message) {
                return message;
            }
        }
    }

    async fn open(&mut self, session_id: Option<&str>) -> (String, Value) {
        match session_id {
            Some(id) => self.send(json!({"type": "open", "session_id": id})).await,
            None => self.send(json!({"type": "open"})).await,
        }
        let opened = self.next().await;
        assert_eq!(opened["type"], "opened");
        let render = self.next().await;
        assert_eq!(render["type"], "render");
        (opened["session_id"].as_str().unwrap().to_string(), render)
    }
}

type DuplexClient = Client<ReadHalf<DuplexStream>, WriteHalf<DuplexStream>>;

fn directory() -> Arc<SessionDirectory> {
    directory_with(SessionSettings::default())
}

fn directory_with(settings: SessionSettings) -> Arc<SessionDirectory> {
    Arc::new(SessionDirectory::new(
        settings,
        Arc::new(DryrunAgent::new().with_latency(Duration::from_millis(200))),
    ))
}

fn connect(directory: &Arc<SessionDirectory>) -> DuplexClient {
    let (client, server) = tokio::io::duplex(64 * 1024);
    let (server_read, server_write) = tokio::io::split(server);
    tokio::spawn(serve_connection(server_read, server_write, directory.clone()));
    let (client_read, client_write) = tokio::io::split(client);
    Client::new(client_read, client_write)
}

fn is_idle_render_with(blocks: usize) -> impl Fn(&Value) -> bool {
    move |message| {
        message["type"] == "render"
            && message["snapshot"]["working"] == false
            && message["snapshot"]["blocks"].as_array().map(Vec::len) == Some(blocks)
    }
}

#[tokio::test]
async fn open_sends_id_and_greeting() {
    let directory = directory();
    let mut client = connect(&directory);

    let (session_id, render) = client.open(None).await;

    assert!(!session_id.is_empty());
    let snapshot = &render["snapshot"];
    assert_eq!(snapshot["session_id"], session_id.as_str());
    assert_eq!(snapshot["blocks"].as_array().unwrap().len(), 1);
    assert_eq!(snapshot["blocks"][0]["role"], "assistant");
    assert_eq!(snapshot["capture"]["mode"], "file");
    assert_eq!(snapshot["toggle_label"], "📸 카메라로 찍기");
}

#[tokio::test]
async fn capture_and_submit_round_trip() {
    let directory = directory();
    let mut client = connect(&directory);
    client.open(None).await;

    client
        .send(json!({"type": "capture", "data": PNG_BASE64, "mime_type": "image/png", "file_name": "sun.png"}))
        .await;
    let held = client.next().await;
    assert_eq!(held["type"], "render");
    assert_eq!(held["snapshot"]["capture"]["has_payload"], true);

    client.send(json!({"type": "submit"})).await;
    let working = client.next().await;
    assert_eq!(working["snapshot"]["working"], true);
    assert_eq!(working["snapshot"]["blocks"][1]["type"], "image");
    assert_eq!(working["snapshot"]["blocks"][1]["data"], PNG_BASE64);

    let done = client.until(is_idle_render_with(3)).await;
    let answer = &done["snapshot"]["blocks"][2];
    assert_eq!(answer["role"], "assistant");
    assert!(answer["markdown"].as_str().unwrap().contains("image/png"));
    assert_eq!(done["snapshot"]["capture"]["has_payload"], false);
}

#[tokio::test]
async fn submit_without_capture_is_a_warning() {
    let directory = directory();
    let mut client = connect(&directory);
    client.open(None).await;

    client.send(json!({"type": "submit"})).await;
    let warning = client.next().await;

    assert_eq!(warning["type"], "warning");
    assert_eq!(warning["kind"], "missing_input");
    assert!(warning["message"].as_str().unwrap().contains("파일"));
}

#[tokio::test]
async fn toggle_pushes_a_render() {
    let directory = directory();
    let mut client = connect(&directory);
    client.open(None).await;

    client.send(json!({"type": "toggle_mode"})).await;
    let render = client.next().await;

    assert_eq!(render["snapshot"]["capture"]["mode"], "camera");
    assert_eq!(render["snapshot"]["toggle_label"], "📁 파일로 올리기");
    assert!(render["snapshot"]["capture"]["hint"].is_string());
}

#[tokio::test]
async fn bad_lines_get_errors_and_the_connection_survives() {
    let directory = directory();
    let mut client = connect(&directory);
    client.open(None).await;

    client.send_raw("this is not json").await;
    assert_eq!(client.next().await["type"], "error");

    client
        .send(json!({"type": "capture", "data": "@@@", "mime_type": "image/png"}))
        .await;
    let error = client.next().await;
    assert_eq!(error["type"], "error");
    assert!(error["message"].as_str().unwrap().contains("image data"));

    client.send(json!({"type": "refresh"})).await;
    assert_eq!(client.next().await["type"], "render");
}

#[tokio::test]
async fn over_long_line_is_an_error_and_the_connection_survives() {
    let directory = directory_with(SessionSettings {
        max_image_bytes: 3,
        ..SessionSettings::default()
    });
    let mut client = connect(&directory);
    client.open(None).await;

    client.send_raw(&"a".repeat(80_000)).await;
    let error = client.next().await;
    assert_eq!(error["type"], "error");
    assert!(error["message"].as_str().unwrap().contains("line exceeds"));

    client.send(json!({"type": "refresh"})).await;
    assert_eq!(client.next().await["type"], "render");
}

#[tokio::test]
async fn non_utf8_line_is_an_error_and_the_next_line_still_runs() {
    let directory = directory();
    let mut client = connect(&directory);
    client.open(None).await;

    client.send_bytes(b"\xff\xfe\n{\"type\":\"refresh\"}\n").await;

    let error = client.next().await;
    assert_eq!(error["type"], "error");
    assert!(error["message"].as_str().unwrap().contains("UTF-8"));
    assert_eq!(client.next().await["type"], "render");
}

#[tokio::test]
async fn commands_before_open_start_a_session() {
    let directory = directory();
    let mut client = connect(&directory);

    client.send(json!({"type": "refresh"})).await;

    assert_eq!(client.next().await["type"], "opened");
    assert_eq!(client.next().await["type"], "render");
    assert_eq!(directory.live_count().await, 1);
}

#[tokio::test]
async fn reconnect_with_session_id_keeps_history() {
    let directory = directory();
    let mut first = connect(&directory);
    let (session_id, _) = first.open(None).await;
    first
        .send(json!({"type": "capture", "data": PNG_BASE64, "mime_type": "image/png"}))
        .await;
    first.send(json!({"type": "submit"})).await;
    first.until(is_idle_render_with(3)).await;
    drop(first);

    let mut second = connect(&directory);
    let (reattached, render) = second.open(Some(&session_id)).await;
    assert_eq!(reattached, session_id);
    assert_eq!(render["snapshot"]["blocks"].as_array().unwrap().len(), 3);

    let mut stranger = connect(&directory);
    let (other, render) = stranger.open(None).await;
    assert_ne!(other, session_id);
    assert_eq!(render["snapshot"]["blocks"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn tcp_server_speaks_the_same_protocol() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(serve_tcp(listener, directory()));

    let stream = TcpStream::connect(addr).await.unwrap();
    let (reader, writer) = stream.into_split();
    let mut client = Client::new(reader, writer);

    let (_, render) = client.open(None).await;
    assert_eq!(render["snapshot"]["capture"]["submit_label"], "선생님께 그림/사진 보여주기!");
}
