//! Serves sessions over any byte stream.
//!
//! One connection is attached to at most one session. Commands are forwarded
//! to the session actor; every snapshot the actor publishes goes back out as
//! a `render` line, so answers that arrive later still reach the client.

use std::io;
use std::sync::Arc;

use anyhow::{Context, Result};
use artbuddy_application::{ActionResult, SessionDirectory, SessionHandle};
use artbuddy_core::error::ArtbuddyError;
use artbuddy_core::locale::UiStrings;
use artbuddy_core::render::RenderSnapshot;
use futures::{SinkExt, StreamExt};
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpListener;
use tokio::sync::watch;
use tokio_util::bytes::BytesMut;
use tokio_util::codec::{Decoder, FramedRead, FramedWrite, LinesCodec, LinesCodecError};
use tracing::Instrument;

use crate::protocol::{ClientMessage, ProtocolError, ServerMessage, decode_capture};

/// Slack on top of the base64 image size for the JSON envelope.
const LINE_OVERHEAD: usize = 64 * 1024;

type Renders = watch::Receiver<Arc<RenderSnapshot>>;

/// Longest line accepted for a given image limit.
pub fn max_line_length(max_image_bytes: usize) -> usize {
    max_image_bytes
        .div_ceil(3)
        .saturating_mul(4)
        .saturating_add(LINE_OVERHEAD)
}

/// Accepts TCP clients until the listener fails.
pub async fn serve_tcp(listener: TcpListener, directory: Arc<SessionDirectory>) -> Result<()> {
    loop {
        let (stream, peer) = listener
            .accept()
            .await
            .context("Failed to accept connection")?;
        let directory = directory.clone();
        let span = tracing::info_span!("connection", %peer);
        tokio::spawn(
            async move {
                tracing::info!("[Transport] Client connected");
                let (reader, writer) = stream.into_split();
                match serve_connection(reader, writer, directory).await {
                    Ok(()) => tracing::info!("[Transport] Client disconnected"),
                    Err(err) => tracing::warn!(error = %err, "[Transport] Connection ended"),
                }
            }
            .instrument(span),
        );
    }
}

/// Runs the protocol on one reader/writer pair until the reader closes.
pub async fn serve_connection<R, W>(
    reader: R,
    writer: W,
    directory: Arc<SessionDirectory>,
) -> Result<()>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    Connection::new(reader, writer, directory).run().await
}

/// One decoded client line, or the reason it was dropped.
#[derive(Debug, PartialEq, Eq)]
enum Inbound {
    Line(String),
    TooLong,
    NotUtf8,
}

/// `LinesCodec` that reports bad lines as frames.
///
/// A decoder error parks `FramedRead` until more bytes arrive, which would
/// stall lines already buffered behind the bad one.
struct InboundCodec {
    lines: LinesCodec,
}

impl InboundCodec {
    fn new(max_length: usize) -> Self {
        Self {
            lines: LinesCodec::new_with_max_length(max_length),
        }
    }

    fn classify(
        decoded: std::result::Result<Option<String>, LinesCodecError>,
    ) -> io::Result<Option<Inbound>> {
        match decoded {
            Ok(line) => Ok(line.map(Inbound::Line)),
            Err(LinesCodecError::MaxLineLengthExceeded) => Ok(Some(Inbound::TooLong)),
            Err(LinesCodecError::Io(err)) if err.kind() == io::ErrorKind::InvalidData => {
                Ok(Some(Inbound::NotUtf8))
            }
            Err(LinesCodecError::Io(err)) => Err(err),
        }
    }
}

impl Decoder for InboundCodec {
    type Item = Inbound;
    type Error = io::Error;

    fn decode(&mut self, buf: &mut BytesMut) -> io::Result<Option<Inbound>> {
        Self::classify(self.lines.decode(buf))
    }

    fn decode_eof(&mut self, buf: &mut BytesMut) -> io::Result<Option<Inbound>> {
        Self::classify(self.lines.decode_eof(buf))
    }
}

struct Connection<R, W> {
    lines: FramedRead<R, InboundCodec>,
    out: FramedWrite<W, LinesCodec>,
    directory: Arc<SessionDirectory>,
    strings: &'static UiStrings,
    line_limit: usize,
    session: Option<SessionHandle>,
    renders: Option<Renders>,
}

impl<R, W> Connection<R, W>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    fn new(reader: R, writer: W, directory: Arc<SessionDirectory>) -> Self {
        let settings = directory.settings();
        let line_limit = max_line_length(settings.max_image_bytes);
        let strings = settings.strings();
        Self {
            lines: FramedRead::new(reader, InboundCodec::new(line_limit)),
            out: FramedWrite::new(writer, LinesCodec::new()),
            directory,
            strings,
            line_limit,
            session: None,
            renders: None,
        }
    }

    async fn run(mut self) -> Result<()> {
        loop {
            tokio::select! {
                line = self.lines.next() => match line {
                    None => break,
                    Some(Ok(Inbound::Line(line))) => self.handle_line(&line).await?,
                    Some(Ok(Inbound::TooLong)) => {
                        let err = ProtocolError::LineTooLong { limit: self.line_limit };
                        self.send(ServerMessage::error(err)).await?;
                    }
                    Some(Ok(Inbound::NotUtf8)) => {
                        let err = ProtocolError::InvalidMessage("line is not valid UTF-8".into());
                        self.send(ServerMessage::error(err)).await?;
                    }
                    Some(Err(err)) => return Err(err).context("Failed to read from client"),
                },
                snapshot = next_render(&mut self.renders), if self.renders.is_some() => {
                    match snapshot {
                        Some(snapshot) => self.send(ServerMessage::Render { snapshot }).await?,
                        None => self.session_ended().await?,
                    }
                }
            }
        }
        Ok(())
    }

    async fn handle_line(&mut self, line: &str) -> Result<()> {
        if line.trim().is_empty() {
            return Ok(());
        }
        let message = match ClientMessage::parse(line) {
            Ok(message) => message,
            Err(err) => {
                tracing::debug!(error = %err, "[Transport] Unparseable line");
                return self.send(ServerMessage::error(err)).await;
            }
        };
        tracing::debug!(kind = message.kind(), "[Transport] Received");

        if let ClientMessage::Open { session_id } = message {
            return self.open(session_id.as_deref()).await;
        }

        let session = match &self.session {
            Some(session) => session.clone(),
            None => {
                self.open(None).await?;
                match &self.session {
                    Some(session) => session.clone(),
                    None => return Ok(()),
                }
            }
        };

        let outcome = match message {
            ClientMessage::Open { .. } => return Ok(()),
            ClientMessage::ToggleMode => session.toggle_mode().await.map(discard),
            ClientMessage::Capture {
                data,
                mime_type,
                file_name,
            } => match decode_capture(&data, &mime_type, file_name) {
                Ok(payload) => session.capture(payload).await,
                Err(err) => return self.send(ServerMessage::error(err)).await,
            },
            ClientMessage::ClearCapture => session.clear_capture().await,
            ClientMessage::Submit => session.submit().await,
            // The actor publishes the refreshed snapshot; it goes out as a render.
            ClientMessage::Refresh => session.refresh().await.map(|_| Ok(())),
        };

        match outcome {
            Ok(Ok(())) => Ok(()),
            Ok(Err(warning)) => self.send(ServerMessage::warning(&warning, self.strings)).await,
            Err(err) => self.session_failed(err).await,
        }
    }

    async fn open(&mut self, requested: Option<&str>) -> Result<()> {
        let session = self.directory.open(requested).await;
        let mut renders = session.subscribe();
        let snapshot = renders.borrow_and_update().clone();
        tracing::info!(session_id = session.id(), "[Transport] Attached");

        self.send(ServerMessage::Opened {
            session_id: session.id().to_string(),
        })
        .await?;
        self.session = Some(session);
        self.renders = Some(renders);
        self.send(ServerMessage::Render { snapshot }).await
    }

    async fn session_failed(&mut self, err: ArtbuddyError) -> Result<()> {
        if err.is_session_closed() {
            self.session_ended().await
        } else {
            self.send(ServerMessage::error(err)).await
        }
    }

    async fn session_ended(&mut self) -> Result<()> {
        let Some(session) = self.session.take() else {
            return Ok(());
        };
        self.renders = None;
        self.directory.remove(session.id()).await;
        tracing::info!(session_id = session.id(), "[Transport] Session ended");
        self.send(ServerMessage::error(ArtbuddyError::session_closed(
            session.id(),
        )))
        .await
    }

    async fn send(&mut self, message: ServerMessage) -> Result<()> {
        let line = serde_json::to_string(&message).context("Failed to encode message")?;
        tracing::debug!(kind = message.kind(), bytes = line.len(), "[Transport] Sent");
        self.out
            .send(line)
            .await
            .context("Failed to write to client")
    }
}

fn discard<T>(result: ActionResult<T>) -> ActionResult<()> {
    result.map(|_| ())
}

async fn next_render(renders: &mut Option<Renders>) -> Option<Arc<RenderSnapshot>> {
    match renders.as_mut() {
        Some(receiver) => match receiver.changed().await {
            Ok(()) => Some(receiver.borrow_and_update().clone()),
            Err(_) => None,
        },
        None => std::future::pending().await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bad_lines_do_not_block_the_next_one() {
        let mut codec = InboundCodec::new(8);
        let mut buf = BytesMut::from(&b"0123456789abc\n\xff\xfe\nok\n"[..]);

        assert_eq!(codec.decode(&mut buf).unwrap(), Some(Inbound::TooLong));
        assert_eq!(codec.decode(&mut buf).unwrap(), Some(Inbound::NotUtf8));
        assert_eq!(codec.decode(&mut buf).unwrap(), Some(Inbound::Line("ok".into())));
        assert_eq!(codec.decode(&mut buf).unwrap(), None);
    }

    #[test]
    fn trailing_line_without_newline_is_decoded_at_eof() {
        let mut codec = InboundCodec::new(64);
        let mut buf = BytesMut::from(&b"{\"type\":\"refresh\"}"[..]);
        assert_eq!(
            codec.decode_eof(&mut buf).unwrap(),
            Some(Inbound::Line(r#"{"type":"refresh"}"#.into()))
        );
    }

    #[test]
    fn line_limit_covers_base64_of_max_image() {
        assert_eq!(max_line_length(3), 4 + LINE_OVERHEAD);
        assert_eq!(max_line_length(4), 8 + LINE_OVERHEAD);
        assert!(max_line_length(200 * 1024 * 1024) > 200 * 1024 * 1024 / 3 * 4);
        assert_eq!(max_line_length(usize::MAX), usize::MAX);
    }
}
