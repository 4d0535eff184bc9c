//! Message framing over byte streams.
//!
//! Every message is a block of `Key: Value` header lines ended by an empty
//! line, followed by exactly `Content-Length` bytes of UTF-8 JSON:
//!
//! ```text
//! Content-Length: 44\r\n
//! \r\n
//! {"jsonrpc":"2.0","id":1,"method":"shutdown"}
//! ```
//!
//! Reading is strict about the length header: a missing, unparsable or
//! non-positive `Content-Length` ends the session just like end of input.

use std::io::{BufRead, Read, Write};

use serde::Serialize;

use crate::error::TransportError;
use crate::message::Message;

/// Outgoing wire form: the message fields plus the protocol version tag.
#[derive(Serialize)]
struct JsonRpc<'a> {
    jsonrpc: &'static str,
    #[serde(flatten)]
    msg: &'a Message,
}

/// Read the next message from `reader`.
///
/// Returns `Ok(None)` when the stream is exhausted, when the header block
/// has no usable `Content-Length`, or when the body is cut short.
pub fn read_message<R: BufRead>(reader: &mut R) -> Result<Option<Message>, TransportError> {
    let Some(length) = read_content_length(reader)? else {
        return Ok(None);
    };

    // Grows with the bytes actually received, never with the announced length
    let mut body = Vec::new();
    reader.by_ref().take(length as u64).read_to_end(&mut body)?;
    if body.len() < length {
        tracing::warn!(
            "Input ended after {} of {length} message body bytes",
            body.len()
        );
        return Ok(None);
    }

    let text = String::from_utf8_lossy(&body);
    tracing::trace!("<- {text}");
    let msg = Message::from_json(&text)?;
    Ok(Some(msg))
}

/// Consume the header block and return the announced body length.
fn read_content_length<R: BufRead>(reader: &mut R) -> Result<Option<usize>, TransportError> {
    let mut content_length: Option<i64> = None;
    let mut buf = Vec::new();

    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            return Ok(None);
        }

        let line = String::from_utf8_lossy(&buf);
        let line = line.trim_end_matches(|c: char| c == '\r' || c == '\n');
        if line.is_empty() {
            break;
        }

        if let Some((key, value)) = line.split_once(':') {
            if key.trim().eq_ignore_ascii_case("content-length") {
                content_length = value.trim().parse().ok();
            }
        }
    }

    match content_length {
        Some(length) if length > 0 => Ok(usize::try_from(length).ok()),
        _ => {
            tracing::warn!("Header block without a positive Content-Length");
            Ok(None)
        }
    }
}

/// Write one message to `writer` and flush it.
pub fn write_message<W: Write>(writer: &mut W, msg: &Message) -> Result<(), TransportError> {
    let body = serde_json::to_vec(&JsonRpc {
        jsonrpc: "2.0",
        msg,
    })?;
    tracing::trace!("-> {}", String::from_utf8_lossy(&body));

    write!(writer, "Content-Length: {}\r\n\r\n", body.len())?;
    writer.write_all(&body)?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::{RequestId, Response};
    use std::io::Cursor;

    fn frame(body: &str) -> String {
        format!("Content-Length: {}\r\n\r\n{body}", body.len())
    }

    #[test]
    fn test_read_request() {
        let input = frame(r#"{"jsonrpc":"2.0","id":1,"method":"shutdown"}"#);
        let msg = read_message(&mut Cursor::new(input)).unwrap();

        match msg {
            Some(Message::Request(req)) => {
                assert_eq!(req.method, "shutdown");
                assert_eq!(req.id, RequestId::from(1_i64));
            }
            other => panic!("expected request, got {other:?}"),
        }
    }

    #[test]
    fn test_read_notification_without_id() {
        let input = frame(r#"{"jsonrpc":"2.0","method":"exit"}"#);
        let msg = read_message(&mut Cursor::new(input)).unwrap();
        assert!(matches!(msg, Some(Message::Notification(n)) if n.method == "exit"));
    }

    #[test]
    fn test_header_name_case_and_extra_headers() {
        let body = r#"{"jsonrpc":"2.0","method":"initialized","params":{}}"#;
        let input = format!(
            "content-length: {}\nContent-Type: application/vscode-jsonrpc\n\n{body}",
            body.len()
        );
        let msg = read_message(&mut Cursor::new(input)).unwrap();
        assert!(matches!(msg, Some(Message::Notification(_))));
    }

    #[test]
    fn test_reads_consecutive_messages() {
        let input = format!(
            "{}{}",
            frame(r#"{"jsonrpc":"2.0","method":"initialized"}"#),
            frame(r#"{"jsonrpc":"2.0","method":"exit"}"#)
        );
        let mut cursor = Cursor::new(input);
        assert!(read_message(&mut cursor).unwrap().is_some());
        assert!(read_message(&mut cursor).unwrap().is_some());
        assert!(read_message(&mut cursor).unwrap().is_none());
    }

    #[test]
    fn test_end_of_stream() {
        assert!(read_message(&mut Cursor::new("")).unwrap().is_none());
    }

    #[test]
    fn test_missing_or_bad_length_ends_session() {
        let no_length = "Content-Type: x\r\n\r\n{}";
        assert!(read_message(&mut Cursor::new(no_length)).unwrap().is_none());

        let zero = "Content-Length: 0\r\n\r\n";
        assert!(read_message(&mut Cursor::new(zero)).unwrap().is_none());

        let negative = "Content-Length: -4\r\n\r\n";
        assert!(read_message(&mut Cursor::new(negative)).unwrap().is_none());

        let garbage = "Content-Length: ten\r\n\r\n";
        assert!(read_message(&mut Cursor::new(garbage)).unwrap().is_none());
    }

    #[test]
    fn test_truncated_body_ends_session() {
        let input = "Content-Length: 100\r\n\r\n{\"jsonrpc\":";
        assert!(read_message(&mut Cursor::new(input)).unwrap().is_none());
    }

    #[test]
    fn test_huge_length_ends_session_without_allocating() {
        let input = "Content-Length: 1000000000000000\r\n\r\n{}";
        assert!(read_message(&mut Cursor::new(input)).unwrap().is_none());
    }

    #[test]
    fn test_large_request_id_is_read_as_request() {
        let input = frame(r#"{"jsonrpc":"2.0","id":4294967296,"method":"shutdown"}"#);
        match read_message(&mut Cursor::new(input)).unwrap() {
            Some(Message::Request(req)) => {
                assert_eq!(req.id.as_value(), &serde_json::json!(4_294_967_296_u64));
            }
            other => panic!("expected request, got {other:?}"),
        }
    }

    #[test]
    fn test_malformed_body_is_an_error() {
        let input = frame("{not json");
        let err = read_message(&mut Cursor::new(input)).unwrap_err();
        assert!(matches!(err, TransportError::Malformed(_)));
    }

    #[test]
    fn test_write_message_framing() {
        let msg = Message::Response(Response::new_ok(
            RequestId::from(7_i64),
            serde_json::Value::Null,
        ));
        let mut out = Vec::new();
        write_message(&mut out, &msg).unwrap();

        let out = String::from_utf8(out).unwrap();
        let (header, body) = out.split_once("\r\n\r\n").unwrap();
        assert_eq!(header, format!("Content-Length: {}", body.len()));

        let value: serde_json::Value = serde_json::from_str(body).unwrap();
        assert_eq!(value["jsonrpc"], "2.0");
        assert_eq!(value["id"], 7);
        assert!(value["result"].is_null());
        assert!(value.get("error").is_none());
    }

    #[test]
    fn test_write_then_read_notification() {
        let msg = Message::Notification(lsp_server::Notification::new(
            "textDocument/publishDiagnostics".to_string(),
            serde_json::json!({ "uri": "file:///a.pua", "diagnostics": [] }),
        ));
        let mut out = Vec::new();
        write_message(&mut out, &msg).unwrap();

        let read = read_message(&mut Cursor::new(out)).unwrap();
        match read {
            Some(Message::Notification(n)) => {
                assert_eq!(n.method, "textDocument/publishDiagnostics");
                assert_eq!(n.params["uri"], "file:///a.pua");
            }
            other => panic!("expected notification, got {other:?}"),
        }
    }
}
