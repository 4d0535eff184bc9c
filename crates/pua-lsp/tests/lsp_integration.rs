//! End-to-end tests for the pua language server.
//!
//! Each test scripts a whole session as framed bytes, runs the main loop
//! over in-memory streams and inspects the framed output.

use std::fs;
use std::io::Cursor;

use pua_lsp::{run_main_loop, ServerConfig};
use serde_json::{json, Value};

// ============================================================================
// Helper Functions
// ============================================================================

fn frame(message: &Value) -> Vec<u8> {
    let body = serde_json::to_vec(message).unwrap();
    let mut out = format!("Content-Length: {}\r\n\r\n", body.len()).into_bytes();
    out.extend(body);
    out
}

fn unframe(mut bytes: &[u8]) -> Vec<Value> {
    let mut messages = Vec::new();
    while !bytes.is_empty() {
        let split = bytes
            .windows(4)
            .position(|w| w == b"\r\n\r\n")
            .expect("header terminator");
        let header = std::str::from_utf8(&bytes[..split]).unwrap();
        let length: usize = header
            .strip_prefix("Content-Length: ")
            .expect("content length header")
            .parse()
            .unwrap();
        let body = &bytes[split + 4..split + 4 + length];
        messages.push(serde_json::from_slice(body).unwrap());
        bytes = &bytes[split + 4 + length..];
    }
    messages
}

/// Run a session and return the exit code and every message written.
fn session(input: &[u8]) -> (i32, Vec<Value>) {
    let mut output = Vec::new();
    let code = run_main_loop(Cursor::new(input), &mut output, ServerConfig::default()).unwrap();
    (code, unframe(&output))
}

fn script(messages: &[Value]) -> Vec<u8> {
    messages.iter().flat_map(frame).collect()
}

fn request(id: i64, method: &str, params: Value) -> Value {
    json!({ "jsonrpc": "2.0", "id": id, "method": method, "params": params })
}

fn notification(method: &str, params: Value) -> Value {
    json!({ "jsonrpc": "2.0", "method": method, "params": params })
}

fn initialize(id: i64, root_uri: Option<&str>) -> Value {
    request(
        id,
        "initialize",
        json!({ "processId": null, "rootUri": root_uri, "capabilities": {} }),
    )
}

fn did_open(uri: &str, text: &str) -> Value {
    notification(
        "textDocument/didOpen",
        json!({ "textDocument": { "uri": uri, "languageId": "pua", "version": 1, "text": text } }),
    )
}

fn did_change(uri: &str, version: i32, text: &str) -> Value {
    notification(
        "textDocument/didChange",
        json!({ "textDocument": { "uri": uri, "version": version }, "contentChanges": [{ "text": text }] }),
    )
}

fn definition(id: i64, uri: &str, line: u32, character: u32) -> Value {
    request(
        id,
        "textDocument/definition",
        json!({ "textDocument": { "uri": uri }, "position": { "line": line, "character": character } }),
    )
}

fn shutdown_and_exit(id: i64) -> [Value; 2] {
    [
        request(id, "shutdown", Value::Null),
        notification("exit", Value::Null),
    ]
}

fn response(messages: &[Value], id: i64) -> &Value {
    messages
        .iter()
        .find(|m| m.get("method").is_none() && m["id"] == id)
        .unwrap_or_else(|| panic!("no response for id {id}"))
}

fn diagnostics_for<'a>(messages: &'a [Value], uri: &str) -> Vec<&'a Value> {
    messages
        .iter()
        .filter(|m| m["method"] == "textDocument/publishDiagnostics" && m["params"]["uri"] == uri)
        .collect()
}

// ============================================================================
// Lifecycle
// ============================================================================

#[test]
fn test_clean_shutdown_exits_zero() {
    let mut messages = vec![initialize(1, None), notification("initialized", json!({}))];
    messages.extend(shutdown_and_exit(2));
    let (code, out) = session(&script(&messages));

    assert_eq!(code, 0);
    assert_eq!(out.len(), 2);

    let init = response(&out, 1);
    assert_eq!(init["jsonrpc"], "2.0");
    let caps = &init["result"]["capabilities"];
    assert_eq!(caps["textDocumentSync"]["change"], 1);
    assert_eq!(caps["textDocumentSync"]["openClose"], true);
    assert_eq!(caps["textDocumentSync"]["save"]["includeText"], true);
    assert_eq!(caps["completionProvider"]["resolveProvider"], false);
    assert_eq!(caps["definitionProvider"], true);
    assert_eq!(caps["documentSymbolProvider"], true);
    assert_eq!(caps["documentFormattingProvider"], true);
    assert_eq!(init["result"]["serverInfo"]["name"], "pua-lsp");

    assert!(response(&out, 2)["result"].is_null());
}

#[test]
fn test_exit_without_shutdown_exits_one() {
    let messages = [initialize(1, None), notification("exit", Value::Null)];
    let (code, _) = session(&script(&messages));
    assert_eq!(code, 1);
}

#[test]
fn test_end_of_input_exit_codes() {
    let (code, _) = session(&script(&[initialize(1, None)]));
    assert_eq!(code, 1);

    let (code, _) = session(&script(&[
        initialize(1, None),
        request(2, "shutdown", Value::Null),
    ]));
    assert_eq!(code, 0);
}

#[test]
fn test_messages_after_exit_are_not_read() {
    let messages = [
        notification("exit", Value::Null),
        request(1, "shutdown", Value::Null),
    ];
    let (code, out) = session(&script(&messages));
    assert_eq!(code, 1);
    assert!(out.is_empty());
}

// ============================================================================
// Documents and diagnostics
// ============================================================================

#[test]
fn test_open_and_change_publish_diagnostics() {
    let uri = "file:///mem/main.pua";
    let mut messages = vec![
        initialize(1, None),
        did_open(uri, "x = (1, 2\n   y = 3\n"),
        did_change(uri, 2, "x = (1, 2)\n"),
    ];
    messages.extend(shutdown_and_exit(2));
    let (_, out) = session(&script(&messages));

    let published = diagnostics_for(&out, uri);
    assert_eq!(published.len(), 2);

    let first = published[0]["params"]["diagnostics"].as_array().unwrap();
    assert_eq!(first.len(), 2);
    for diagnostic in first {
        assert_eq!(diagnostic["source"], "pua-lsp");
    }
    let unclosed = first
        .iter()
        .find(|d| d["message"] == "Unclosed '('.")
        .unwrap();
    assert_eq!(unclosed["severity"], 1);
    assert_eq!(unclosed["range"]["start"], json!({ "line": 0, "character": 4 }));

    let indent = first
        .iter()
        .find(|d| d["message"] == "Indentation should be a multiple of 2 spaces.")
        .unwrap();
    assert_eq!(indent["severity"], 2);

    assert!(published[1]["params"]["diagnostics"]
        .as_array()
        .unwrap()
        .is_empty());
}

#[test]
fn test_close_clears_diagnostics() {
    let uri = "file:///mem/main.pua";
    let messages = [
        initialize(1, None),
        did_open(uri, "if ready\n"),
        notification("textDocument/didClose", json!({ "textDocument": { "uri": uri } })),
        request(2, "textDocument/documentSymbol", json!({ "textDocument": { "uri": uri } })),
    ];
    let (_, out) = session(&script(&messages));

    let published = diagnostics_for(&out, uri);
    assert_eq!(published.len(), 2);
    assert_eq!(
        published[0]["params"]["diagnostics"][0]["message"],
        "Header without following block."
    );
    assert_eq!(published[1]["params"]["diagnostics"], json!([]));

    assert_eq!(response(&out, 2)["result"], json!([]));
}

// ============================================================================
// Language features
// ============================================================================

#[test]
fn test_language_requests() {
    let main = "file:///mem/main.pua";
    let util = "file:///mem/util.pua";
    let main_text = "fn helper(x)\n  return x\nresult = helper(1)\n";
    let util_text = "fn helper(y)\n  return y\nfn other()\n   return 2\n";

    let mut messages = vec![
        initialize(1, None),
        did_open(main, main_text),
        did_open(util, util_text),
        request(2, "textDocument/completion", json!({
            "textDocument": { "uri": main },
            "position": { "line": 2, "character": 0 }
        })),
        definition(3, main, 2, 10),
        definition(4, util, 0, 5),
        definition(5, main, 2, 7),
        request(6, "textDocument/documentSymbol", json!({ "textDocument": { "uri": main } })),
        request(7, "textDocument/formatting", json!({
            "textDocument": { "uri": util },
            "options": { "tabSize": 2, "insertSpaces": true }
        })),
    ];
    messages.extend(shutdown_and_exit(8));
    let (code, out) = session(&script(&messages));
    assert_eq!(code, 0);

    // Completion
    let completion = &response(&out, 2)["result"];
    assert_eq!(completion["isIncomplete"], false);
    let items = completion["items"].as_array().unwrap();
    assert!(items.iter().any(|i| i["label"] == "while" && i["kind"] == 14));
    assert!(items.iter().any(|i| i["label"] == "other" && i["kind"] == 3));
    assert!(items
        .iter()
        .any(|i| i["label"] == "result" && i["sortText"] == "0_result"));

    // Definition prefers the requesting document
    let here = &response(&out, 3)["result"];
    assert_eq!(here["uri"], main);
    assert_eq!(here["range"]["start"], json!({ "line": 0, "character": 3 }));
    assert_eq!(here["range"]["end"], json!({ "line": 0, "character": 9 }));

    let there = &response(&out, 4)["result"];
    assert_eq!(there["uri"], util);

    // Cursor on the `=` of `result = ...` has no word
    assert!(response(&out, 5)["result"].is_null());

    // Outline
    let symbols = response(&out, 6)["result"].as_array().unwrap().clone();
    let names: Vec<_> = symbols.iter().map(|s| s["name"].clone()).collect();
    assert_eq!(names, vec![json!("helper"), json!("result")]);
    assert_eq!(symbols[0]["kind"], 12);
    assert_eq!(symbols[1]["kind"], 13);

    // Formatting
    let edits = response(&out, 7)["result"].as_array().unwrap().clone();
    assert_eq!(edits.len(), 1);
    assert_eq!(edits[0]["range"]["end"], json!({ "line": 5, "character": 0 }));
    assert_eq!(
        edits[0]["newText"],
        "fn helper(y)\n  return y\nfn other()\n  return 2\n"
    );
}

// ============================================================================
// Workspace index
// ============================================================================

#[test]
fn test_initialize_indexes_workspace_root() {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir(dir.path().join("nested")).unwrap();
    fs::write(dir.path().join("lib.pua"), "fn from_disk()\n  return 1\n").unwrap();
    fs::write(dir.path().join("nested").join("deep.pua"), "depth = 3\n").unwrap();
    fs::write(dir.path().join("notes.md"), "ignored = 1\n").unwrap();
    let root = pua_lsp::workspace::path_to_uri(dir.path()).unwrap();
    let main = "file:///mem/main.pua";

    let messages = [
        initialize(1, Some(root.as_str())),
        did_open(main, "from_disk(depth, ignored)\n"),
        definition(2, main, 0, 2),
        definition(3, main, 0, 12),
        definition(4, main, 0, 19),
    ];
    let (_, out) = session(&script(&messages));

    let found = &response(&out, 2)["result"];
    assert!(found["uri"].as_str().unwrap().ends_with("/lib.pua"));
    assert_eq!(found["range"]["start"], json!({ "line": 0, "character": 3 }));
    assert_eq!(found["range"]["end"], json!({ "line": 0, "character": 12 }));

    assert!(response(&out, 3)["result"]["uri"]
        .as_str()
        .unwrap()
        .ends_with("/nested/deep.pua"));
    assert!(response(&out, 4)["result"].is_null());
}

#[test]
fn test_change_does_not_rescan_disk() {
    let dir = tempfile::tempdir().unwrap();
    let lib = dir.path().join("lib.pua");
    fs::write(&lib, "fn on_disk()\n  return 1\n").unwrap();
    let root = pua_lsp::workspace::path_to_uri(dir.path()).unwrap();
    let lib_uri = pua_lsp::workspace::path_to_uri(&lib).unwrap();
    let main = "file:///mem/main.pua";

    // Opening the disk file and editing it away: the edit is authoritative.
    let messages = [
        initialize(1, Some(root.as_str())),
        did_open(main, "on_disk()\n"),
        did_open(lib_uri.as_str(), "fn on_disk()\n  return 1\n"),
        did_change(lib_uri.as_str(), 2, "renamed = 1\n"),
        definition(2, main, 0, 1),
        notification(
            "textDocument/didClose",
            json!({ "textDocument": { "uri": lib_uri.as_str() } }),
        ),
        definition(3, main, 0, 1),
    ];
    let (_, out) = session(&script(&messages));

    // Local update removed the open copy's symbol
    assert!(response(&out, 2)["result"].is_null());
    // Closing rebuilt the index from disk again
    assert_eq!(response(&out, 3)["result"]["uri"], lib_uri.as_str());
}

#[test]
fn test_workspace_folder_notifications() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("pkg.pua"), "package_name = \"demo\"\n").unwrap();
    let folder = pua_lsp::workspace::path_to_uri(dir.path()).unwrap();
    let main = "file:///mem/main.pua";

    let folders = |added: Value, removed: Value| {
        notification(
            "workspace/didChangeWorkspaceFolders",
            json!({ "event": { "added": added, "removed": removed } }),
        )
    };
    let entry = json!([{ "uri": folder.as_str(), "name": "pkg" }]);

    let messages = [
        initialize(1, None),
        did_open(main, "print(package_name)\n"),
        definition(2, main, 0, 8),
        folders(entry.clone(), json!([])),
        definition(3, main, 0, 8),
        folders(json!([]), entry),
        definition(4, main, 0, 8),
    ];
    let (_, out) = session(&script(&messages));

    assert!(response(&out, 2)["result"].is_null());
    assert!(response(&out, 3)["result"]["uri"]
        .as_str()
        .unwrap()
        .ends_with("/pkg.pua"));
    assert!(response(&out, 4)["result"].is_null());
}

// ============================================================================
// Error handling
// ============================================================================

#[test]
fn test_errors_and_unknown_methods() {
    let mut input = script(&[
        initialize(1, None),
        request(2, "textDocument/formatting", json!({ "textDocument": 42 })),
        request(3, "textDocument/hover", json!({})),
        notification("textDocument/didOpen", json!({ "garbage": true })),
        notification("$/cancelRequest", json!({ "id": 3 })),
    ]);
    input.extend(b"Content-Length: 9\r\n\r\n{not json");
    input.extend(script(&shutdown_and_exit(4)));

    let (code, out) = session(&input);
    assert_eq!(code, 0);

    let failed = response(&out, 2);
    assert_eq!(failed["error"]["code"], -32603);
    assert!(failed["error"]["message"]
        .as_str()
        .unwrap()
        .contains("textDocument/formatting"));
    assert!(failed.get("result").is_none());

    let unknown = response(&out, 3);
    assert!(unknown["result"].is_null());
    assert!(unknown.get("error").is_none());

    // Only responses: notifications never answer
    assert_eq!(out.len(), 4);
}

#[test]
fn test_string_request_ids_round_trip() {
    let messages = [json!({ "jsonrpc": "2.0", "id": "abc", "method": "shutdown" })];
    let (code, out) = session(&script(&messages));
    assert_eq!(code, 0);
    assert_eq!(out[0]["id"], "abc");
}

#[test]
fn test_request_ids_outside_i32_get_responses() {
    let messages = [
        initialize(1, None),
        request(4_294_967_296, "shutdown", Value::Null),
        notification("exit", Value::Null),
    ];
    let (code, out) = session(&script(&messages));
    assert_eq!(code, 0);
    assert!(response(&out, 4_294_967_296)["result"].is_null());
}

#[test]
fn test_float_request_id_is_echoed() {
    let messages = [
        json!({ "jsonrpc": "2.0", "id": 7.5, "method": "textDocument/hover", "params": {} }),
        request(2, "shutdown", Value::Null),
        notification("exit", Value::Null),
    ];
    let (code, out) = session(&script(&messages));
    assert_eq!(code, 0);
    assert_eq!(out.len(), 2);
    assert_eq!(out[0]["id"], 7.5);
    assert!(out[0]["result"].is_null());
}

#[test]
fn test_huge_content_length_ends_session() {
    let mut input = script(&[initialize(1, None)]);
    input.extend(b"Content-Length: 1000000000000000\r\n\r\n{}");

    let (code, out) = session(&input);
    assert_eq!(code, 1);
    assert_eq!(out.len(), 1);
}

#[test]
fn test_missing_content_length_ends_session() {
    let mut input = script(&[initialize(1, None)]);
    input.extend(b"Content-Type: text/plain\r\n\r\n");
    input.extend(script(&shutdown_and_exit(2)));

    let (code, out) = session(&input);
    assert_eq!(code, 1);
    assert_eq!(out.len(), 1);
}
