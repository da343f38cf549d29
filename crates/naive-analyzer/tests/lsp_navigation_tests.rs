mod common;

use common::{temp_workspace, write_file};
use futures::StreamExt;
use serde_json::json;
use tower::{Service, ServiceExt};
use tower_lsp::jsonrpc::{Request, Response};
use tower_lsp::lsp_types::Url;
use tower_lsp::{ClientSocket, LspService};

use naive_analyzer::NaiveLanguageServer;

/// Drive one request through the service while draining client-bound
/// traffic (progress notifications, messages, logs) from the socket so
/// the server never blocks on an unread channel.
async fn request(
    service: &mut LspService<NaiveLanguageServer>,
    socket: &mut ClientSocket,
    req: Request,
) -> Option<Response> {
    let call = async { service.ready().await.expect("service ready").call(req).await.expect("request call") };
    tokio::pin!(call);

    let mut socket_open = true;
    loop {
        tokio::select! {
            response = &mut call => return response,
            message = socket.next(), if socket_open => {
                if message.is_none() {
                    socket_open = false;
                }
            },
        }
    }
}

#[tokio::test]
async fn goto_definition_end_to_end() {
    let root = temp_workspace("lsp-e2e");
    let text = "def foo(): pass\nvalue = foo()\n";
    let file = write_file(&root, "main.py", text);
    let uri = Url::from_file_path(&file).expect("file uri");
    let root_uri = Url::from_file_path(&root).expect("root uri");

    let (mut service, mut socket) = LspService::new(NaiveLanguageServer::new);

    // live-search only: keeps the test free of background index timing
    let initialize = Request::build("initialize")
        .params(json!({
            "capabilities": {},
            "workspaceFolders": [{ "uri": root_uri, "name": "ws" }],
            "initializationOptions": {
                "rules": { "definitions": ["def "], "useIndex": false },
                "indexing": { "enable": false }
            }
        }))
        .id(1)
        .finish();
    assert!(request(&mut service, &mut socket, initialize).await.is_some());

    let initialized = Request::build("initialized").params(json!({})).finish();
    assert!(request(&mut service, &mut socket, initialized).await.is_none());

    let did_open = Request::build("textDocument/didOpen")
        .params(json!({
            "textDocument": { "uri": uri, "languageId": "python", "version": 1, "text": text }
        }))
        .finish();
    request(&mut service, &mut socket, did_open).await;

    // cursor on the call site `foo` on line 1
    let goto = Request::build("textDocument/definition")
        .params(json!({ "textDocument": { "uri": uri }, "position": { "line": 1, "character": 9 } }))
        .id(2)
        .finish();
    let response = request(&mut service, &mut socket, goto).await.expect("definition response");

    let canonical_uri =
        Url::from_file_path(file.canonicalize().expect("fixture exists")).expect("canonical file uri");
    let value = serde_json::to_value(&response).expect("serialize response");
    assert_eq!(value["result"]["uri"], json!(canonical_uri));
    assert_eq!(value["result"]["range"]["start"], json!({ "line": 0, "character": 0 }));
    assert_eq!(value["result"]["range"]["end"], json!({ "line": 0, "character": 15 }));

    let _ = std::fs::remove_dir_all(root);
}

#[tokio::test]
async fn definition_query_without_open_document_returns_null() {
    let root = temp_workspace("lsp-no-doc");
    let file = write_file(&root, "main.py", "def foo(): pass\n");
    let uri = Url::from_file_path(&file).expect("file uri");
    let root_uri = Url::from_file_path(&root).expect("root uri");

    let (mut service, mut socket) = LspService::new(NaiveLanguageServer::new);

    let initialize = Request::build("initialize")
        .params(json!({
            "capabilities": {},
            "workspaceFolders": [{ "uri": root_uri, "name": "ws" }],
            "initializationOptions": { "indexing": { "enable": false } }
        }))
        .id(1)
        .finish();
    assert!(request(&mut service, &mut socket, initialize).await.is_some());

    let goto = Request::build("textDocument/definition")
        .params(json!({ "textDocument": { "uri": uri }, "position": { "line": 0, "character": 5 } }))
        .id(2)
        .finish();
    let response = request(&mut service, &mut socket, goto).await.expect("definition response");

    let value = serde_json::to_value(&response).expect("serialize response");
    assert_eq!(value["result"], json!(null));

    let _ = std::fs::remove_dir_all(root);
}
