//! LSP server main loop with request/notification dispatch.
//!
//! Uses `lsp-server` (synchronous, crossbeam-based) for the transport.
//! No async runtime needed: every request is a pure function of the
//! current document text and is answered before the next one is read.

use jabuti_core::DateStamps;
use lsp_server::{Connection, ErrorCode, Message, Notification, Request, Response};
use lsp_types::notification::{
    DidChangeTextDocument, DidCloseTextDocument, DidOpenTextDocument, Notification as _,
};
use lsp_types::request::{
    Completion, DocumentSymbolRequest, Formatting, GotoDefinition, HoverRequest,
};
use lsp_types::{
    CompletionOptions, CompletionResponse, DocumentSymbolResponse, GotoDefinitionResponse,
    HoverProviderCapability, OneOf, ServerCapabilities, TextDocumentSyncCapability,
    TextDocumentSyncKind, TextDocumentSyncOptions,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::completion;
use crate::document::DocumentState;
use crate::error::ServerError;
use crate::formatting;
use crate::hover;
use crate::navigation;

/// Run the LSP server over stdio until shutdown.
pub fn run() -> Result<(), ServerError> {
    let (connection, io_threads) = Connection::stdio();

    // ── Initialize handshake ──────────────────────────────────────────
    let init_json = serde_json::to_value(build_capabilities())?;
    let init_params: lsp_types::InitializeParams =
        serde_json::from_value(connection.initialize(init_json)?)?;
    info!(
        client = init_params
            .client_info
            .as_ref()
            .map_or("unknown", |c| c.name.as_str()),
        "language server initialized"
    );

    // ── Main loop ─────────────────────────────────────────────────────
    let mut doc_state = DocumentState::new();

    for msg in &connection.receiver {
        match msg {
            Message::Request(req) => {
                if connection.handle_shutdown(&req)? {
                    info!("shutdown requested");
                    break;
                }
                let response = handle_request(&doc_state, req)?;
                send(&connection, Message::Response(response))?;
            }
            Message::Notification(not) => handle_notification(&mut doc_state, not)?,
            Message::Response(_) => {
                // We never send requests to the client.
            }
        }
    }

    io_threads.join()?;
    Ok(())
}

pub fn build_capabilities() -> ServerCapabilities {
    ServerCapabilities {
        text_document_sync: Some(TextDocumentSyncCapability::Options(
            TextDocumentSyncOptions {
                open_close: Some(true),
                change: Some(TextDocumentSyncKind::FULL),
                ..Default::default()
            },
        )),
        definition_provider: Some(OneOf::Left(true)),
        document_symbol_provider: Some(OneOf::Left(true)),
        document_formatting_provider: Some(OneOf::Left(true)),
        hover_provider: Some(HoverProviderCapability::Simple(true)),
        completion_provider: Some(CompletionOptions {
            trigger_characters: Some(
                completion::TRIGGER_CHARACTERS
                    .iter()
                    .map(|c| c.to_string())
                    .collect(),
            ),
            resolve_provider: Some(false),
            ..Default::default()
        }),
        ..Default::default()
    }
}

fn send(connection: &Connection, msg: Message) -> Result<(), ServerError> {
    let what = match &msg {
        Message::Request(_) => "request",
        Message::Response(_) => "response",
        Message::Notification(_) => "notification",
    };
    connection
        .sender
        .send(msg)
        .map_err(|_| ServerError::Send(what))
}

fn ok(req: Request, result: impl Serialize) -> Result<Response, ServerError> {
    Ok(Response::new_ok(req.id, serde_json::to_value(result)?))
}

/// Decode request params, or the `InvalidParams` response to send instead.
fn decode_params<P: DeserializeOwned>(req: &Request) -> Result<P, Response> {
    serde_json::from_value(req.params.clone()).map_err(|e| {
        warn!(method = %req.method, id = %req.id, error = %e, "invalid params");
        Response::new_err(
            req.id.clone(),
            ErrorCode::InvalidParams as i32,
            format!("invalid params for {}: {e}", req.method),
        )
    })
}

/// Answer one request against the current document state.
pub fn handle_request(doc_state: &DocumentState, req: Request) -> Result<Response, ServerError> {
    use lsp_types::request::Request as _;

    debug!(method = %req.method, id = %req.id, "request");

    if req.method == Completion::METHOD {
        let params: lsp_types::CompletionParams = match decode_params(&req) {
            Ok(p) => p,
            Err(resp) => return Ok(resp),
        };
        let doc = &params.text_document_position;
        let content = doc_state.content(&doc.text_document.uri);
        let items = completion::compute_completions(&content, doc.position, &DateStamps::now());
        debug!(count = items.len(), "completion items");
        ok(req, CompletionResponse::Array(items))
    } else if req.method == HoverRequest::METHOD {
        let params: lsp_types::HoverParams = match decode_params(&req) {
            Ok(p) => p,
            Err(resp) => return Ok(resp),
        };
        let doc = &params.text_document_position_params;
        let content = doc_state.content(&doc.text_document.uri);
        let result = hover::compute_hover(&content, doc.position, &DateStamps::now());
        ok(req, result)
    } else if req.method == GotoDefinition::METHOD {
        let params: lsp_types::GotoDefinitionParams = match decode_params(&req) {
            Ok(p) => p,
            Err(resp) => return Ok(resp),
        };
        let doc = &params.text_document_position_params;
        let content = doc_state.content(&doc.text_document.uri);
        let result = navigation::goto_definition(&doc.text_document.uri, doc.position, &content)
            .map(GotoDefinitionResponse::Scalar);
        ok(req, result)
    } else if req.method == DocumentSymbolRequest::METHOD {
        let params: lsp_types::DocumentSymbolParams = match decode_params(&req) {
            Ok(p) => p,
            Err(resp) => return Ok(resp),
        };
        let content = doc_state.content(&params.text_document.uri);
        let syms = navigation::document_symbols(&content);
        let result: Option<DocumentSymbolResponse> = if syms.is_empty() {
            None
        } else {
            Some(DocumentSymbolResponse::Nested(syms))
        };
        ok(req, result)
    } else if req.method == Formatting::METHOD {
        let params: lsp_types::DocumentFormattingParams = match decode_params(&req) {
            Ok(p) => p,
            Err(resp) => return Ok(resp),
        };
        let content = doc_state.content(&params.text_document.uri);
        let edits = formatting::format_document(&content);
        ok(req, (!edits.is_empty()).then_some(edits))
    } else {
        warn!(method = %req.method, "unsupported request");
        Ok(Response::new_err(
            req.id,
            ErrorCode::MethodNotFound as i32,
            format!("method not found: {}", req.method),
        ))
    }
}

/// Apply a document lifecycle notification. Notifications whose params do
/// not decode are logged and dropped.
pub fn handle_notification(
    doc_state: &mut DocumentState,
    not: Notification,
) -> Result<(), ServerError> {
    let method = not.method.clone();
    if let Err(e) = apply_notification(doc_state, not) {
        warn!(method = %method, error = %e, "invalid notification params");
    }
    Ok(())
}

fn apply_notification(
    doc_state: &mut DocumentState,
    not: Notification,
) -> Result<(), serde_json::Error> {
    match not.method.as_str() {
        m if m == DidOpenTextDocument::METHOD => {
            let params: lsp_types::DidOpenTextDocumentParams = serde_json::from_value(not.params)?;
            let doc = params.text_document;
            debug!(uri = doc.uri.as_str(), version = doc.version, "opened");
            doc_state.open(doc.uri.as_str(), doc.version, doc.text);
        }
        m if m == DidChangeTextDocument::METHOD => {
            let params: lsp_types::DidChangeTextDocumentParams =
                serde_json::from_value(not.params)?;
            // FULL sync: the last change carries the entire document
            if let Some(change) = params.content_changes.into_iter().last() {
                doc_state.change(
                    params.text_document.uri.as_str(),
                    params.text_document.version,
                    change.text,
                );
            }
        }
        m if m == DidCloseTextDocument::METHOD => {
            let params: lsp_types::DidCloseTextDocumentParams = serde_json::from_value(not.params)?;
            debug!(uri = params.text_document.uri.as_str(), "closed");
            doc_state.close(params.text_document.uri.as_str());
        }
        other => debug!(method = other, "ignored notification"),
    }
    Ok(())
}
