/// Failures that stop the language server.
///
/// Individual requests never fail on document content; only the transport
/// and message decoding can.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// The `initialize` handshake or shutdown sequence was violated.
    #[error("protocol error: {0}")]
    Protocol(#[from] lsp_server::ProtocolError),

    /// Request params or a response payload could not be (de)serialized.
    #[error("invalid message payload: {0}")]
    Json(#[from] serde_json::Error),

    /// The client side of the connection went away.
    #[error("failed to send {0} to the client")]
    Send(&'static str),

    /// The stdio reader/writer threads failed.
    #[error("I/O thread failed: {0}")]
    Io(#[from] std::io::Error),
}
