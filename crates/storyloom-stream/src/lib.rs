//! Storyloom stream ingestion
//!
//! Consumes the incremental response stream produced by the
//! text-generation backend: raw byte fragments are decoded, framed into
//! lines, classified into protocol events, and forwarded to a consumer
//! that may cancel at any time. The same pipeline backs live dialogue,
//! field polishing, and narrative generation; call sites supply only the
//! request payload, the callbacks, and an optional decorator such as
//! [`PreambleSuppressor`].
//!
//! ```no_run
//! use storyloom_stream::{
//!     CallbackHandler, ClientConfig, GenerationClient, StreamRequest,
//! };
//!
//! # async fn demo() -> Result<(), storyloom_stream::StreamError> {
//! let config = ClientConfig::new("http://localhost:8000/".parse().unwrap());
//! let client = GenerationClient::new(config)?;
//!
//! let handle = client.start_stream(
//!     StreamRequest::new("invoke/stream", serde_json::json!({"session_id": "s1"})),
//!     CallbackHandler::new(
//!         |text: &str| print!("{text}"),
//!         || println!("\n[done]"),
//!         |message: &str| eprintln!("stream failed: {message}"),
//!     ),
//! );
//!
//! // The caller owns the handle; dropping it does not cancel the session.
//! handle.cancel();
//! # Ok(())
//! # }
//! ```

mod cancellation;
mod client;
mod decode;
mod error;
mod event;
mod framing;
mod handler;
mod preamble;
mod session;

pub use cancellation::CancelHandle;
pub use client::{ClientConfig, CompletionEnvelope, GenerationClient, StreamRequest};
pub use error::StreamError;
pub use event::FramedEvent;
pub use handler::{CallbackHandler, StreamHandler};
pub use preamble::PreambleSuppressor;
pub use session::SessionState;
