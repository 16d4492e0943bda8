//! Remote gateway client for the game-community service.
//!
//! Every operation speaks the envelope protocol: an outer
//! `{returnCode, errorMessage, data}` wrapper, with payload-bearing
//! operations nesting a second JSON-encoded string ("pack") inside `data`.
//! Handlers depend on the [`CommunityGateway`] capability trait, never on the
//! concrete HTTP transport.

pub mod client;
pub mod envelope;
pub mod http;
pub mod types;

pub use client::CommunityGateway;
pub use envelope::{Envelope, GatewayError, CODE_ALREADY_CLAIMED};
pub use http::HttpGateway;
pub use types::{ClaimOutcome, PostPage, RawPost, RawTask, TaskStatusPack};
