//! Edge Negotiator: Content Negotiation at the Edge
//!
//! Request handlers that sit in front of a static site. The agent negotiator
//! serves Markdown to clients that ask for it and stamps discovery headers on
//! every response; the card resolver serves one business card in many formats.

pub mod card;
pub mod config;
pub mod error;
pub mod logging;
pub mod negotiator;
pub mod origin;
pub mod server;
pub mod tooling;
pub mod types;
