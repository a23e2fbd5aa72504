//! Integration tests for the edge router, origins, and CLI

mod card_routes;
mod cli_contracts;
mod local_site;
mod negotiation_routes;
mod support;
