// Library root
// -----------
// This crate exposes a small library surface for the CLI. The binary
// (`main.rs`) parses arguments, prompts for credentials and hands over to
// `ui::run`.
//
// Module responsibilities:
// - `api`: blocking HTTP client for the token and GTIN endpoints.
// - `pages`: page selection and the aggregation loop over a `PageSource`.
// - `writer`: saves the collected products as a JSON array.
// - `config`: command-line arguments and the resolved run configuration.
// - `error`: error types shared by the modules above.
// - `ui`: prompts, spinner and user-facing messages.
pub mod api;
pub mod config;
pub mod error;
pub mod pages;
pub mod ui;
pub mod writer;
