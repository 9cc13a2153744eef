//! reasm: replay driver for `reasm-core`.
//!
//! Feeds a scripted sequence of indexed substrings through a
//! [`Reassembler`](reasm_core::Reassembler) and writes the reassembled stream
//! out, the way a transport receiver would hand segments to the core.
//!
//! - `config`: layered configuration (defaults, TOML file, env, CLI)
//! - `telemetry`: structured logging setup
//! - `replay`: segment scripts and the replay loop

pub mod config;
pub mod replay;
pub mod telemetry;
