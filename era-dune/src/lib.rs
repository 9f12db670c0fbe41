//! # Era Dune Client
//!
//! Runs the Era airdrop query on Dune Analytics for a single wallet.
//! Implements [`era_core::AirdropSource`] so the lookup service can use it
//! without knowing about Dune.

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

mod client;

pub use client::{DuneClient, DuneConfig, ExecutionState};
