//! # Express Entry Draws
//!
//! Keeps a local snapshot of Canadian Express Entry draws and serves
//! filtered listings and statistics over it.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐   ┌─────────────┐   ┌──────────────┐
//! │ IRCC feed   │──▶│ Normalizer  │──▶│ JSON snapshot │
//! │ (upstream)  │   │   (core)    │   │  (FileStore)  │
//! └─────────────┘   └─────────────┘   └──────┬───────┘
//!                                            │
//!                      ┌─────────────────────┤
//!                      ▼                     ▼
//!                 ┌──────────┐         ┌──────────┐
//!                 │   CLI    │         │   HTTP   │
//!                 │(eedraws) │         │  (axum)  │
//!                 └──────────┘         └──────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! eedraws sync                         # fetch and normalize the IRCC feed
//! eedraws list --year 2025 --limit 5   # most recent 2025 draws
//! eedraws stats --year 2025            # CRS and invitation statistics
//! eedraws serve                        # start the HTTP API
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`upstream`] | IRCC feed download |
//! | [`ingest`] | Sync pipeline (fetch → normalize → save) |
//! | [`storage`] | File-backed snapshot store |
//! | [`draws`] | Listing and lookup commands |
//! | [`stats`] | Statistics command |
//! | [`server`] | HTTP API |

pub mod config;
pub mod draws;
pub mod ingest;
pub mod server;
pub mod stats;
pub mod storage;
pub mod upstream;
