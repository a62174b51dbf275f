//! Blockdraw - drawing canvas persistence for SiYuan hosts
//!
//! Ties the pieces together for an embedder:
//! - Shell: wires a drawing engine surface to the restore/save controller
//! - Links: routing policy for links activated on the canvas
//! - Config: layered application configuration
//! - Cli: the `blockdraw` command-line tool
//!
//! The scene model, host client, and sync controller live in the
//! `blockdraw-scene`, `blockdraw-host`, and `blockdraw-sync` crates.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod cli;
pub mod config;
pub mod links;
pub mod shell;
