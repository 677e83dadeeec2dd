//! Core library for the `volley` CLI.
//!
//! This crate turns declarative scenario descriptions into concrete requests:
//! variable sources feed a per-iteration scope, request steps are rendered by
//! a templater, responses are mined by postprocessors, and scenarios chain the
//! steps with pacing. Ammo documents convert losslessly between the YAML/JSON
//! and TOML surfaces and the validated model.
pub mod ammo;
pub mod args;
pub mod config;
pub mod error;
pub mod postprocess;
pub mod runner;
pub mod scope;
pub mod source;
pub mod template;
pub mod transport;
