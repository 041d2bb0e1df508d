//! Feed Reader - A browser-based RSS reader
//!
//! This crate keeps an in-memory list of named feeds, loads the entries of
//! a selected feed, and serves them as HTML together with a slide-out menu
//! and a form for adding feeds.

pub mod config;
pub mod fetcher;
pub mod loader;
pub mod menu;
pub mod registry;
pub mod routes;
pub mod validation;
