//! Adapters behind the polcheck ports: the rule/file catalog, the process runner, and the
//! JSON Lines event log.
//!
//! This crate is allowed to do filesystem IO and spawn processes. The pipeline itself lives in
//! `polcheck-domain` and only sees these types through its traits.

#![forbid(unsafe_code)]

mod catalog;
mod events;
mod process;

pub use catalog::{
    Catalog, CatalogV1, CommandEntry, FileEntry, FormatEntry, RuleEntry, ToolEntry, load_catalog,
    parse_catalog_json, parse_catalog_toml,
};
pub use events::{JsonlEventStore, read_events};
pub use process::SystemRunner;
