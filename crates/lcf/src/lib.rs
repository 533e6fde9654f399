//! Read, write, and transcode the chunked container format used by a legacy 2D
//! RPG-authoring tool's project files: the database, the map tree, individual maps, and
//! save games.
//!
//! The format is a schema-driven tag/length/value codec: every record type declares its
//! fields once, via `#[derive(lcf_macros::LcfRecord)]`, and that declaration drives both the
//! binary reader/writer and an XML mirror. See [`schema`] for the trait every record type
//! implements, [`chunk`] for the tokenizer and writer underneath it, and [`facade`] for
//! whole-file entry points.

// Lets records defined inside this crate use the same `::lcf::...` paths the derive macro
// generates for downstream crates.
extern crate self as lcf;

pub mod chunk;
pub mod codec;
pub mod config;
pub mod encoding;
pub mod error;
pub mod facade;
pub mod ini;
pub mod primitive;
pub mod records;
pub mod schema;
pub mod varint;
pub mod xml;

pub use error::{LcfError, LcfResult, LoadResult, LoadWarning};
