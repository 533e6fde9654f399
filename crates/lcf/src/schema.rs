//! The static schema table every record type publishes, and the trait that ties a Rust
//! struct to its binary representation.
//!
//! `FIELDS` exists independently of the generated read/write bodies: tools that want to
//! introspect a record type (a future schema dumper, diagnostics, the XML writer's field
//! ordering) can walk it without decoding anything.

use crate::chunk::{RawChunks, RecordWriter, UnknownChunk};
use crate::codec::{DecodeCtx, EncodeCtx};
use crate::error::LcfResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    /// Always written, even when equal to the type's default.
    Always,
    /// Omitted from the wire when equal to the type's default.
    OmitIfDefault,
    /// Derived from another field's length; never independently defaulted.
    SizeOfCompanion,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldCategory {
    Primitive,
    Record,
    ArrayPrimitive,
    ArrayRecord { size_tag: u32 },
    /// The varint-size chunk that precedes an `ArrayRecord` field.
    Size { of_tag: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDescriptor {
    pub tag: u32,
    pub name: &'static str,
    pub category: FieldCategory,
    pub presence: Presence,
}

/// Implemented by every `#[derive(LcfRecord)]` type. `read_body`/`write_body` handle the
/// fields the schema knows about; the surrounding codec layer is responsible for merging in
/// chunks the schema doesn't recognize, via [`unknown_chunks`](Record::unknown_chunks).
pub trait Record: Sized + Default {
    const TYPE_NAME: &'static str;
    const FIELDS: &'static [FieldDescriptor];

    fn read_body(raw: &RawChunks, ctx: &DecodeCtx) -> LcfResult<Self>;
    fn write_body(&self, w: &mut RecordWriter, ctx: &EncodeCtx) -> LcfResult<()>;

    fn unknown_chunks(&self) -> &[UnknownChunk];
    fn unknown_chunks_mut(&mut self) -> &mut Vec<UnknownChunk>;

    /// Tags the schema assigns meaning to, used to separate known fields from the
    /// unknown-chunk sidecar when decoding.
    fn known_tags() -> Vec<u32> {
        Self::FIELDS.iter().map(|f| f.tag).collect()
    }
}
