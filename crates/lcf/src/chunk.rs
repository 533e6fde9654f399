//! Chunk tokenizing and the buffer-based record writer.
//!
//! A record body is a sequence of `(tag: varint, len: varint, payload: [u8; len])` chunks,
//! closed either by a zero tag or by running out of input. [`tokenize`] turns such a
//! sequence into a `tag -> payload` map (last write for a tag wins, matching the reference
//! reader); [`RecordWriter`] does the inverse, collecting `(tag, payload)` pairs and sorting
//! them into canonical tag order on [`finish`](RecordWriter::finish).

use std::collections::BTreeMap;

use crate::error::{LcfError, LcfResult};
use crate::varint;

/// Whether a missing terminator chunk is an error.
///
/// Root and nested records are always read from an already-bounded slice (the enclosing
/// chunk's length prefix, or EOF for the file root), so running out of input without seeing
/// a zero tag is fine. Elements of a record array share one undivided payload with no
/// per-element length prefix, so the zero tag is the only delimiter and must be present.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    Optional,
    Mandatory,
}

/// Tokenizes one record body from the front of `input`.
///
/// Returns the chunk map and whatever of `input` is left after the record (empty for
/// `Optional` records read to EOF, or the start of the next element for array members).
pub fn tokenize(mut input: &[u8], termination: Termination) -> LcfResult<(BTreeMap<u32, Vec<u8>>, &[u8])> {
    let mut map = BTreeMap::new();

    loop {
        if input.is_empty() {
            return match termination {
                Termination::Optional => Ok((map, input)),
                Termination::Mandatory => Err(LcfError::Truncated { context: "record terminator" }),
            };
        }

        let (tag, rest) = varint::read(input)?;
        if tag == 0 {
            return Ok((map, rest));
        }

        let (len, rest) = varint::read(rest)?;
        let len = len as usize;
        if rest.len() < len {
            return Err(LcfError::Truncated { context: "chunk payload" });
        }
        let (payload, rest) = rest.split_at(len);
        map.insert(tag, payload.to_vec());
        input = rest;
    }
}

/// A chunk whose tag the schema doesn't recognize, kept so writers can round-trip it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UnknownChunk {
    pub tag: u32,
    pub payload: Vec<u8>,
}

/// Read-only view over a tokenized record body.
#[derive(Debug, Clone, Default)]
pub struct RawChunks {
    map: BTreeMap<u32, Vec<u8>>,
}

impl RawChunks {
    pub fn new(map: BTreeMap<u32, Vec<u8>>) -> Self {
        RawChunks { map }
    }

    pub fn get(&self, tag: u32) -> Option<&[u8]> {
        self.map.get(&tag).map(Vec::as_slice)
    }

    pub fn get_varint(&self, tag: u32) -> LcfResult<Option<u32>> {
        match self.get(tag) {
            Some(payload) => {
                let (value, rest) = varint::read(payload)?;
                if !rest.is_empty() {
                    return Err(LcfError::malformed(
                        format!("chunk {tag}"),
                        "trailing bytes after varint",
                    ));
                }
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    pub fn tags(&self) -> impl Iterator<Item = u32> + '_ {
        self.map.keys().copied()
    }

    /// Chunks whose tag isn't in `known`, as owned [`UnknownChunk`]s in tag order.
    pub fn unknown_chunks(&self, known: &[u32]) -> Vec<UnknownChunk> {
        self.map
            .iter()
            .filter(|(tag, _)| !known.contains(tag))
            .map(|(&tag, payload)| UnknownChunk { tag, payload: payload.clone() })
            .collect()
    }
}

/// Builder for a record body: collects `(tag, payload)` pairs and emits them in canonical
/// tag order, terminated by a zero tag. Nested and array-element payloads are produced by
/// recursing into a fresh `RecordWriter` over a temporary buffer, whose finished bytes then
/// become the parent chunk's payload — there is no `Seek`-based back-patching.
#[derive(Debug, Default)]
pub struct RecordWriter {
    chunks: Vec<(u32, Vec<u8>)>,
}

impl RecordWriter {
    pub fn new() -> Self {
        RecordWriter::default()
    }

    pub fn emit(&mut self, tag: u32, payload: Vec<u8>) {
        self.chunks.push((tag, payload));
    }

    pub fn finish(mut self) -> Vec<u8> {
        self.chunks.sort_by_key(|(tag, _)| *tag);
        let mut out = Vec::new();
        for (tag, payload) in &self.chunks {
            out.extend(varint::encode(*tag));
            out.extend(varint::encode(payload.len() as u32));
            out.extend_from_slice(payload);
        }
        out.push(0);
        out
    }
}
