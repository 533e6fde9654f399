//! Glues [`schema::Record`] onto [`chunk`]'s tokenizer and writer, and carries the text
//! encoding every primitive decode/encode needs.

use crate::chunk::{tokenize, RawChunks, RecordWriter, Termination};
use crate::error::{LcfError, LcfResult};
use crate::primitive::Primitive;
use crate::schema::Record;

/// Context threaded through every decode call. Holds the text encoding negotiated for the
/// file being read; nothing here is ever mutated mid-decode, so records are decoded
/// independently of one another and of any notion of file position.
#[derive(Debug, Clone, Copy)]
pub struct DecodeCtx {
    pub encoding: &'static encoding_rs::Encoding,
}

#[derive(Debug, Clone, Copy)]
pub struct EncodeCtx {
    pub encoding: &'static encoding_rs::Encoding,
}

impl DecodeCtx {
    pub fn new(encoding: &'static encoding_rs::Encoding) -> Self {
        DecodeCtx { encoding }
    }
}

impl EncodeCtx {
    pub fn new(encoding: &'static encoding_rs::Encoding) -> Self {
        EncodeCtx { encoding }
    }
}

/// Decodes a nested or root record from its already length-bounded chunk payload.
pub fn decode_record<T: Record>(payload: &[u8], ctx: &DecodeCtx) -> LcfResult<T> {
    let (map, _rest) = tokenize(payload, Termination::Optional)?;
    let raw = RawChunks::new(map);
    let mut value = T::read_body(&raw, ctx)?;
    *value.unknown_chunks_mut() = raw.unknown_chunks(&T::known_tags());
    Ok(value)
}

/// Encodes a nested or root record, merging the fields the schema knows about with any
/// unknown chunks carried alongside it.
pub fn encode_record<T: Record>(value: &T, ctx: &EncodeCtx) -> LcfResult<Vec<u8>> {
    let mut w = RecordWriter::new();
    value.write_body(&mut w, ctx)?;
    for chunk in value.unknown_chunks() {
        w.emit(chunk.tag, chunk.payload.clone());
    }
    Ok(w.finish())
}

/// Decodes a fixed-width packed array of primitives (an `#[array_primitive]` field body).
pub fn decode_primitive_array<P: Primitive>(payload: &[u8], _ctx: &DecodeCtx) -> LcfResult<Vec<P>> {
    if P::PACKED_WIDTH == 0 {
        return Err(LcfError::malformed("primitive array", "element type has no packed form"));
    }
    if payload.len() % P::PACKED_WIDTH != 0 {
        return Err(LcfError::malformed(
            "primitive array",
            format!("length {} is not a multiple of element width {}", payload.len(), P::PACKED_WIDTH),
        ));
    }
    payload.chunks(P::PACKED_WIDTH).map(P::decode_packed).collect()
}

pub fn encode_primitive_array<P: Primitive>(items: &[P], _ctx: &EncodeCtx) -> LcfResult<Vec<u8>> {
    Ok(items.iter().flat_map(P::encode_packed).collect())
}

/// Decodes `count` consecutive record elements, each terminated by a mandatory zero tag
/// since there is no per-element length prefix to bound them otherwise.
pub fn decode_record_array<T: Record>(payload: &[u8], count: u32, ctx: &DecodeCtx) -> LcfResult<Vec<T>> {
    let mut cursor = payload;
    let mut out = Vec::with_capacity(count as usize);
    for _ in 0..count {
        let (map, rest) = tokenize(cursor, Termination::Mandatory)?;
        let raw = RawChunks::new(map);
        let mut value = T::read_body(&raw, ctx)?;
        *value.unknown_chunks_mut() = raw.unknown_chunks(&T::known_tags());
        out.push(value);
        cursor = rest;
    }
    if !cursor.is_empty() {
        return Err(LcfError::malformed(
            "record array",
            "trailing bytes after declared element count",
        ));
    }
    Ok(out)
}

pub fn encode_record_array<T: Record>(items: &[T], ctx: &EncodeCtx) -> LcfResult<Vec<u8>> {
    let mut out = Vec::new();
    for item in items {
        out.extend(encode_record(item, ctx)?);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunk::UnknownChunk;
    use crate::schema::{FieldCategory, FieldDescriptor, Presence};

    #[derive(Debug, Default, Clone, PartialEq)]
    struct Leaf {
        value: i32,
        unknown: Vec<UnknownChunk>,
    }

    impl Record for Leaf {
        const TYPE_NAME: &'static str = "Leaf";
        const FIELDS: &'static [FieldDescriptor] = &[FieldDescriptor {
            tag: 1,
            name: "value",
            category: FieldCategory::Primitive,
            presence: Presence::OmitIfDefault,
        }];

        fn read_body(raw: &RawChunks, ctx: &DecodeCtx) -> LcfResult<Self> {
            let value = match raw.get(1) {
                Some(payload) => i32::decode(payload, ctx)?,
                None => 0,
            };
            Ok(Leaf { value, unknown: Vec::new() })
        }

        fn write_body(&self, w: &mut RecordWriter, ctx: &EncodeCtx) -> LcfResult<()> {
            if self.value != 0 {
                w.emit(1, self.value.encode(ctx)?);
            }
            Ok(())
        }

        fn unknown_chunks(&self) -> &[UnknownChunk] {
            &self.unknown
        }

        fn unknown_chunks_mut(&mut self) -> &mut Vec<UnknownChunk> {
            &mut self.unknown
        }
    }

    fn ctx_pair() -> (DecodeCtx, EncodeCtx) {
        let enc = encoding_rs::WINDOWS_1252;
        (DecodeCtx::new(enc), EncodeCtx::new(enc))
    }

    #[test]
    fn record_round_trip_preserves_unknown_chunks() {
        let (dctx, ectx) = ctx_pair();
        let mut value = Leaf { value: 7, unknown: Vec::new() };
        value.unknown.push(UnknownChunk { tag: 99, payload: vec![1, 2, 3] });

        let bytes = encode_record(&value, &ectx).unwrap();
        let decoded: Leaf = decode_record(&bytes, &dctx).unwrap();

        assert_eq!(decoded.value, 7);
        assert_eq!(decoded.unknown, value.unknown);
    }

    #[test]
    fn record_array_requires_terminator_per_element() {
        let (dctx, ectx) = ctx_pair();
        let items = vec![Leaf { value: 1, unknown: Vec::new() }, Leaf { value: 2, unknown: Vec::new() }];
        let bytes = encode_record_array(&items, &ectx).unwrap();
        let decoded: Vec<Leaf> = decode_record_array(&bytes, 2, &dctx).unwrap();
        assert_eq!(decoded, items);
    }

    #[test]
    fn record_array_rejects_wrong_count() {
        let (dctx, ectx) = ctx_pair();
        let items = vec![Leaf { value: 1, unknown: Vec::new() }, Leaf { value: 2, unknown: Vec::new() }];
        let bytes = encode_record_array(&items, &ectx).unwrap();
        assert!(decode_record_array::<Leaf>(&bytes, 1, &dctx).is_err());
    }
}
