//! Whole-file read/write: the header magic string in front of the root record, and the
//! per-file-type entry points built on top of it.
//!
//! Save-game files are the one file kind whose magic this crate does not hardcode: the
//! reference format ties it to the engine release that wrote the save, which this codec has
//! no independent way to know. Callers pass the magic they expect (or accept whatever is
//! actually present) via [`read_tagged`]/[`write_tagged`].

use crate::codec::{decode_record, encode_record, DecodeCtx, EncodeCtx};
use crate::error::{LcfError, LcfResult, LoadResult, LoadWarning};
use crate::schema::Record;
use crate::varint;

pub const DATABASE_MAGIC: &str = "LcfDataBase";
pub const MAP_TREE_MAGIC: &str = "LcfMapTree";
pub const MAP_UNIT_MAGIC: &str = "LcfMapUnit";

/// Reads the leading `(varint length, ascii bytes)` magic string and returns it alongside
/// the remaining bytes, which are the root record's chunk stream.
fn read_header(data: &[u8]) -> LcfResult<(String, &[u8])> {
    let (len, rest) = varint::read(data)?;
    let len = len as usize;
    if rest.len() < len {
        return Err(LcfError::Truncated { context: "file header" });
    }
    let (magic_bytes, body) = rest.split_at(len);
    let magic = String::from_utf8(magic_bytes.to_vec())
        .map_err(|_| LcfError::malformed("file header", "magic is not valid UTF-8"))?;
    Ok((magic, body))
}

fn write_header(magic: &str) -> Vec<u8> {
    let mut out = varint::encode(magic.len() as u32);
    out.extend_from_slice(magic.as_bytes());
    out
}

/// Reads a root record of type `T`, checking the header magic against `expected_magic`.
/// A mismatch is recorded as a [`LoadWarning::HeaderMismatch`] rather than rejected: a
/// renamed or hand-edited file is still worth reading.
pub fn read_tagged<T: Record>(data: &[u8], expected_magic: &str, ctx: &DecodeCtx) -> LcfResult<LoadResult<T>> {
    let (magic, body) = read_header(data)?;
    let mut result = LoadResult::new(decode_record::<T>(body, ctx)?);
    if magic != expected_magic {
        result.push_warning(LoadWarning::HeaderMismatch { expected: expected_magic.to_string(), found: magic });
    }
    Ok(result)
}

pub fn write_tagged<T: Record>(value: &T, magic: &str, ctx: &EncodeCtx) -> LcfResult<Vec<u8>> {
    let mut out = write_header(magic);
    out.extend(encode_record(value, ctx)?);
    Ok(out)
}

pub fn read_database<T: Record>(data: &[u8], ctx: &DecodeCtx) -> LcfResult<LoadResult<T>> {
    read_tagged(data, DATABASE_MAGIC, ctx)
}

pub fn write_database<T: Record>(value: &T, ctx: &EncodeCtx) -> LcfResult<Vec<u8>> {
    write_tagged(value, DATABASE_MAGIC, ctx)
}

pub fn read_map_tree<T: Record>(data: &[u8], ctx: &DecodeCtx) -> LcfResult<LoadResult<T>> {
    read_tagged(data, MAP_TREE_MAGIC, ctx)
}

pub fn write_map_tree<T: Record>(value: &T, ctx: &EncodeCtx) -> LcfResult<Vec<u8>> {
    write_tagged(value, MAP_TREE_MAGIC, ctx)
}

pub fn read_map_unit<T: Record>(data: &[u8], ctx: &DecodeCtx) -> LcfResult<LoadResult<T>> {
    read_tagged(data, MAP_UNIT_MAGIC, ctx)
}

pub fn write_map_unit<T: Record>(value: &T, ctx: &EncodeCtx) -> LcfResult<Vec<u8>> {
    write_tagged(value, MAP_UNIT_MAGIC, ctx)
}

/// Reads a save-game file against a caller-supplied magic string.
pub fn read_save_game<T: Record>(data: &[u8], magic: &str, ctx: &DecodeCtx) -> LcfResult<LoadResult<T>> {
    read_tagged(data, magic, ctx)
}

pub fn write_save_game<T: Record>(value: &T, magic: &str, ctx: &EncodeCtx) -> LcfResult<Vec<u8>> {
    write_tagged(value, magic, ctx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::database::{Database, NamedEntry, Terms};

    #[test]
    fn database_file_round_trips() {
        let ctx = DecodeCtx::new(encoding_rs::WINDOWS_1252);
        let ectx = EncodeCtx::new(encoding_rs::WINDOWS_1252);
        let db = Database {
            switches: vec![NamedEntry { id: 1, name: "Flag".to_string() }],
            variables: vec![],
            terms: Terms::default(),
            troops: vec![],
            unknown_chunks: Vec::new(),
        };
        let bytes = write_database(&db, &ectx).unwrap();
        let loaded: LoadResult<Database> = read_database(&bytes, &ctx).unwrap();
        assert!(loaded.warnings.is_empty());
        assert_eq!(loaded.value, db);
    }

    #[test]
    fn mismatched_header_is_a_warning_not_an_error() {
        let ctx = DecodeCtx::new(encoding_rs::WINDOWS_1252);
        let ectx = EncodeCtx::new(encoding_rs::WINDOWS_1252);
        let db = Database::default();
        let bytes = write_tagged(&db, "SomeOtherMagic", &ectx).unwrap();
        let loaded: LoadResult<Database> = read_database(&bytes, &ctx).unwrap();
        assert_eq!(loaded.warnings.len(), 1);
        assert!(matches!(loaded.warnings[0], LoadWarning::HeaderMismatch { .. }));
    }

    #[test]
    fn truncated_header_errors() {
        let ctx = DecodeCtx::new(encoding_rs::WINDOWS_1252);
        let err = read_database::<Database>(&[200], &ctx).unwrap_err();
        assert!(matches!(err, LcfError::Truncated { .. }));
    }
}
