//! Scalar wire types: the leaves of the schema tree.
//!
//! Two independent encodings exist per type: the varint-tagged form used for
//! `#[primitive]` fields (`decode`/`encode`), and a fixed-width packed form used inside
//! `#[array_primitive]` fields, which store a raw run of same-sized values with no
//! per-element tag or length (`decode_packed`/`encode_packed`). `String` has no packed form;
//! packed string arrays don't occur in the format.

use byteorder::{ByteOrder, LittleEndian};

use crate::codec::{DecodeCtx, EncodeCtx};
use crate::encoding;
use crate::error::{LcfError, LcfResult};
use crate::varint;

pub trait Primitive: Sized + Default + PartialEq + Clone {
    /// Byte width of the packed representation, or 0 if this type has none.
    const PACKED_WIDTH: usize;

    fn decode(payload: &[u8], ctx: &DecodeCtx) -> LcfResult<Self>;
    fn encode(&self, ctx: &EncodeCtx) -> LcfResult<Vec<u8>>;

    fn decode_packed(bytes: &[u8]) -> LcfResult<Self>;
    fn encode_packed(&self) -> Vec<u8>;

    fn decode_xml(text: &str) -> LcfResult<Self>;
    fn encode_xml(&self) -> String;
}

impl Primitive for i32 {
    const PACKED_WIDTH: usize = 4;

    fn decode(payload: &[u8], _ctx: &DecodeCtx) -> LcfResult<Self> {
        let (bits, _) = varint::read(payload)?;
        Ok(bits as i32)
    }

    fn encode(&self, _ctx: &EncodeCtx) -> LcfResult<Vec<u8>> {
        Ok(varint::encode(*self as u32))
    }

    fn decode_packed(bytes: &[u8]) -> LcfResult<Self> {
        if bytes.len() != 4 {
            return Err(LcfError::malformed("packed i32", "expected 4 bytes"));
        }
        Ok(LittleEndian::read_i32(bytes))
    }

    fn encode_packed(&self) -> Vec<u8> {
        let mut buf = [0u8; 4];
        LittleEndian::write_i32(&mut buf, *self);
        buf.to_vec()
    }

    fn decode_xml(text: &str) -> LcfResult<Self> {
        text.trim()
            .parse()
            .map_err(|_| LcfError::malformed("xml i32", format!("not an integer: {text:?}")))
    }

    fn encode_xml(&self) -> String {
        self.to_string()
    }
}

impl Primitive for u32 {
    const PACKED_WIDTH: usize = 4;

    fn decode(payload: &[u8], _ctx: &DecodeCtx) -> LcfResult<Self> {
        let (bits, _) = varint::read(payload)?;
        Ok(bits)
    }

    fn encode(&self, _ctx: &EncodeCtx) -> LcfResult<Vec<u8>> {
        Ok(varint::encode(*self))
    }

    fn decode_packed(bytes: &[u8]) -> LcfResult<Self> {
        if bytes.len() != 4 {
            return Err(LcfError::malformed("packed u32", "expected 4 bytes"));
        }
        Ok(LittleEndian::read_u32(bytes))
    }

    fn encode_packed(&self) -> Vec<u8> {
        let mut buf = [0u8; 4];
        LittleEndian::write_u32(&mut buf, *self);
        buf.to_vec()
    }

    fn decode_xml(text: &str) -> LcfResult<Self> {
        text.trim()
            .parse()
            .map_err(|_| LcfError::malformed("xml u32", format!("not an integer: {text:?}")))
    }

    fn encode_xml(&self) -> String {
        self.to_string()
    }
}

impl Primitive for bool {
    const PACKED_WIDTH: usize = 1;

    fn decode(payload: &[u8], _ctx: &DecodeCtx) -> LcfResult<Self> {
        let (value, _) = varint::read(payload)?;
        Ok(value != 0)
    }

    fn encode(&self, _ctx: &EncodeCtx) -> LcfResult<Vec<u8>> {
        Ok(varint::encode(u32::from(*self)))
    }

    fn decode_packed(bytes: &[u8]) -> LcfResult<Self> {
        match bytes {
            [b] => Ok(*b != 0),
            _ => Err(LcfError::malformed("packed bool", "expected 1 byte")),
        }
    }

    fn encode_packed(&self) -> Vec<u8> {
        vec![u8::from(*self)]
    }

    fn decode_xml(text: &str) -> LcfResult<Self> {
        match text.trim() {
            "T" => Ok(true),
            "F" => Ok(false),
            other => Err(LcfError::malformed("xml bool", format!("expected T/F, got {other:?}"))),
        }
    }

    fn encode_xml(&self) -> String {
        if *self { "T".to_string() } else { "F".to_string() }
    }
}

impl Primitive for String {
    const PACKED_WIDTH: usize = 0;

    fn decode(payload: &[u8], ctx: &DecodeCtx) -> LcfResult<Self> {
        Ok(encoding::to_unicode(payload, ctx.encoding))
    }

    fn encode(&self, ctx: &EncodeCtx) -> LcfResult<Vec<u8>> {
        Ok(encoding::from_unicode(self, ctx.encoding))
    }

    fn decode_packed(_bytes: &[u8]) -> LcfResult<Self> {
        Err(LcfError::malformed("packed string", "strings have no packed representation"))
    }

    fn encode_packed(&self) -> Vec<u8> {
        Vec::new()
    }

    fn decode_xml(text: &str) -> LcfResult<Self> {
        Ok(text.to_string())
    }

    fn encode_xml(&self) -> String {
        self.clone()
    }
}

impl Primitive for Vec<u8> {
    const PACKED_WIDTH: usize = 1;

    fn decode(payload: &[u8], _ctx: &DecodeCtx) -> LcfResult<Self> {
        Ok(payload.to_vec())
    }

    fn encode(&self, _ctx: &EncodeCtx) -> LcfResult<Vec<u8>> {
        Ok(self.clone())
    }

    fn decode_packed(bytes: &[u8]) -> LcfResult<Self> {
        Ok(bytes.to_vec())
    }

    fn encode_packed(&self) -> Vec<u8> {
        self.clone()
    }

    fn decode_xml(text: &str) -> LcfResult<Self> {
        Ok(text.as_bytes().to_vec())
    }

    fn encode_xml(&self) -> String {
        String::from_utf8_lossy(self).into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoding;

    fn ctx() -> DecodeCtx {
        DecodeCtx { encoding: encoding_rs::WINDOWS_1252 }
    }

    fn ectx() -> EncodeCtx {
        EncodeCtx { encoding: encoding_rs::WINDOWS_1252 }
    }

    #[test]
    fn i32_round_trips_negative_values() {
        let v: i32 = -17;
        let bytes = v.encode(&ectx()).unwrap();
        assert_eq!(i32::decode(&bytes, &ctx()).unwrap(), v);
    }

    #[test]
    fn bool_xml_uses_t_f() {
        assert_eq!(true.encode_xml(), "T");
        assert_eq!(bool::decode_xml("F").unwrap(), false);
        assert!(bool::decode_xml("true").is_err());
    }

    #[test]
    fn string_round_trips_through_codepage() {
        let ctx = DecodeCtx { encoding: encoding::by_codepage(encoding::CP_WINDOWS_1252).unwrap() };
        let ectx = EncodeCtx { encoding: ctx.encoding };
        let original = "hello".to_string();
        let bytes = original.encode(&ectx).unwrap();
        assert_eq!(String::decode(&bytes, &ctx).unwrap(), original);
    }

    #[test]
    fn packed_i32_is_four_bytes_little_endian() {
        let v: i32 = 300;
        let packed = v.encode_packed();
        assert_eq!(packed, vec![44, 1, 0, 0]);
        assert_eq!(i32::decode_packed(&packed).unwrap(), v);
    }
}
