//! The XML mirror of the binary schema: same field declarations via `#[derive(LcfRecord)]`,
//! a different surface syntax.
//!
//! Booleans render as `T`/`F` rather than `1`/`0`. C0 control characters, which are legal
//! inside a chunk payload but not inside XML text, are escaped into the Unicode Private Use
//! Area (`&#xE0xx;` for control byte `xx`) instead of being dropped. Array-of-record fields
//! get one child element per item with a one-based `id="0001"`-style index attribute, so a
//! hand edit that reorders or deletes an element doesn't silently renumber its siblings.

use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};

use crate::codec::{DecodeCtx, EncodeCtx};
use crate::error::{LcfError, LcfResult};
use crate::primitive::Primitive;

/// Implemented by every `#[derive(LcfRecord)]` type, generated alongside the binary codec.
pub trait XmlRecord: Sized + Default {
    fn read_xml_fields(elem: &XmlElement, ctx: &DecodeCtx) -> LcfResult<Self>;
    fn write_xml_fields(&self, w: &mut XmlFieldWriter, ctx: &EncodeCtx) -> LcfResult<()>;
}

/// A parsed XML element: name, attributes, concatenated text, and child elements in
/// document order. Deliberately minimal compared to a general-purpose DOM; the schema
/// never needs mixed content or namespaces.
#[derive(Debug, Clone, Default)]
pub struct XmlElement {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    text: String,
    pub children: Vec<XmlElement>,
}

impl XmlElement {
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.iter().find(|(k, _)| k == name).map(|(_, v)| v.as_str())
    }

    pub fn child(&self, name: &str) -> Option<&XmlElement> {
        self.children.iter().find(|c| c.name == name)
    }

    pub fn children<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a XmlElement> {
        self.children.iter().filter(move |c| c.name == name)
    }
}

/// Parses a full XML document into its root element.
pub fn parse_document(input: &[u8]) -> LcfResult<XmlElement> {
    let mut reader = Reader::from_reader(input);
    reader.config_mut().trim_text(true);

    let mut stack: Vec<XmlElement> = Vec::new();
    let mut root: Option<XmlElement> = None;
    let mut buf = Vec::new();

    loop {
        match reader
            .read_event_into(&mut buf)
            .map_err(|e| LcfError::malformed("xml", e.to_string()))?
        {
            Event::Start(start) => stack.push(new_element(&start)?),
            Event::Empty(start) => {
                let elem = new_element(&start)?;
                push_child(&mut stack, &mut root, elem);
            }
            Event::End(_) => {
                let elem = stack.pop().ok_or_else(|| LcfError::malformed("xml", "unbalanced close tag"))?;
                push_child(&mut stack, &mut root, elem);
            }
            Event::Text(text) => {
                let decoded = text
                    .unescape()
                    .map_err(|e| LcfError::malformed("xml", e.to_string()))?;
                let unescaped = unescape_private_use_controls(&decoded);
                if let Some(top) = stack.last_mut() {
                    top.text.push_str(&unescaped);
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    root.ok_or_else(|| LcfError::malformed("xml", "document has no root element"))
}

fn new_element(start: &BytesStart) -> LcfResult<XmlElement> {
    let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
    let mut attributes = Vec::new();
    for attr in start.attributes() {
        let attr = attr.map_err(|e| LcfError::malformed("xml", e.to_string()))?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr
            .unescape_value()
            .map_err(|e| LcfError::malformed("xml", e.to_string()))?
            .into_owned();
        attributes.push((key, value));
    }
    Ok(XmlElement { name, attributes, text: String::new(), children: Vec::new() })
}

fn push_child(stack: &mut Vec<XmlElement>, root: &mut Option<XmlElement>, elem: XmlElement) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(elem),
        None => *root = Some(elem),
    }
}

/// Writes fields of one record into its parent element. A thin wrapper over
/// [`quick_xml::Writer`] that knows the three shapes the schema needs: a scalar leaf, a
/// nested record, and an indexed array element.
pub struct XmlFieldWriter<'a> {
    writer: &'a mut Writer<Vec<u8>>,
}

impl<'a> XmlFieldWriter<'a> {
    pub fn new(writer: &'a mut Writer<Vec<u8>>) -> Self {
        XmlFieldWriter { writer }
    }

    pub fn leaf(&mut self, name: &str, text: &str) {
        let escaped = escape_text(text);
        self.writer.write_event(Event::Start(BytesStart::new(name))).ok();
        self.writer.write_event(Event::Text(BytesText::from_escaped(escaped))).ok();
        self.writer.write_event(Event::End(BytesEnd::new(name))).ok();
    }

    pub fn nested(&mut self, name: &str, body: impl FnOnce(&mut XmlFieldWriter) -> LcfResult<()>) -> LcfResult<()> {
        self.writer.write_event(Event::Start(BytesStart::new(name))).map_err(xml_io_err)?;
        body(self)?;
        self.writer.write_event(Event::End(BytesEnd::new(name))).map_err(xml_io_err)?;
        Ok(())
    }

    pub fn indexed(
        &mut self,
        name: &str,
        one_based_index: usize,
        body: impl FnOnce(&mut XmlFieldWriter) -> LcfResult<()>,
    ) -> LcfResult<()> {
        let mut start = BytesStart::new(name);
        start.push_attribute(("id", format!("{one_based_index:04}").as_str()));
        self.writer.write_event(Event::Start(start)).map_err(xml_io_err)?;
        body(self)?;
        self.writer.write_event(Event::End(BytesEnd::new(name))).map_err(xml_io_err)?;
        Ok(())
    }
}

fn xml_io_err(e: quick_xml::Error) -> LcfError {
    LcfError::malformed("xml", e.to_string())
}

/// Encodes `<`, `>`, `&` the usual way, and remaps C0 control characters (illegal in XML
/// text) into the Private Use Area at `0xE000 + c`, written as `&#xE0xx;`.
pub fn escape_text(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '&' => out.push_str("&amp;"),
            c if (c as u32) < 0x20 && c != '\t' && c != '\n' && c != '\r' => {
                out.push_str(&format!("&#x{:04x};", 0xE000 + c as u32));
            }
            c => out.push(c),
        }
    }
    out
}

/// Reverses the Private Use Area remapping `escape_text` performs; standard entities are
/// already resolved by the time this runs, since it operates on `quick_xml`'s unescaped text.
fn unescape_private_use_controls(s: &str) -> String {
    s.chars()
        .map(|c| {
            let code = c as u32;
            if (0xE000..=0xE01F).contains(&code) {
                char::from_u32(code - 0xE000).unwrap_or(c)
            } else {
                c
            }
        })
        .collect()
}

/// Parses a complete XML document and decodes its root element as `T`.
pub fn read_xml_root<T: XmlRecord>(input: &[u8], ctx: &DecodeCtx) -> LcfResult<T> {
    let root = parse_document(input)?;
    T::read_xml_fields(&root, ctx)
}

/// Encodes `value` as a complete XML document with `root_name` as its root element.
pub fn write_xml_root<T: XmlRecord>(value: &T, root_name: &str, ctx: &EncodeCtx) -> LcfResult<Vec<u8>> {
    let mut out = Vec::new();
    let mut writer = Writer::new_with_indent(&mut out, b' ', 2);
    writer
        .write_event(Event::Start(BytesStart::new(root_name)))
        .map_err(xml_io_err)?;
    {
        let mut fw = XmlFieldWriter::new(&mut writer);
        value.write_xml_fields(&mut fw, ctx)?;
    }
    writer
        .write_event(Event::End(BytesEnd::new(root_name)))
        .map_err(xml_io_err)?;
    Ok(out)
}

pub fn encode_primitive_tokens<P: Primitive>(items: &[P]) -> String {
    items.iter().map(Primitive::encode_xml).collect::<Vec<_>>().join(" ")
}

pub fn decode_primitive_tokens<P: Primitive>(text: &str) -> LcfResult<Vec<P>> {
    text.split_whitespace().map(P::decode_xml).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escape_round_trips_control_chars() {
        let original = "line1\x01line2";
        let escaped = escape_text(original);
        assert_eq!(escaped, "line1&#xe001;line2");

        let doc = format!("<root>{escaped}</root>");
        let parsed = parse_document(doc.as_bytes()).unwrap();
        assert_eq!(parsed.text(), original);
    }

    #[test]
    fn escape_handles_angle_brackets_and_ampersand() {
        assert_eq!(escape_text("a<b>&c"), "a&lt;b&gt;&amp;c");
    }

    #[test]
    fn indexed_children_carry_one_based_ids() {
        let mut out = Vec::new();
        {
            let mut writer = Writer::new(&mut out);
            let mut fw = XmlFieldWriter::new(&mut writer);
            fw.indexed("page", 1, |w| {
                w.leaf("name", "intro");
                Ok(())
            })
            .unwrap();
        }
        let doc = parse_document(&out).unwrap();
        assert_eq!(doc.attr("id"), Some("0001"));
        assert_eq!(doc.child("name").unwrap().text(), "intro");
    }

    #[test]
    fn primitive_token_list_round_trips() {
        let values = vec![1i32, 0, -5, 42];
        let text = encode_primitive_tokens(&values);
        assert_eq!(decode_primitive_tokens::<i32>(&text).unwrap(), values);
    }
}
