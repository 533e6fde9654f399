//! A single event-interpreter instruction: an opcode, an indent level, and a parameter list
//! whose shape depends on the opcode. The schema itself stays oblivious to that
//! opcode-specific shape — it only carries the flat field list; command-specific parameter
//! decoding belongs one layer up, in whatever interprets a command stream.

use lcf_macros::LcfRecord;

use crate::chunk::UnknownChunk;

#[derive(Debug, Clone, PartialEq, Default, LcfRecord)]
pub struct EventCommand {
    #[primitive(tag = 1, always)]
    pub code: i32,
    #[primitive(tag = 2, always)]
    pub indent: i32,
    #[primitive(tag = 3)]
    pub string_arg: String,
    #[array_primitive(tag = 4)]
    pub parameters: Vec<i32>,
    #[unknown_chunks]
    pub unknown_chunks: Vec<UnknownChunk>,
}
