//! Battle troop definitions.
//!
//! Field layout is grounded on the reference reader's `Ldb_TroopPage` chunk table: a
//! typed condition block, followed by a size-prefixed event command array. `TroopPage`
//! reuses that same condition-then-commands shape the original groups under one page.

use bitflags::bitflags;
use lcf_macros::LcfRecord;

use crate::chunk::UnknownChunk;
use crate::codec::{DecodeCtx, EncodeCtx};
use crate::error::LcfResult;
use crate::primitive::Primitive;
use crate::records::event::EventCommand;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct TroopPageConditionFlags: u32 {
        const SWITCH_A      = 0x001;
        const SWITCH_B      = 0x002;
        const VARIABLE      = 0x004;
        const TURN          = 0x008;
        const TURN_ENEMY    = 0x010;
        const TURN_ACTOR    = 0x020;
        const FATIGUE       = 0x040;
        const ENEMY_HP      = 0x080;
        const ACTOR_HP      = 0x100;
        const COMMAND_ACTOR = 0x200;
    }
}

impl Primitive for TroopPageConditionFlags {
    const PACKED_WIDTH: usize = 4;

    fn decode(payload: &[u8], ctx: &DecodeCtx) -> LcfResult<Self> {
        Ok(TroopPageConditionFlags::from_bits_truncate(u32::decode(payload, ctx)?))
    }

    fn encode(&self, ctx: &EncodeCtx) -> LcfResult<Vec<u8>> {
        self.bits().encode(ctx)
    }

    fn decode_packed(bytes: &[u8]) -> LcfResult<Self> {
        Ok(TroopPageConditionFlags::from_bits_truncate(u32::decode_packed(bytes)?))
    }

    fn encode_packed(&self) -> Vec<u8> {
        self.bits().encode_packed()
    }

    fn decode_xml(text: &str) -> LcfResult<Self> {
        Ok(TroopPageConditionFlags::from_bits_truncate(u32::decode_xml(text)?))
    }

    fn encode_xml(&self) -> String {
        self.bits().encode_xml()
    }
}

#[derive(Debug, Clone, PartialEq, Default, LcfRecord)]
pub struct TroopPageCondition {
    #[primitive(tag = 1, always)]
    pub flags: TroopPageConditionFlags,
    #[primitive(tag = 2)]
    pub switch_a_id: i32,
    #[primitive(tag = 3)]
    pub switch_b_id: i32,
    #[primitive(tag = 4)]
    pub variable_id: i32,
    #[primitive(tag = 5)]
    pub variable_value: i32,
    #[primitive(tag = 6)]
    pub turn_a: i32,
    #[primitive(tag = 7)]
    pub turn_b: i32,
    #[primitive(tag = 8)]
    pub turn_enemy_id: i32,
    #[primitive(tag = 9)]
    pub turn_enemy_a: i32,
    #[primitive(tag = 10)]
    pub turn_enemy_b: i32,
    #[primitive(tag = 11)]
    pub turn_actor_id: i32,
    #[primitive(tag = 12)]
    pub turn_actor_a: i32,
    #[primitive(tag = 13)]
    pub turn_actor_b: i32,
    #[primitive(tag = 14)]
    pub fatigue_min: i32,
    #[primitive(tag = 15)]
    pub fatigue_max: i32,
    #[primitive(tag = 16)]
    pub enemy_hp_id: i32,
    #[primitive(tag = 17)]
    pub enemy_hp_min: i32,
    #[primitive(tag = 18)]
    pub enemy_hp_max: i32,
    #[primitive(tag = 19)]
    pub actor_hp_id: i32,
    #[primitive(tag = 20)]
    pub actor_hp_min: i32,
    #[primitive(tag = 21)]
    pub actor_hp_max: i32,
    #[primitive(tag = 22)]
    pub command_actor_id: i32,
    #[primitive(tag = 23)]
    pub command_id: i32,
    #[unknown_chunks]
    pub unknown_chunks: Vec<UnknownChunk>,
}

#[derive(Debug, Clone, PartialEq, Default, LcfRecord)]
pub struct TroopPage {
    #[primitive(tag = 1, always)]
    pub id: i32,
    #[record(tag = 2, always)]
    pub condition: TroopPageCondition,
    #[array_record(tag = 4, size = 3)]
    pub event_commands: Vec<EventCommand>,
    #[unknown_chunks]
    pub unknown_chunks: Vec<UnknownChunk>,
}

#[derive(Debug, Clone, PartialEq, Default, LcfRecord)]
pub struct Troop {
    #[primitive(tag = 1, always)]
    pub id: i32,
    #[primitive(tag = 2)]
    pub name: String,
    #[array_record(tag = 4, size = 3)]
    pub pages: Vec<TroopPage>,
    #[unknown_chunks]
    pub unknown_chunks: Vec<UnknownChunk>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{decode_record, encode_record};

    #[test]
    fn troop_with_pages_round_trips() {
        let ctx = DecodeCtx::new(encoding_rs::WINDOWS_1252);
        let ectx = EncodeCtx::new(encoding_rs::WINDOWS_1252);
        let troop = Troop {
            id: 1,
            name: "Slime Squad".to_string(),
            pages: vec![TroopPage {
                id: 1,
                condition: TroopPageCondition {
                    flags: TroopPageConditionFlags::SWITCH_A | TroopPageConditionFlags::TURN,
                    switch_a_id: 3,
                    turn_a: 1,
                    turn_b: 0,
                    ..Default::default()
                },
                event_commands: vec![EventCommand { code: 1, indent: 0, ..Default::default() }],
                unknown_chunks: Vec::new(),
            }],
            unknown_chunks: Vec::new(),
        };

        let bytes = encode_record(&troop, &ectx).unwrap();
        let decoded: Troop = decode_record(&bytes, &ctx).unwrap();
        assert_eq!(decoded, troop);
    }

    #[test]
    fn empty_page_list_round_trips_without_size_chunk() {
        let ctx = DecodeCtx::new(encoding_rs::WINDOWS_1252);
        let ectx = EncodeCtx::new(encoding_rs::WINDOWS_1252);
        let troop = Troop { id: 2, name: String::new(), pages: Vec::new(), unknown_chunks: Vec::new() };
        let bytes = encode_record(&troop, &ectx).unwrap();
        let decoded: Troop = decode_record(&bytes, &ctx).unwrap();
        assert_eq!(decoded, troop);
    }
}
