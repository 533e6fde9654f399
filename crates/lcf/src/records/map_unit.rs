//! A single map's contents (`MapNNNN.lmu`): its events, each with the pages and command
//! streams an event can switch between.

use lcf_macros::LcfRecord;

use crate::chunk::UnknownChunk;
use crate::records::event::EventCommand;

#[derive(Debug, Clone, PartialEq, Default, LcfRecord)]
pub struct MapEventPage {
    #[primitive(tag = 1)]
    pub switch_a_id: i32,
    #[primitive(tag = 2)]
    pub switch_a_active: bool,
    #[array_record(tag = 4, size = 3)]
    pub event_commands: Vec<EventCommand>,
    #[unknown_chunks]
    pub unknown_chunks: Vec<UnknownChunk>,
}

#[derive(Debug, Clone, PartialEq, Default, LcfRecord)]
pub struct MapEvent {
    #[primitive(tag = 1, always)]
    pub id: i32,
    #[primitive(tag = 2)]
    pub name: String,
    #[primitive(tag = 3, always)]
    pub x: i32,
    #[primitive(tag = 4, always)]
    pub y: i32,
    #[array_record(tag = 6, size = 5)]
    pub pages: Vec<MapEventPage>,
    #[unknown_chunks]
    pub unknown_chunks: Vec<UnknownChunk>,
}

#[derive(Debug, Clone, PartialEq, Default, LcfRecord)]
pub struct MapUnit {
    #[primitive(tag = 1, always)]
    pub width: i32,
    #[primitive(tag = 2, always)]
    pub height: i32,
    #[array_record(tag = 4, size = 3)]
    pub events: Vec<MapEvent>,
    #[unknown_chunks]
    pub unknown_chunks: Vec<UnknownChunk>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{decode_record, encode_record, DecodeCtx, EncodeCtx};

    #[test]
    fn map_unit_round_trips_with_nested_pages() {
        let ctx = DecodeCtx::new(encoding_rs::WINDOWS_1252);
        let ectx = EncodeCtx::new(encoding_rs::WINDOWS_1252);
        let map = MapUnit {
            width: 20,
            height: 15,
            events: vec![MapEvent {
                id: 1,
                name: "Villager".to_string(),
                x: 5,
                y: 5,
                pages: vec![MapEventPage {
                    switch_a_id: 0,
                    switch_a_active: false,
                    event_commands: vec![EventCommand { code: 20110, indent: 0, ..Default::default() }],
                    unknown_chunks: Vec::new(),
                }],
                unknown_chunks: Vec::new(),
            }],
            unknown_chunks: Vec::new(),
        };
        let bytes = encode_record(&map, &ectx).unwrap();
        let decoded: MapUnit = decode_record(&bytes, &ctx).unwrap();
        assert_eq!(decoded, map);
    }
}
