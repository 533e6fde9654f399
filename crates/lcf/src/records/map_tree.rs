//! The map tree (`RPG_RT.lmt`): the project's map hierarchy and the order maps are shown
//! in the editor's tree view.

use lcf_macros::LcfRecord;

use crate::chunk::UnknownChunk;

#[derive(Debug, Clone, PartialEq, Default, LcfRecord)]
pub struct MapTreeEntry {
    #[primitive(tag = 1, always)]
    pub id: i32,
    #[primitive(tag = 2)]
    pub name: String,
    #[primitive(tag = 3)]
    pub parent_id: i32,
    #[primitive(tag = 4)]
    pub indentation: i32,
}

#[derive(Debug, Clone, PartialEq, Default, LcfRecord)]
pub struct MapTree {
    #[array_record(tag = 2, size = 1)]
    pub entries: Vec<MapTreeEntry>,
    #[array_primitive(tag = 3)]
    pub tree_order: Vec<i32>,
    #[primitive(tag = 4, always)]
    pub start_map_id: i32,
    #[unknown_chunks]
    pub unknown_chunks: Vec<UnknownChunk>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{decode_record, encode_record, DecodeCtx, EncodeCtx};

    #[test]
    fn map_tree_round_trips() {
        let ctx = DecodeCtx::new(encoding_rs::WINDOWS_1252);
        let ectx = EncodeCtx::new(encoding_rs::WINDOWS_1252);
        let tree = MapTree {
            entries: vec![
                MapTreeEntry { id: 1, name: "Root".to_string(), parent_id: 0, indentation: 0 },
                MapTreeEntry { id: 2, name: "Town".to_string(), parent_id: 1, indentation: 1 },
            ],
            tree_order: vec![1, 2],
            start_map_id: 1,
            unknown_chunks: Vec::new(),
        };
        let bytes = encode_record(&tree, &ectx).unwrap();
        let decoded: MapTree = decode_record(&bytes, &ctx).unwrap();
        assert_eq!(decoded, tree);
    }
}
