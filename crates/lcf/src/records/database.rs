//! The project database root (`RPG_RT.ldb`): system vocabulary, and the named lookup
//! tables (switches, variables, troops) every other file references by numeric id.

use lcf_macros::LcfRecord;

use crate::chunk::UnknownChunk;

/// One entry of a switch/variable/actor/... name table. Every such table in the database
/// shares this `id -> name` shape, so it is factored out instead of repeated per table.
#[derive(Debug, Clone, PartialEq, Default, LcfRecord)]
pub struct NamedEntry {
    #[primitive(tag = 1, always)]
    pub id: i32,
    #[primitive(tag = 2)]
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Default, LcfRecord)]
pub struct Terms {
    #[primitive(tag = 1)]
    pub ok: String,
    #[primitive(tag = 2)]
    pub cancel: String,
    #[primitive(tag = 3)]
    pub menu_save: String,
    #[primitive(tag = 4)]
    pub menu_quit: String,
    #[primitive(tag = 5)]
    pub gold: String,
    #[primitive(tag = 6)]
    pub hp: String,
    #[primitive(tag = 7)]
    pub sp: String,
    #[primitive(tag = 8)]
    pub level: String,
    #[unknown_chunks]
    pub unknown_chunks: Vec<UnknownChunk>,
}

#[derive(Debug, Clone, PartialEq, Default, LcfRecord)]
pub struct Database {
    #[array_record(tag = 2, size = 1)]
    pub switches: Vec<NamedEntry>,
    #[array_record(tag = 4, size = 3)]
    pub variables: Vec<NamedEntry>,
    #[record(tag = 5, always)]
    pub terms: Terms,
    #[array_record(tag = 7, size = 6)]
    pub troops: Vec<super::troop::Troop>,
    #[unknown_chunks]
    pub unknown_chunks: Vec<UnknownChunk>,
}

/// Knobs that distinguish engine variants (RPG Maker 2000 vs 2003, language patches, ...).
/// The reference implementation resolves these through per-record `Setup()` methods backed
/// by process-global state; this crate keeps it an explicit value instead, so loading a
/// database never depends on hidden global configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineFlags {
    pub is_rpg2k3: bool,
    pub default_term_language_is_english: bool,
}

impl Default for EngineFlags {
    fn default() -> Self {
        EngineFlags { is_rpg2k3: false, default_term_language_is_english: true }
    }
}

/// Fills in engine-specific defaults the on-disk format leaves implicit, mirroring the
/// reference reader's post-load fixups without routing through global state.
pub fn apply_engine_defaults(db: &mut Database, flags: EngineFlags) {
    if db.terms.ok.is_empty() {
        db.terms.ok = if flags.default_term_language_is_english { "Yes".to_string() } else { "Oui".to_string() };
    }
    if db.terms.cancel.is_empty() {
        db.terms.cancel = if flags.default_term_language_is_english { "No".to_string() } else { "Non".to_string() };
    }
    if db.terms.gold.is_empty() {
        db.terms.gold = "Gold".to_string();
    }
    if flags.is_rpg2k3 && db.terms.menu_save.is_empty() {
        db.terms.menu_save = "Save".to_string();
    }
}
