//! End-to-end scenarios spanning the whole crate: file header, schema codec, unknown-chunk
//! preservation, and the XML mirror, rather than one module in isolation.

use lcf::codec::{decode_record, encode_record, DecodeCtx, EncodeCtx};
use lcf::error::LcfError;
use lcf::facade::{read_database, write_database, DATABASE_MAGIC};
use lcf::records::database::{Database, NamedEntry, Terms};
use lcf::records::troop::{Troop, TroopPage, TroopPageCondition, TroopPageConditionFlags};
use lcf::LoadResult;

fn ctx_pair() -> (DecodeCtx, EncodeCtx) {
    let enc = encoding_rs::WINDOWS_1252;
    (DecodeCtx::new(enc), EncodeCtx::new(enc))
}

#[test]
fn minimal_database_round_trips_through_a_full_file() {
    let (dctx, ectx) = ctx_pair();
    let db = Database {
        switches: vec![NamedEntry { id: 1, name: "Switch 1".to_string() }],
        variables: vec![NamedEntry { id: 1, name: "Variable 1".to_string() }],
        terms: Terms { ok: "Yes".to_string(), cancel: "No".to_string(), ..Default::default() },
        troops: vec![],
        unknown_chunks: Vec::new(),
    };

    let bytes = write_database(&db, &ectx).unwrap();
    assert!(bytes.starts_with(&[DATABASE_MAGIC.len() as u8]));

    let loaded: LoadResult<Database> = read_database(&bytes, &dctx).unwrap();
    assert!(loaded.warnings.is_empty());
    assert_eq!(loaded.value, db);
}

#[test]
fn bad_magic_still_loads_but_reports_a_warning() {
    let (dctx, ectx) = ctx_pair();
    let db = Database::default();
    let bytes = lcf::facade::write_tagged(&db, "NotTheRightMagic", &ectx).unwrap();
    let loaded: LoadResult<Database> = read_database(&bytes, &dctx).unwrap();
    assert_eq!(loaded.value, db);
    assert_eq!(loaded.warnings.len(), 1);
}

#[test]
fn mutating_an_array_field_keeps_its_size_companion_in_sync() {
    let (dctx, ectx) = ctx_pair();
    let mut db = Database {
        switches: vec![NamedEntry { id: 1, name: "A".to_string() }],
        ..Default::default()
    };
    db.switches.push(NamedEntry { id: 2, name: "B".to_string() });
    db.switches.push(NamedEntry { id: 3, name: "C".to_string() });

    let bytes = encode_record(&db, &ectx).unwrap();
    let decoded: Database = decode_record(&bytes, &dctx).unwrap();
    assert_eq!(decoded.switches.len(), 3);
    assert_eq!(decoded, db);
}

#[test]
fn unknown_chunks_survive_a_decode_mutate_encode_cycle() {
    use lcf::chunk::UnknownChunk;

    let (dctx, ectx) = ctx_pair();
    let mut db = Database::default();
    db.unknown_chunks.push(UnknownChunk { tag: 250, payload: vec![0xde, 0xad, 0xbe, 0xef] });

    let bytes = encode_record(&db, &ectx).unwrap();
    let mut decoded: Database = decode_record(&bytes, &dctx).unwrap();
    assert_eq!(decoded.unknown_chunks, db.unknown_chunks);

    decoded.terms.ok = "Sure".to_string();
    let bytes2 = encode_record(&decoded, &ectx).unwrap();
    let roundtripped: Database = decode_record(&bytes2, &dctx).unwrap();
    assert_eq!(roundtripped.unknown_chunks, db.unknown_chunks);
    assert_eq!(roundtripped.terms.ok, "Sure");
}

#[test]
fn nested_record_array_with_condition_flags_round_trips() {
    let (dctx, ectx) = ctx_pair();
    let troop = Troop {
        id: 7,
        name: "Bandit Camp".to_string(),
        pages: vec![
            TroopPage {
                id: 1,
                condition: TroopPageCondition {
                    flags: TroopPageConditionFlags::SWITCH_A | TroopPageConditionFlags::ENEMY_HP,
                    switch_a_id: 4,
                    enemy_hp_id: 1,
                    enemy_hp_min: 0,
                    enemy_hp_max: 50,
                    ..Default::default()
                },
                event_commands: vec![],
                unknown_chunks: vec![],
            },
            TroopPage::default(),
        ],
        unknown_chunks: Vec::new(),
    };

    let bytes = encode_record(&troop, &ectx).unwrap();
    let decoded: Troop = decode_record(&bytes, &dctx).unwrap();
    assert_eq!(decoded, troop);
    assert!(decoded.pages[0].condition.flags.contains(TroopPageConditionFlags::SWITCH_A));
}

#[test]
fn database_mirrors_through_xml_without_losing_fields() {
    use lcf::xml::{read_xml_root, write_xml_root};

    let (dctx, ectx) = ctx_pair();
    let db = Database {
        switches: vec![NamedEntry { id: 1, name: "On/Off".to_string() }],
        variables: vec![],
        terms: Terms { ok: "Yes".to_string(), cancel: "No".to_string(), ..Default::default() },
        troops: vec![Troop { id: 1, name: "Slimes".to_string(), pages: vec![], unknown_chunks: vec![] }],
        unknown_chunks: Vec::new(),
    };

    let xml_bytes = write_xml_root(&db, "database", &ectx).unwrap();
    let xml_text = String::from_utf8(xml_bytes.clone()).unwrap();
    assert!(xml_text.contains("<database>"));
    assert!(xml_text.contains("id=\"0001\""));

    let decoded: Database = read_xml_root(&xml_bytes, &dctx).unwrap();
    assert_eq!(decoded, db);
}

#[test]
fn truncated_file_is_reported_as_truncated_not_panic() {
    let (dctx, _) = ctx_pair();
    let err = read_database::<Database>(&[], &dctx).unwrap_err();
    assert!(matches!(err, LcfError::Truncated { .. }));
}
