use std::io::Write;

use zwave_cc::cc_catalog::{command_class_name, display_name, CatalogRegistry};
use zwave_cc::command_class::{CommandClass, NodeContext};
use zwave_cc::protection::{Decoded, Protection};
use zwave_cc::state_table::StateTable;
use zwave_cc::transport::RecordingTransport;
use zwave_cc::value_store::{MemoryValueStore, ValueStore};
use zwave_cc::ZwaveError;

const LOCK_STATES: &str = r#"
[[state]]
code = 1
label = "Buttons locked"

[[state]]
code = 0
label = "Buttons free"
"#;

#[test]
fn state_table_from_file_feeds_adapter() {
    let mut f = tempfile::NamedTempFile::new().expect("tempfile");
    f.write_all(LOCK_STATES.as_bytes()).expect("write");
    let table = StateTable::from_path(f.path()).expect("load table");
    assert_eq!(table.label(0), Some("Buttons free"));
    assert_eq!(table.label(1), Some("Buttons locked"));

    let p = Protection::with_states(table);
    assert_eq!(p.decode_report(&[0x03, 0x01]).ok(), Some(Decoded::State(1)));
    assert!(p.decode_report(&[0x03, 0x02]).is_err());

    let t = RecordingTransport::new();
    let store = MemoryValueStore::with_capacity(4);
    let ctx = NodeContext::new(2, &t, &store);
    p.create_vars(&ctx, 1).expect("create vars");
    let v = store.get(&Protection::value_key(2, 1)).expect("value");
    assert_eq!(v.data.as_list().map(|l| l.items().len()), Some(2));
}

#[test]
fn state_table_rejects_gaps_and_reports_position() {
    let gap = r#"
[[state]]
code = 0
label = "A"

[[state]]
code = 2
label = "C"
"#;
    let err = StateTable::from_str(gap).expect_err("gap must fail");
    assert!(err.to_string().contains("dense"), "{err}");

    let broken = "[[state]]\ncode = 0\nlabel = \n";
    let err = StateTable::from_str(broken).expect_err("syntax must fail");
    assert!(err.to_string().contains("state table parse error"), "{err}");
}

#[test]
fn missing_definition_files_are_io_errors() {
    let dir = tempfile::tempdir().expect("tempdir");
    let res = StateTable::from_path(&dir.path().join("absent.toml"));
    assert!(
        matches!(res, Err(ZwaveError::Io(ref e)) if e.kind() == std::io::ErrorKind::NotFound),
        "{res:?}"
    );
    let res = CatalogRegistry::from_path(&dir.path().join("command_classes.toml"));
    assert!(matches!(res, Err(ZwaveError::Io(_))));
}

#[test]
fn catalog_merge_keeps_existing_entries() {
    CatalogRegistry::embedded()
        .expect("embedded")
        .register_or_merge()
        .expect("register embedded");

    let extra = r#"
[[command_class]]
id = "0xF0"
name = "COMMAND_CLASS_MARK"
"#;
    extra
        .parse::<CatalogRegistry>()
        .expect("parse extra")
        .register_or_merge()
        .expect("merge extra");

    assert_eq!(display_name(0xF0), "COMMAND_CLASS_MARK");
    assert_eq!(
        command_class_name(0x75).as_deref(),
        Some("COMMAND_CLASS_PROTECTION")
    );
}
