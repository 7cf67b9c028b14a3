use zwave_cc::cc_define::{RequestFlags, COMMAND_CLASS_PROTECTION};
use zwave_cc::command_class::{CommandClass, NodeContext};
use zwave_cc::protection::{Decoded, Protection, PROTECTION_STATE_COUNT, PROTECTION_STATE_LABELS};
use zwave_cc::transport::RecordingTransport;
use zwave_cc::value::{Value, ValueData, ValueGenre, ValueKey, ValueType};
use zwave_cc::value_store::{MemoryValueStore, NotificationKind, ValueStore};
use zwave_cc::ZwaveError;

const NODE: u8 = 7;

#[test]
fn get_and_set_frames_for_node_7() {
    let p = Protection::new();
    let t = RecordingTransport::new();
    let store = MemoryValueStore::with_capacity(8);
    let ctx = NodeContext::new(NODE, &t, &store);

    p.create_vars(&ctx, 1).expect("create vars");
    p.request_value(&ctx, 1);

    let key = Protection::value_key(NODE, 1);
    let mut value = store.get(&key).expect("registered value");
    if let ValueData::List(list) = &mut value.data {
        assert!(list.select_by_value(1));
    }
    assert!(p.set_value(&ctx, &value).expect("set"));

    let sent = t.take();
    assert_eq!(sent.len(), 2);
    assert_eq!(sent[0].label(), "ProtectionCmd_Get");
    assert_eq!(sent[0].command_payload(), &[COMMAND_CLASS_PROTECTION, 0x02]);
    assert_eq!(sent[0].to_bytes(), vec![NODE, 2, 0x75, 0x02, 0x05]);
    assert_eq!(sent[1].label(), "Protection Set");
    assert_eq!(sent[1].command_payload(), &[COMMAND_CLASS_PROTECTION, 0x01, 0x01]);
    assert_eq!(sent[1].to_bytes(), vec![NODE, 3, 0x75, 0x01, 0x01, 0x05]);
}

#[test]
fn report_updates_registered_value() {
    let p = Protection::new();
    let t = RecordingTransport::new();
    let store = MemoryValueStore::with_capacity(8);
    let ctx = NodeContext::new(NODE, &t, &store);
    p.create_vars(&ctx, 1).expect("create vars");
    let mut rx = store.subscribe();

    assert!(p.handle_msg(&ctx, &[0x03, 0x01], 1).expect("report"));

    let key = Protection::value_key(NODE, 1);
    assert_eq!(store.selected_code(&key), Some(1));
    let value = store.get(&key).expect("value");
    let label = value
        .data
        .as_list()
        .and_then(|l| l.selected_item())
        .map(|i| i.label.clone());
    assert_eq!(label.as_deref(), Some("Protection by Sequence"));
    let n = rx.try_recv().expect("notification");
    assert_eq!(n.key, key);
    assert_eq!(n.kind, NotificationKind::Changed);
}

#[test]
fn out_of_range_report_is_rejected_without_store_update() {
    let p = Protection::new();
    let t = RecordingTransport::new();
    let store = MemoryValueStore::with_capacity(8);
    let ctx = NodeContext::new(NODE, &t, &store);
    p.create_vars(&ctx, 1).expect("create vars");
    let mut rx = store.subscribe();

    let res = p.handle_msg(&ctx, &[0x03, 0x09], 1);
    assert!(matches!(
        res,
        Err(ZwaveError::StateOutOfRange { code: 9, count: 3 })
    ));
    assert_eq!(store.selected_code(&Protection::value_key(NODE, 1)), Some(0));
    assert!(rx.try_recv().is_err(), "no notification expected");
}

#[test]
fn short_buffers_never_read_past_the_end() {
    let p = Protection::new();
    assert!(matches!(
        p.decode_report(&[]),
        Err(ZwaveError::MalformedReport { len: 0, .. })
    ));
    assert!(matches!(
        p.decode_report(&[0x03]),
        Err(ZwaveError::MalformedReport { len: 1, .. })
    ));
    // a Report at the end of a longer buffer slice is still bounded by the slice
    let buf = [0x03u8, 0x01, 0x02];
    assert!(p.decode_report(&buf[..1]).is_err());
}

#[test]
fn non_report_commands_are_not_recognized() {
    let p = Protection::new();
    for first in (0u8..=0xFF).filter(|b| *b != 0x03) {
        for rest in [&[][..], &[0x01][..], &[0xFF, 0xFF, 0xFF][..]] {
            let mut buf = vec![first];
            buf.extend_from_slice(rest);
            assert_eq!(
                p.decode_report(&buf).ok(),
                Some(Decoded::NotRecognized),
                "{buf:02X?}"
            );
        }
    }
}

#[test]
fn set_code_survives_report_round_trip() {
    let p = Protection::new();
    for code in 0..PROTECTION_STATE_COUNT as u8 {
        let set = p.encode_set(NODE, code).expect("set");
        let sent_code = set.command_payload()[2];
        let report = [0x03, sent_code];
        assert_eq!(p.decode_report(&report).ok(), Some(Decoded::State(code)));
        assert_eq!(
            p.states().label(code),
            Some(PROTECTION_STATE_LABELS[usize::from(code)])
        );
    }
}

#[test]
fn registration_is_idempotent() {
    let p = Protection::new();
    let t = RecordingTransport::new();
    let store = MemoryValueStore::with_capacity(8);
    let ctx = NodeContext::new(NODE, &t, &store);
    p.create_vars(&ctx, 1).expect("first");
    p.handle_msg(&ctx, &[0x03, 0x02], 1).expect("report");
    p.create_vars(&ctx, 1).expect("second");

    let values = store.values_for_node(NODE);
    assert_eq!(values.len(), 1);
    let v = &values[0];
    let id = v.id();
    assert_eq!(id.key, Protection::value_key(NODE, 1));
    assert_eq!(id.genre, ValueGenre::System);
    assert_eq!(id.value_type, ValueType::List);
    assert_eq!(v.label, "Protection");
    assert!(!v.read_only);
    let list = v.data.as_list().expect("list value");
    assert_eq!(list.items().len(), PROTECTION_STATE_COUNT);
    assert_eq!(list.selected_index(), 2);
}

#[test]
fn report_for_unregistered_instance_is_a_noop() {
    let p = Protection::new();
    let t = RecordingTransport::new();
    let store = MemoryValueStore::with_capacity(8);
    let ctx = NodeContext::new(NODE, &t, &store);
    p.create_vars(&ctx, 1).expect("create vars");

    assert!(p.handle_msg(&ctx, &[0x03, 0x01], 2).expect("report"));
    assert!(store.get(&Protection::value_key(NODE, 2)).is_none());
    assert_eq!(store.selected_code(&Protection::value_key(NODE, 1)), Some(0));
}

#[test]
fn set_with_non_list_value_is_not_applicable() {
    let p = Protection::new();
    let t = RecordingTransport::new();
    let store = MemoryValueStore::with_capacity(8);
    let ctx = NodeContext::new(NODE, &t, &store);
    let value = Value {
        key: ValueKey::new(NODE, COMMAND_CLASS_PROTECTION, 1, 0),
        genre: ValueGenre::System,
        label: "Protection".into(),
        units: String::new(),
        read_only: false,
        data: ValueData::Bool(true),
    };
    assert!(!p.set_value(&ctx, &value).expect("set"));
    assert!(t.sent().is_empty());
}

#[test]
fn request_state_only_acts_on_session() {
    let p = Protection::new();
    let t = RecordingTransport::new();
    let store = MemoryValueStore::with_capacity(8);
    let ctx = NodeContext::new(NODE, &t, &store);

    assert!(!p.request_state(&ctx, RequestFlags::STATIC, 1));
    assert!(!p.request_state(&ctx, RequestFlags::DYNAMIC, 1));
    assert!(t.sent().is_empty());
    assert!(p.request_state(&ctx, RequestFlags::STATIC | RequestFlags::SESSION, 1));
    let sent = t.sent();
    assert_eq!(sent.len(), 1);
    let reply = sent[0].expected_reply().expect("get expects a report");
    assert_eq!(reply.command_class_id, Some(COMMAND_CLASS_PROTECTION));
}
