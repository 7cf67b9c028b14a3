use std::env;

use zwave_cc::cc_define::{RequestFlags, COMMAND_CLASS_PROTECTION, DEFAULT_INSTANCE};
use zwave_cc::frame::hex_dump;
use zwave_cc::protection::Protection;
use zwave_cc::transport::RecordingTransport;
use zwave_cc::value_store::{MemoryValueStore, ValueStore};
use zwave_cc::{init_defaults, CommandClassRegistry, NodeContext};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_defaults()?;

    // frame dumps are emitted through `log`; run with RUST_LOG=debug ZWAVE_LOG_FRAMES=1
    env_logger::init();

    let node: u8 = env::var("ZW_NODE")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(7);
    let report_code: u8 = env::var("ZW_REPORT_STATE")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(1);

    let transport = RecordingTransport::new();
    let store = MemoryValueStore::new();
    let registry = CommandClassRegistry::with_defaults();
    let ctx = NodeContext::new(node, &transport, &store);

    registry.create_vars(&ctx, DEFAULT_INSTANCE)?;
    registry.request_state(&ctx, RequestFlags::SESSION, DEFAULT_INSTANCE);

    let inbound = [COMMAND_CLASS_PROTECTION, 0x03, report_code];
    println!("inbound: {}", hex_dump(&inbound));
    match registry.handle_application_command(&ctx, DEFAULT_INSTANCE, &inbound) {
        Ok(handled) => println!("handled: {handled}"),
        Err(e) => println!("rejected: {e}"),
    }

    for frame in transport.take() {
        println!("sent {:<18} {}", frame.label(), hex_dump(&frame.to_bytes()));
    }
    println!(
        "selected code: {:?}",
        store.selected_code(&Protection::value_key(node, DEFAULT_INSTANCE))
    );
    Ok(())
}
