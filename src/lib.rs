#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::doc_markdown,
    clippy::too_long_first_doc_paragraph
)]

//! zwave_cc
//!
//! zwave_cc は Z-Wave のコマンドクラス層（Get / Set / Report）を型付きの値ストアへ
//! 橋渡しする Rust ライブラリです。
//!
//! 主な機能:
//! - コマンドクラスごとのアダプタ (`CommandClass` トレイト、`Protection` 実装)
//! - 送信フレームの組立 (`OutboundFrame`)
//! - Report の解析と値ストアへの反映 (`ValueStore`, `MemoryValueStore`)
//! - コマンドクラス ID によるディスパッチ (`CommandClassRegistry`)
//! - テスト用の模擬ノード (別 crate `zwave_cc_mock`)
//!
//! 使い方の簡単な例:
//! ```
//! use zwave_cc::command_class::{CommandClass, NodeContext};
//! use zwave_cc::protection::Protection;
//! use zwave_cc::transport::RecordingTransport;
//! use zwave_cc::value_store::{MemoryValueStore, ValueStore};
//!
//! let transport = RecordingTransport::new();
//! let store = MemoryValueStore::new();
//! let ctx = NodeContext::new(7, &transport, &store);
//! let protection = Protection::new();
//! protection.create_vars(&ctx, 1).unwrap();
//! protection.handle_msg(&ctx, &[0x03, 0x01], 1).unwrap();
//! assert_eq!(store.selected_code(&Protection::value_key(7, 1)), Some(1));
//! ```

pub mod cc_catalog;
pub mod cc_define;
pub mod command_class;
pub mod commands;
pub mod config;
pub mod error;
pub mod frame;
pub mod protection;
pub mod registry;
pub mod state_table;
pub mod transport;
pub mod value;
pub mod value_store;

pub use command_class::{CommandClass, NodeContext};
pub use error::ZwaveError;
pub use registry::CommandClassRegistry;

/// Register the embedded command class catalog into the global catalog.
///
/// Safe to call more than once: later calls merge into the existing catalog.
pub fn init_defaults() -> Result<(), ZwaveError> {
    cc_catalog::CatalogRegistry::embedded()?.register_or_merge()
}
