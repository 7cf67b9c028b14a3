use once_cell::sync::Lazy;

use crate::cc_define::TRANSMIT_OPTIONS_DEFAULT;
use crate::value_store::MAX_NOTIFY_CAPACITY;

const DEFAULT_NOTIFY_CAPACITY: usize = 64;

#[derive(Debug)]
pub struct Config {
    pub log_frames: bool,
    pub transmit_options: u8,
    pub notify_capacity: usize,
}

impl Config {
    fn from_env() -> Self {
        let log_frames = std::env::var("ZWAVE_LOG_FRAMES")
            .map(|v| v == "1")
            .unwrap_or(false);
        let transmit_options = std::env::var("ZWAVE_TRANSMIT_OPTIONS")
            .ok()
            .and_then(|s| parse_byte(&s))
            .unwrap_or(TRANSMIT_OPTIONS_DEFAULT);
        let notify_capacity = std::env::var("ZWAVE_NOTIFY_CAPACITY")
            .ok()
            .and_then(|s| parse_capacity(&s))
            .unwrap_or(DEFAULT_NOTIFY_CAPACITY);
        Self {
            log_frames,
            transmit_options,
            notify_capacity,
        }
    }
}

/// Accepts decimal ("5") or hex ("0x05") notation.
fn parse_byte(s: &str) -> Option<u8> {
    let s = s.trim();
    s.strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .map_or_else(|| s.parse::<u8>().ok(), |h| u8::from_str_radix(h, 16).ok())
}

/// Positive capacity, clamped to [`MAX_NOTIFY_CAPACITY`].
fn parse_capacity(s: &str) -> Option<usize> {
    s.trim()
        .parse::<usize>()
        .ok()
        .filter(|n| *n > 0)
        .map(|n| n.min(MAX_NOTIFY_CAPACITY))
}

/// Global config loaded once from environment at first access.
pub static GLOBAL_CONFIG: Lazy<Config> = Lazy::new(Config::from_env);

/// Convenience accessor
pub fn config() -> &'static Config {
    &GLOBAL_CONFIG
}
