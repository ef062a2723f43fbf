//! Key dispatch and file collaborator.
//!
//! * `dispatcher` - the Normal / PendingPrefix state machine turning decoded
//!   keys into navigation, insertion, save and quit.
//! * `io_ops` - open, read and write of the edited file behind the
//!   `DocumentSink` trait the dispatcher saves through.

pub mod dispatcher;
pub mod io_ops;

pub use dispatcher::{DispatchResult, DispatchState, Dispatcher};
pub use io_ops::{DocumentSink, EditFile, FileError, MemorySink, open_for_edit};

use core_config::KeysConfig;
use core_keymap::KeymapSpec;

/// Keymap overrides taken from the `[keys]` config table.
pub fn keymap_spec(keys: &KeysConfig) -> KeymapSpec {
    KeymapSpec {
        prefix: keys.prefix.trim().to_string(),
        quit: keys.quit.trim().to_string(),
        save: keys.save.trim().to_string(),
        interrupt: keys.interrupt().map(str::to_string),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_keys_match_default_spec() {
        assert_eq!(keymap_spec(&KeysConfig::default()), KeymapSpec::default());
    }

    #[test]
    fn empty_interrupt_disables_binding() {
        let keys = KeysConfig {
            interrupt: "  ".into(),
            ..KeysConfig::default()
        };
        assert_eq!(keymap_spec(&keys).interrupt, None);
    }
}
