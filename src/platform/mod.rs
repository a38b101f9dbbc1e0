//! OS services the options dialog depends on.
//!
//! Each service is a trait so the dialog can be driven without a desktop
//! session; the concrete types here talk to the real system.

mod appearance;
mod display;
mod hotkey;

pub use appearance::{SystemAppearance, SystemTheme};
pub use display::{DisplayEnumerator, FixedDisplays, SystemDisplays};
pub use hotkey::{GlobalHotkey, HotkeyRegistrar, OfflineHotkey, Registration};
