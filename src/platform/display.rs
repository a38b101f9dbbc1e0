/// Reports how many screens are attached.
pub trait DisplayEnumerator {
    fn screen_count(&self) -> usize;
}

/// Asks the OS. Platforms without a monitor query report a single screen.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemDisplays;

impl DisplayEnumerator for SystemDisplays {
    fn screen_count(&self) -> usize {
        attached_screens()
    }
}

/// A fixed screen count, e.g. from `--screens`.
#[derive(Debug, Clone, Copy)]
pub struct FixedDisplays(pub usize);

impl DisplayEnumerator for FixedDisplays {
    fn screen_count(&self) -> usize {
        self.0
    }
}

#[cfg(windows)]
#[allow(unsafe_code)]
fn attached_screens() -> usize {
    use windows::Win32::UI::WindowsAndMessaging::{GetSystemMetrics, SM_CMONITORS};

    // SM_CMONITORS only counts visible display monitors
    let count = unsafe { GetSystemMetrics(SM_CMONITORS) };
    usize::try_from(count).unwrap_or(0).max(1)
}

#[cfg(not(windows))]
fn attached_screens() -> usize {
    1
}
