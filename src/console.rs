//! Serialized console output.
//!
//! All library-initiated text (usage rendering, default error
//! diagnostics, version output) goes through one lock so concurrent
//! callers cannot interleave partial writes. Write failures are
//! ignored; console output is a diagnostic channel, not a data channel.

use std::io::Write;
use std::sync::{Mutex, MutexGuard};

static CONSOLE: Mutex<()> = Mutex::new(());

fn lock() -> MutexGuard<'static, ()> {
    CONSOLE.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Write text to standard output under the console lock.
pub fn print(text: &str) {
    let _guard = lock();
    let mut stdout = std::io::stdout();
    let _ = stdout.write_all(text.as_bytes());
    let _ = stdout.flush();
}

/// Write text to standard error under the console lock.
pub fn eprint(text: &str) {
    let _guard = lock();
    let mut stderr = std::io::stderr();
    let _ = stderr.write_all(text.as_bytes());
    let _ = stderr.flush();
}
