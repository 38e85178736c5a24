//! Safety interlocks.

mod interlock;

pub use interlock::{LimitInterlock, DEFAULT_DEBOUNCE_MS, MAX_LIMIT_LINES};
