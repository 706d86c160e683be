//! Browser console output. Each macro formats like `format!`; natively the
//! arguments are type-checked and dropped.

#[cfg(target_family = "wasm")]
macro_rules! console_at {
    ($sink:ident, $($arg:tt)*) => {
        web_sys::console::$sink(&format!($($arg)*).into())
    };
}

#[cfg(not(target_family = "wasm"))]
macro_rules! console_at {
    ($sink:ident, $($arg:tt)*) => {
        if false {
            let _ = format_args!($($arg)*);
        }
    };
}

macro_rules! console_log {
    ($($arg:tt)*) => { $crate::diag::console_at!(log_1, $($arg)*) };
}

macro_rules! console_warn {
    ($($arg:tt)*) => { $crate::diag::console_at!(warn_1, $($arg)*) };
}

macro_rules! console_error {
    ($($arg:tt)*) => { $crate::diag::console_at!(error_1, $($arg)*) };
}

pub(crate) use {console_at, console_error, console_log, console_warn};
