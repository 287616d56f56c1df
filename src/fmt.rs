//! Logging shims.
//!
//! Diagnostics go to `defmt` when that feature is enabled, otherwise to `log`,
//! otherwise nowhere. The silent variant still borrows its arguments so values
//! that only feed a log line do not trip unused warnings.
#![allow(unused_macros)]

cfg_if::cfg_if! {
    if #[cfg(feature = "defmt")] {
        macro_rules! debug {
            ($($arg:tt)*) => { ::defmt::debug!($($arg)*) };
        }
        macro_rules! warn {
            ($($arg:tt)*) => { ::defmt::warn!($($arg)*) };
        }
    } else if #[cfg(feature = "log")] {
        macro_rules! debug {
            ($($arg:tt)*) => { ::log::debug!($($arg)*) };
        }
        macro_rules! warn {
            ($($arg:tt)*) => { ::log::warn!($($arg)*) };
        }
    } else {
        macro_rules! debug {
            ($s:literal $(, $x:expr)* $(,)?) => {{
                let _ = ($(&$x),*);
            }};
        }
        macro_rules! warn {
            ($s:literal $(, $x:expr)* $(,)?) => {{
                let _ = ($(&$x),*);
            }};
        }
    }
}
