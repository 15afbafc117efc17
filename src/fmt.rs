//! Crate internal logging macros.
//!
//! Forwards to `defmt` or `log` depending on the enabled feature and compiles
//! away to nothing when neither is enabled.
#![macro_use]
#![allow(unused_macros)]

cfg_if::cfg_if! {
    if #[cfg(feature = "defmt")] {
        macro_rules! trace {
            ($s:literal $(, $x:expr)* $(,)?) => { ::defmt::trace!($s $(, $x)*) };
        }
        macro_rules! debug {
            ($s:literal $(, $x:expr)* $(,)?) => { ::defmt::debug!($s $(, $x)*) };
        }
        macro_rules! info {
            ($s:literal $(, $x:expr)* $(,)?) => { ::defmt::info!($s $(, $x)*) };
        }
        macro_rules! warn {
            ($s:literal $(, $x:expr)* $(,)?) => { ::defmt::warn!($s $(, $x)*) };
        }
    } else if #[cfg(feature = "log")] {
        macro_rules! trace {
            ($s:literal $(, $x:expr)* $(,)?) => { ::log::trace!($s $(, $x)*) };
        }
        macro_rules! debug {
            ($s:literal $(, $x:expr)* $(,)?) => { ::log::debug!($s $(, $x)*) };
        }
        macro_rules! info {
            ($s:literal $(, $x:expr)* $(,)?) => { ::log::info!($s $(, $x)*) };
        }
        macro_rules! warn {
            ($s:literal $(, $x:expr)* $(,)?) => { ::log::warn!($s $(, $x)*) };
        }
    } else {
        macro_rules! trace {
            ($s:literal $(, $x:expr)* $(,)?) => { { let _ = ($( & $x ),*); } };
        }
        macro_rules! debug {
            ($s:literal $(, $x:expr)* $(,)?) => { { let _ = ($( & $x ),*); } };
        }
        macro_rules! info {
            ($s:literal $(, $x:expr)* $(,)?) => { { let _ = ($( & $x ),*); } };
        }
        macro_rules! warn {
            ($s:literal $(, $x:expr)* $(,)?) => { { let _ = ($( & $x ),*); } };
        }
    }
}
