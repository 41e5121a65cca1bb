//! Crate-local logging macros
//!
//! The backend is picked by this crate's own `defmt` and `log` features, so
//! the calls expand against dependencies `sisicic-core` actually has. Enabling
//! a backend on `sisicic-hal` alone leaves this crate silent.

#[cfg(feature = "defmt")]
mod backend {
    macro_rules! log_debug {
        ($($arg:tt)*) => { ::defmt::debug!($($arg)*) };
    }

    macro_rules! log_info {
        ($($arg:tt)*) => { ::defmt::info!($($arg)*) };
    }

    macro_rules! log_warn {
        ($($arg:tt)*) => { ::defmt::warn!($($arg)*) };
    }

    macro_rules! log_error {
        ($($arg:tt)*) => { ::defmt::error!($($arg)*) };
    }

    pub(crate) use {log_debug, log_error, log_info, log_warn};
}

#[cfg(all(feature = "log", not(feature = "defmt")))]
mod backend {
    macro_rules! log_debug {
        ($($arg:tt)*) => { ::log::debug!($($arg)*) };
    }

    macro_rules! log_info {
        ($($arg:tt)*) => { ::log::info!($($arg)*) };
    }

    macro_rules! log_warn {
        ($($arg:tt)*) => { ::log::warn!($($arg)*) };
    }

    macro_rules! log_error {
        ($($arg:tt)*) => { ::log::error!($($arg)*) };
    }

    pub(crate) use {log_debug, log_error, log_info, log_warn};
}

#[cfg(not(any(feature = "defmt", feature = "log")))]
mod backend {
    macro_rules! log_debug {
        ($($arg:tt)*) => {{ if false { let _ = ::core::format_args!($($arg)*); } }};
    }

    macro_rules! log_info {
        ($($arg:tt)*) => {{ if false { let _ = ::core::format_args!($($arg)*); } }};
    }

    macro_rules! log_warn {
        ($($arg:tt)*) => {{ if false { let _ = ::core::format_args!($($arg)*); } }};
    }

    macro_rules! log_error {
        ($($arg:tt)*) => {{ if false { let _ = ::core::format_args!($($arg)*); } }};
    }

    pub(crate) use {log_debug, log_error, log_info, log_warn};
}

pub(crate) use backend::{log_debug, log_error, log_info, log_warn};
