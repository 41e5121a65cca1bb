//! Logging front-end for the driver code in this crate
//!
//! Boards flash with `defmt` over RTT; host tools and tests can route the same
//! call sites through the `log` facade instead. With neither feature enabled
//! every macro compiles to nothing, which is the release default.
//!
//! The backend follows this crate's features only. Other crates pick their
//! own, since `defmt` macros expand against the caller's dependencies.
//!
//! Format strings must stay within the subset both backends understand:
//! `{}` and `{:?}` only.

#[doc(hidden)]
pub mod __private {
    #[cfg(feature = "defmt")]
    pub use defmt;
    #[cfg(all(feature = "log", not(feature = "defmt")))]
    pub use log;
}

#[cfg(feature = "defmt")]
mod backend {
    #[macro_export]
    macro_rules! log_debug {
        ($($arg:tt)*) => { $crate::logging::__private::defmt::debug!($($arg)*) };
    }

    #[macro_export]
    macro_rules! log_info {
        ($($arg:tt)*) => { $crate::logging::__private::defmt::info!($($arg)*) };
    }

    #[macro_export]
    macro_rules! log_warn {
        ($($arg:tt)*) => { $crate::logging::__private::defmt::warn!($($arg)*) };
    }

    #[macro_export]
    macro_rules! log_error {
        ($($arg:tt)*) => { $crate::logging::__private::defmt::error!($($arg)*) };
    }
}

#[cfg(all(feature = "log", not(feature = "defmt")))]
mod backend {
    #[macro_export]
    macro_rules! log_debug {
        ($($arg:tt)*) => { $crate::logging::__private::log::debug!($($arg)*) };
    }

    #[macro_export]
    macro_rules! log_info {
        ($($arg:tt)*) => { $crate::logging::__private::log::info!($($arg)*) };
    }

    #[macro_export]
    macro_rules! log_warn {
        ($($arg:tt)*) => { $crate::logging::__private::log::warn!($($arg)*) };
    }

    #[macro_export]
    macro_rules! log_error {
        ($($arg:tt)*) => { $crate::logging::__private::log::error!($($arg)*) };
    }
}

// Arguments stay type-checked with logging off
#[cfg(not(any(feature = "defmt", feature = "log")))]
mod backend {
    #[macro_export]
    macro_rules! log_debug {
        ($($arg:tt)*) => {{ if false { let _ = ::core::format_args!($($arg)*); } }};
    }

    #[macro_export]
    macro_rules! log_info {
        ($($arg:tt)*) => {{ if false { let _ = ::core::format_args!($($arg)*); } }};
    }

    #[macro_export]
    macro_rules! log_warn {
        ($($arg:tt)*) => {{ if false { let _ = ::core::format_args!($($arg)*); } }};
    }

    #[macro_export]
    macro_rules! log_error {
        ($($arg:tt)*) => {{ if false { let _ = ::core::format_args!($($arg)*); } }};
    }
}
