//! C API for the B2 descriptor. All functions return a `b2_status_t`
//! (or a NULL pointer for constructors), and the error message for the last
//! failed call on the current thread is available with `b2_last_error`.

#![warn(clippy::all, clippy::pedantic)]

// disable some style lints
#![allow(clippy::needless_return, clippy::redundant_field_names, clippy::upper_case_acronyms)]
#![allow(clippy::missing_errors_doc, clippy::missing_safety_doc, clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]

mod utils;

#[macro_use]
mod status;
pub use self::status::{catch_unwind, b2_status_t, b2_last_error};

mod logging;
pub use self::logging::{b2_logging_callback_t, b2_set_logging_callback};

pub mod calculator;
pub mod profiling;
