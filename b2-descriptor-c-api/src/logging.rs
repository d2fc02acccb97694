use std::ffi::CString;
use std::sync::Mutex;

use log::{Record, Metadata};
use once_cell::sync::Lazy;

use crate::{catch_unwind, b2_status_t};

/// Callback function type for logging. The first argument is the log level
/// (1 for errors, 2 for warnings, 3 for info, 4 for debug and 5 for trace),
/// the second the NULL-terminated message.
#[allow(non_camel_case_types)]
pub type b2_logging_callback_t = Option<unsafe extern fn(level: i32, message: *const std::os::raw::c_char)>;

static GLOBAL_CALLBACK: Lazy<Mutex<b2_logging_callback_t>> = Lazy::new(|| Mutex::new(None));

/// Implementation of `log::Log` that forward all log messages to the global
/// `b2_logging_callback_t`.
struct B2Logger;

impl log::Log for B2Logger {
    fn enabled(&self, _: &Metadata) -> bool {
       return true;
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let message = format!("{} -- {}", record.target(), record.args());
            // messages with NULL bytes can not be sent to C
            let Ok(message) = CString::new(message) else { return };

            let callback = *GLOBAL_CALLBACK.lock().expect("mutex was poisoned");
            if let Some(callback) = callback {
                unsafe {
                    callback(record.level() as i32, message.as_ptr());
                }
            }
        }
    }

    fn flush(&self) {}
}

/// Set the function to call with log messages, and the maximal level of
/// messages to forward: 0 disables logging, 1 only forward errors, up to 5 for
/// all messages including traces.
///
/// @param callback function to call with log messages, or `NULL` to drop all
///                 messages
/// @param log_level maximal level of messages
///
/// @returns The status code of this operation. If the status is not
///          `B2_SUCCESS`, you can use `b2_last_error()` to get the full
///          error message.
#[no_mangle]
pub unsafe extern fn b2_set_logging_callback(callback: b2_logging_callback_t, log_level: i32) -> b2_status_t {
    catch_unwind(|| {
        let level = match log_level {
            0 => log::LevelFilter::Off,
            1 => log::LevelFilter::Error,
            2 => log::LevelFilter::Warn,
            3 => log::LevelFilter::Info,
            4 => log::LevelFilter::Debug,
            5 => log::LevelFilter::Trace,
            _ => return Err(b2_descriptor::Error::InvalidParameter(format!(
                "log level {} is not known, please use an integer in the range [0, 5]", log_level
            ))),
        };

        *GLOBAL_CALLBACK.lock().expect("mutex was poisoned") = callback;
        // we allow multiple sets of logger, therefore the result will be ignored
        let _ = log::set_boxed_logger(Box::new(B2Logger));
        log::set_max_level(level);

        Ok(())
    })
}
