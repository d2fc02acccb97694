use std::os::raw::c_char;
use std::ffi::CStr;

use b2_descriptor::Error;

use crate::{catch_unwind, b2_status_t};
use crate::utils::copy_str_to_c;

/// Clear all collected profiling data
///
/// See also `b2_profiling_enable` and `b2_profiling_get`.
///
/// @returns The status code of this operation. If the status is not
///          `B2_SUCCESS`, you can use `b2_last_error()` to get the full
///          error message.
#[no_mangle]
pub unsafe extern fn b2_profiling_clear() -> b2_status_t {
    catch_unwind(|| {
        time_graph::clear_collected_data();
        Ok(())
    })
}

/// Enable or disable profiling data collection. By default, data collection
/// is disabled.
///
/// The timing information is collected with
/// [`time_graph`](https://docs.rs/time-graph/), and contains the total time
/// spent building the single bond and B2 descriptors, as well as in the
/// spherical harmonics.
///
/// @param enabled whether data collection should be enabled or not
///
/// @returns The status code of this operation. If the status is not
///          `B2_SUCCESS`, you can use `b2_last_error()` to get the full
///          error message.
#[no_mangle]
pub unsafe extern fn b2_profiling_enable(enabled: bool) -> b2_status_t {
    catch_unwind(|| {
        time_graph::enable_data_collection(enabled);
        Ok(())
    })
}

/// Extract the current set of data collected for profiling.
///
/// @param format in which format should the data be provided. `"table"`,
///              `"short_table"` and `"json"` are currently supported
/// @param buffer pre-allocated buffer in which profiling data will be copied.
///               If the buffer is too small, this function will return
///               `B2_INVALID_PARAMETER_ERROR`
/// @param bufflen size of the `buffer`
///
/// @returns The status code of this operation. If the status is not
///          `B2_SUCCESS`, you can use `b2_last_error()` to get the full
///          error message.
#[no_mangle]
pub unsafe extern fn b2_profiling_get(
    format: *const c_char,
    buffer: *mut c_char,
    bufflen: usize,
) -> b2_status_t {
    catch_unwind(|| {
        check_pointers!(format, buffer);

        let data = match CStr::from_ptr(format).to_str()? {
            "table" => time_graph::get_full_graph().as_table(),
            "short_table" => time_graph::get_full_graph().as_short_table(),
            "json" => time_graph::get_full_graph().as_json(),
            format => return Err(Error::InvalidParameter(format!(
                "invalid data format in b2_profiling_get: {}, expected 'table', 'short_table' or 'json'",
                format
            )))
        };
        copy_str_to_c(&data, buffer, bufflen)?;

        Ok(())
    })
}
