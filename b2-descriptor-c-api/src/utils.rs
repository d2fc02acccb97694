use std::os::raw::c_char;

use b2_descriptor::Error;

/// Copy `string` to the C buffer `buffer` of size `bufflen`, including a
/// NULL terminator. It is an error for the buffer to be too small.
pub unsafe fn copy_str_to_c(string: &str, buffer: *mut c_char, bufflen: usize) -> Result<(), Error> {
    if string.len() + 1 > bufflen {
        return Err(Error::InvalidParameter(format!(
            "string buffer is not big enough: got space for {} characters but need {}",
            bufflen, string.len() + 1
        )));
    }

    std::ptr::copy(string.as_ptr(), buffer.cast::<u8>(), string.len());
    // NULL-terminate the string
    buffer.add(string.len()).write(0);

    return Ok(());
}
