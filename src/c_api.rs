// File: src/c_api.rs
// C entry points. Strings cross the boundary as NUL-terminated UTF-8 and
// results come back as heap strings the caller releases with
// `pvi_free_string`.
use crate::core::engine::profile;
use crate::core::phonology::Separator;
use crate::error::Result;
use std::ffi::{c_char, CStr, CString};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::ptr;
use tracing::error;

/// Borrows an optional C string; null reads as `None`.
unsafe fn opt_str<'a>(s: *const c_char) -> Option<&'a str> {
    if s.is_null() {
        return None;
    }
    CStr::from_ptr(s).to_str().ok()
}

fn profile_json(word: &str, phonemic: Option<&str>, separator: Option<&str>) -> Result<String> {
    let separator = match separator {
        Some(s) => s.parse()?,
        None => Separator::default(),
    };
    let verb = profile(word, phonemic, separator)?;
    Ok(serde_json::to_string(&verb)?)
}

/// Generates the profile of `word` and returns it as JSON.
///
/// `phonemic` and `separator` may be null. Returns null when `word` is null
/// or not UTF-8, when validation fails, or on an internal panic.
///
/// # Safety
/// Every non-null argument must point to a NUL-terminated string.
#[no_mangle]
pub unsafe extern "C" fn pvi_profile(
    word: *const c_char,
    phonemic: *const c_char,
    separator: *const c_char,
) -> *mut c_char {
    let Some(word) = opt_str(word) else {
        return ptr::null_mut();
    };
    let phonemic = opt_str(phonemic);
    let separator = opt_str(separator);

    let result = catch_unwind(AssertUnwindSafe(|| profile_json(word, phonemic, separator)));
    let json = match result {
        Ok(Ok(json)) => json,
        Ok(Err(e)) => {
            error!(word, error = %e, "pvi_profile failed");
            return ptr::null_mut();
        }
        Err(_) => {
            error!(word, "panic in pvi_profile");
            return ptr::null_mut();
        }
    };
    match CString::new(json) {
        Ok(s) => s.into_raw(),
        Err(_) => ptr::null_mut(),
    }
}

/// Releases a string returned by [`pvi_profile`].
///
/// # Safety
/// `s` must be null or a pointer obtained from `pvi_profile` that has not
/// been freed yet.
#[no_mangle]
pub unsafe extern "C" fn pvi_free_string(s: *mut c_char) {
    if !s.is_null() {
        drop(CString::from_raw(s));
    }
}
