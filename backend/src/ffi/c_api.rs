//! C ABI over the generator adapter
//!
//! Every function returns an `i32` status (`GEN_ADAPTER_OK` or a negative
//! error class) except the constructor's out-parameter and the destructor.
//! After a non-zero status, `gen_adapter_last_error` returns a message for
//! the calling thread.
//!
//! A handle must not be used from two threads at once. Hosts that sample in
//! parallel create one handle per worker.

use std::cell::RefCell;
use std::ffi::{c_char, CStr, CString};
use std::panic::{self, AssertUnwindSafe};
use std::path::PathBuf;
use std::ptr;

use crate::adapter::{AdapterError, BeamConfig, GeneratorAdapter, ProcessSelection};
use crate::generator::{EventGenerator, ToyGenerator};

pub const GEN_ADAPTER_OK: i32 = 0;
pub const GEN_ADAPTER_ERR_NULL_POINTER: i32 = -1;
pub const GEN_ADAPTER_ERR_INVALID_UTF8: i32 = -2;
pub const GEN_ADAPTER_ERR_CONFIG: i32 = -3;
pub const GEN_ADAPTER_ERR_VALIDATION: i32 = -4;
pub const GEN_ADAPTER_ERR_ALREADY_INITIALIZED: i32 = -5;
pub const GEN_ADAPTER_ERR_INIT: i32 = -6;
pub const GEN_ADAPTER_ERR_NOT_INITIALIZED: i32 = -7;
pub const GEN_ADAPTER_ERR_PANIC: i32 = -99;

thread_local! {
    static LAST_ERROR: RefCell<Option<CString>> = const { RefCell::new(None) };
}

fn set_last_error(message: String) {
    let message = CString::new(message.replace('\0', " ")).unwrap_or_default();
    LAST_ERROR.with(|slot| *slot.borrow_mut() = Some(message));
}

fn clear_last_error() {
    LAST_ERROR.with(|slot| *slot.borrow_mut() = None);
}

/// Opaque adapter handle handed to C callers.
pub struct GenAdapterHandle {
    adapter: GeneratorAdapter<Box<dyn EventGenerator + Send>>,
}

impl GenAdapterHandle {
    /// Wrap any generator. Rust hosts embedding a different generator
    /// build the handle here and pass [`into_raw`](Self::into_raw) to C code.
    pub fn new(generator: Box<dyn EventGenerator + Send>) -> Self {
        Self {
            adapter: GeneratorAdapter::new(generator),
        }
    }

    pub fn into_raw(self) -> *mut GenAdapterHandle {
        Box::into_raw(Box::new(self))
    }

    pub fn adapter(&self) -> &GeneratorAdapter<Box<dyn EventGenerator + Send>> {
        &self.adapter
    }
}

enum FfiError {
    NullPointer(&'static str),
    InvalidUtf8(&'static str),
    Adapter(AdapterError),
}

impl From<AdapterError> for FfiError {
    fn from(e: AdapterError) -> Self {
        FfiError::Adapter(e)
    }
}

impl FfiError {
    fn status(&self) -> i32 {
        match self {
            FfiError::NullPointer(_) => GEN_ADAPTER_ERR_NULL_POINTER,
            FfiError::InvalidUtf8(_) => GEN_ADAPTER_ERR_INVALID_UTF8,
            FfiError::Adapter(e) => match e {
                AdapterError::Config(_) | AdapterError::RunConfig(_) => GEN_ADAPTER_ERR_CONFIG,
                AdapterError::Validation(_) => GEN_ADAPTER_ERR_VALIDATION,
                AdapterError::AlreadyInitialized => GEN_ADAPTER_ERR_ALREADY_INITIALIZED,
                AdapterError::Init(_) | AdapterError::InitFailed => GEN_ADAPTER_ERR_INIT,
                AdapterError::NotInitialized => GEN_ADAPTER_ERR_NOT_INITIALIZED,
            },
        }
    }

    fn message(&self) -> String {
        match self {
            FfiError::NullPointer(what) => format!("{} is null", what),
            FfiError::InvalidUtf8(what) => format!("{} is not valid UTF-8", what),
            FfiError::Adapter(e) => e.to_string(),
        }
    }
}

/// Run `body`, translating errors and panics into a status code.
fn guard<F>(body: F) -> i32
where
    F: FnOnce() -> Result<(), FfiError>,
{
    match panic::catch_unwind(AssertUnwindSafe(body)) {
        Ok(Ok(())) => {
            clear_last_error();
            GEN_ADAPTER_OK
        }
        Ok(Err(e)) => {
            set_last_error(e.message());
            e.status()
        }
        Err(_) => {
            set_last_error("panic inside the generator adapter".to_string());
            GEN_ADAPTER_ERR_PANIC
        }
    }
}

unsafe fn handle_mut<'a>(handle: *mut GenAdapterHandle) -> Result<&'a mut GenAdapterHandle, FfiError> {
    handle.as_mut().ok_or(FfiError::NullPointer("handle"))
}

unsafe fn path_arg(path: *const c_char) -> Result<PathBuf, FfiError> {
    if path.is_null() {
        return Err(FfiError::NullPointer("path"));
    }
    let text = CStr::from_ptr(path)
        .to_str()
        .map_err(|_| FfiError::InvalidUtf8("path"))?;
    Ok(PathBuf::from(text))
}

unsafe fn write_out<T>(out: *mut T, value: T, what: &'static str) -> Result<(), FfiError> {
    if out.is_null() {
        return Err(FfiError::NullPointer(what));
    }
    out.write(value);
    Ok(())
}

/// Create an adapter over the reference generator.
///
/// # Safety
/// `out` must be a valid pointer to writable storage for one handle pointer.
/// The handle must be released with `gen_adapter_free`.
#[no_mangle]
pub unsafe extern "C" fn gen_adapter_new(out: *mut *mut GenAdapterHandle) -> i32 {
    guard(|| {
        if out.is_null() {
            return Err(FfiError::NullPointer("out"));
        }
        let handle = GenAdapterHandle::new(Box::new(ToyGenerator::new()));
        out.write(handle.into_raw());
        Ok(())
    })
}

/// Release a handle. Null is ignored.
///
/// # Safety
/// `handle` must come from `gen_adapter_new` (or `GenAdapterHandle::into_raw`)
/// and must not be used afterwards.
#[no_mangle]
pub unsafe extern "C" fn gen_adapter_free(handle: *mut GenAdapterHandle) {
    if !handle.is_null() {
        let _ = panic::catch_unwind(AssertUnwindSafe(|| drop(Box::from_raw(handle))));
    }
}

/// Set where the settings snapshot is written; null disables it.
///
/// # Safety
/// `handle` must be a live handle; `path` null or a NUL-terminated string.
#[no_mangle]
pub unsafe extern "C" fn gen_adapter_set_snapshot_path(
    handle: *mut GenAdapterHandle,
    path: *const c_char,
) -> i32 {
    guard(|| {
        let handle = handle_mut(handle)?;
        let path = if path.is_null() {
            None
        } else {
            Some(path_arg(path)?)
        };
        handle.adapter.set_snapshot_path(path);
        Ok(())
    })
}

/// Initialize the generator. Exactly once per handle.
///
/// # Safety
/// `handle` must be a live handle.
#[no_mangle]
pub unsafe extern "C" fn gen_adapter_init(handle: *mut GenAdapterHandle) -> i32 {
    guard(|| Ok(handle_mut(handle)?.adapter.initialize()?))
}

/// Apply the baseline default settings.
///
/// # Safety
/// `handle` must be a live handle.
#[no_mangle]
pub unsafe extern "C" fn gen_adapter_defaults(handle: *mut GenAdapterHandle) -> i32 {
    guard(|| Ok(handle_mut(handle)?.adapter.apply_defaults()?))
}

/// Select soft-QCD processes.
///
/// # Safety
/// `handle` must be a live handle.
#[no_mangle]
pub unsafe extern "C" fn gen_adapter_set_process(
    handle: *mut GenAdapterHandle,
    elastic: bool,
    single_diffractive: bool,
    double_diffractive: bool,
    central_diffractive: bool,
    non_diffractive: bool,
) -> i32 {
    guard(|| {
        let processes = ProcessSelection {
            elastic,
            single_diffractive,
            double_diffractive,
            central_diffractive,
            non_diffractive,
        };
        Ok(handle_mut(handle)?.adapter.set_processes(processes)?)
    })
}

/// Configure the Coulomb term in elastic scattering.
///
/// # Safety
/// `handle` must be a live handle.
#[no_mangle]
pub unsafe extern "C" fn gen_adapter_set_coulomb(
    handle: *mut GenAdapterHandle,
    enabled: bool,
    t_abs_min: f64,
) -> i32 {
    guard(|| Ok(handle_mut(handle)?.adapter.set_coulomb(enabled, t_abs_min)?))
}

/// Seed the generator. Negative seeds are system-derived and NOT
/// reproducible.
///
/// # Safety
/// `handle` must be a live handle.
#[no_mangle]
pub unsafe extern "C" fn gen_adapter_set_seed(handle: *mut GenAdapterHandle, seed: i32) -> i32 {
    guard(|| {
        handle_mut(handle)?.adapter.set_seed(seed)?;
        Ok(())
    })
}

/// Set beam kinematics.
///
/// # Safety
/// `handle` must be a live handle.
#[no_mangle]
pub unsafe extern "C" fn gen_adapter_set_beam(
    handle: *mut GenAdapterHandle,
    frame_type: i32,
    id_a: i32,
    id_b: i32,
    e_a: f64,
    e_b: f64,
) -> i32 {
    guard(|| {
        let beam = BeamConfig {
            frame_type,
            id_a,
            id_b,
            e_a,
            e_b,
        };
        Ok(handle_mut(handle)?.adapter.set_beam(beam)?)
    })
}

/// Apply a settings file.
///
/// # Safety
/// `handle` must be a live handle; `path` a NUL-terminated string.
#[no_mangle]
pub unsafe extern "C" fn gen_adapter_read_file(
    handle: *mut GenAdapterHandle,
    path: *const c_char,
) -> i32 {
    guard(|| {
        let handle = handle_mut(handle)?;
        let path = path_arg(path)?;
        handle.adapter.load_file(&path)?;
        Ok(())
    })
}

/// Read the total and elastic cross-section estimates, in mb. Nothing is
/// written unless both out pointers are valid.
///
/// # Safety
/// `handle` must be a live handle; both out pointers writable.
#[no_mangle]
pub unsafe extern "C" fn gen_adapter_get_cross_section(
    handle: *mut GenAdapterHandle,
    sigma_total: *mut f64,
    sigma_elastic: *mut f64,
) -> i32 {
    guard(|| {
        if sigma_total.is_null() || sigma_elastic.is_null() {
            return Err(FfiError::NullPointer("cross-section output"));
        }
        let summary = handle_mut(handle)?.adapter.cross_sections()?;
        write_out(sigma_total, summary.sigma_total, "sigma_total")?;
        write_out(sigma_elastic, summary.sigma_elastic, "sigma_elastic")?;
        Ok(())
    })
}

/// Sample one event. A `false` status is written to `status` with a zero
/// return code: it is a result, not an error.
///
/// # Safety
/// `handle` must be a live handle; all out pointers writable.
#[no_mangle]
pub unsafe extern "C" fn gen_adapter_get_event(
    handle: *mut GenAdapterHandle,
    status: *mut bool,
    code: *mut i32,
    t: *mut f64,
    xi: *mut f64,
) -> i32 {
    guard(|| {
        if status.is_null() || code.is_null() || t.is_null() || xi.is_null() {
            return Err(FfiError::NullPointer("event output"));
        }
        let result = handle_mut(handle)?.adapter.sample_event()?;
        write_out(status, result.status, "status")?;
        write_out(code, result.process_code, "code")?;
        write_out(t, result.t, "t")?;
        write_out(xi, result.xi, "xi")?;
        Ok(())
    })
}

/// Message for the last failed call on this thread, or null.
///
/// The pointer stays valid until the next adapter call on the same thread.
#[no_mangle]
pub extern "C" fn gen_adapter_last_error() -> *const c_char {
    LAST_ERROR.with(|slot| {
        slot.borrow()
            .as_ref()
            .map(|message| message.as_ptr())
            .unwrap_or(ptr::null())
    })
}
