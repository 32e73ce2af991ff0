//! Foreign buffer allocation.
//!
//! Every byte buffer and error string handed to the caller is one
//! independent heap allocation that the caller must release exactly once
//! via [`cookie_free_pointer`], never via its own allocator.
//!
//! The release entry point receives only the user pointer, so each
//! allocation carries a hidden 8-byte header storing the total allocation
//! size just before the bytes the caller sees.

use std::alloc::{alloc, dealloc, Layout};
use std::os::raw::{c_char, c_void};

const HEADER: usize = std::mem::size_of::<u64>();

fn block_layout(total: usize) -> Option<Layout> {
    Layout::from_size_align(total, std::mem::align_of::<u64>()).ok()
}

/// Allocates a block with room for `len` user bytes.
///
/// Returns the user pointer (just past the header), or null if the
/// allocator fails or the size overflows.
fn alloc_block(len: usize) -> *mut u8 {
    let Some(total) = HEADER.checked_add(len) else {
        return std::ptr::null_mut();
    };
    let Some(layout) = block_layout(total) else {
        return std::ptr::null_mut();
    };
    // SAFETY: the layout has non-zero size (at least the header).
    let raw = unsafe { alloc(layout) };
    if raw.is_null() {
        return std::ptr::null_mut();
    }
    // SAFETY: raw points to `total` bytes aligned for u64.
    unsafe {
        raw.cast::<u64>().write(total as u64);
        raw.add(HEADER)
    }
}

/// Copies `bytes` into a fresh foreign allocation.
///
/// Returns null only on allocation failure, which the entry points surface
/// as `AllocationFailed`.
pub fn alloc_bytes(bytes: &[u8]) -> *mut u8 {
    let ptr = alloc_block(bytes.len());
    if !ptr.is_null() {
        // SAFETY: ptr points to at least bytes.len() writable bytes.
        unsafe {
            std::ptr::copy_nonoverlapping(bytes.as_ptr(), ptr, bytes.len());
        }
    }
    ptr
}

/// Copies `message` into a foreign allocation with a NUL terminator.
///
/// Returns null on allocation failure; error reporting is best-effort, so
/// callers of this helper tolerate a null result.
pub fn alloc_error_string(message: &str) -> *mut c_char {
    let bytes = message.as_bytes();
    let Some(len) = bytes.len().checked_add(1) else {
        return std::ptr::null_mut();
    };
    let ptr = alloc_block(len);
    if ptr.is_null() {
        return std::ptr::null_mut();
    }
    // SAFETY: ptr points to bytes.len() + 1 writable bytes.
    unsafe {
        std::ptr::copy_nonoverlapping(bytes.as_ptr(), ptr, bytes.len());
        ptr.add(bytes.len()).write(0);
    }
    ptr.cast()
}

/// Frees memory previously returned by a `cookie_store_*` entry point:
/// serialized cookie buffers and error message strings alike.
///
/// No-op on null. Each allocation must be released exactly once.
///
/// # Safety
///
/// `ptr` must be null or a pointer obtained from this library that has not
/// already been freed.
#[no_mangle]
pub unsafe extern "C" fn cookie_free_pointer(ptr: *mut c_void) {
    if ptr.is_null() {
        return;
    }
    let raw = ptr.cast::<u8>().sub(HEADER);
    let total = raw.cast::<u64>().read() as usize;
    // The layout was validated when the block was allocated.
    let layout = Layout::from_size_align_unchecked(total, std::mem::align_of::<u64>());
    dealloc(raw, layout);
}
