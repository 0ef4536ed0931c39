//! Exclusive ownership of one engine resource plus the engine function that frees it.

use std::fmt;
use std::mem::ManuallyDrop;
use std::ptr::NonNull;

use crate::error::{ModelError, Result};

/// Engine-supplied release function for a resource of type `T`.
pub type ReleaseFn<T> = unsafe extern "C" fn(*mut T);

/// Safe owner of a non-null `*mut T` handed out by the engine.
///
/// Dropping releases the resource exactly once; `into_raw` disarms the release.
pub struct NativeHandle<T> {
    ptr: NonNull<T>,
    release: ReleaseFn<T>,
}

impl<T> NativeHandle<T> {
    /// Take ownership of `ptr`.
    ///
    /// A null pointer is rejected with `InvalidArgument` and `release` is never called.
    ///
    /// # Safety
    /// `ptr` must be owned by the caller and `release` must be the engine function that frees it.
    pub unsafe fn from_raw(ptr: *mut T, release: ReleaseFn<T>) -> Result<Self> {
        NonNull::new(ptr)
            .map(|ptr| Self { ptr, release })
            .ok_or(ModelError::InvalidArgument("null native handle"))
    }

    #[inline]
    pub fn as_ptr(&self) -> *mut T {
        self.ptr.as_ptr()
    }

    #[inline]
    pub fn release_fn(&self) -> ReleaseFn<T> {
        self.release
    }

    /// Give the resource back to the caller without releasing it.
    pub fn into_raw(self) -> *mut T {
        let this = ManuallyDrop::new(self);
        this.ptr.as_ptr()
    }
}

impl<T> Drop for NativeHandle<T> {
    fn drop(&mut self) {
        unsafe { (self.release)(self.ptr.as_ptr()) };
    }
}

impl<T> fmt::Debug for NativeHandle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("NativeHandle").field(&self.ptr).finish()
    }
}
