/*! Typed reads from the `CFDictionary` entries returned by `CGWindowList`. */

#![allow(unsafe_code)]

use std::ptr::NonNull;

use objc2_core_foundation::{CFDictionary, CFNumber, CFRetained, CFString, CGRect};
use objc2_core_graphics::CGRectMakeWithDictionaryRepresentation;

/// One window-info dictionary.
pub(super) struct WindowInfo(CFRetained<CFDictionary>);

impl WindowInfo {
  /// Retain the dictionary behind a raw array element.
  pub(super) fn retain(ptr: *const CFDictionary) -> Option<Self> {
    let ptr = NonNull::new(ptr.cast_mut())?;
    Some(Self(unsafe { CFRetained::retain(ptr) }))
  }

  fn value<T>(&self, key: &str) -> Option<NonNull<T>> {
    let key = CFString::from_str(key);
    let key_ptr: *const CFString = &*key;
    unsafe {
      if !self.0.contains_ptr_key(key_ptr.cast()) {
        return None;
      }
      NonNull::new(self.0.value(key_ptr.cast()).cast_mut().cast::<T>())
    }
  }

  pub(super) fn number(&self, key: &str) -> Option<i64> {
    let number = self.value::<CFNumber>(key)?;
    unsafe { number.as_ref() }.as_i64()
  }

  pub(super) fn string(&self, key: &str) -> Option<String> {
    let string = self.value::<CFString>(key)?;
    Some(unsafe { string.as_ref() }.to_string())
  }

  /// `kCGWindowBounds`, in global top-left-origin coordinates.
  pub(super) fn bounds(&self) -> Option<CGRect> {
    let dict = self.value::<CFDictionary>("kCGWindowBounds")?;
    let mut rect = CGRect::default();
    let ok = unsafe { CGRectMakeWithDictionaryRepresentation(Some(dict.as_ref()), &raw mut rect) };
    ok.then_some(rect)
  }
}
