// Copyright 2025 John Brosnihan
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//! Owned, alignment-parameterised raw buffers
//!
//! [`RawBuffer`] is the building block of the pointer-based strategies: a
//! single heap allocation of `len` elements at a caller-chosen alignment,
//! zero-initialised on creation and released exactly once on drop. It never
//! grows in place; strategies that need more room allocate a fresh buffer,
//! copy the live prefix across, and drop the old one.
//!
//! Raw pointers never leave this module except through the explicit
//! `as_ptr` accessors used to state alignment facts to the optimizer.

use bytemuck::Zeroable;
use std::alloc::{self, Layout};
use std::marker::PhantomData;
use std::ops::{Deref, DerefMut};
use std::ptr::NonNull;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use thiserror::Error;

/// Cache line size targeted by the aligned strategies
pub const CACHE_LINE: usize = 64;

/// Failure to lay out or allocate a [`RawBuffer`]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BufferError {
    /// `len * size_of::<T>()` overflowed or `align` is not a power of two
    #[error("layout for {len} elements at alignment {align} is not representable")]
    LayoutOverflow {
        /// Requested element count
        len: usize,
        /// Requested alignment in bytes
        align: usize,
    },

    /// The global allocator returned null
    #[error("out of memory allocating {bytes} bytes")]
    OutOfMemory {
        /// Size of the failed allocation
        bytes: usize,
    },
}

thread_local! {
    static LIVE_ALLOCATIONS: Arc<AtomicUsize> = Arc::new(AtomicUsize::new(0));
}

/// Number of non-empty [`RawBuffer`] allocations currently alive that were
/// created on this thread
///
/// Each buffer keeps a handle to the counter of the thread that allocated
/// it, so a buffer sent to and dropped on another thread still releases its
/// count here. Used to verify that reallocating grows free every old buffer
/// exactly once.
pub fn live_allocations() -> usize {
    LIVE_ALLOCATIONS.with(|live| live.load(Ordering::Relaxed))
}

/// Round `count` up to the next multiple of `block`
///
/// Returns `None` on overflow. `block` must be non-zero.
pub fn round_up_to_block(count: usize, block: usize) -> Option<usize> {
    debug_assert!(block > 0, "block size must be non-zero");
    count.checked_next_multiple_of(block)
}

/// A fixed-length, zero-initialised heap buffer with explicit alignment
pub struct RawBuffer<T> {
    ptr: NonNull<T>,
    len: usize,
    layout: Layout,
    live: Option<Arc<AtomicUsize>>,
    _owns: PhantomData<T>,
}

impl<T: Zeroable + Copy> RawBuffer<T> {
    /// Allocate `len` zeroed elements aligned to at least `align` bytes
    ///
    /// `align` is raised to `align_of::<T>()` if smaller. A zero-length
    /// buffer performs no allocation but still reports a pointer that
    /// satisfies the requested alignment.
    pub fn zeroed(len: usize, align: usize) -> Result<Self, BufferError> {
        let align = align.max(std::mem::align_of::<T>());
        let layout = Layout::array::<T>(len)
            .and_then(|layout| layout.align_to(align))
            .map_err(|_| BufferError::LayoutOverflow { len, align })?;

        if layout.size() == 0 {
            // Any non-null address that is a multiple of `align` is valid for
            // an empty slice; `align` itself is the smallest such address.
            let ptr = NonNull::new(align as *mut T).unwrap_or(NonNull::dangling());
            return Ok(RawBuffer {
                ptr,
                len,
                layout,
                live: None,
                _owns: PhantomData,
            });
        }

        // SAFETY: layout has non-zero size, and `T: Zeroable` makes the
        // all-zero bit pattern a valid value for every element.
        let raw = unsafe { alloc::alloc_zeroed(layout) };
        let ptr = NonNull::new(raw.cast::<T>()).ok_or(BufferError::OutOfMemory {
            bytes: layout.size(),
        })?;

        let live = LIVE_ALLOCATIONS.with(Arc::clone);
        live.fetch_add(1, Ordering::Relaxed);

        Ok(RawBuffer {
            ptr,
            len,
            layout,
            live: Some(live),
            _owns: PhantomData,
        })
    }

    /// Allocate `len` elements and copy `prefix` into the front
    ///
    /// Elements past `prefix.len()` are zero.
    ///
    /// # Panics
    ///
    /// Panics if `prefix` is longer than `len`.
    pub fn with_prefix(len: usize, align: usize, prefix: &[T]) -> Result<Self, BufferError> {
        assert!(
            prefix.len() <= len,
            "prefix of {} elements does not fit in buffer of {}",
            prefix.len(),
            len
        );
        let mut buffer = Self::zeroed(len, align)?;
        buffer[..prefix.len()].copy_from_slice(prefix);
        Ok(buffer)
    }
}

impl<T> RawBuffer<T> {
    /// Number of elements the buffer holds
    pub fn len(&self) -> usize {
        self.len
    }

    /// Check whether the buffer holds no elements
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Alignment the buffer was allocated with, in bytes
    pub fn align(&self) -> usize {
        self.layout.align()
    }

    /// Check that the start address honours the allocation alignment
    pub fn is_aligned(&self) -> bool {
        self.ptr.as_ptr() as usize % self.layout.align() == 0
    }

    /// Raw start pointer, for stating alignment facts
    pub fn as_ptr(&self) -> *const T {
        self.ptr.as_ptr()
    }

    /// View the buffer as a slice
    pub fn as_slice(&self) -> &[T] {
        // SAFETY: ptr is valid for `len` initialised elements (or dangling
        // and aligned when len is zero) and uniquely owned by self.
        unsafe { std::slice::from_raw_parts(self.ptr.as_ptr(), self.len) }
    }

    /// View the buffer as a mutable slice
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        // SAFETY: as above, and &mut self guarantees exclusive access.
        unsafe { std::slice::from_raw_parts_mut(self.ptr.as_ptr(), self.len) }
    }
}

impl<T> Deref for RawBuffer<T> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T> DerefMut for RawBuffer<T> {
    fn deref_mut(&mut self) -> &mut [T] {
        self.as_mut_slice()
    }
}

impl<T> Drop for RawBuffer<T> {
    fn drop(&mut self) {
        if self.layout.size() == 0 {
            return;
        }
        // SAFETY: ptr came from alloc_zeroed with exactly this layout and is
        // released only here. Elements are Copy, so there is nothing to drop.
        unsafe { alloc::dealloc(self.ptr.as_ptr().cast::<u8>(), self.layout) };
        if let Some(live) = &self.live {
            live.fetch_sub(1, Ordering::Relaxed);
        }
    }
}

impl<T> std::fmt::Debug for RawBuffer<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RawBuffer")
            .field("len", &self.len)
            .field("align", &self.layout.align())
            .finish()
    }
}

// SAFETY: RawBuffer uniquely owns its allocation, like Box<[T]>.
unsafe impl<T: Send> Send for RawBuffer<T> {}

// SAFETY: shared access only hands out &[T]; mutation requires &mut self.
unsafe impl<T: Sync> Sync for RawBuffer<T> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::body::Color;

    #[test]
    fn test_zeroed_buffer() {
        let buffer = RawBuffer::<f32>::zeroed(100, CACHE_LINE).unwrap();
        assert_eq!(buffer.len(), 100);
        assert_eq!(buffer.align(), CACHE_LINE);
        assert!(buffer.is_aligned());
        assert!(buffer.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_natural_alignment_is_minimum() {
        let buffer = RawBuffer::<f32>::zeroed(3, 1).unwrap();
        assert_eq!(buffer.align(), std::mem::align_of::<f32>());
        assert!(buffer.is_aligned());
    }

    #[test]
    fn test_empty_buffer_is_aligned() {
        let before = live_allocations();
        let buffer = RawBuffer::<f32>::zeroed(0, CACHE_LINE).unwrap();
        assert!(buffer.is_empty());
        assert!(buffer.is_aligned());
        assert_eq!(buffer.as_slice(), &[] as &[f32]);
        assert_eq!(live_allocations(), before);
    }

    #[test]
    fn test_with_prefix() {
        let buffer = RawBuffer::with_prefix(5, CACHE_LINE, &[1.0f32, 2.0]).unwrap();
        assert_eq!(buffer.as_slice(), &[1.0, 2.0, 0.0, 0.0, 0.0]);

        let colors = RawBuffer::with_prefix(2, 1, &[Color::opaque(1, 2, 3)]).unwrap();
        assert_eq!(colors[0], Color::opaque(1, 2, 3));
        assert_eq!(colors[1], Color::default());
    }

    #[test]
    #[should_panic(expected = "does not fit")]
    fn test_prefix_too_long() {
        let _ = RawBuffer::with_prefix(1, 4, &[1.0f32, 2.0]);
    }

    #[test]
    fn test_layout_overflow() {
        let error = RawBuffer::<f32>::zeroed(usize::MAX, CACHE_LINE).unwrap_err();
        assert!(matches!(error, BufferError::LayoutOverflow { .. }));

        let error = RawBuffer::<f32>::zeroed(4, 48).unwrap_err();
        assert_eq!(error, BufferError::LayoutOverflow { len: 4, align: 48 });
    }

    #[test]
    fn test_live_allocation_accounting() {
        let before = live_allocations();
        let a = RawBuffer::<f32>::zeroed(16, CACHE_LINE).unwrap();
        let b = RawBuffer::<Color>::zeroed(16, 1).unwrap();
        assert_eq!(live_allocations(), before + 2);
        drop(a);
        assert_eq!(live_allocations(), before + 1);
        drop(b);
        assert_eq!(live_allocations(), before);
    }

    #[test]
    fn test_live_allocation_dropped_on_other_thread() {
        let before = live_allocations();
        let buffer = RawBuffer::<f32>::zeroed(64, CACHE_LINE).unwrap();
        assert_eq!(live_allocations(), before + 1);

        let remote = std::thread::spawn(move || {
            let untouched = live_allocations();
            drop(buffer);
            live_allocations() == untouched
        })
        .join()
        .unwrap();

        assert!(remote, "drop must not touch the dropping thread's counter");
        assert_eq!(live_allocations(), before);
    }

    #[test]
    fn test_round_up_to_block() {
        assert_eq!(round_up_to_block(0, 16), Some(0));
        assert_eq!(round_up_to_block(1, 16), Some(16));
        assert_eq!(round_up_to_block(16, 16), Some(16));
        assert_eq!(round_up_to_block(17, 16), Some(32));
        assert_eq!(round_up_to_block(usize::MAX, 16), None);
    }
}
