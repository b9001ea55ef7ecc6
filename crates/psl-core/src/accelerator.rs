//! The capability-swap contract for an external matching backend.
//!
//! An accelerator implements the same `public_suffix_position` contract as
//! [`crate::matcher::public_suffix_position`] over the exact same buffer
//! layout, so a host embedding this crate (for example, one shipping a
//! WASM SIMD kernel) can swap in a faster implementation without touching
//! the buffer format. If an accelerator call fails or panics-by-contract
//! (it must not), callers should fall back to the reference implementation.

use crate::buffer::Buffer;

/// An interchangeable implementation of the matcher's hot loop.
///
/// Implementations must be pure functions of the buffer's contents: given
/// the same tree, scratch, and `num_labels`, they must return the same
/// cursor the reference implementation would.
pub trait Accelerator: Send + Sync {
    fn public_suffix_position(&self, buf: &mut Buffer, num_labels: usize) -> Option<usize>;

    /// A short identifier for logging/diagnostics, e.g. `"wasm-simd"`.
    fn name(&self) -> &str;
}

/// The always-available fallback, implemented by the buffer-native matcher.
#[derive(Debug, Default, Clone, Copy)]
pub struct ReferenceAccelerator;

impl Accelerator for ReferenceAccelerator {
    fn public_suffix_position(&self, buf: &mut Buffer, num_labels: usize) -> Option<usize> {
        crate::matcher::public_suffix_position(buf, num_labels)
    }

    fn name(&self) -> &str {
        "reference"
    }
}
