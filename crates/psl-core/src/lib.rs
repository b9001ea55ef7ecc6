//! Public suffix matching backed by a flat binary trie.
//!
//! A [`List`] compiles Public Suffix List text into a single contiguous
//! buffer: a fixed scratch prefix followed by a node-record tree and an
//! interned character-data region. The hot path (`public_suffix`,
//! `registrable_domain`, `is_public_suffix`) does no allocation beyond the
//! owned `String` it hands back, walks the tree with binary search, and
//! can be swapped out for an external [`Accelerator`] operating on the
//! same buffer layout.

mod accelerator;
mod buffer;
mod builder;
mod error;
mod layout;
mod list;
mod matcher;
mod selfie;
mod tree;

pub use accelerator::{Accelerator, ReferenceAccelerator};
pub use buffer::Buffer;
pub use error::{Error, Result};
pub use list::List;
