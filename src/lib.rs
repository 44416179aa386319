//! tagged-table: a single-threaded hash table over runtime-tagged
//! primitive keys and values.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: a table whose key kind and value kind are chosen at runtime
//!   (signed integer, unsigned integer, double, string; values may also be
//!   opaque pointers) while keeping tag and payload consistent by
//!   construction.
//! - Pieces:
//!   - `Key`/`Value`: tagged unions with kind accessors. `Key` hashes its
//!     raw payload bytes and compares per kind.
//!   - `Fnv1a32`/`BuildFnv1a32`: 32-bit FNV-1a behind the standard
//!     `Hasher`/`BuildHasher` seam; the table's default hasher.
//!   - `HashTable<S>`: separate chaining over a slotmap arena of entries,
//!     with buckets holding chain heads and entries carrying `next` links.
//!
//! Constraints
//! - Single-threaded: no internal locking; a table storing an `OpaquePtr`
//!   is `!Send`/`!Sync` through the raw pointer it holds.
//! - Keys are unique; duplicate inserts fail without mutation.
//! - `capacity` is always positive; a zero-capacity request falls back to
//!   the default of 16 buckets.
//! - Growth: when an insert would push `len / capacity` to or past the
//!   configured threshold (default 0.75), the bucket count doubles and all
//!   entries are relinked before the insert lands. Every entry reachable
//!   from bucket `i` satisfies `hash % capacity == i` at all times.
//!
//! Hasher and rehashing invariants
//! - Each entry stores its full pre-modulo hash; growth recomputes only the
//!   slot assignment, never re-reads key bytes. The default hasher is
//!   deterministic, so stored hashes and fresh lookups always agree.
//!
//! Ownership
//! - Keys and values are copied in on insert and copied out on `get`. For
//!   `Ptr` values only the address is copied; the table never dereferences
//!   or frees the pointee.
//!
//! Notes and non-goals
//! - No iteration API; the surface is insert/get/remove/len/is_empty/clear.
//! - No persistence, no concurrency, no shrinking on remove.
//! - Failed operations never leave the table inconsistent.

mod fnv;
mod kind;
mod table;
mod table_proptest;

// Public surface
pub use fnv::{BuildFnv1a32, Fnv1a32};
pub use kind::{Key, KeyKind, OpaquePtr, Value, ValueKind};
pub use table::{
    HashTable, TableConfig, TableError, DEFAULT_INITIAL_CAPACITY, DEFAULT_MAX_LOAD_FACTOR,
};
