//! Kind tags and tagged key/value payloads.
//!
//! A table is fixed to one `KeyKind` and one `ValueKind` at construction;
//! the `Key`/`Value` enums keep the kind tag and the payload consistent by
//! construction, so a payload can never be read against the wrong layout.

use core::fmt;
use core::hash::{Hash, Hasher};

/// Kind of key a table accepts.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum KeyKind {
    Int,
    Uint,
    Double,
    Str,
}

/// Kind of value a table stores.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum ValueKind {
    Int,
    Uint,
    Double,
    Str,
    Ptr,
}

/// Non-owning address stored for `ValueKind::Ptr` entries.
///
/// The table copies only the address; it never dereferences or frees the
/// pointee. Lifetime and ownership of the pointed-to memory stay entirely
/// with the caller. Holding a raw pointer also keeps any table storing one
/// `!Send`/`!Sync`, in line with the single-threaded design.
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
pub struct OpaquePtr(*const ());

impl OpaquePtr {
    pub fn new<T>(ptr: *const T) -> Self {
        Self(ptr.cast())
    }

    pub fn as_ptr(self) -> *const () {
        self.0
    }

    /// Recover the address at a concrete type. The caller is responsible
    /// for casting back to the type it originally stored.
    pub fn cast<T>(self) -> *const T {
        self.0.cast()
    }
}

impl fmt::Debug for OpaquePtr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "OpaquePtr({:p})", self.0)
    }
}

/// A key: one of the four supported primitive kinds.
///
/// `Double` keys compare and hash by IEEE-754 bit pattern so `Eq` and
/// `Hash` agree: `+0.0` and `-0.0` are distinct keys, and NaNs with equal
/// bit patterns are equal keys.
#[derive(Clone, Debug)]
pub enum Key {
    Int(i64),
    Uint(u64),
    Double(f64),
    Str(String),
}

impl Key {
    pub fn kind(&self) -> KeyKind {
        match self {
            Key::Int(_) => KeyKind::Int,
            Key::Uint(_) => KeyKind::Uint,
            Key::Double(_) => KeyKind::Double,
            Key::Str(_) => KeyKind::Str,
        }
    }
}

impl PartialEq for Key {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Key::Int(a), Key::Int(b)) => a == b,
            (Key::Uint(a), Key::Uint(b)) => a == b,
            (Key::Double(a), Key::Double(b)) => a.to_bits() == b.to_bits(),
            (Key::Str(a), Key::Str(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Key {}

impl Hash for Key {
    /// Feed exactly the payload's raw bytes to the hasher: native-endian
    /// numerics, the f64 bit pattern, string bytes without terminator. No
    /// discriminant and no length prefix are written; a table only ever
    /// holds keys of a single kind, so cross-kind collisions cannot occur.
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            Key::Int(v) => state.write(&v.to_ne_bytes()),
            Key::Uint(v) => state.write(&v.to_ne_bytes()),
            Key::Double(v) => state.write(&v.to_bits().to_ne_bytes()),
            Key::Str(s) => state.write(s.as_bytes()),
        }
    }
}

impl From<i64> for Key {
    fn from(v: i64) -> Self {
        Key::Int(v)
    }
}
impl From<u64> for Key {
    fn from(v: u64) -> Self {
        Key::Uint(v)
    }
}
impl From<f64> for Key {
    fn from(v: f64) -> Self {
        Key::Double(v)
    }
}
impl From<String> for Key {
    fn from(v: String) -> Self {
        Key::Str(v)
    }
}
impl From<&str> for Key {
    fn from(v: &str) -> Self {
        Key::Str(v.to_string())
    }
}

/// A value: one of the five supported kinds.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Int(i64),
    Uint(u64),
    Double(f64),
    Str(String),
    Ptr(OpaquePtr),
}

impl Value {
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Int(_) => ValueKind::Int,
            Value::Uint(_) => ValueKind::Uint,
            Value::Double(_) => ValueKind::Double,
            Value::Str(_) => ValueKind::Str,
            Value::Ptr(_) => ValueKind::Ptr,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_uint(&self) -> Option<u64> {
        match self {
            Value::Uint(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_double(&self) -> Option<f64> {
        match self {
            Value::Double(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_ptr(&self) -> Option<OpaquePtr> {
        match self {
            Value::Ptr(p) => Some(*p),
            _ => None,
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}
impl From<u64> for Value {
    fn from(v: u64) -> Self {
        Value::Uint(v)
    }
}
impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Double(v)
    }
}
impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Str(v)
    }
}
impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Str(v.to_string())
    }
}
impl From<OpaquePtr> for Value {
    fn from(v: OpaquePtr) -> Self {
        Value::Ptr(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::hash_map::DefaultHasher;

    fn hash_of(k: &Key) -> u64 {
        let mut h = DefaultHasher::new();
        k.hash(&mut h);
        h.finish()
    }

    /// Invariant: kind tag and payload always agree.
    #[test]
    fn kinds_match_payloads() {
        assert_eq!(Key::Int(1).kind(), KeyKind::Int);
        assert_eq!(Key::Uint(1).kind(), KeyKind::Uint);
        assert_eq!(Key::Double(1.0).kind(), KeyKind::Double);
        assert_eq!(Key::from("s").kind(), KeyKind::Str);
        assert_eq!(Value::Int(1).kind(), ValueKind::Int);
        assert_eq!(Value::Ptr(OpaquePtr::new(core::ptr::null::<u8>())).kind(), ValueKind::Ptr);
    }

    /// Invariant: equal keys hash equally (Eq/Hash agreement), including
    /// the bit-pattern semantics for doubles.
    #[test]
    fn double_keys_use_bit_pattern() {
        let pos = Key::Double(0.0);
        let neg = Key::Double(-0.0);
        assert_ne!(pos, neg, "signed zeros are distinct keys");
        assert_ne!(hash_of(&pos), hash_of(&neg));

        let nan = Key::Double(f64::NAN);
        assert_eq!(nan, nan.clone(), "identical NaN bits are equal keys");
        assert_eq!(hash_of(&nan), hash_of(&nan));
    }

    /// Keys of different kinds never compare equal, even with the same
    /// numeric payload.
    #[test]
    fn cross_kind_keys_are_unequal() {
        assert_ne!(Key::Int(1), Key::Uint(1));
        assert_ne!(Key::Int(0), Key::Double(0.0));
    }

    /// Value accessors copy the payload out for the matching kind only.
    #[test]
    fn value_accessors() {
        assert_eq!(Value::Int(-3).as_int(), Some(-3));
        assert_eq!(Value::Int(-3).as_uint(), None);
        assert_eq!(Value::from("v").as_str(), Some("v"));
        let x = 7u32;
        let p = OpaquePtr::new(&x as *const u32);
        assert_eq!(Value::Ptr(p).as_ptr(), Some(p));
        assert_eq!(p.cast::<u32>(), &x as *const u32);
    }
}
