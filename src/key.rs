//! Key capability: what a type must provide to be stored in a
//! `HybridHashMap`.
//!
//! The table computes slot addresses from `TableKey::table_hash` alone; it
//! never runs a `Hasher`. Two keys that compare equal must report the same
//! hash, and the hash must be stable for the lifetime of the entry.
//!
//! Slots are encoded as `Option<Node>`, so the table never consults
//! `is_empty_sentinel`. The method remains part of the contract for key
//! types that reserve a "null" value (`0`, the empty string) so callers
//! exchanging data with sentinel-encoded tables can detect it.

/// Hash, equality and empty-sentinel contract for table keys.
pub trait TableKey: Eq {
    /// Deterministic hash used for slot addressing.
    fn table_hash(&self) -> u64;

    /// Whether this value is the type's reserved "empty" state.
    #[inline]
    fn is_empty_sentinel(&self) -> bool {
        false
    }
}

macro_rules! int_keys {
    ($($t:ty),* $(,)?) => {
        $(
            impl TableKey for $t {
                #[inline]
                fn table_hash(&self) -> u64 {
                    // Identity hash: sign-extension on negative values is fine,
                    // only determinism matters.
                    *self as u64
                }

                #[inline]
                fn is_empty_sentinel(&self) -> bool {
                    *self == 0
                }
            }
        )*
    };
}

int_keys!(u8, u16, u32, u64, usize, i8, i16, i32, i64, isize);

impl TableKey for u128 {
    #[inline]
    fn table_hash(&self) -> u64 {
        (*self as u64) ^ ((*self >> 64) as u64)
    }

    #[inline]
    fn is_empty_sentinel(&self) -> bool {
        *self == 0
    }
}

impl TableKey for i128 {
    #[inline]
    fn table_hash(&self) -> u64 {
        (*self as u128).table_hash()
    }

    #[inline]
    fn is_empty_sentinel(&self) -> bool {
        *self == 0
    }
}

impl TableKey for char {
    #[inline]
    fn table_hash(&self) -> u64 {
        u64::from(*self)
    }

    #[inline]
    fn is_empty_sentinel(&self) -> bool {
        *self == '\0'
    }
}

impl TableKey for bool {
    #[inline]
    fn table_hash(&self) -> u64 {
        u64::from(*self)
    }
}

/// Polynomial string hash (`h = h * 31 + byte`), shared by every string-like
/// key so that `String` keys can be queried with `&str`.
#[inline]
pub fn str_hash(s: &str) -> u64 {
    s.bytes()
        .fold(0u64, |h, b| h.wrapping_mul(31).wrapping_add(u64::from(b)))
}

impl TableKey for str {
    #[inline]
    fn table_hash(&self) -> u64 {
        str_hash(self)
    }

    #[inline]
    fn is_empty_sentinel(&self) -> bool {
        self.is_empty()
    }
}

impl TableKey for String {
    #[inline]
    fn table_hash(&self) -> u64 {
        str_hash(self)
    }

    #[inline]
    fn is_empty_sentinel(&self) -> bool {
        self.is_empty()
    }
}

impl TableKey for Box<str> {
    #[inline]
    fn table_hash(&self) -> u64 {
        str_hash(self)
    }

    #[inline]
    fn is_empty_sentinel(&self) -> bool {
        self.is_empty()
    }
}

impl<T: ?Sized + TableKey> TableKey for &T {
    #[inline]
    fn table_hash(&self) -> u64 {
        (**self).table_hash()
    }

    #[inline]
    fn is_empty_sentinel(&self) -> bool {
        (**self).is_empty_sentinel()
    }
}
