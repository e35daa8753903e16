//! Native-to-engine key code translation.
//!
//! The host backend hands the device a curated list of
//! `(native code, engine key)` pairs at startup. The pairs are sorted once
//! into a [`KeyMap`] and queried with a binary search for every keyboard
//! event afterwards; the table is never mutated once built, so identical
//! native input always resolves to the same engine key for the lifetime of
//! the device.

/// Symbolic name for a keyboard key.
///
/// These are virtual key codes of physical keys; they don't necessarily
/// represent what's actually printed on the key cap.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Serialize, Deserialize)]
pub enum Key {
    /// The sentinel reported for native keys absent from the key map.
    Unknown,

    /// The '1' key over the letters.
    Key1,
    /// The '2' key over the letters.
    Key2,
    Key3,
    Key4,
    Key5,
    Key6,
    Key7,
    Key8,
    Key9,
    /// The '0' key over the 'O' and 'P' keys.
    Key0,

    A,
    B,
    C,
    D,
    E,
    F,
    G,
    H,
    I,
    J,
    K,
    L,
    M,
    N,
    O,
    P,
    Q,
    R,
    S,
    T,
    U,
    V,
    W,
    X,
    Y,
    Z,

    Escape,

    F1,
    F2,
    F3,
    F4,
    F5,
    F6,
    F7,
    F8,
    F9,
    F10,
    F11,
    F12,
    F13,
    F14,
    F15,

    /// Print Screen/SysRq.
    Snapshot,
    /// Scroll Lock.
    Scroll,
    Pause,

    Insert,
    Home,
    Delete,
    End,
    PageDown,
    PageUp,

    Left,
    Up,
    Right,
    Down,

    /// The Backspace key, right over Enter.
    Back,
    /// The Enter key.
    Return,
    Space,
    Tab,

    /// The "Compose" key on Linux.
    Compose,

    Numlock,
    Numpad0,
    Numpad1,
    Numpad2,
    Numpad3,
    Numpad4,
    Numpad5,
    Numpad6,
    Numpad7,
    Numpad8,
    Numpad9,

    Add,
    Subtract,
    Multiply,
    Divide,
    Decimal,
    NumpadEnter,

    Backslash,
    Capital,
    Clear,
    Colon,
    Comma,
    Equals,
    Grave,
    Help,
    LAlt,
    LBracket,
    LControl,
    LShift,
    LWin,
    Minus,
    Period,
    Plus,
    RAlt,
    RBracket,
    RControl,
    RShift,
    RWin,
    Semicolon,
    Slash,
    Sleep,
}

/// One `(native, engine)` pair of the key translation table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyMapEntry {
    pub native: u32,
    pub key: Key,
}

/// The sorted native-to-engine key table.
pub struct KeyMap {
    entries: Vec<KeyMapEntry>,
}

impl KeyMap {
    /// Builds the table from a curated pair list. Pairs are sorted by the
    /// native code; should the host report the same native code for two
    /// engine keys, the first pair wins deterministically.
    pub fn new<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (u32, Key)>,
    {
        let mut entries: Vec<KeyMapEntry> = pairs
            .into_iter()
            .map(|(native, key)| KeyMapEntry { native, key })
            .collect();

        entries.sort_by_key(|v| v.native);
        entries.dedup_by_key(|v| v.native);

        KeyMap { entries }
    }

    /// Resolves a native key code. A miss is not a failure: unmapped keys
    /// are reported as [`Key::Unknown`] and the engine decides on their
    /// significance.
    #[inline]
    pub fn lookup(&self, native: u32) -> Key {
        match self.entries.binary_search_by_key(&native, |v| v.native) {
            Ok(index) => self.entries[index].key,
            Err(_) => Key::Unknown,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_returns_exact_mapping_for_every_inserted_code() {
        let pairs = [
            (57, Key::Space),
            (1, Key::Escape),
            (30, Key::A),
            (17, Key::W),
            (28, Key::Return),
        ];

        let map = KeyMap::new(pairs);
        assert_eq!(map.len(), pairs.len());

        for &(native, key) in &pairs {
            assert_eq!(map.lookup(native), key);
        }
    }

    #[test]
    fn lookup_misses_yield_the_sentinel() {
        let map = KeyMap::new([(1, Key::Escape), (28, Key::Return)]);
        assert_eq!(map.lookup(0), Key::Unknown);
        assert_eq!(map.lookup(2), Key::Unknown);
        assert_eq!(map.lookup(9999), Key::Unknown);
    }

    #[test]
    fn duplicated_native_codes_resolve_deterministically() {
        // A curated list may map one native code twice (Print Screen
        // doubles as SysRq on some hosts); the first insertion wins.
        let map = KeyMap::new([(99, Key::Snapshot), (99, Key::Pause)]);
        assert_eq!(map.len(), 1);
        assert_eq!(map.lookup(99), Key::Snapshot);
    }

    #[test]
    fn empty_table_always_misses() {
        let map = KeyMap::new([]);
        assert!(map.is_empty());
        assert_eq!(map.lookup(42), Key::Unknown);
    }
}
