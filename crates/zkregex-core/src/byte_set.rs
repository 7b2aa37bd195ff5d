//! Fixed-size set of byte values.

use std::fmt;

/// Set of byte values backed by a 256-bit bitmap.
///
/// Iteration is always in ascending byte order, which keeps every structure
/// derived from a set (edge keys, gate order, emitted text) deterministic.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ByteSet([u64; 4]);

impl ByteSet {
    pub const EMPTY: ByteSet = ByteSet([0; 4]);

    pub const fn new() -> Self {
        Self::EMPTY
    }

    pub fn single(byte: u8) -> Self {
        let mut set = Self::new();
        set.insert(byte);
        set
    }

    /// Inclusive range `lo..=hi`. Empty when `lo > hi`.
    pub fn range(lo: u8, hi: u8) -> Self {
        let mut set = Self::new();
        for b in lo..=hi {
            set.insert(b);
        }
        set
    }

    #[inline]
    pub fn insert(&mut self, byte: u8) {
        self.0[(byte >> 6) as usize] |= 1 << (byte & 63);
    }

    #[inline]
    pub fn remove(&mut self, byte: u8) {
        self.0[(byte >> 6) as usize] &= !(1 << (byte & 63));
    }

    #[inline]
    pub fn contains(&self, byte: u8) -> bool {
        self.0[(byte >> 6) as usize] & (1 << (byte & 63)) != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0.iter().all(|w| *w == 0)
    }

    pub fn len(&self) -> usize {
        self.0.iter().map(|w| w.count_ones() as usize).sum()
    }

    pub fn union(&self, other: &ByteSet) -> ByteSet {
        let mut out = *self;
        for (w, o) in out.0.iter_mut().zip(other.0) {
            *w |= o;
        }
        out
    }

    pub fn intersection(&self, other: &ByteSet) -> ByteSet {
        let mut out = *self;
        for (w, o) in out.0.iter_mut().zip(other.0) {
            *w &= o;
        }
        out
    }

    pub fn difference(&self, other: &ByteSet) -> ByteSet {
        let mut out = *self;
        for (w, o) in out.0.iter_mut().zip(other.0) {
            *w &= !o;
        }
        out
    }

    pub fn first(&self) -> Option<u8> {
        self.iter().next()
    }

    pub fn iter(&self) -> impl Iterator<Item = u8> + '_ {
        (0..=255u8).filter(move |b| self.contains(*b))
    }

    /// Maximal runs of consecutive members as inclusive `(min, max)` pairs.
    pub fn runs(&self) -> Vec<(u8, u8)> {
        let mut runs: Vec<(u8, u8)> = Vec::new();
        for b in self.iter() {
            match runs.last_mut() {
                Some((_, max)) if *max as u16 + 1 == b as u16 => *max = b,
                _ => runs.push((b, b)),
            }
        }
        runs
    }

    /// Canonical textual key, a JSON array of the member byte values.
    pub fn key(&self) -> String {
        let items: Vec<String> = self.iter().map(|b| b.to_string()).collect();
        format!("[{}]", items.join(","))
    }

    /// Parse a key produced by [`ByteSet::key`].
    pub fn from_key(key: &str) -> Option<ByteSet> {
        let values: Vec<u8> = serde_json::from_str(key).ok()?;
        Some(values.into_iter().collect())
    }
}

impl FromIterator<u8> for ByteSet {
    fn from_iter<I: IntoIterator<Item = u8>>(iter: I) -> Self {
        let mut set = ByteSet::new();
        for b in iter {
            set.insert(b);
        }
        set
    }
}

impl Extend<u8> for ByteSet {
    fn extend<I: IntoIterator<Item = u8>>(&mut self, iter: I) {
        for b in iter {
            self.insert(b);
        }
    }
}

/// Compact human-readable form used by the `dump()` printers.
///
/// Printable ASCII is shown literally, everything else as `\xNN`; runs of
/// three or more members collapse to `lo-hi`.
impl fmt::Display for ByteSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (min, max) in self.runs() {
            if max as u16 >= min as u16 + 2 {
                write!(f, "{}-{}", DisplayByte(min), DisplayByte(max))?;
            } else {
                for b in min..=max {
                    write!(f, "{}", DisplayByte(b))?;
                }
            }
        }
        Ok(())
    }
}

impl fmt::Debug for ByteSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ByteSet({self})")
    }
}

/// Formats one byte the way edge labels are printed.
pub(crate) struct DisplayByte(pub(crate) u8);

impl fmt::Display for DisplayByte {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            b'-' | b'\\' => write!(f, "\\{}", self.0 as char),
            0x21..=0x7e => write!(f, "{}", self.0 as char),
            b => write!(f, "\\x{b:02x}"),
        }
    }
}
