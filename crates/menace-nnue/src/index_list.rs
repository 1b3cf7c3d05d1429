//! Fixed-capacity feature index lists and the sorted two-pointer difference.

use std::ops::Deref;

/// Inline list of at most `N` feature indices.
#[derive(Clone, Copy)]
pub struct IndexList<const N: usize> {
    values: [u32; N],
    len: usize,
}

impl<const N: usize> IndexList<N> {
    pub const CAPACITY: usize = N;

    pub const fn new() -> Self {
        Self { values: [0; N], len: 0 }
    }

    /// # Panics
    ///
    /// Panics when the list is full. Capacities are sized to the largest
    /// feature count a legal position produces.
    #[inline]
    pub fn push(&mut self, index: usize) {
        assert!(self.len < N, "index list capacity {N} exceeded");
        self.values[self.len] = index as u32;
        self.len += 1;
    }

    #[inline]
    pub fn clear(&mut self) {
        self.len = 0;
    }

    #[inline]
    pub fn as_slice(&self) -> &[u32] {
        &self.values[..self.len]
    }

    /// Sort the entries pushed since position `start`.
    #[inline]
    pub(crate) fn sort_tail(&mut self, start: usize) {
        self.values[start..self.len].sort_unstable();
    }

    /// `true` if entries are strictly ascending.
    pub fn is_strictly_sorted(&self) -> bool {
        self.as_slice().windows(2).all(|w| w[0] < w[1])
    }
}

impl<const N: usize> Default for IndexList<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> PartialEq for IndexList<N> {
    fn eq(&self, other: &Self) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<const N: usize> Eq for IndexList<N> {}

impl<const N: usize> Deref for IndexList<N> {
    type Target = [u32];

    fn deref(&self) -> &[u32] {
        self.as_slice()
    }
}

impl<const N: usize> std::fmt::Debug for IndexList<N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.as_slice()).finish()
    }
}

/// Split two strictly ascending lists into `added = new - old` and `removed = old - new`.
///
/// Classic merge walk: the smaller head is emitted to its side's output, equal
/// heads are skipped together. Both outputs come out ascending.
pub fn sorted_difference<const N: usize>(
    new: &[u32],
    old: &[u32],
    added: &mut IndexList<N>,
    removed: &mut IndexList<N>,
) {
    debug_assert!(new.windows(2).all(|w| w[0] < w[1]), "new list not sorted");
    debug_assert!(old.windows(2).all(|w| w[0] < w[1]), "old list not sorted");

    let (mut i, mut j) = (0, 0);
    while i < new.len() && j < old.len() {
        match new[i].cmp(&old[j]) {
            std::cmp::Ordering::Less => {
                added.push(new[i] as usize);
                i += 1;
            }
            std::cmp::Ordering::Greater => {
                removed.push(old[j] as usize);
                j += 1;
            }
            std::cmp::Ordering::Equal => {
                i += 1;
                j += 1;
            }
        }
    }
    for &index in &new[i..] {
        added.push(index as usize);
    }
    for &index in &old[j..] {
        removed.push(index as usize);
    }
}
