use std::iter::FusedIterator;

use crate::{Error, Result};

/// Cities not yet visited on the current partial tour, one bit per city.
///
/// City 0 is the fixed start and end of every tour and is never a member of a
/// set built by [`CitySet::full`]. The set is a plain value: every operation
/// that "removes" a city returns a new set, so a parent node can hand copies
/// to concurrent branches without synchronisation.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub struct CitySet(u32);

impl CitySet {
    /// Largest `n` a set can describe.
    pub const CAPACITY: usize = u32::BITS as usize;
    pub const EMPTY: Self = Self(0);

    /// Cities `1..n`, i.e. every city except the start.
    pub fn full(n: usize) -> Result<Self> {
        if n > Self::CAPACITY {
            return Err(Error::invalid_input(format!(
                "{n} cities exceed the city set capacity of {}",
                Self::CAPACITY
            )));
        }
        let all = match n {
            0 => 0,
            n if n == Self::CAPACITY => u32::MAX,
            n => (1u32 << n) - 1,
        };
        Ok(Self(all & !1))
    }

    #[inline]
    pub fn without(self, city: usize) -> Self {
        debug_assert!(city < Self::CAPACITY);
        Self(self.0 & !(1u32 << city))
    }

    #[inline]
    pub fn contains(self, city: usize) -> bool {
        city < Self::CAPACITY && self.0 & (1u32 << city) != 0
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    /// Members in ascending order.
    pub fn iter(self) -> Members {
        Members(self.0)
    }
}

impl IntoIterator for CitySet {
    type Item = usize;
    type IntoIter = Members;

    fn into_iter(self) -> Members {
        self.iter()
    }
}

/// Ascending iterator over the members of a [`CitySet`].
#[derive(Clone, Debug)]
pub struct Members(u32);

impl Iterator for Members {
    type Item = usize;

    #[inline]
    fn next(&mut self) -> Option<usize> {
        if self.0 == 0 {
            return None;
        }
        let city = self.0.trailing_zeros() as usize;
        self.0 &= self.0 - 1;
        Some(city)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.0.count_ones() as usize;
        (len, Some(len))
    }
}

impl ExactSizeIterator for Members {}
impl FusedIterator for Members {}

#[cfg(test)]
mod tests {
    use super::CitySet;

    #[test]
    fn full_excludes_start_city() {
        let set = CitySet::full(5).expect("set");
        assert_eq!(set.iter().collect::<Vec<_>>(), vec![1, 2, 3, 4]);
        assert!(!set.contains(0));
        assert_eq!(set.len(), 4);
    }

    #[test]
    fn full_of_one_or_zero_cities_is_empty() {
        assert!(CitySet::full(1).expect("set").is_empty());
        assert!(CitySet::full(0).expect("set").is_empty());
    }

    #[test]
    fn full_at_capacity_uses_every_bit_but_start() {
        let set = CitySet::full(CitySet::CAPACITY).expect("set");
        assert_eq!(set.len(), CitySet::CAPACITY - 1);
        assert!(set.contains(CitySet::CAPACITY - 1));
    }

    #[test]
    fn full_over_capacity_is_rejected() {
        let err = CitySet::full(CitySet::CAPACITY + 1).expect_err("too many cities");
        assert!(err.to_string().contains("exceed the city set capacity"));
    }

    #[test]
    fn without_leaves_original_untouched() {
        let parent = CitySet::full(4).expect("set");
        let child = parent.without(2);
        assert!(parent.contains(2));
        assert!(!child.contains(2));
        assert_eq!(child.iter().collect::<Vec<_>>(), vec![1, 3]);
    }

    #[test]
    fn members_iteration_is_restartable() {
        let set = CitySet::full(6).expect("set").without(3);
        let first: Vec<_> = set.iter().collect();
        let second: Vec<_> = set.into_iter().collect();
        assert_eq!(first, second);
        assert_eq!(set.iter().len(), 4);
    }

    #[test]
    fn removing_every_member_empties_the_set() {
        let set = CitySet::full(4).expect("set");
        let emptied = set.iter().fold(set, CitySet::without);
        assert!(emptied.is_empty());
        assert_eq!(emptied, CitySet::EMPTY);
    }

    #[test]
    fn contains_is_false_out_of_range() {
        assert!(!CitySet::full(8).expect("set").contains(40));
    }
}
