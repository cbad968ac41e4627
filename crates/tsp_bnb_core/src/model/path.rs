use crate::{CitySet, DistanceMatrix, Result};

/// One node of the search tree: where the partial tour currently is, which
/// cities it still has to visit and how long it is so far.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PathState {
    pub city: usize,
    pub remaining: CitySet,
    pub length: f64,
}

impl PathState {
    /// Tour that has only left city 0.
    pub fn root(n: usize) -> Result<Self> {
        Ok(Self {
            city: 0,
            remaining: CitySet::full(n)?,
            length: 0.0,
        })
    }

    /// No city left to visit; the only move is back to city 0.
    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.remaining.is_empty()
    }

    #[inline]
    pub fn closing_length(&self, matrix: &DistanceMatrix) -> f64 {
        self.length + matrix.get(self.city, 0)
    }

    #[inline]
    pub fn branch(&self, next: usize, matrix: &DistanceMatrix) -> Self {
        debug_assert!(self.remaining.contains(next));
        Self {
            city: next,
            remaining: self.remaining.without(next),
            length: self.length + matrix.get(self.city, next),
        }
    }

    /// Every child in ascending city order, before any pruning.
    pub fn children<'a>(&self, matrix: &'a DistanceMatrix) -> impl Iterator<Item = Self> + use<'a> {
        let parent = *self;
        parent
            .remaining
            .iter()
            .map(move |next| parent.branch(next, matrix))
    }
}

/// Fixed-capacity buffer of surviving children, kept on the stack.
#[derive(Clone, Debug)]
pub(crate) struct Children {
    items: [PathState; CitySet::CAPACITY],
    len: usize,
}

impl Children {
    pub(crate) fn new() -> Self {
        Self {
            items: [PathState::default(); CitySet::CAPACITY],
            len: 0,
        }
    }

    /// A node has at most `CAPACITY - 1` children, so this never overflows.
    pub(crate) fn push(&mut self, state: PathState) {
        self.items[self.len] = state;
        self.len += 1;
    }

    pub(crate) fn pop(&mut self) -> Option<PathState> {
        self.len = self.len.checked_sub(1)?;
        Some(self.items[self.len])
    }

    pub(crate) fn as_slice(&self) -> &[PathState] {
        &self.items[..self.len]
    }
}

#[cfg(test)]
mod tests {
    use super::{Children, PathState};
    use crate::DistanceMatrix;

    fn square() -> DistanceMatrix {
        DistanceMatrix::from_rows(&[
            vec![0.0, 1.0, 2.0, 1.0],
            vec![1.0, 0.0, 1.0, 2.0],
            vec![2.0, 1.0, 0.0, 1.0],
            vec![1.0, 2.0, 1.0, 0.0],
        ])
        .expect("valid matrix")
    }

    #[test]
    fn root_starts_at_city_zero_with_everything_left() {
        let root = PathState::root(4).expect("root");
        assert_eq!(root.city, 0);
        assert_eq!(root.length, 0.0);
        assert_eq!(root.remaining.len(), 3);
        assert!(!root.remaining.contains(root.city));
    }

    #[test]
    fn branch_extends_length_and_drops_city() {
        let m = square();
        let child = PathState::root(4).expect("root").branch(2, &m);
        assert_eq!(child.city, 2);
        assert_eq!(child.length, 2.0);
        assert!(!child.remaining.contains(2));
        assert_eq!(child.remaining.len(), 2);
    }

    #[test]
    fn children_are_ascending_and_never_contain_current_city() {
        let m = square();
        let children: Vec<_> = PathState::root(4).expect("root").children(&m).collect();
        assert_eq!(
            children.iter().map(|c| c.city).collect::<Vec<_>>(),
            vec![1, 2, 3]
        );
        assert!(children.iter().all(|c| !c.remaining.contains(c.city)));
    }

    #[test]
    fn leaf_closes_back_to_start() {
        let m = square();
        let leaf = [1, 2, 3]
            .into_iter()
            .fold(PathState::root(4).expect("root"), |state, next| {
                state.branch(next, &m)
            });
        assert!(leaf.is_leaf());
        assert_eq!(leaf.length, 3.0);
        assert_eq!(leaf.closing_length(&m), 4.0);
    }

    #[test]
    fn children_buffer_pops_in_reverse_push_order() {
        let m = square();
        let mut buffer = Children::new();
        for child in PathState::root(4).expect("root").children(&m) {
            buffer.push(child);
        }
        assert_eq!(buffer.as_slice().len(), 3);
        assert_eq!(buffer.pop().map(|c| c.city), Some(3));
        assert_eq!(buffer.as_slice().len(), 2);
        buffer.pop();
        buffer.pop();
        assert!(buffer.pop().is_none());
    }
}
