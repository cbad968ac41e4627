pub mod bound;
pub(crate) mod iterative;
pub(crate) mod recursive;
pub(crate) mod sequential;
pub(crate) mod work_pool;

/// Whether a partial tour is cut off once it reaches the best known length.
///
/// `Disabled` explores every child and only exists to check that pruning never
/// changes the optimum.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum Pruning {
    #[default]
    Enabled,
    Disabled,
}

impl Pruning {
    /// A partial tour of `length` can still beat `best`.
    #[inline]
    pub fn admits(self, length: f64, best: f64) -> bool {
        match self {
            Self::Enabled => length < best,
            Self::Disabled => true,
        }
    }
}
