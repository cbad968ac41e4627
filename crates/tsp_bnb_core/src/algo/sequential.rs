use crate::{DistanceMatrix, PathState, Result, algo::Pruning};

/// Depth-first branch-and-bound with a single local bound.
pub(crate) fn search(matrix: &DistanceMatrix, pruning: Pruning) -> Result<f64> {
    let mut best = f64::INFINITY;
    descend(matrix, pruning, PathState::root(matrix.n())?, &mut best);
    Ok(best)
}

fn descend(matrix: &DistanceMatrix, pruning: Pruning, state: PathState, best: &mut f64) {
    if state.is_leaf() {
        *best = best.min(state.closing_length(matrix));
        return;
    }
    for child in state.children(matrix) {
        if pruning.admits(child.length, *best) {
            descend(matrix, pruning, child, best);
        }
    }
}
