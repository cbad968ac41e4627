//! Fork-join traversal: each internal node spawns all surviving children but
//! the last as tasks and explores the last one inline.

use rayon::Scope;

use crate::{
    DistanceMatrix, Error, PathState, Result, SharedBound,
    algo::Pruning,
    model::path::Children,
};

struct Context<'a> {
    matrix: &'a DistanceMatrix,
    bound: &'a SharedBound,
    pruning: Pruning,
}

pub(crate) fn search(matrix: &DistanceMatrix, workers: usize, pruning: Pruning) -> Result<f64> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(workers)
        .thread_name(|idx| format!("bnb-fork-{idx}"))
        .build()
        .map_err(|e| Error::other(format!("rayon pool: {e}")))?;

    let root = PathState::root(matrix.n())?;
    let bound = SharedBound::new();
    let ctx = Context {
        matrix,
        bound: &bound,
        pruning,
    };

    // The scope returns only once every transitively spawned task is done.
    pool.install(|| rayon::scope(|scope| explore(scope, &ctx, root)));

    Ok(bound.read())
}

fn explore<'s>(scope: &Scope<'s>, ctx: &'s Context<'s>, state: PathState) {
    if state.is_leaf() {
        ctx.bound.improve(state.closing_length(ctx.matrix));
        return;
    }

    let best = ctx.bound.read();
    // The bound may have dropped since this task was spawned.
    if !ctx.pruning.admits(state.length, best) {
        return;
    }

    let mut children = Children::new();
    for child in state.children(ctx.matrix) {
        if ctx.pruning.admits(child.length, best) {
            children.push(child);
        }
    }

    let Some(last) = children.pop() else {
        return;
    };
    for &child in children.as_slice() {
        scope.spawn(move |scope| explore(scope, ctx, child));
    }
    explore(scope, ctx, last);
}

#[cfg(test)]
mod tests {
    use super::search;
    use crate::{
        DistanceMatrix,
        algo::{Pruning, sequential},
    };

    fn ring(n: usize) -> DistanceMatrix {
        let rows: Vec<Vec<f64>> = (0..n)
            .map(|i| {
                (0..n)
                    .map(|j| {
                        let gap = i.abs_diff(j);
                        gap.min(n - gap) as f64 * 1.5
                    })
                    .collect()
            })
            .collect();
        DistanceMatrix::from_rows(&rows).expect("valid matrix")
    }

    #[test]
    fn matches_sequential_on_a_ring() {
        let m = ring(9);
        let expected = sequential::search(&m, Pruning::Enabled).expect("sequential");
        assert_eq!(expected, 9.0 * 1.5);
        for workers in [1, 2, 4, 8] {
            assert_eq!(search(&m, workers, Pruning::Enabled).expect("solve"), expected);
        }
    }

    #[test]
    fn unpruned_search_reaches_the_same_optimum() {
        let m = ring(7);
        assert_eq!(
            search(&m, 3, Pruning::Disabled).expect("solve"),
            search(&m, 3, Pruning::Enabled).expect("solve"),
        );
    }

    #[test]
    fn two_cities_go_there_and_back() {
        let m = DistanceMatrix::from_rows(&[vec![0.0, 4.0], vec![4.0, 0.0]]).expect("valid");
        assert_eq!(search(&m, 2, Pruning::Enabled).expect("solve"), 8.0);
    }
}
