//! Work-pool traversal: a fixed set of workers repeatedly claim a partial
//! tour, offer it to the bound if complete, otherwise push its surviving
//! children back into the pool.

use crate::{
    DistanceMatrix, Error, PathState, Result, SharedBound,
    algo::{Pruning, work_pool::WorkPool},
    model::path::Children,
};

struct Context<'a> {
    matrix: &'a DistanceMatrix,
    bound: &'a SharedBound,
    pool: &'a WorkPool<PathState>,
    pruning: Pruning,
}

pub(crate) fn search(matrix: &DistanceMatrix, workers: usize, pruning: Pruning) -> Result<f64> {
    let threads = rayon::ThreadPoolBuilder::new()
        .num_threads(workers)
        .thread_name(|idx| format!("bnb-pool-{idx}"))
        .build()
        .map_err(|e| Error::other(format!("rayon pool: {e}")))?;

    let bound = SharedBound::new();
    let pool = WorkPool::new([PathState::root(matrix.n())?]);
    let ctx = Context {
        matrix,
        bound: &bound,
        pool: &pool,
        pruning,
    };

    // Every pool thread runs one drain loop; broadcast joins them all.
    let expanded = threads.broadcast(|_| drain(&ctx));

    let stats = pool.stats();
    log::debug!(
        "iterative: drained workers={workers} claimed={} peak_pending={} per_worker={expanded:?}",
        stats.claimed,
        stats.peak_pending
    );

    Ok(bound.read())
}

/// Runs until the pool is quiescent. Returns how many states this worker took.
fn drain(ctx: &Context<'_>) -> usize {
    let mut view = ctx.bound.view();
    let mut taken = 0;

    while let Some(state) = ctx.pool.claim() {
        taken += 1;

        if state.is_leaf() {
            view.improve(state.closing_length(ctx.matrix));
            ctx.pool.complete([]);
            continue;
        }

        let best = view.refresh();
        let mut children = Children::new();
        if ctx.pruning.admits(state.length, best) {
            for child in state.children(ctx.matrix) {
                if ctx.pruning.admits(child.length, best) {
                    children.push(child);
                }
            }
        }
        // Reverse so the lowest-numbered child is claimed first, like the
        // depth-first strategies.
        ctx.pool.complete(children.as_slice().iter().rev().copied());
    }

    taken
}
