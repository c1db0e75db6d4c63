//! Observation of the Remez exchange.
//!
//! The [`FilterDesigner`](crate::FilterDesigner) reports each stage of the
//! design to an [`Observer`]. Observers only receive shared references, so
//! they cannot change the course of the design. [`NoopObserver`] ignores all
//! the events, and [`LogObserver`] forwards them to the [`log`] facade.

use crate::barycentric::ExtremalSet;
use crate::designer::DesignState;
use crate::grid::Grid;
use num_traits::{Float, ToPrimitive};

/// Observer of the Remez exchange.
///
/// All the methods have an empty default implementation, so an observer only
/// needs to implement the events it is interested in. Iteration numbers are
/// 1-based.
pub trait Observer<T> {
    /// Called once, after the dense grid has been built.
    fn grid_built(&mut self, _grid: &Grid<T>) {}

    /// Called after the weighted error has been evaluated on the grid.
    fn error_evaluated(&mut self, _iteration: usize, _grid: &Grid<T>) {}

    /// Called with the extrema candidates of the error curve, before pruning.
    fn candidates_found(&mut self, _iteration: usize, _candidates: &[usize], _grid: &Grid<T>) {}

    /// Called after each exchange with the interpolant used in the
    /// iteration, the new extremal indices and the number of changes.
    fn exchanged(
        &mut self,
        _iteration: usize,
        _interpolant: &ExtremalSet<T>,
        _indices: &[usize],
        _num_changes: usize,
    ) {
    }

    /// Called when the designer reaches a terminal state.
    fn finished(&mut self, _state: &DesignState) {}
}

impl<T, O: Observer<T> + ?Sized> Observer<T> for &mut O {
    fn grid_built(&mut self, grid: &Grid<T>) {
        (**self).grid_built(grid)
    }

    fn error_evaluated(&mut self, iteration: usize, grid: &Grid<T>) {
        (**self).error_evaluated(iteration, grid)
    }

    fn candidates_found(&mut self, iteration: usize, candidates: &[usize], grid: &Grid<T>) {
        (**self).candidates_found(iteration, candidates, grid)
    }

    fn exchanged(
        &mut self,
        iteration: usize,
        interpolant: &ExtremalSet<T>,
        indices: &[usize],
        num_changes: usize,
    ) {
        (**self).exchanged(iteration, interpolant, indices, num_changes)
    }

    fn finished(&mut self, state: &DesignState) {
        (**self).finished(state)
    }
}

/// Observer that ignores all the events.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct NoopObserver;

impl<T> Observer<T> for NoopObserver {}

/// Observer that writes the progress of the design to the [`log`] facade.
///
/// A summary of each iteration is logged at the debug level. The error curve
/// and the extremal frequencies are logged at the trace level.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct LogObserver;

fn show<T: ToPrimitive>(x: T) -> f64 {
    x.to_f64().unwrap_or(f64::NAN)
}

impl<T: Float> Observer<T> for LogObserver {
    fn grid_built(&mut self, grid: &Grid<T>) {
        log::debug!(
            "grid: {} points, spacing {:.6e}",
            grid.len(),
            show(grid.spacing())
        );
    }

    fn error_evaluated(&mut self, iteration: usize, grid: &Grid<T>) {
        if log::log_enabled!(log::Level::Trace) {
            for (i, (&f, &e)) in grid.freqs().iter().zip(grid.errors().iter()).enumerate() {
                log::trace!(
                    "iteration {iteration}: E[{i:4}] f = {:12.8} e = {:16.8e}",
                    show(f),
                    show(e)
                );
            }
        }
    }

    fn candidates_found(&mut self, iteration: usize, candidates: &[usize], _grid: &Grid<T>) {
        log::debug!(
            "iteration {iteration}: {} extrema candidates",
            candidates.len()
        );
    }

    fn exchanged(
        &mut self,
        iteration: usize,
        interpolant: &ExtremalSet<T>,
        indices: &[usize],
        num_changes: usize,
    ) {
        log::debug!(
            "iteration {iteration}: rho = {:.8e}, {num_changes} changes",
            show(interpolant.rho())
        );
        log::trace!("iteration {iteration}: extremal indices {indices:?}");
    }

    fn finished(&mut self, state: &DesignState) {
        match state {
            DesignState::Converged { iterations } => {
                log::debug!("converged after {iterations} iterations")
            }
            DesignState::Exhausted {
                iterations,
                num_changes,
            } => log::debug!(
                "stopped after {iterations} iterations with {num_changes} changes pending"
            ),
            DesignState::Faulted { iteration, fault } => {
                log::debug!("numerical fault at iteration {iteration}: {fault}")
            }
            _ => (),
        }
    }
}
