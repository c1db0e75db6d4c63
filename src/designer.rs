use crate::{
    barycentric::ExtremalSet,
    error::{Error, NumericalFault, Result, ValidationError},
    error_curve::{MaybeSync, evaluate_errors},
    exchange::remez_exchange,
    grid::Grid,
    observer::{NoopObserver, Observer},
    types::{DesignParameters, FilterSpec},
};
use itertools::{Itertools, MinMaxResult};
use num_traits::{Float, FloatConst};

/// State of a [`FilterDesigner`].
///
/// A designer starts in [`DesignState::GridBuilt`] once the filter
/// specification has been validated and the grid has been constructed. Each
/// call to [`FilterDesigner::step`] moves it to one of the other states.
/// `Converged`, `Exhausted` and `Faulted` are terminal states. Iteration
/// numbers are 1-based.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum DesignState {
    /// The grid is built and the initial extremal set is in place.
    GridBuilt,
    /// The Remez exchange is in progress.
    Iterating {
        /// Number of iterations performed so far.
        iteration: usize,
        /// Number of extremal indices changed by the last exchange.
        num_changes: usize,
    },
    /// The last exchange left the extremal set unchanged.
    Converged {
        /// Number of iterations performed.
        iterations: usize,
    },
    /// The iteration cap was reached while the extremal set was still
    /// changing.
    Exhausted {
        /// Number of iterations performed.
        iterations: usize,
        /// Number of extremal indices changed by the last exchange.
        num_changes: usize,
    },
    /// The exchange stopped because of a numerical fault.
    Faulted {
        /// Iteration in which the fault was detected.
        iteration: usize,
        /// Reason for the fault.
        fault: NumericalFault,
    },
}

impl DesignState {
    /// Returns true if no further iterations are needed or possible.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            DesignState::Converged { .. }
                | DesignState::Exhausted { .. }
                | DesignState::Faulted { .. }
        )
    }
}

/// Convergence status of a finished design.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Convergence {
    /// The extremal set stopped changing.
    Converged {
        /// Number of iterations performed.
        iterations: usize,
    },
    /// The iteration cap was reached.
    ///
    /// The design is usable, but it is not guaranteed to be optimal.
    Exhausted {
        /// Number of iterations performed.
        iterations: usize,
        /// Number of extremal indices changed by the last exchange.
        num_changes: usize,
    },
}

impl Convergence {
    /// Returns true if the design converged.
    pub fn is_converged(&self) -> bool {
        matches!(self, Convergence::Converged { .. })
    }

    /// Returns the number of iterations performed.
    pub fn iterations(&self) -> usize {
        match *self {
            Convergence::Converged { iterations } | Convergence::Exhausted { iterations, .. } => {
                iterations
            }
        }
    }
}

/// Parks-McClellan design result.
///
/// This structure contains the designed amplitude response in the form of
/// the interpolant of the last Remez exchange iteration, together with the
/// grid it was computed on and other information about the design. The
/// amplitude response can be evaluated at any frequency with
/// [`Design::frequency_response`]. Synthesis of the filter taps from the
/// response is left to the caller.
#[derive(Debug, Clone)]
pub struct Design<T> {
    /// Convergence status of the Remez exchange.
    pub status: Convergence,
    /// Maximum weighted error achieved by the design.
    ///
    /// This is the magnitude of the minimax error `rho` of the last
    /// interpolant.
    pub weighted_error: T,
    /// Extremal frequencies of the last interpolant.
    ///
    /// The frequencies are in the interval [0.0, 0.5].
    pub extremal_freqs: Vec<T>,
    /// Number of iterations performed by the Remez exchange.
    pub num_iterations: usize,
    /// Flatness of the solution.
    ///
    /// It is defined as the difference between the maximum and the minimum
    /// absolute value of the weighted error over the extremal set produced by
    /// the last exchange, divided by the maximum. It is zero when the weighted
    /// error vanishes at all of them.
    pub flatness: T,
    /// Extremal set and interpolant of the last iteration.
    pub extremal_set: ExtremalSet<T>,
    /// Dense grid, including the weighted error of the last iteration.
    pub grid: Grid<T>,
}

impl<T: Float + FloatConst> Design<T> {
    /// Evaluates the designed amplitude response at a frequency in
    /// cycles/sample.
    pub fn frequency_response(&self, freq: T) -> T {
        self.extremal_set.frequency_response(freq)
    }
}

/// Remez exchange driver.
///
/// The `FilterDesigner` owns the filter specification, the dense grid and the
/// extremal set, and runs the Remez exchange one iteration at a time. Each
/// iteration builds the interpolant for the current extremal set, evaluates
/// the weighted error on the grid and exchanges the extremal set for the
/// extrema of the error. The design converges when an exchange does not
/// change any of the extremal indices.
///
/// Events are reported to the observer `O`. See [`Observer`].
#[derive(Debug)]
pub struct FilterDesigner<T, O = NoopObserver> {
    spec: FilterSpec<T>,
    grid: Grid<T>,
    indices: Vec<usize>,
    interpolant: Option<ExtremalSet<T>>,
    state: DesignState,
    iteration: usize,
    max_iterations: usize,
    flat_level: T,
    observer: O,
}

impl<T> FilterDesigner<T, NoopObserver>
where
    T: Float + FloatConst + MaybeSync,
{
    /// Creates a designer for some design parameters.
    ///
    /// The grid is built and the extremal set is initialized to `r + 1`
    /// indices evenly spaced over the grid. An error is returned if the grid
    /// density or the iteration cap are zero, or if the buffers cannot be
    /// allocated.
    pub fn new<P: DesignParameters<T>>(parameters: &P) -> Result<Self> {
        FilterDesigner::with_observer(parameters, NoopObserver)
    }
}

impl<T, O> FilterDesigner<T, O>
where
    T: Float + FloatConst + MaybeSync,
    O: Observer<T>,
{
    /// Creates a designer that reports its progress to an observer.
    ///
    /// This behaves as [`FilterDesigner::new`].
    pub fn with_observer<P: DesignParameters<T>>(parameters: &P, mut observer: O) -> Result<Self> {
        let grid_density = parameters.grid_density();
        if grid_density == 0 {
            return Err(ValidationError::GridDensityZero.into());
        }
        let max_iterations = parameters.max_iterations();
        if max_iterations == 0 {
            return Err(ValidationError::MaxIterationsZero.into());
        }
        let spec = parameters.filter_spec().clone();
        let grid = Grid::new(&spec, grid_density)?;
        observer.grid_built(&grid);
        let indices = initial_extremal_indices(grid.len(), spec.num_functions())?;
        let flat_level = parameters.flat_error_threshold() * grid.error_scale();
        Ok(FilterDesigner {
            spec,
            grid,
            indices,
            interpolant: None,
            state: DesignState::GridBuilt,
            iteration: 0,
            max_iterations,
            flat_level,
            observer,
        })
    }

    /// Performs one iteration of the Remez exchange.
    ///
    /// Returns the number of extremal indices that the exchange changed. The
    /// designer state is updated accordingly. Iterating a designer that has
    /// converged or exhausted its iteration cap is allowed, and re-runs the
    /// exchange on the current extremal set.
    ///
    /// If a numerical fault is detected, the designer moves to
    /// [`DesignState::Faulted`] and the fault is returned. Further calls
    /// return the same fault.
    pub fn step(&mut self) -> Result<usize> {
        if let DesignState::Faulted { iteration, fault } = self.state {
            return Err(Error::Numerical { iteration, fault });
        }
        let iteration = self.iteration + 1;
        self.iteration = iteration;
        match self.exchange(iteration) {
            Ok(num_changes) => {
                self.state = if num_changes == 0 {
                    DesignState::Converged {
                        iterations: iteration,
                    }
                } else if iteration >= self.max_iterations {
                    log::warn!(
                        "Remez exchange did not converge in {iteration} iterations \
                         ({num_changes} extremal indices still changing)"
                    );
                    DesignState::Exhausted {
                        iterations: iteration,
                        num_changes,
                    }
                } else {
                    DesignState::Iterating {
                        iteration,
                        num_changes,
                    }
                };
                if self.state.is_terminal() {
                    self.observer.finished(&self.state);
                }
                Ok(num_changes)
            }
            Err(fault) => {
                self.state = DesignState::Faulted { iteration, fault };
                self.observer.finished(&self.state);
                Err(Error::Numerical { iteration, fault })
            }
        }
    }

    fn exchange(&mut self, iteration: usize) -> core::result::Result<usize, NumericalFault> {
        let interpolant = ExtremalSet::new(self.indices.clone(), &self.grid)?;
        evaluate_errors(&mut self.grid, &interpolant);
        self.observer.error_evaluated(iteration, &self.grid);
        let (indices, num_changes) = remez_exchange(
            &self.grid,
            &self.indices,
            interpolant.rho(),
            self.flat_level,
            iteration,
            &mut self.observer,
        )?;
        self.observer
            .exchanged(iteration, &interpolant, &indices, num_changes);
        self.indices = indices;
        self.interpolant = Some(interpolant);
        Ok(num_changes)
    }

    /// Iterates until a terminal state is reached.
    ///
    /// Returns the terminal state if it is [`DesignState::Converged`] or
    /// [`DesignState::Exhausted`], and the numerical fault otherwise.
    pub fn run(&mut self) -> Result<DesignState> {
        loop {
            match self.state {
                DesignState::Faulted { iteration, fault } => {
                    return Err(Error::Numerical { iteration, fault });
                }
                DesignState::Converged { .. } | DesignState::Exhausted { .. } => {
                    return Ok(self.state);
                }
                DesignState::GridBuilt | DesignState::Iterating { .. } => {
                    self.step()?;
                }
            }
        }
    }

    /// Runs the design to completion and returns the result.
    pub fn into_design(mut self) -> Result<Design<T>> {
        let status = match self.run()? {
            DesignState::Converged { iterations } => Convergence::Converged { iterations },
            DesignState::Exhausted {
                iterations,
                num_changes,
            } => Convergence::Exhausted {
                iterations,
                num_changes,
            },
            state => unreachable!("run() returned non-terminal state {state:?}"),
        };
        let Some(extremal_set) = self.interpolant else {
            unreachable!("terminal state reached without an interpolant")
        };
        let flatness = match self
            .indices
            .iter()
            .map(|&i| self.grid.errors()[i].abs())
            .minmax()
        {
            MinMaxResult::MinMax(min, max) if max > T::zero() => (max - min) / max,
            _ => T::zero(),
        };
        let extremal_freqs = extremal_set
            .indices()
            .iter()
            .map(|&i| self.grid.freqs()[i])
            .collect();
        Ok(Design {
            status,
            weighted_error: extremal_set.rho().abs(),
            extremal_freqs,
            num_iterations: self.iteration,
            flatness,
            extremal_set,
            grid: self.grid,
        })
    }
}

impl<T, O> FilterDesigner<T, O> {
    /// Returns the current state.
    pub fn state(&self) -> DesignState {
        self.state
    }

    /// Returns the filter specification.
    pub fn spec(&self) -> &FilterSpec<T> {
        &self.spec
    }

    /// Returns the grid.
    ///
    /// The weighted error stored in the grid is that of the last iteration.
    pub fn grid(&self) -> &Grid<T> {
        &self.grid
    }

    /// Returns the extremal set and interpolant of the last iteration.
    ///
    /// Returns `None` before the first iteration has been completed.
    pub fn extremal_set(&self) -> Option<&ExtremalSet<T>> {
        self.interpolant.as_ref()
    }

    /// Returns the extremal indices that the next iteration will use.
    pub fn extremal_indices(&self) -> &[usize] {
        &self.indices
    }

    /// Returns the number of iterations performed so far.
    pub fn iteration(&self) -> usize {
        self.iteration
    }

    /// Returns a reference to the observer.
    pub fn observer(&self) -> &O {
        &self.observer
    }
}

// r + 1 indices evenly spaced over [0, grid_size - 1]
fn initial_extremal_indices(grid_size: usize, num_functions: usize) -> Result<Vec<usize>> {
    let mut indices = Vec::new();
    indices.try_reserve_exact(num_functions + 1)?;
    indices.extend((0..=num_functions).map(|k| k * (grid_size - 1) / num_functions));
    Ok(indices)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::types::{Band, ParametersBuilder, RemezParameters};

    fn lowpass(h_len: usize) -> RemezParameters<f64> {
        RemezParameters::new(
            h_len,
            vec![Band::new(0.0, 0.2).unwrap(), Band::new(0.3, 0.5).unwrap()],
            vec![1.0, 0.0],
            vec![1.0, 1.0],
        )
        .unwrap()
    }

    #[test]
    fn initial_indices() {
        assert_eq!(
            initial_extremal_indices(64, 5).unwrap(),
            vec![0, 12, 25, 37, 50, 63]
        );
        assert_eq!(initial_extremal_indices(10, 1).unwrap(), vec![0, 9]);
    }

    #[test]
    fn states() {
        let mut designer = FilterDesigner::new(&lowpass(9)).unwrap();
        assert_eq!(designer.state(), DesignState::GridBuilt);
        assert!(designer.extremal_set().is_none());
        assert_eq!(designer.extremal_indices(), &[0, 12, 25, 37, 50, 63]);
        let num_changes = designer.step().unwrap();
        assert!(num_changes > 0);
        assert_eq!(
            designer.state(),
            DesignState::Iterating {
                iteration: 1,
                num_changes
            }
        );
        assert_eq!(
            designer.extremal_set().unwrap().indices(),
            &[0, 12, 25, 37, 50, 63]
        );
        let state = designer.run().unwrap();
        assert!(matches!(state, DesignState::Converged { .. }));
        assert!(state.is_terminal());
        assert_eq!(designer.run().unwrap(), state);
    }

    #[test]
    fn invalid_tunables() {
        let mut params = lowpass(9);
        params.set_grid_density(0);
        assert!(matches!(
            FilterDesigner::new(&params),
            Err(Error::Validation(ValidationError::GridDensityZero))
        ));
        let mut params = lowpass(9);
        params.set_max_iterations(0);
        assert!(matches!(
            FilterDesigner::new(&params),
            Err(Error::Validation(ValidationError::MaxIterationsZero))
        ));
    }

    #[test]
    fn exhausted() {
        let mut params = lowpass(35);
        params.set_max_iterations(1);
        let mut designer = FilterDesigner::new(&params).unwrap();
        let state = designer.run().unwrap();
        let DesignState::Exhausted {
            iterations,
            num_changes,
        } = state
        else {
            panic!("unexpected state {state:?}");
        };
        assert_eq!(iterations, 1);
        assert!(num_changes > 0);
        let design = designer.into_design().unwrap();
        assert_eq!(
            design.status,
            Convergence::Exhausted {
                iterations,
                num_changes
            }
        );
        assert!(!design.status.is_converged());
        // the design holds the interpolant that was evaluated, not the
        // exchanged indices
        assert_eq!(design.extremal_set.len(), 19);
        assert_eq!(design.extremal_set.indices()[1], 12);
        assert!(design.flatness > 0.0);
    }

    #[test]
    fn sparse_grid_fault() {
        // with two or three points per band the error curve cannot show six
        // alternating extrema
        let mut params = RemezParameters::new(
            9,
            vec![
                Band::new(0.0, 0.1).unwrap(),
                Band::new(0.15, 0.3).unwrap(),
                Band::new(0.35, 0.5).unwrap(),
            ],
            vec![0.0, 1.0, 0.0],
            vec![1.0, 1.0, 1.0],
        )
        .unwrap();
        params.set_grid_density(2);
        let mut designer = FilterDesigner::new(&params).unwrap();
        assert_eq!(designer.grid().len(), 8);
        assert_eq!(designer.extremal_indices(), &[0, 1, 2, 4, 5, 7]);
        let Err(Error::Numerical {
            iteration: 1,
            fault: fault @ NumericalFault::NotEnoughExtrema { found, needed: 6 },
        }) = designer.step()
        else {
            panic!("unexpected state {:?}", designer.state());
        };
        assert!(found < 6);
        assert_eq!(designer.state(), DesignState::Faulted { iteration: 1, fault });
        assert!(designer.extremal_set().is_none());
        assert_eq!(designer.iteration(), 1);
    }

    #[test]
    fn fault_is_sticky() {
        // a single grid point cannot hold r + 1 distinct extremal frequencies
        let params =
            RemezParameters::new(41, vec![Band::new(0.0, 0.001).unwrap()], vec![1.0], vec![1.0])
                .unwrap();
        let mut designer = FilterDesigner::new(&params).unwrap();
        assert_eq!(designer.grid().len(), 1);
        assert!(matches!(
            designer.step(),
            Err(Error::Numerical {
                iteration: 1,
                fault: NumericalFault::DuplicateAbscissas
            })
        ));
        let faulted = DesignState::Faulted {
            iteration: 1,
            fault: NumericalFault::DuplicateAbscissas,
        };
        assert_eq!(designer.state(), faulted);
        assert!(matches!(
            designer.step(),
            Err(Error::Numerical { iteration: 1, .. })
        ));
        assert!(matches!(
            designer.run(),
            Err(Error::Numerical { iteration: 1, .. })
        ));
        assert_eq!(designer.iteration(), 1);
        assert!(designer.into_design().is_err());
    }
}
