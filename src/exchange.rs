use crate::error::NumericalFault;
use crate::grid::Grid;
use crate::observer::Observer;
use itertools::Itertools;
use num_traits::Float;
use std::cmp::Ordering;

// Perform one Remez exchange on the error curve of the grid.
//
// Returns the new extremal indices (exactly n of them, where n is the length
// of `previous`) and the number of positions in which they differ from
// `previous`. When the error curve has too few extrema because the
// interpolant is exact (`rho` and the whole curve below `flat_level`),
// `previous` is kept. Otherwise too few extrema is a fault.
pub fn remez_exchange<T, O>(
    grid: &Grid<T>,
    previous: &[usize],
    rho: T,
    flat_level: T,
    iteration: usize,
    observer: &mut O,
) -> Result<(Vec<usize>, usize), NumericalFault>
where
    T: Float,
    O: Observer<T> + ?Sized,
{
    let errors = grid.errors();
    let n = previous.len();
    let mut candidates = find_extrema_candidates(errors);
    observer.candidates_found(iteration, &candidates, grid);
    if candidates.len() < n {
        if rho.abs() <= flat_level && is_flat(errors, flat_level) {
            return Ok((previous.to_vec(), 0));
        }
        return Err(NumericalFault::NotEnoughExtrema {
            found: candidates.len(),
            needed: n,
        });
    }
    prune_extrema_candidates(&mut candidates, errors, n);
    let num_changes = count_changes(previous, &candidates);
    Ok((candidates, num_changes))
}

pub fn is_flat<T: Float>(errors: &[T], flat_level: T) -> bool {
    errors.iter().all(|e| e.abs() <= flat_level)
}

// Find the local extrema of the error curve.
//
// Interior points qualify when they are a strict positive local maximum or a
// strict negative local minimum. Each end of the grid qualifies when its
// magnitude exceeds that of its only neighbour.
pub fn find_extrema_candidates<T: Float>(errors: &[T]) -> Vec<usize> {
    let len = errors.len();
    if len < 2 {
        return Vec::new();
    }
    let zero = T::zero();
    let mut candidates = Vec::new();
    if errors[0].abs() > errors[1].abs() {
        candidates.push(0);
    }
    candidates.extend(errors.windows(3).enumerate().filter_map(|(j, w)| {
        let (prev, e, next) = (w[0], w[1], w[2]);
        let maximum = e > zero && prev < e && next < e;
        let minimum = e < zero && prev > e && next > e;
        (maximum || minimum).then_some(j + 1)
    }));
    if errors[len - 1].abs() > errors[len - 2].abs() {
        candidates.push(len - 1);
    }
    candidates
}

// Prune extrema candidates to leave only n of them. The candidates must be
// sorted and there must be at least n of them.
//
// Candidates are removed one at a time. If two consecutive candidates have
// the same sign, the smaller of the two (the first one on ties) is
// removed. If the signs already alternate and a single candidate is in
// excess, the smaller of the two ends (the last one on ties) is removed.
// Otherwise the candidate with smallest magnitude is removed.
pub fn prune_extrema_candidates<T: Float>(candidates: &mut Vec<usize>, errors: &[T], n: usize) {
    debug_assert!(candidates.len() >= n);
    let magnitude = |i: usize| errors[i].abs();
    while candidates.len() > n {
        let excess = candidates.len() - n;
        let remove = match first_sign_violation(candidates, errors) {
            Some(k) => {
                if magnitude(candidates[k]) < magnitude(candidates[k - 1]) {
                    k
                } else {
                    k - 1
                }
            }
            None if excess == 1 => {
                let last = candidates.len() - 1;
                if magnitude(candidates[0]) < magnitude(candidates[last]) {
                    0
                } else {
                    last
                }
            }
            None => candidates
                .iter()
                .position_min_by(|&&a, &&b| {
                    magnitude(a)
                        .partial_cmp(&magnitude(b))
                        .unwrap_or(Ordering::Equal)
                })
                // there are more than n >= 1 candidates
                .unwrap_or(0),
        };
        candidates.remove(remove);
    }
}

// Position of the first candidate whose error does not have the opposite
// sign of the previous candidate.
fn first_sign_violation<T: Float>(candidates: &[usize], errors: &[T]) -> Option<usize> {
    let zero = T::zero();
    let mut positive = errors[*candidates.first()?] > zero;
    for (k, &i) in candidates.iter().enumerate().skip(1) {
        let e = errors[i];
        if (positive && e < zero) || (!positive && e > zero) {
            positive = !positive;
        } else {
            return Some(k);
        }
    }
    None
}

// Count the positions at which two extremal sets differ
pub fn count_changes(previous: &[usize], current: &[usize]) -> usize {
    previous
        .iter()
        .zip(current.iter())
        .filter(|(a, b)| a != b)
        .count()
}
