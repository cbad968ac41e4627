use std::fmt;

use crate::{CitySet, Error, Result};

const SYMMETRY_EPSILON: f64 = 1e-9;

/// Dense symmetric distance matrix, stored row-major.
///
/// Off-diagonal entries may be `+inf` for absent edges. A built matrix is
/// always validated: square, `1..=CitySet::CAPACITY` cities, zero diagonal,
/// symmetric, no negative or NaN weights.
#[derive(Clone, Debug, PartialEq)]
pub struct DistanceMatrix {
    n: usize,
    weights: Vec<f64>,
}

impl DistanceMatrix {
    pub fn from_rows(rows: &[Vec<f64>]) -> Result<Self> {
        let n = rows.len();
        if let Some((idx, row)) = rows.iter().enumerate().find(|(_, row)| row.len() != n) {
            return Err(Error::invalid_input(format!(
                "matrix is not square: row {idx} has {} entries, expected {n}",
                row.len()
            )));
        }
        Self::from_flat(n, rows.iter().flatten().copied().collect())
    }

    pub fn from_flat(n: usize, weights: Vec<f64>) -> Result<Self> {
        if weights.len() != n * n {
            return Err(Error::invalid_input(format!(
                "expected {} weights for {n} cities, got {}",
                n * n,
                weights.len()
            )));
        }
        // -0.0 would otherwise compare below +0.0 once summed into a bound.
        let weights = weights.into_iter().map(|w| w + 0.0).collect();
        let matrix = Self { n, weights };
        matrix.validate()?;
        Ok(matrix)
    }

    fn validate(&self) -> Result<()> {
        if self.n == 0 {
            return Err(Error::invalid_input("matrix needs at least one city"));
        }
        if self.n > CitySet::CAPACITY {
            return Err(Error::invalid_input(format!(
                "{} cities exceed the supported maximum of {}",
                self.n,
                CitySet::CAPACITY
            )));
        }
        for i in 0..self.n {
            if self.get(i, i) != 0.0 {
                return Err(Error::invalid_input(format!(
                    "diagonal entry ({i},{i}) must be 0, got {}",
                    self.get(i, i)
                )));
            }
            for j in (i + 1)..self.n {
                let (a, b) = (self.get(i, j), self.get(j, i));
                if a.is_nan() || b.is_nan() || a < 0.0 || b < 0.0 {
                    return Err(Error::invalid_input(format!(
                        "edge ({i},{j}) must be a non-negative weight, got {a} / {b}"
                    )));
                }
                if !same_weight(a, b) {
                    return Err(Error::invalid_input(format!(
                        "matrix is not symmetric at ({i},{j}): {a} != {b}"
                    )));
                }
            }
        }
        Ok(())
    }

    #[inline]
    pub fn n(&self) -> usize {
        self.n
    }

    #[inline]
    pub fn get(&self, from: usize, to: usize) -> f64 {
        self.weights[from * self.n + to]
    }

    pub fn row(&self, city: usize) -> &[f64] {
        &self.weights[city * self.n..(city + 1) * self.n]
    }

    /// Renames cities so that new city `i` is old city `order[i]`.
    /// `order` must be a permutation of `0..n` that keeps city 0 in place.
    pub fn relabel(&self, order: &[usize]) -> Result<Self> {
        if order.len() != self.n {
            return Err(Error::invalid_input(format!(
                "relabel order has {} entries, expected {}",
                order.len(),
                self.n
            )));
        }
        if order[0] != 0 {
            return Err(Error::invalid_input("relabel must keep city 0 as the start"));
        }
        let mut seen = vec![false; self.n];
        for &city in order {
            if city >= self.n || std::mem::replace(&mut seen[city], true) {
                return Err(Error::invalid_input(format!(
                    "relabel order is not a permutation (city {city})"
                )));
            }
        }

        let weights = order
            .iter()
            .flat_map(|&from| order.iter().map(move |&to| (from, to)))
            .map(|(from, to)| self.get(from, to))
            .collect();
        Ok(Self {
            n: self.n,
            weights,
        })
    }

    /// Length of the fixed tour `0 -> 1 -> ... -> n-1 -> 0`.
    pub fn naive_tour_length(&self) -> f64 {
        if self.n < 2 {
            return 0.0;
        }
        let open: f64 = (1..self.n).map(|i| self.get(i - 1, i)).sum();
        open + self.get(self.n - 1, 0)
    }

    /// Number of undirected edges with a finite weight.
    pub fn finite_edges(&self) -> usize {
        (0..self.n)
            .flat_map(|i| ((i + 1)..self.n).map(move |j| (i, j)))
            .filter(|&(i, j)| self.get(i, j).is_finite())
            .count()
    }
}

impl fmt::Display for DistanceMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for i in 0..self.n {
            let row: Vec<String> = self
                .row(i)
                .iter()
                .map(|w| ryu::Buffer::new().format(*w).to_owned())
                .collect();
            writeln!(f, "{}", row.join(" "))?;
        }
        Ok(())
    }
}

fn same_weight(a: f64, b: f64) -> bool {
    if a == b {
        return true;
    }
    a.is_finite() && b.is_finite() && (a - b).abs() <= SYMMETRY_EPSILON * a.abs().max(1.0)
}

#[cfg(test)]
mod tests {
    use super::DistanceMatrix;

    fn sample() -> DistanceMatrix {
        DistanceMatrix::from_rows(&[
            vec![0.0, 10.0, 15.0, 20.0],
            vec![10.0, 0.0, 35.0, 25.0],
            vec![15.0, 35.0, 0.0, 30.0],
            vec![20.0, 25.0, 30.0, 0.0],
        ])
        .expect("valid matrix")
    }

    #[test]
    fn from_rows_reads_row_major() {
        let m = sample();
        assert_eq!(m.n(), 4);
        assert_eq!(m.get(1, 3), 25.0);
        assert_eq!(m.row(2), &[15.0, 35.0, 0.0, 30.0]);
    }

    #[test]
    fn rejects_empty_matrix() {
        let err = DistanceMatrix::from_rows(&[]).expect_err("empty");
        assert!(err.to_string().contains("at least one city"));
    }

    #[test]
    fn rejects_ragged_rows() {
        let err = DistanceMatrix::from_rows(&[vec![0.0, 1.0], vec![1.0]]).expect_err("ragged");
        assert!(err.to_string().contains("not square"));
    }

    #[test]
    fn rejects_asymmetric_entries() {
        let err = DistanceMatrix::from_rows(&[vec![0.0, 5.1], vec![5.0, 0.0]])
            .expect_err("asymmetric");
        assert!(err.to_string().contains("not symmetric at (0,1)"));
    }

    #[test]
    fn rejects_non_zero_diagonal() {
        let err = DistanceMatrix::from_rows(&[vec![1.0, 2.0], vec![2.0, 0.0]])
            .expect_err("diagonal");
        assert!(err.to_string().contains("diagonal entry (0,0)"));
    }

    #[test]
    fn rejects_negative_and_nan_weights() {
        let neg = DistanceMatrix::from_rows(&[vec![0.0, -1.0], vec![-1.0, 0.0]]);
        assert!(neg.is_err());
        let nan = DistanceMatrix::from_rows(&[vec![0.0, f64::NAN], vec![f64::NAN, 0.0]]);
        assert!(nan.is_err());
    }

    #[test]
    fn rejects_more_cities_than_capacity() {
        let n = 33;
        let err = DistanceMatrix::from_flat(n, vec![0.0; n * n]).expect_err("too large");
        assert!(err.to_string().contains("exceed the supported maximum"));
    }

    #[test]
    fn accepts_infinite_edges() {
        let inf = f64::INFINITY;
        let m = DistanceMatrix::from_rows(&[
            vec![0.0, 1.0, inf],
            vec![1.0, 0.0, 2.0],
            vec![inf, 2.0, 0.0],
        ])
        .expect("inf edges are allowed");
        assert_eq!(m.finite_edges(), 2);
    }

    #[test]
    fn naive_tour_follows_index_order() {
        assert_eq!(sample().naive_tour_length(), 10.0 + 35.0 + 30.0 + 20.0);
    }

    #[test]
    fn relabel_moves_rows_and_columns_together() {
        let m = sample().relabel(&[0, 3, 1, 2]).expect("relabel");
        assert_eq!(m.get(0, 1), 20.0);
        assert_eq!(m.get(1, 2), 25.0);
        assert_eq!(m.get(2, 3), 35.0);
    }

    #[test]
    fn relabel_must_keep_start_and_be_a_permutation() {
        assert!(sample().relabel(&[1, 0, 2, 3]).is_err());
        assert!(sample().relabel(&[0, 1, 1, 3]).is_err());
        assert!(sample().relabel(&[0, 1, 2]).is_err());
    }

    #[test]
    fn display_prints_one_row_per_line() {
        let text = sample().to_string();
        assert_eq!(text.lines().count(), 4);
        assert_eq!(text.lines().next(), Some("0.0 10.0 15.0 20.0"));
    }
}
