use std::ops::Index;

use itertools::Itertools;

use crate::misc::{CurveError, FloatingPoint, Invertible};

use super::KnotMultiplicity;

/// Knot vector representation
/// a non-decreasing sequence of parameters of length `# of control points + degree + 1`
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct KnotVector<T>(Vec<T>);

/// Divide or return zero when the knot interval collapses (repeated knots)
fn guarded_div<T: FloatingPoint>(numerator: T, denominator: T) -> T {
    if denominator == T::zero() {
        T::zero()
    } else {
        numerator / denominator
    }
}

impl<T: FloatingPoint> KnotVector<T> {
    pub fn new(knots: Vec<T>) -> Self {
        Self(knots)
    }

    /// Create an open uniform clamped knot vector over [0, 1]
    /// the first and last `degree + 1` knots are 0 and 1, interior knots are evenly spaced
    /// # Example
    /// ```
    /// use spline_core::prelude::KnotVector;
    /// let knots: KnotVector<f64> = KnotVector::open_uniform(5, 2);
    /// assert_eq!(knots.to_vec(), vec![0., 0., 0., 1. / 3., 2. / 3., 1., 1., 1.]);
    /// ```
    pub fn open_uniform(point_count: usize, degree: usize) -> Self {
        let m = point_count + degree + 1;
        let knots = (0..m)
            .map(|i| {
                if i <= degree {
                    T::zero()
                } else if i + degree + 1 >= m {
                    T::one()
                } else {
                    let interval = T::from_usize(m - 2 * degree - 1).unwrap();
                    T::from_usize(i - degree).unwrap() / interval
                }
            })
            .collect();
        Self(knots)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn to_vec(&self) -> Vec<T> {
        self.0.clone()
    }

    pub fn first(&self) -> T {
        self.0[0]
    }

    pub fn last(&self) -> T {
        self.0[self.0.len() - 1]
    }

    pub fn as_slice(&self) -> &[T] {
        &self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.0.iter()
    }

    /// Get the domain of the knot vector by degree
    pub fn domain(&self, degree: usize) -> (T, T) {
        (self.0[degree], self.0[self.0.len() - 1 - degree])
    }

    pub fn is_non_decreasing(&self) -> bool {
        self.0.iter().tuple_windows().all(|(a, b)| a <= b)
    }

    /// Check that the knot vector can drive a curve with `point_count` control points of `degree`
    /// length matches, knots never decrease and the domain is not empty
    pub fn is_valid_for(&self, point_count: usize, degree: usize) -> bool {
        if point_count <= degree || self.len() != point_count + degree + 1 {
            return false;
        }
        let (start, end) = self.domain(degree);
        self.is_non_decreasing() && start < end
    }

    /// Get the multiplicity of each knot
    /// # Example
    /// ```
    /// use spline_core::prelude::KnotVector;
    /// let knots = KnotVector::<f64>::new(vec![0., 0., 0., 0.5, 1., 1., 1.]);
    /// let knot_multiplicity = knots.multiplicity();
    /// assert_eq!(knot_multiplicity[0].multiplicity(), 3);
    /// assert_eq!(knot_multiplicity[1].multiplicity(), 1);
    /// assert_eq!(knot_multiplicity[2].multiplicity(), 3);
    /// ```
    pub fn multiplicity(&self) -> Vec<KnotMultiplicity<T>> {
        let mut mult = vec![];
        let Some(first) = self.0.first() else {
            return mult;
        };

        let mut current = KnotMultiplicity::new(*first, 0);
        self.0.iter().for_each(|knot| {
            if (*knot - *current.knot()).abs() > T::default_epsilon() {
                mult.push(current);
                current = KnotMultiplicity::new(*knot, 0);
            }
            current.increment_multiplicity();
        });
        mult.push(current);

        mult
    }

    /// Check if the knot vector is clamped
    /// `clamped` means the first and last knots have a multiplicity greater than the degree
    pub fn is_clamped(&self, degree: usize) -> bool {
        let multiplicity = self.multiplicity();
        match (multiplicity.first(), multiplicity.last()) {
            (Some(start), Some(end)) => {
                start.multiplicity() > degree && end.multiplicity() > degree
            }
            _ => false,
        }
    }

    /// Find the knot span index `i` such that `U[i] <= u < U[i + 1]`
    /// `n` is the index of the last control point.
    /// Returns `n` when `u` sits on the last knot of the domain.
    ///
    /// # Failures
    /// - fewer than 2 control points, or not enough knots for `n` and `degree`
    /// - `u` outside of the knot domain `[U[degree], U[n + 1]]`
    ///
    /// # Example
    /// ```
    /// use spline_core::prelude::KnotVector;
    /// let knots = KnotVector::<f64>::new(vec![0., 0., 0., 1., 2., 3., 3., 3.]);
    /// assert_eq!(knots.find_knot_span_index(4, 2, 2.5).unwrap(), 4);
    /// assert_eq!(knots.find_knot_span_index(4, 2, 3.).unwrap(), 4);
    /// assert!(knots.find_knot_span_index(4, 2, 3.5).is_err());
    /// ```
    pub fn find_knot_span_index(&self, n: usize, degree: usize, u: T) -> anyhow::Result<usize> {
        if n < 1 || n < degree || self.len() < n + degree + 2 {
            let (min, max) = match (self.0.first(), self.0.last()) {
                (Some(first), Some(last)) => (*first, *last),
                _ => (T::zero(), T::zero()),
            };
            return Err(CurveError::out_of_range(u, min, max).into());
        }

        let (min, max) = (self[degree], self[n + 1]);
        if !(u >= min && u <= max) {
            return Err(CurveError::out_of_range(u, min, max).into());
        }

        if u == max {
            return Ok(n);
        }

        // binary search
        let mut low = degree;
        let mut high = n + 1;
        let mut mid = (low + high) / 2;
        while u < self[mid] || self[mid + 1] <= u {
            if u < self[mid] {
                high = mid;
            } else {
                low = mid;
            }
            let next = (low + high) / 2;
            if mid == next {
                break;
            }
            mid = next;
        }

        Ok(mid)
    }

    /// Compute the non-vanishing basis functions by the Cox-de Boor recurrence
    /// Returns `degree + 1` values `N[span - degree], ..., N[span]` at `u`
    pub fn basis_functions(&self, knot_span_index: usize, u: T, degree: usize) -> Vec<T> {
        let mut basis_functions = vec![T::zero(); degree + 1];
        let mut left = vec![T::zero(); degree + 1];
        let mut right = vec![T::zero(); degree + 1];

        basis_functions[0] = T::one();

        for j in 1..=degree {
            left[j] = u - self[knot_span_index + 1 - j];
            right[j] = self[knot_span_index + j] - u;
            let mut saved = T::zero();

            for r in 0..j {
                let temp = guarded_div(basis_functions[r], right[r + 1] + left[j - r]);
                basis_functions[r] = saved + right[r + 1] * temp;
                saved = left[j - r] * temp;
            }

            basis_functions[j] = saved;
        }

        basis_functions
    }

    /// Compute the non-vanishing basis functions and their derivatives
    /// 2d array of size (n + 1, degree + 1): the kth row holds the kth derivative
    /// rows above `degree` are zero
    pub fn derivative_basis_functions(
        &self,
        knot_index: usize,
        u: T,
        degree: usize,
        n: usize,
    ) -> Vec<Vec<T>> {
        let mut ndu = vec![vec![T::zero(); degree + 1]; degree + 1];
        let mut left = vec![T::zero(); degree + 1];
        let mut right = vec![T::zero(); degree + 1];

        ndu[0][0] = T::one();

        for j in 1..=degree {
            left[j] = u - self[knot_index + 1 - j];
            right[j] = self[knot_index + j] - u;

            let mut saved = T::zero();
            for r in 0..j {
                // lower triangle
                ndu[j][r] = right[r + 1] + left[j - r];
                let temp = guarded_div(ndu[r][j - 1], ndu[j][r]);

                // upper triangle
                ndu[r][j] = saved + right[r + 1] * temp;
                saved = left[j - r] * temp;
            }
            ndu[j][j] = saved;
        }

        let mut ders = vec![vec![T::zero(); degree + 1]; n + 1];
        let mut a = vec![vec![T::zero(); degree + 1]; 2];

        // load the basis functions
        for j in 0..=degree {
            ders[0][j] = ndu[j][degree];
        }

        let idegree = degree as isize;
        let du = n.min(degree) as isize;

        // compute the derivatives
        for r in 0..=idegree {
            // alternate rows in array a
            let mut s1 = 0;
            let mut s2 = 1;
            a[0][0] = T::one();

            // loop to compute the kth derivative
            for k in 1..=du {
                let mut d = T::zero();
                let rk = r - k;
                let pk = idegree - k;

                if r >= k {
                    a[s2][0] = guarded_div(a[s1][0], ndu[(pk + 1) as usize][rk as usize]);
                    d = a[s2][0] * ndu[rk as usize][pk as usize];
                }

                let j1 = if rk >= -1 { 1 } else { -rk };
                let j2 = if r - 1 <= pk { k - 1 } else { idegree - r };

                for j in j1..=j2 {
                    let ju = j as usize;
                    a[s2][ju] = guarded_div(
                        a[s1][ju] - a[s1][ju - 1],
                        ndu[(pk + 1) as usize][(rk + j) as usize],
                    );
                    d += a[s2][ju] * ndu[(rk + j) as usize][pk as usize];
                }

                let uk = k as usize;
                let ur = r as usize;
                if r <= pk {
                    a[s2][uk] = guarded_div(-a[s1][uk - 1], ndu[(pk + 1) as usize][ur]);
                    d += a[s2][uk] * ndu[ur][pk as usize];
                }

                ders[uk][ur] = d;

                // switch rows
                std::mem::swap(&mut s1, &mut s2);
            }
        }

        // multiply through by the falling factorial p (p - 1) ... (p - k + 1)
        let mut acc = idegree;
        for k in 1..=du {
            for j in 0..=degree {
                ders[k as usize][j] *= T::from_isize(acc).unwrap();
            }
            acc *= idegree - k;
        }
        ders
    }
}

impl<T> Index<usize> for KnotVector<T> {
    type Output = T;
    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}

impl<T> FromIterator<T> for KnotVector<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<T: FloatingPoint> Invertible for KnotVector<T> {
    /// Reverses the knot vector, keeping its first knot in place
    /// # Example
    /// ```
    /// use spline_core::prelude::*;
    /// let mut knot = KnotVector::<f64>::new(vec![0., 0., 0., 0.25, 1., 1., 1.]);
    /// knot.invert();
    /// assert_eq!(knot.to_vec(), vec![0., 0., 0., 0.75, 1., 1., 1.]);
    /// ```
    fn invert(&mut self) {
        let Some(min) = self.0.first() else {
            return;
        };

        let mut next = vec![*min];
        let len = self.len();
        for i in 1..len {
            next.push(next[i - 1] + (self[len - i] - self[len - i - 1]));
        }

        self.0 = next;
    }
}
