use std::collections::HashMap;

use crate::misc::FloatingPoint;

/// Returns the binomial coefficient of `n` and `k`.
/// Used to build Bernstein polynomials.
pub fn binomial<T: FloatingPoint>(n: usize, k: usize) -> T {
    if k == 0 || k == n {
        return T::one();
    } else if n == 0 || k > n {
        return T::zero();
    }

    let k = k.min(n - k);
    let mut r = T::one();
    for i in 0..k {
        r = r * T::from_usize(n - i).unwrap() / T::from_usize(i + 1).unwrap();
    }
    r
}

/// A memoized binomial coefficient calculator based on Pascal's rule.
/// Rational derivative evaluation asks for the same small coefficients repeatedly.
#[derive(Debug, Clone, Default)]
pub struct Binomial<T> {
    memo: HashMap<(usize, usize), T>,
}

impl<T: FloatingPoint> Binomial<T> {
    pub fn new() -> Self {
        Self {
            memo: HashMap::new(),
        }
    }

    /// Returns the binomial coefficient of `n` and `k` with memoization.
    pub fn get(&mut self, n: usize, k: usize) -> T {
        if k == 0 || k == n {
            return T::one();
        } else if n == 0 || k > n {
            return T::zero();
        }

        let k = k.min(n - k);

        if let Some(memoized) = self.memo.get(&(n, k)) {
            return *memoized;
        }

        let r = self.get(n - 1, k) + self.get(n - 1, k - 1);
        self.memo.insert((n, k), r);
        r
    }
}
