//! Lazy enumeration of k-permutations.

/// Iterator over every ordered selection of `k` distinct values from
/// `0..n`, in lexicographic order.
///
/// Only the current selection is held in memory; each call to `next`
/// derives the following one in place.
///
/// # Examples
/// ```
/// use waymark_planner::KPermutations;
///
/// let all: Vec<Vec<usize>> = KPermutations::new(3, 2).collect();
/// assert_eq!(
///     all,
///     vec![vec![0, 1], vec![0, 2], vec![1, 0], vec![1, 2], vec![2, 0], vec![2, 1]]
/// );
/// ```
#[derive(Debug, Clone)]
pub struct KPermutations {
    n: usize,
    k: usize,
    current: Vec<usize>,
    started: bool,
}

impl KPermutations {
    /// Enumerate selections of `k` values from `0..n`.
    #[must_use]
    pub fn new(n: usize, k: usize) -> Self {
        Self {
            n,
            k,
            current: Vec::with_capacity(k),
            started: false,
        }
    }

    /// Append the smallest unused values until the selection is full.
    fn fill(&mut self) -> bool {
        while self.current.len() < self.k {
            match (0..self.n).find(|value| !self.current.contains(value)) {
                Some(value) => self.current.push(value),
                None => return false,
            }
        }
        true
    }

    /// Step to the next selection; `false` once exhausted.
    fn advance(&mut self) -> bool {
        while let Some(last) = self.current.pop() {
            let next = (last + 1..self.n).find(|value| !self.current.contains(value));
            if let Some(value) = next {
                self.current.push(value);
                return self.fill();
            }
        }
        false
    }
}

impl Iterator for KPermutations {
    type Item = Vec<usize>;

    fn next(&mut self) -> Option<Self::Item> {
        let ready = if self.started {
            !self.current.is_empty() && self.advance()
        } else {
            self.started = true;
            self.k > 0 && self.fill()
        };
        if ready {
            Some(self.current.clone())
        } else {
            self.current.clear();
            None
        }
    }
}

/// Number of `k`-permutations of `n` values, saturating on overflow.
#[must_use]
pub fn permutation_count(n: usize, k: usize) -> usize {
    if k > n {
        return 0;
    }
    (n - k + 1..=n).fold(1_usize, usize::saturating_mul)
}
