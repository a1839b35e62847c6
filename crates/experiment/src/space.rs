//! Enumeration of the case space.

use std::fmt;
use std::iter::FusedIterator;

use crate::case::Case;

/// One value per case, in declared case order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Combination(Vec<String>);

impl Combination {
    /// Wrap an ordered list of case values.
    pub fn new(values: Vec<String>) -> Self {
        Self(values)
    }

    /// The values, in case order.
    pub fn values(&self) -> &[String] {
        &self.0
    }

    /// Value for the case at position `i`.
    pub fn get(&self, i: usize) -> Option<&str> {
        self.0.get(i).map(String::as_str)
    }

    /// Number of values.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the combination is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Consume into the underlying values.
    pub fn into_values(self) -> Vec<String> {
        self.0
    }
}

impl fmt::Display for Combination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({})", self.0.join(", "))
    }
}

impl<S: AsRef<str>> PartialEq<[S]> for Combination {
    fn eq(&self, other: &[S]) -> bool {
        self.0.len() == other.len() && self.0.iter().zip(other).all(|(a, b)| a == b.as_ref())
    }
}

/// The Cartesian product of a set of cases.
///
/// A `CaseSpace` is a cheap view: every call to [`iter`](Self::iter) starts a
/// fresh enumeration, the first case varying slowest and the last fastest.
#[derive(Debug, Clone, Copy)]
pub struct CaseSpace<'a> {
    cases: &'a [Case],
}

impl<'a> CaseSpace<'a> {
    pub(crate) fn new(cases: &'a [Case]) -> Self {
        Self { cases }
    }

    /// Total number of combinations.
    ///
    /// Saturates at `usize::MAX`; a built [`Experiment`](crate::Experiment)
    /// never gets there.
    pub fn len(&self) -> usize {
        self.checked_len().unwrap_or(usize::MAX)
    }

    /// Total number of combinations, or `None` if it overflows `usize`.
    pub fn checked_len(&self) -> Option<usize> {
        self.cases
            .iter()
            .try_fold(1usize, |acc, case| acc.checked_mul(case.len()))
    }

    /// Whether the space has no combinations.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Enumerate every combination.
    pub fn iter(&self) -> CaseSpaceIter<'a> {
        CaseSpaceIter {
            cases: self.cases,
            odometer: vec![0; self.cases.len()],
            remaining: self.len(),
        }
    }

    /// Position of `values` in enumeration order, if every value is declared
    /// for its case.
    pub fn index_of<S: AsRef<str>>(&self, values: &[S]) -> Option<usize> {
        if values.len() != self.cases.len() {
            return None;
        }
        self.cases
            .iter()
            .zip(values)
            .try_fold(0usize, |acc, (case, value)| {
                case.position(value.as_ref()).map(|p| acc * case.len() + p)
            })
    }
}

impl<'a> IntoIterator for CaseSpace<'a> {
    type Item = Combination;
    type IntoIter = CaseSpaceIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a> IntoIterator for &CaseSpace<'a> {
    type Item = Combination;
    type IntoIter = CaseSpaceIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over a [`CaseSpace`].
#[derive(Debug, Clone)]
pub struct CaseSpaceIter<'a> {
    cases: &'a [Case],
    odometer: Vec<usize>,
    remaining: usize,
}

impl Iterator for CaseSpaceIter<'_> {
    type Item = Combination;

    fn next(&mut self) -> Option<Combination> {
        if self.remaining == 0 {
            return None;
        }

        let values = self
            .cases
            .iter()
            .zip(&self.odometer)
            .map(|(case, &i)| case.values()[i].clone())
            .collect();

        // Advance the last case fastest.
        for (digit, case) in self.odometer.iter_mut().zip(self.cases).rev() {
            *digit += 1;
            if *digit < case.len() {
                break;
            }
            *digit = 0;
        }
        self.remaining -= 1;

        Some(Combination(values))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for CaseSpaceIter<'_> {}

impl FusedIterator for CaseSpaceIter<'_> {}
