use std::cmp::Ordering;
use std::fmt;
use std::ops::Index;

use crate::foundation::error::{PatternError, PatternResult};

/// One value per garment size, in size order.
///
/// A single-element `Graded` describes a non-graded (single-size) pattern. The sequence is never
/// empty; every constructor enforces that.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Graded<T>(Vec<T>);

impl<T> Graded<T> {
    /// Wrap per-size values, rejecting an empty list.
    pub fn new(values: Vec<T>) -> PatternResult<Self> {
        if values.is_empty() {
            return Err(PatternError::construction(
                "graded value needs at least one size",
            ));
        }
        Ok(Self(values))
    }

    /// Wrap values already known to be non-empty.
    pub(crate) fn from_nonempty(values: Vec<T>) -> Self {
        debug_assert!(!values.is_empty());
        Self(values)
    }

    pub fn single(value: T) -> Self {
        Self(vec![value])
    }

    /// The same value for `sizes` sizes.
    pub fn repeat(value: T, sizes: usize) -> PatternResult<Self>
    where
        T: Clone,
    {
        Self::new(vec![value; sizes])
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// `true` when there is more than one size.
    pub fn is_graded(&self) -> bool {
        self.0.len() > 1
    }

    pub fn values(&self) -> &[T] {
        &self.0
    }

    pub fn into_vec(self) -> Vec<T> {
        self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.0.iter()
    }

    /// Value for the first size. Always present.
    pub fn first(&self) -> &T {
        &self.0[0]
    }

    pub fn get(&self, size: usize) -> Option<&T> {
        self.0.get(size)
    }

    pub fn map<U>(&self, f: impl FnMut(&T) -> U) -> Graded<U> {
        Graded(self.0.iter().map(f).collect())
    }

    pub fn try_map<U, E>(&self, f: impl FnMut(&T) -> Result<U, E>) -> Result<Graded<U>, E> {
        Ok(Graded(self.0.iter().map(f).collect::<Result<Vec<_>, E>>()?))
    }

    /// Combine two graded values size by size. Sizes must agree.
    pub fn zip_with<U, V>(
        &self,
        other: &Graded<U>,
        mut f: impl FnMut(&T, &U) -> V,
    ) -> PatternResult<Graded<V>> {
        if self.len() != other.len() {
            return Err(PatternError::broadcast(format!(
                "graded values cover {} and {} sizes",
                self.len(),
                other.len()
            )));
        }
        Ok(Graded(
            self.0
                .iter()
                .zip(other.0.iter())
                .map(|(a, b)| f(a, b))
                .collect(),
        ))
    }

    pub fn any(&self, pred: impl FnMut(&T) -> bool) -> bool {
        self.0.iter().any(pred)
    }

    pub fn all(&self, pred: impl FnMut(&T) -> bool) -> bool {
        self.0.iter().all(pred)
    }
}

impl<T: PartialEq> Graded<T> {
    pub fn all_equal(&self) -> bool {
        let first = self.first();
        self.0.iter().all(|v| v == first)
    }

    /// The shared value when every size agrees.
    pub fn collapsed(&self) -> Option<&T> {
        self.all_equal().then(|| self.first())
    }
}

impl<T: Ord + Copy> Graded<T> {
    /// Smallest value across all sizes.
    pub fn min(&self) -> T {
        self.0.iter().copied().fold(*self.first(), std::cmp::min)
    }

    /// Largest value across all sizes.
    pub fn max(&self) -> T {
        self.0.iter().copied().fold(*self.first(), std::cmp::max)
    }

    pub fn elementwise_min(&self, other: &Self) -> PatternResult<Self> {
        self.zip_with(other, |a, b| std::cmp::min(*a, *b))
    }

    pub fn elementwise_max(&self, other: &Self) -> PatternResult<Self> {
        self.zip_with(other, |a, b| std::cmp::max(*a, *b))
    }
}

impl<T: serde::Serialize + PartialEq> Graded<T> {
    /// Template-facing form: a scalar when all sizes agree, else an array.
    pub fn to_context_value(&self) -> PatternResult<serde_json::Value> {
        match self.collapsed() {
            Some(v) => Ok(serde_json::to_value(v)?),
            None => Ok(serde_json::to_value(&self.0)?),
        }
    }
}

impl<T> Index<usize> for Graded<T> {
    type Output = T;

    fn index(&self, size: usize) -> &T {
        &self.0[size]
    }
}

impl<'a, T> IntoIterator for &'a Graded<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Elementwise partial order: comparable only when every size agrees on the direction.
impl<T: PartialOrd> PartialOrd for Graded<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        if self.len() != other.len() {
            return None;
        }
        let mut acc = Ordering::Equal;
        for (a, b) in self.0.iter().zip(other.0.iter()) {
            match (acc, a.partial_cmp(b)?) {
                (_, Ordering::Equal) => {}
                (Ordering::Equal, o) => acc = o,
                (a_ord, o) if a_ord == o => {}
                _ => return None,
            }
        }
        Some(acc)
    }
}

/// `12` when all sizes agree, otherwise `10 (12, 14)`.
impl<T: fmt::Display + PartialEq> fmt::Display for Graded<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(v) = self.collapsed() {
            return write!(f, "{v}");
        }
        write!(f, "{}", self.first())?;
        f.write_str(" (")?;
        for (i, v) in self.0[1..].iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{v}")?;
        }
        f.write_str(")")
    }
}

impl<T: serde::Serialize> serde::Serialize for Graded<T> {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.serialize(serializer)
    }
}

impl<'de, T: serde::Deserialize<'de>> serde::Deserialize<'de> for Graded<T> {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let values = Vec::<T>::deserialize(deserializer)?;
        Self::new(values).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/graded.rs"]
mod tests;
