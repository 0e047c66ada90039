use rand::Rng;

use crate::args::PositiveU64;

/// Proportional random choice over a non-empty, ordered list of weighted
/// items. `P(item) = weight / total`.
#[derive(Debug, Clone)]
pub struct WeightedSelector<T> {
    head: Vec<(T, u64)>,
    last: (T, u64),
    total: u64,
}

impl<T> WeightedSelector<T> {
    /// Builds a selector. Returns `None` for an empty list or when the
    /// weights overflow `u64`.
    pub fn new<I>(items: I) -> Option<Self>
    where
        I: IntoIterator<Item = (T, PositiveU64)>,
    {
        let mut head: Vec<(T, u64)> = items
            .into_iter()
            .map(|(item, weight)| (item, weight.get()))
            .collect();
        let total = head
            .iter()
            .try_fold(0u64, |sum, (_, weight)| sum.checked_add(*weight))?;
        let last = head.pop()?;
        Some(Self { head, last, total })
    }

    #[must_use]
    pub const fn total_weight(&self) -> u64 {
        self.total
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.head.len().saturating_add(1)
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        false
    }

    pub fn iter(&self) -> impl Iterator<Item = (&T, u64)> {
        self.head
            .iter()
            .chain(std::iter::once(&self.last))
            .map(|(item, weight)| (item, *weight))
    }

    /// Draws uniformly in `[0, total)` and walks the list subtracting
    /// weights until the draw falls inside an item.
    pub fn pick<R>(&self, rng: &mut R) -> &T
    where
        R: Rng + ?Sized,
    {
        let draw = rng.gen_range(0..self.total);
        self.pick_at(draw)
    }

    /// Deterministic half of [`pick`](Self::pick). Draws at or past the
    /// total land on the last item.
    #[must_use]
    pub fn pick_at(&self, draw: u64) -> &T {
        let mut remaining = draw;
        for (item, weight) in &self.head {
            if remaining < *weight {
                return item;
            }
            remaining = remaining.saturating_sub(*weight);
        }
        &self.last.0
    }
}
