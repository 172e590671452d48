//! Popularity ranking.
//!
//! Pure sort helpers over anything that exposes a popularity score. Sorting
//! is stable, so ties keep their original (discovery) order and the result
//! is deterministic for identical inputs.

use crate::settings::SortOrder;
use crate::types::{Release, Track};

/// Anything with a numeric popularity score in `[0, 100]`.
pub trait Scored {
    fn score(&self) -> u8;
}

impl Scored for Release {
    fn score(&self) -> u8 {
        self.popularity
    }
}

impl Scored for Track {
    fn score(&self) -> u8 {
        self.popularity
    }
}

impl<S: Scored> Scored for &S {
    fn score(&self) -> u8 {
        (*self).score()
    }
}

/// Return a new sequence ordered by score under the requested direction.
///
/// The output is a permutation of the input; ties preserve input order
/// (stable sort by original position).
pub fn rank<T: Scored + Clone>(items: &[T], order: SortOrder) -> Vec<T> {
    let mut ranked = items.to_vec();
    rank_in_place(&mut ranked, order);
    ranked
}

/// In-place variant of [`rank`].
pub fn rank_in_place<T: Scored>(items: &mut [T], order: SortOrder) {
    match order {
        SortOrder::Ascending => items.sort_by_key(|item| item.score()),
        SortOrder::Descending => items.sort_by_key(|item| std::cmp::Reverse(item.score())),
    }
}
