use crate::PieceKind;

/// The score of a warehouse holding `goods`.
///
/// The first good of each kind is worth 1 point and every further good of
/// that kind 2 points, so a full warehouse scores between 4 (all different)
/// and 7 (all the same). The order of the goods does not matter.
///
/// ```
/// # use dockjump::{score, PieceKind::*};
/// assert_eq!(score(&[Cheese, Cheese, Egg, Egg]), 6);
/// ```
pub fn score(goods: &[PieceKind]) -> u32 {
    let mut counts = [0u32; 4];
    for &kind in goods {
        counts[kind as usize] += 1;
    }
    counts
        .into_iter()
        .filter(|&n| n > 0)
        .map(|n| 1 + 2 * (n - 1))
        .sum()
}
