//! Per-year competition ranking.

use std::collections::BTreeMap;

/// Competition ("min") ranking, higher score first.
///
/// Tied scores share the lowest rank of their group and the next distinct
/// score skips ahead, so `[8, 6, 6, 3]` ranks as `[1, 2, 2, 4]`.
/// Missing or NaN scores get no rank and do not count towards others.
pub fn competition_rank(scores: &[Option<f64>]) -> Vec<Option<u32>> {
    let mut indexed: Vec<(usize, f64)> = scores
        .iter()
        .enumerate()
        .filter_map(|(i, s)| s.filter(|v| !v.is_nan()).map(|v| (i, v)))
        .collect();

    indexed.sort_by(|a, b| b.1.total_cmp(&a.1));

    let mut ranks = vec![None; scores.len()];
    let mut current_rank = 0u32;
    let mut previous: Option<f64> = None;
    for (position, (idx, score)) in indexed.iter().enumerate() {
        if previous != Some(*score) {
            current_rank = position as u32 + 1;
            previous = Some(*score);
        }
        ranks[*idx] = Some(current_rank);
    }
    ranks
}

/// Rank every row within its own year. `rows` yields (year, score) and the
/// result is aligned with it.
pub fn rank_by_year<I>(rows: I) -> Vec<Option<u32>>
where
    I: IntoIterator<Item = (i32, Option<f64>)>,
{
    let rows: Vec<(i32, Option<f64>)> = rows.into_iter().collect();

    let mut by_year: BTreeMap<i32, Vec<usize>> = BTreeMap::new();
    for (i, (year, _)) in rows.iter().enumerate() {
        by_year.entry(*year).or_default().push(i);
    }

    let mut ranks = vec![None; rows.len()];
    for indices in by_year.values() {
        let scores: Vec<Option<f64>> = indices.iter().map(|&i| rows[i].1).collect();
        for (&i, rank) in indices.iter().zip(competition_rank(&scores)) {
            ranks[i] = rank;
        }
    }
    ranks
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn ties_share_the_minimum_rank() {
        let scores = [Some(8.0), Some(6.0), Some(6.0), Some(3.0)];
        assert_eq!(
            competition_rank(&scores),
            vec![Some(1), Some(2), Some(2), Some(4)]
        );
    }

    #[test]
    fn input_order_does_not_matter() {
        let scores = [Some(3.0), Some(6.0), Some(8.0), Some(6.0)];
        assert_eq!(
            competition_rank(&scores),
            vec![Some(4), Some(2), Some(1), Some(2)]
        );
    }

    #[test]
    fn missing_scores_are_unranked() {
        let scores = [Some(5.0), None, Some(f64::NAN), Some(7.0)];
        assert_eq!(competition_rank(&scores), vec![Some(2), None, None, Some(1)]);
    }

    #[test]
    fn years_are_ranked_independently() {
        let rows = vec![
            (2020, Some(7.0)),
            (2021, Some(1.0)),
            (2020, Some(9.0)),
            (2021, Some(2.0)),
            (2021, Some(2.0)),
        ];
        assert_eq!(
            rank_by_year(rows),
            vec![Some(2), Some(3), Some(1), Some(1), Some(1)]
        );
    }

    #[test]
    fn empty_input() {
        assert!(competition_rank(&[]).is_empty());
        assert!(rank_by_year(Vec::new()).is_empty());
    }
}
