//! Majority vote over per-shape labels

/// Most frequent label in `labels`.
///
/// Ties go to the label encountered first. Returns `None` for an empty slice.
pub fn majority_vote<T: Copy + PartialEq>(labels: &[T]) -> Option<T> {
    // (label, votes) in first-seen order
    let mut tally: Vec<(T, usize)> = Vec::new();
    for &label in labels {
        match tally.iter_mut().find(|(seen, _)| *seen == label) {
            Some((_, votes)) => *votes += 1,
            None => tally.push((label, 1)),
        }
    }

    let mut winner: Option<(T, usize)> = None;
    for (label, votes) in tally {
        if winner.is_none_or(|(_, best)| votes > best) {
            winner = Some((label, votes));
        }
    }
    winner.map(|(label, _)| label)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{Fill, Shape};

    #[test]
    fn test_clear_majority() {
        let fills = [Fill::Striped, Fill::Full, Fill::Striped];
        assert_eq!(majority_vote(&fills), Some(Fill::Striped));
    }

    #[test]
    fn test_tie_goes_to_first_seen() {
        let shapes = [Shape::Squiggle, Shape::Diamond];
        assert_eq!(majority_vote(&shapes), Some(Shape::Squiggle));

        let shapes = [Shape::Oval, Shape::Diamond, Shape::Diamond, Shape::Oval];
        assert_eq!(majority_vote(&shapes), Some(Shape::Oval));
    }

    #[test]
    fn test_empty_has_no_winner() {
        let none: [Fill; 0] = [];
        assert_eq!(majority_vote(&none), None);
    }
}
