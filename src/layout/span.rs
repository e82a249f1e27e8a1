/// A run of siblings `[start, end)` packed into one strip, with their combined weight.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Span {
    pub end: usize,
    pub sum: f64,
}

/// Squareness score of a strip of length `space` holding `sum` weight,
/// whose largest item is `max` and smallest is `min`. Lower is squarer.
///
/// The first term is the aspect ratio of the widest rectangle, the second
/// that of the narrowest one (from Bruls, Huizing & van Wijk 2000).
pub fn score(min: f64, max: f64, sum: f64, space: f64) -> f64 {
    let space_sq = space * space;
    let sum_sq = sum * sum;
    let from_max = (max * space_sq) / sum_sq;
    let from_min = sum_sq / (min * space_sq);
    from_max.max(from_min)
}

/// Pick how many weights starting at `start` go into a strip of length `space`.
///
/// Items are added one at a time while the worst aspect ratio keeps
/// improving; the first item that makes it strictly worse ends the span and
/// is left for the next strip. The span always holds at least `weights[start]`.
///
/// `weights` must be sorted descending, `space` strictly positive and
/// `start < weights.len()`.
pub fn select_span(weights: &[f64], space: f64, start: usize) -> Span {
    debug_assert!(start < weights.len(), "span start {start} past {} weights", weights.len());

    let mut min = weights[start];
    let mut max = min;
    let mut sum = 0.0;
    let mut best: Option<f64> = None;
    let mut end = start;

    while end < weights.len() {
        let weight = weights[end];
        min = min.min(weight);
        max = max.max(weight);

        let next_sum = sum + weight;
        let candidate = score(min, max, next_sum, space);
        if best.is_some_and(|best| candidate > best) {
            break;
        }

        best = Some(candidate);
        sum = next_sum;
        end += 1;
    }

    Span { end, sum }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn third_item_rejected_when_score_worsens() {
        let two = score(9.0, 10.0, 19.0, 10.0);
        let three = score(1.0, 10.0, 20.0, 10.0);
        assert!((two - 1000.0 / 361.0).abs() < 1e-12);
        assert!((three - 4.0).abs() < 1e-12);
        assert!(three > two);

        let span = select_span(&[10.0, 9.0, 1.0], 10.0, 0);
        assert_eq!(span, Span { end: 2, sum: 19.0 });
    }

    #[test]
    fn single_item_is_always_taken() {
        let span = select_span(&[42.0], 0.5, 0);
        assert_eq!(span, Span { end: 1, sum: 42.0 });
    }

    #[test]
    fn starts_mid_sequence() {
        // From index 1 the [14, 1] pair still improves on [14] alone in a wide strip.
        let span = select_span(&[85.0, 14.0, 1.0], 10.0, 1);
        assert_eq!(span, Span { end: 3, sum: 15.0 });
    }

    #[test]
    fn zero_weight_forces_short_span() {
        let span = select_span(&[5.0, 0.0, 0.0], 3.0, 0);
        assert_eq!(span, Span { end: 1, sum: 5.0 });
    }

    #[test]
    fn equal_weights_fill_a_long_strip() {
        // Four unit squares fit a strip of length 2 exactly two at a time.
        let weights = [1.0; 4];
        let first = select_span(&weights, 2.0, 0);
        assert_eq!(first, Span { end: 2, sum: 2.0 });
        let second = select_span(&weights, 2.0, first.end);
        assert_eq!(second, Span { end: 4, sum: 2.0 });
    }
}
