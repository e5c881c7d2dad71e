//! Colour-index ordering for the active contacts.
//!
//! Colours are spread evenly across the palette every time a contact joins
//! or leaves, and the newest contact always receives palette index 0.

/// `n` evenly spaced integer positions across `[0, palette_len - 1]`,
/// endpoints included, truncated toward zero.
pub fn spaced_indices(n: usize, palette_len: usize) -> Vec<usize> {
    let last = palette_len.saturating_sub(1);
    match n {
        0 => Vec::new(),
        1 => vec![0],
        _ => (0..n).map(|i| i * last / (n - 1)).collect(),
    }
}

/// Palette indices for `n` contacts, ordered **newest contact first**.
///
/// The evenly spaced samples lose their first entry, gain a trailing `0`, and
/// are reversed, so element 0 of the result is always palette index 0.
pub fn color_order(n: usize, palette_len: usize) -> Vec<usize> {
    let mut order = spaced_indices(n, palette_len);
    if order.is_empty() {
        return order;
    }
    order.remove(0);
    order.push(0);
    order.reverse();
    order
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn spaced_endpoints() {
        assert_eq!(spaced_indices(2, 256), vec![0, 255]);
        assert_eq!(spaced_indices(3, 256), vec![0, 127, 255]);
        assert_eq!(spaced_indices(5, 256), vec![0, 63, 127, 191, 255]);
    }

    #[test]
    fn single_contact_gets_zero() {
        assert_eq!(color_order(1, 256), vec![0]);
    }

    #[test]
    fn three_contacts() {
        // samples [0, 127, 255] → [127, 255] → [127, 255, 0] → reversed
        assert_eq!(color_order(3, 256), vec![0, 255, 127]);
    }

    #[test]
    fn none_for_empty() {
        assert!(color_order(0, 256).is_empty());
    }

    proptest! {
        #[test]
        fn newest_always_zero(n in 1usize..64, palette_len in 1usize..512) {
            let order = color_order(n, palette_len);
            prop_assert_eq!(order.len(), n);
            prop_assert_eq!(order[0], 0);
            prop_assert!(order.iter().all(|&i| i < palette_len));
        }

        #[test]
        fn spaced_is_non_decreasing(n in 0usize..64, palette_len in 1usize..512) {
            let s = spaced_indices(n, palette_len);
            prop_assert!(s.windows(2).all(|w| w[0] <= w[1]));
        }
    }
}
