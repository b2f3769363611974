//! Viewport — keeping the cursor on screen.
//!
//! The viewport is the `rows × cols` window of the document that starts at
//! the scroll offset. [`reconcile`] runs once per frame, before the frame is
//! composed, and moves the offset just far enough that the cursor falls
//! inside the window:
//!
//! ```text
//!   cursor above the window   →  row_offset = cursor.row
//!   cursor below the window   →  row_offset = cursor.row - rows + 1
//!   (columns work the same way against col_offset and cols)
//! ```
//!
//! This is a minimal-scroll policy: the window never re-centers, it only
//! slides until the cursor sits on its nearest edge.

use kilt_term::terminal::Size;

use crate::position::Position;

/// Slide `scroll` so that `cursor` lies in
/// `[scroll.row, scroll.row + rows) × [scroll.col, scroll.col + cols)`.
///
/// Pure: returns the new offset and leaves an already-valid one unchanged.
/// A zero dimension is treated as one so the window is never empty.
#[must_use]
pub fn reconcile(cursor: Position, size: Size, scroll: Position) -> Position {
    Position {
        row: slide(cursor.row, usize::from(size.rows), scroll.row),
        col: slide(cursor.col, usize::from(size.cols), scroll.col),
    }
}

/// One axis of [`reconcile`].
const fn slide(at: usize, extent: usize, offset: usize) -> usize {
    let extent = if extent == 0 { 1 } else { extent };
    if at < offset {
        at
    } else if at >= offset + extent {
        at + 1 - extent
    } else {
        offset
    }
}

/// Whether `cursor` is inside the window at `scroll`.
#[cfg(test)]
fn is_visible(cursor: Position, size: Size, scroll: Position) -> bool {
    let rows = usize::from(size.rows);
    let cols = usize::from(size.cols);
    (scroll.row..scroll.row + rows).contains(&cursor.row)
        && (scroll.col..scroll.col + cols).contains(&cursor.col)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const SCREEN: Size = Size::new(24, 80);

    #[test]
    fn visible_cursor_keeps_offset() {
        let scroll = Position::new(10, 5);
        let cursor = Position::new(20, 40);
        assert_eq!(reconcile(cursor, SCREEN, scroll), scroll);
    }

    #[test]
    fn cursor_above_scrolls_up_to_it() {
        let scroll = reconcile(Position::new(3, 0), SCREEN, Position::new(10, 0));
        assert_eq!(scroll.row, 3);
    }

    #[test]
    fn cursor_below_scrolls_minimally() {
        let scroll = reconcile(Position::new(24, 0), SCREEN, Position::ZERO);
        assert_eq!(scroll.row, 1);
    }

    #[test]
    fn cursor_on_last_visible_row_does_not_scroll() {
        let scroll = reconcile(Position::new(23, 0), SCREEN, Position::ZERO);
        assert_eq!(scroll.row, 0);
    }

    #[test]
    fn far_jump_down_puts_cursor_on_bottom_row() {
        let scroll = reconcile(Position::new(500, 0), SCREEN, Position::ZERO);
        assert_eq!(scroll.row, 477);
    }

    #[test]
    fn cursor_left_scrolls_left_to_it() {
        let scroll = reconcile(Position::new(0, 2), SCREEN, Position::new(0, 30));
        assert_eq!(scroll.col, 2);
    }

    #[test]
    fn cursor_right_scrolls_minimally() {
        let scroll = reconcile(Position::new(0, 80), SCREEN, Position::ZERO);
        assert_eq!(scroll.col, 1);
    }

    #[test]
    fn both_axes_at_once() {
        let scroll = reconcile(Position::new(100, 200), SCREEN, Position::ZERO);
        assert_eq!(scroll, Position::new(77, 121));
    }

    #[test]
    fn zero_size_behaves_as_one() {
        let scroll = reconcile(Position::new(5, 7), Size::new(0, 0), Position::ZERO);
        assert_eq!(scroll, Position::new(5, 7));
    }

    #[test]
    fn is_visible_edges() {
        let scroll = Position::new(10, 10);
        assert!(is_visible(Position::new(10, 10), SCREEN, scroll));
        assert!(is_visible(Position::new(33, 89), SCREEN, scroll));
        assert!(!is_visible(Position::new(34, 10), SCREEN, scroll));
        assert!(!is_visible(Position::new(10, 90), SCREEN, scroll));
        assert!(!is_visible(Position::new(9, 10), SCREEN, scroll));
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn cursor_always_visible_after_reconcile(
                row in 0..100_000usize,
                col in 0..10_000usize,
                row_offset in 0..100_000usize,
                col_offset in 0..10_000usize,
                rows in 1..300u16,
                cols in 1..500u16,
            ) {
                let size = Size::new(rows, cols);
                let cursor = Position::new(row, col);
                let scroll = reconcile(cursor, size, Position::new(row_offset, col_offset));

                prop_assert!(scroll.row <= cursor.row);
                prop_assert!(cursor.row < scroll.row + usize::from(rows));
                prop_assert!(scroll.col <= cursor.col);
                prop_assert!(cursor.col < scroll.col + usize::from(cols));
                prop_assert!(is_visible(cursor, size, scroll));
            }

            #[test]
            fn reconcile_is_idempotent(
                row in 0..10_000usize,
                col in 0..10_000usize,
                row_offset in 0..10_000usize,
                col_offset in 0..10_000usize,
                rows in 1..300u16,
                cols in 1..500u16,
            ) {
                let size = Size::new(rows, cols);
                let cursor = Position::new(row, col);
                let once = reconcile(cursor, size, Position::new(row_offset, col_offset));
                prop_assert_eq!(reconcile(cursor, size, once), once);
            }

            #[test]
            fn already_visible_never_moves(
                row_offset in 0..10_000usize,
                col_offset in 0..10_000usize,
                dy in 0..300usize,
                dx in 0..500usize,
                rows in 1..300u16,
                cols in 1..500u16,
            ) {
                let size = Size::new(rows, cols);
                let scroll = Position::new(row_offset, col_offset);
                let cursor = Position::new(
                    row_offset + dy % usize::from(rows),
                    col_offset + dx % usize::from(cols),
                );
                prop_assert_eq!(reconcile(cursor, size, scroll), scroll);
            }
        }
    }
}
