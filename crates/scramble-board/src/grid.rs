//! Card grid storage and rendering.

use crate::cell::Card;
use crate::error::BoardSetupError;
use scramble_types::{PlayerId, Position};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::ops::{Index, IndexMut};

/// `rows × cols` grid of [`Card`] cells in row-major order.
///
/// The grid owns cell state only; turn state, waiting and notification
/// live in their own components. Dimensions are fixed at construction.
///
/// Indexing by [`Position`] panics when out of range, like slice
/// indexing; callers validate with [`contains`](Self::contains) at the
/// operation boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Grid {
    rows: usize,
    cols: usize,
    cells: Vec<Card>,
}

impl Grid {
    /// Builds a grid with every cell `Present`, face down, uncontrolled.
    ///
    /// # Errors
    ///
    /// - [`BoardSetupError::BadDimensions`] if `rows` or `cols` is zero
    /// - [`BoardSetupError::ValueCount`] if `values` does not have
    ///   exactly `rows * cols` entries
    /// - [`BoardSetupError::InvalidValue`] if a value is empty or
    ///   contains whitespace
    ///
    /// # Example
    ///
    /// ```
    /// use scramble_board::Grid;
    ///
    /// let grid = Grid::from_values(2, 2, ["A", "B", "B", "A"]).unwrap();
    /// assert_eq!(grid.rows(), 2);
    /// assert_eq!(grid.cols(), 2);
    /// ```
    pub fn from_values<I, S>(rows: usize, cols: usize, values: I) -> Result<Self, BoardSetupError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if rows == 0 || cols == 0 {
            return Err(BoardSetupError::BadDimensions { rows, cols });
        }
        let expected = rows * cols;

        let values: Vec<String> = values.into_iter().map(Into::into).collect();
        if values.len() != expected {
            return Err(BoardSetupError::ValueCount {
                expected,
                actual: values.len(),
            });
        }
        for (index, value) in values.iter().enumerate() {
            if value.is_empty() || value.contains(char::is_whitespace) {
                return Err(BoardSetupError::InvalidValue {
                    index,
                    value: value.clone(),
                });
            }
        }

        Ok(Self {
            rows,
            cols,
            cells: values.into_iter().map(Card::face_down).collect(),
        })
    }

    /// Number of rows.
    #[must_use]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    #[must_use]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Returns `true` if `pos` is inside the grid.
    #[must_use]
    pub fn contains(&self, pos: Position) -> bool {
        pos.row < self.rows && pos.col < self.cols
    }

    /// Iterates all positions in row-major order.
    pub fn positions(&self) -> impl Iterator<Item = Position> {
        let cols = self.cols;
        (0..self.rows).flat_map(move |row| (0..cols).map(move |col| Position::new(row, col)))
    }

    /// Renders the board as seen by `viewer`.
    ///
    /// The output is the wire snapshot: `"<rows>x<cols>\n"` followed by
    /// one line per cell in row-major order, each terminated by `\n`:
    ///
    /// - `none` - removed cell
    /// - `down` - face-down card
    /// - `up V` - face-up card not controlled by `viewer`
    /// - `my V` - face-up card controlled by `viewer`
    #[must_use]
    pub fn render(&self, viewer: &PlayerId) -> String {
        let mut out = format!("{}x{}\n", self.rows, self.cols);
        for card in &self.cells {
            match card {
                Card::Removed => out.push_str("none\n"),
                Card::Present { face_up: false, .. } => out.push_str("down\n"),
                Card::Present {
                    value, controller, ..
                } => {
                    if controller.as_ref() == Some(viewer) {
                        out.push_str("my ");
                    } else {
                        out.push_str("up ");
                    }
                    out.push_str(value);
                    out.push('\n');
                }
            }
        }
        out
    }

    /// Groups the positions of present cells by card value, in row-major
    /// order of first appearance.
    ///
    /// This is the snapshot a `map` transform iterates over.
    #[must_use]
    pub fn value_groups(&self) -> Vec<(String, Vec<Position>)> {
        let mut groups: Vec<(String, Vec<Position>)> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();
        for pos in self.positions() {
            if let Card::Present { value, .. } = &self[pos] {
                let slot = *index.entry(value.clone()).or_insert_with(|| {
                    groups.push((value.clone(), Vec::new()));
                    groups.len() - 1
                });
                groups[slot].1.push(pos);
            }
        }
        groups
    }

    fn offset(&self, pos: Position) -> usize {
        assert!(
            self.contains(pos),
            "position {} out of range for {}x{} grid",
            pos,
            self.rows,
            self.cols
        );
        pos.row * self.cols + pos.col
    }
}

impl Index<Position> for Grid {
    type Output = Card;

    fn index(&self, pos: Position) -> &Card {
        &self.cells[self.offset(pos)]
    }
}

impl IndexMut<Position> for Grid {
    fn index_mut(&mut self, pos: Position) -> &mut Card {
        let offset = self.offset(pos);
        &mut self.cells[offset]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn abba() -> Grid {
        Grid::from_values(2, 2, ["A", "B", "B", "A"]).unwrap()
    }

    #[test]
    fn rejects_zero_dimensions() {
        let err = Grid::from_values(0, 3, Vec::<String>::new()).unwrap_err();
        assert!(matches!(err, BoardSetupError::BadDimensions { .. }));
    }

    #[test]
    fn rejects_wrong_value_count() {
        let err = Grid::from_values(2, 2, ["A", "B"]).unwrap_err();
        assert_eq!(
            err,
            BoardSetupError::ValueCount {
                expected: 4,
                actual: 2
            }
        );
    }

    #[test]
    fn rejects_empty_and_whitespace_values() {
        let err = Grid::from_values(1, 2, ["A", ""]).unwrap_err();
        assert!(matches!(err, BoardSetupError::InvalidValue { index: 1, .. }));

        let err = Grid::from_values(1, 2, ["A", "B C"]).unwrap_err();
        assert!(matches!(err, BoardSetupError::InvalidValue { index: 1, .. }));
    }

    #[test]
    fn indexing_is_row_major() {
        let grid = abba();
        assert_eq!(grid[Position::new(0, 1)].value(), Some("B"));
        assert_eq!(grid[Position::new(1, 0)].value(), Some("B"));
        assert_eq!(grid[Position::new(1, 1)].value(), Some("A"));
    }

    #[test]
    fn contains_bounds() {
        let grid = abba();
        assert!(grid.contains(Position::new(1, 1)));
        assert!(!grid.contains(Position::new(2, 0)));
        assert!(!grid.contains(Position::new(0, 2)));
    }

    #[test]
    fn render_all_spot_kinds() {
        let alice = PlayerId::new("alice");
        let bob = PlayerId::new("bob");
        let mut grid = abba();

        grid[Position::new(0, 0)] = Card::Removed;
        grid[Position::new(0, 1)] = Card::Present {
            value: "B".to_string(),
            face_up: true,
            controller: None,
        };
        grid[Position::new(1, 0)] = Card::Present {
            value: "B".to_string(),
            face_up: true,
            controller: Some(alice.clone()),
        };

        assert_eq!(grid.render(&alice), "2x2\nnone\nup B\nmy B\ndown\n");
        // Another viewer sees alice's card as plain face-up.
        assert_eq!(grid.render(&bob), "2x2\nnone\nup B\nup B\ndown\n");
    }

    #[test]
    fn value_groups_row_major_first_appearance() {
        let grid = abba();
        let groups = grid.value_groups();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].0, "A");
        assert_eq!(
            groups[0].1,
            vec![Position::new(0, 0), Position::new(1, 1)]
        );
        assert_eq!(groups[1].0, "B");
        assert_eq!(
            groups[1].1,
            vec![Position::new(0, 1), Position::new(1, 0)]
        );
    }

    #[test]
    fn value_groups_skip_removed() {
        let mut grid = abba();
        grid[Position::new(0, 0)] = Card::Removed;
        grid[Position::new(1, 1)] = Card::Removed;

        let groups = grid.value_groups();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].0, "B");
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn indexing_out_of_range_panics() {
        let grid = abba();
        let _ = &grid[Position::new(5, 5)];
    }
}
