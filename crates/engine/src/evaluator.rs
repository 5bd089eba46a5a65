//! Board evaluator - static heuristic over a settled grid
//!
//! Ranks candidate placements only; it has nothing to do with the live score.
//!
//! | Feature | Weight |
//! |---------|--------|
//! | max column height | -10 |
//! | lines cleared | +40 |
//! | weighted holes | -20 |
//! | bumpiness | -3 |
//! | wells (depth squared) | -15 |
//! | four-line clear | +200 flat |

use tetris_ai_core::Grid;
use tetris_ai_types::EMPTY;

/// Heuristic weights
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EvaluatorWeights {
    pub height: i32,
    pub lines: i32,
    pub holes: i32,
    pub bumpiness: i32,
    pub wells: i32,
    pub tetris_bonus: i32,
}

impl Default for EvaluatorWeights {
    fn default() -> Self {
        Self {
            height: -10,
            lines: 40,
            holes: -20,
            bumpiness: -3,
            wells: -15,
            tetris_bonus: 200,
        }
    }
}

/// Raw feature values behind a score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BoardFeatures {
    pub height: i32,
    pub holes: i32,
    pub bumpiness: i32,
    pub wells: i32,
}

impl BoardFeatures {
    pub fn measure(grid: &Grid) -> Self {
        let heights = column_heights(grid);
        Self {
            height: heights.iter().copied().max().unwrap_or(0),
            holes: count_holes(grid),
            bumpiness: heights.windows(2).map(|w| (w[0] - w[1]).abs()).sum(),
            wells: count_wells(grid),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Evaluator {
    weights: EvaluatorWeights,
}

impl Evaluator {
    pub fn new(weights: EvaluatorWeights) -> Self {
        Self { weights }
    }

    pub fn weights(&self) -> &EvaluatorWeights {
        &self.weights
    }

    /// Score `grid` (already cleared) given how many rows the placement filled
    pub fn evaluate(&self, grid: &Grid, lines_cleared: usize) -> i32 {
        let f = BoardFeatures::measure(grid);
        let w = &self.weights;
        let lines = lines_cleared as i32;
        let bonus = if lines_cleared == 4 { w.tetris_bonus } else { 0 };

        w.height * f.height
            + w.lines * lines
            + w.holes * f.holes
            + w.bumpiness * f.bumpiness
            + w.wells * f.wells
            + bonus
    }
}

/// Score with the default weights
pub fn evaluate(grid: &Grid, lines_cleared: usize) -> i32 {
    Evaluator::default().evaluate(grid, lines_cleared)
}

/// Distance from each column's topmost filled cell to the floor (0 when empty)
pub fn column_heights(grid: &Grid) -> Vec<i32> {
    let h = i32::from(grid.height());
    (0..i32::from(grid.width()))
        .map(|x| {
            (0..h)
                .find(|&y| grid.is_occupied(x, y))
                .map_or(0, |top| h - top)
        })
        .collect()
}

/// Every empty cell under a filled one costs the number of filled cells above it
fn count_holes(grid: &Grid) -> i32 {
    let mut holes = 0;
    for x in 0..i32::from(grid.width()) {
        let mut above = 0;
        for y in 0..i32::from(grid.height()) {
            if grid.is_occupied(x, y) {
                above += 1;
            } else {
                // zero until the first filled cell
                holes += above;
            }
        }
    }
    holes
}

/// Vertical runs of empty cells walled left and right (edges count as walls),
/// each adding its depth squared
fn count_wells(grid: &Grid) -> i32 {
    let width = i32::from(grid.width());
    let height = i32::from(grid.height());
    let walled = |x: i32, y: i32| {
        let left = x == 0 || grid.is_occupied(x - 1, y);
        let right = x == width - 1 || grid.is_occupied(x + 1, y);
        left && right
    };

    let mut wells = 0;
    for x in 0..width {
        let mut y = 0;
        while y < height {
            if grid.get(x, y) == Some(EMPTY) && walled(x, y) {
                let mut depth = 0;
                while y + depth < height
                    && grid.get(x, y + depth) == Some(EMPTY)
                    && walled(x, y + depth)
                {
                    depth += 1;
                }
                wells += depth * depth;
                y += depth;
            } else {
                y += 1;
            }
        }
    }
    wells
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(rows: &[&str]) -> Grid {
        let rows: Vec<Vec<u8>> = rows
            .iter()
            .map(|r| r.bytes().map(|b| u8::from(b == b'#')).collect())
            .collect();
        Grid::from_rows(&rows).unwrap()
    }

    #[test]
    fn empty_board_has_no_features() {
        let g = Grid::new(10, 20);
        assert_eq!(BoardFeatures::measure(&g), BoardFeatures::default());
        assert_eq!(evaluate(&g, 0), 0);
    }

    #[test]
    fn holes_are_weighted_by_material_above() {
        let g = grid(&["#...", "#...", "....", "...."]);
        // two empty cells under a two-high cap
        assert_eq!(count_holes(&g), 4);
    }

    #[test]
    fn bumpiness_sums_neighbour_steps() {
        let g = grid(&["....", "#...", "#.#.", "#.##"]);
        assert_eq!(column_heights(&g), vec![3, 0, 2, 1]);
        assert_eq!(BoardFeatures::measure(&g).bumpiness, 3 + 2 + 1);
    }

    #[test]
    fn wells_count_depth_squared_once() {
        let g = grid(&["....", "#.##", "#.##", "#.##"]);
        // column 1 is walled for three rows, column 0's empty top cell is not
        assert_eq!(count_wells(&g), 9);
    }

    #[test]
    fn edge_counts_as_wall() {
        let g = grid(&["....", ".###", ".###", "####"]);
        assert_eq!(count_wells(&g), 4);
    }

    #[test]
    fn four_lines_earn_the_bonus() {
        let g = Grid::new(10, 20);
        assert_eq!(evaluate(&g, 3), 120);
        assert_eq!(evaluate(&g, 4), 160 + 200);
    }

    #[test]
    fn more_lines_score_higher() {
        let g = grid(&["....", "....", "#...", "##.#"]);
        let base = evaluate(&g, 0);
        assert_eq!(evaluate(&g, 1), base + 40);
        assert_eq!(evaluate(&g, 2), base + 80);
    }
}
