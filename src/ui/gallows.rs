/// Number of body parts in the hanged-man figure
pub const FIGURE_PARTS: usize = 6;

const SCAFFOLD: [&str; 7] = [
    "  +---+  ",
    "  |   |  ",
    "      |  ",
    "      |  ",
    "      |  ",
    "      |  ",
    "=========",
];

// (row, column, glyph) in drawing order: head, body, arms, legs
const PARTS: [(usize, usize, char); FIGURE_PARTS] = [
    (2, 2, 'O'),
    (3, 2, '|'),
    (3, 1, '/'),
    (3, 3, '\\'),
    (4, 1, '/'),
    (4, 3, '\\'),
];

/// How many parts to draw for a miss count. The last part only appears on
/// the losing miss, whatever the budget.
pub fn parts_visible(miss_count: usize, max_misses: usize) -> usize {
    if miss_count == 0 || max_misses == 0 {
        return 0;
    }
    if miss_count >= max_misses {
        return FIGURE_PARTS;
    }
    1 + (miss_count - 1) * (FIGURE_PARTS - 1) / (max_misses - 1)
}

pub fn figure_lines(parts: usize) -> Vec<String> {
    let mut grid: Vec<Vec<char>> = SCAFFOLD.iter().map(|l| l.chars().collect()).collect();
    for &(row, col, glyph) in PARTS.iter().take(parts) {
        grid[row][col] = glyph;
    }
    grid.into_iter().map(|row| row.into_iter().collect()).collect()
}

pub fn height() -> u16 {
    SCAFFOLD.len() as u16
}
