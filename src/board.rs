//! Rectangular board of colored, optionally owned cells.

use std::fmt;

use crate::coord::Coord;
use crate::game::GameError;

/// Index into the color palette.
pub type ColorIndex = usize;

/// Index of a player in turn order.
pub type PlayerIndex = usize;

/// A single board cell: a color and, once captured, its owner.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ColorCell {
    color: ColorIndex,
    owner: Option<PlayerIndex>,
}

impl ColorCell {
    pub fn new(color: ColorIndex) -> Self {
        Self { color, owner: None }
    }

    pub fn color(&self) -> ColorIndex {
        self.color
    }

    pub fn owner(&self) -> Option<PlayerIndex> {
        self.owner
    }

    pub fn is_owned(&self) -> bool {
        self.owner.is_some()
    }

    /// Repaint the cell and assign it to `owner`.
    pub(crate) fn claim(&mut self, color: ColorIndex, owner: PlayerIndex) {
        self.color = color;
        self.owner = Some(owner);
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Board {
    height: usize,
    width: usize,
    cells: Vec<ColorCell>,
}

impl Board {
    /// Fill a `height x width` board with independent uniform draws from
    /// `[0, colors_count)`.
    pub fn random(
        height: usize,
        width: usize,
        colors_count: usize,
        rng: &mut fastrand::Rng,
    ) -> Self {
        let cells = (0..height * width)
            .map(|_| ColorCell::new(rng.usize(..colors_count)))
            .collect();
        Self {
            height,
            width,
            cells,
        }
    }

    /// Build a board from explicit color rows. All rows must be non-empty and
    /// of equal length.
    pub fn from_rows<R: AsRef<[ColorIndex]>>(rows: &[R]) -> Result<Self, GameError> {
        let height = rows.len();
        let width = rows.first().map(|r| r.as_ref().len()).unwrap_or(0);
        if height == 0 || width == 0 || rows.iter().any(|r| r.as_ref().len() != width) {
            return Err(GameError::InvalidBoardSize { height, width });
        }
        let cells = rows
            .iter()
            .flat_map(|r| r.as_ref().iter().copied().map(ColorCell::new))
            .collect();
        Ok(Self {
            height,
            width,
            cells,
        })
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn width(&self) -> usize {
        self.width
    }

    /// Total number of cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn is_valid(&self, c: Coord) -> bool {
        c.row >= 0 && (c.row as usize) < self.height && c.col >= 0 && (c.col as usize) < self.width
    }

    fn idx(&self, c: Coord) -> usize {
        c.row as usize * self.width + c.col as usize
    }

    /// The cell at `c`, or `None` when `c` is off the board.
    pub fn get(&self, c: Coord) -> Option<&ColorCell> {
        if !self.is_valid(c) {
            return None;
        }
        Some(&self.cells[self.idx(c)])
    }

    /// The cell at `c`.
    ///
    /// # Panics
    ///
    /// Panics if `c` is outside the board. Callers check with [`Board::is_valid`].
    pub fn cell(&self, c: Coord) -> &ColorCell {
        assert!(self.is_valid(c), "coordinate {c} outside {}x{} board", self.height, self.width);
        &self.cells[self.idx(c)]
    }

    pub(crate) fn cell_mut(&mut self, c: Coord) -> &mut ColorCell {
        assert!(self.is_valid(c), "coordinate {c} outside {}x{} board", self.height, self.width);
        let i = self.idx(c);
        &mut self.cells[i]
    }

    /// All coordinates in row-major order.
    pub fn coords(&self) -> impl Iterator<Item = Coord> + '_ {
        (0..self.height as i32).flat_map(move |r| (0..self.width as i32).map(move |c| Coord::new(r, c)))
    }

    /// One character per cell (the color index in base 36), one line per row.
    pub fn ascii(&self) -> String {
        let mut s = String::with_capacity(self.cells.len() + self.height);
        for row in self.cells.chunks(self.width) {
            for cell in row {
                s.push(std::char::from_digit(cell.color as u32, 36).unwrap_or('?'));
            }
            s.push('\n');
        }
        s
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.ascii())
    }
}
