//! Two fixed board layouts chosen by terminal width.

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Viewport {
    /// One terminal column per cell.
    Narrow,
    /// Two terminal columns per cell.
    Wide,
}

impl Viewport {
    /// Picks the narrow layout when the terminal is below `narrow_below`
    /// columns or too small to fit the wide board.
    pub fn for_terminal(width: u16, narrow_below: u16, cols: usize) -> Self {
        if width < narrow_below || width < Viewport::Wide.board_size(cols, 0).0 {
            Viewport::Narrow
        } else {
            Viewport::Wide
        }
    }

    pub fn cell_width(&self) -> u16 {
        match self {
            Viewport::Narrow => 1,
            Viewport::Wide => 2,
        }
    }

    pub fn block_symbol(&self) -> &'static str {
        match self {
            Viewport::Narrow => "█",
            Viewport::Wide => "██",
        }
    }

    pub fn empty_symbol(&self) -> &'static str {
        match self {
            Viewport::Narrow => " ",
            Viewport::Wide => "  ",
        }
    }

    /// Board size in terminal cells, borders included. Saturates at
    /// `u16::MAX` for grids too large to draw.
    pub fn board_size(&self, cols: usize, rows: usize) -> (u16, u16) {
        let cols = u16::try_from(cols).unwrap_or(u16::MAX);
        let rows = u16::try_from(rows).unwrap_or(u16::MAX);
        (
            cols.saturating_mul(self.cell_width()).saturating_add(2),
            rows.saturating_add(2),
        )
    }
}
