/// Rendering layer — all terminal output lives here.
///
/// The game draws on a fixed 800×400 logical canvas.  `TerminalCanvas`
/// scales that onto the terminal's cell grid, composes the frame into a cell
/// buffer and writes the whole buffer out on `present`, so nothing flickers
/// between the background and the sprites on top of it.

use std::io::{self, Write};

use crossterm::{
    cursor,
    style::{self, Color, Print},
    QueueableCommand,
};

use jump_mania::assets::{Sprite, SpriteSheet};
use jump_mania::canvas::Canvas;
use jump_mania::entities::{Rect, Rgb, SpriteKey, SCREEN_HEIGHT, SCREEN_WIDTH};

// ── Colour palette ────────────────────────────────────────────────────────────

/// Shown wherever nothing has been drawn yet this frame.
const C_BLANK: Rgb = Rgb(0, 0, 0);
const C_DEFAULT_FG: Rgb = Rgb(255, 255, 255);

fn to_color(rgb: Rgb) -> Color {
    Color::Rgb { r: rgb.0, g: rgb.1, b: rgb.2 }
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct Cell {
    ch: char,
    fg: Rgb,
    bg: Rgb,
}

impl Cell {
    fn blank() -> Self {
        Cell { ch: ' ', fg: C_DEFAULT_FG, bg: C_BLANK }
    }
}

/// Cell-space rectangle, already clipped to the grid.
#[derive(Clone, Copy, Debug, PartialEq)]
struct CellRect {
    left: i32,
    top: i32,
    right: i32,
    bottom: i32,
}

/// The frame being composed, one `Cell` per terminal cell.
struct Grid {
    cols: u16,
    rows: u16,
    cells: Vec<Cell>,
}

impl Grid {
    fn new(cols: u16, rows: u16) -> Self {
        let cols = cols.max(1);
        let rows = rows.max(1);
        Grid {
            cols,
            rows,
            cells: vec![Cell::blank(); cols as usize * rows as usize],
        }
    }

    // ── Logical → cell mapping ────────────────────────────────────────────────

    fn col(&self, x: i32) -> i32 {
        x * self.cols as i32 / SCREEN_WIDTH
    }

    fn row(&self, y: i32) -> i32 {
        y * self.rows as i32 / SCREEN_HEIGHT
    }

    /// Every logical rect covers at least one cell so small sprites never vanish.
    fn cell_rect(&self, rect: Rect) -> CellRect {
        let left = self.col(rect.x);
        let top = self.row(rect.y);
        let right = self.col(rect.right()).max(left + 1);
        let bottom = self.row(rect.bottom()).max(top + 1);
        CellRect { left, top, right, bottom }
    }

    fn cell_mut(&mut self, col: i32, row: i32) -> Option<&mut Cell> {
        if col < 0 || row < 0 || col >= self.cols as i32 || row >= self.rows as i32 {
            return None;
        }
        let idx = row as usize * self.cols as usize + col as usize;
        self.cells.get_mut(idx)
    }

    fn put(&mut self, col: i32, row: i32, ch: char, fg: Rgb) {
        if let Some(cell) = self.cell_mut(col, row) {
            cell.ch = ch;
            cell.fg = fg;
        }
    }

    fn clear(&mut self, with: Cell) {
        for cell in &mut self.cells {
            *cell = with;
        }
    }

    fn row_cells(&self, row: u16) -> &[Cell] {
        let start = row as usize * self.cols as usize;
        &self.cells[start..start + self.cols as usize]
    }

    /// Paint `sprite` into `area`: background first, then the art on the
    /// bottom edge, centred horizontally.  Spaces in the art are transparent.
    fn draw_sprite(&mut self, sprite: &Sprite, area: CellRect) {
        if let Some(bg) = sprite.bg {
            for row in area.top..area.bottom {
                for col in area.left..area.right {
                    if let Some(cell) = self.cell_mut(col, row) {
                        *cell = Cell { ch: ' ', fg: C_DEFAULT_FG, bg };
                    }
                }
            }
        }

        let fg = sprite.fg.unwrap_or(C_DEFAULT_FG);
        let art_height = sprite.rows.len() as i32;
        let art_width = sprite.rows.iter().map(|r| r.chars().count()).max().unwrap_or(0) as i32;
        let top = area.bottom - art_height;
        let left = area.left + (area.right - area.left - art_width) / 2;
        for (dy, line) in sprite.rows.iter().enumerate() {
            for (dx, ch) in line.chars().enumerate() {
                if ch != ' ' {
                    self.put(left + dx as i32, top + dy as i32, ch, fg);
                }
            }
        }
    }

    #[cfg(test)]
    fn cell(&self, col: u16, row: u16) -> Cell {
        self.cells[row as usize * self.cols as usize + col as usize]
    }
}

pub struct TerminalCanvas<W: Write> {
    out: W,
    sheet: SpriteSheet,
    grid: Grid,
}

impl<W: Write> TerminalCanvas<W> {
    pub fn new(out: W, sheet: SpriteSheet, cols: u16, rows: u16) -> Self {
        TerminalCanvas {
            out,
            sheet,
            grid: Grid::new(cols, rows),
        }
    }

    pub fn resize(&mut self, cols: u16, rows: u16) {
        self.grid = Grid::new(cols, rows);
        tracing::debug!(cols = self.grid.cols, rows = self.grid.rows, "canvas resized");
    }

    pub fn writer(&mut self) -> &mut W {
        &mut self.out
    }
}

impl<W: Write> Canvas for TerminalCanvas<W> {
    fn fill(&mut self, color: Rgb) -> io::Result<()> {
        self.grid.clear(Cell { ch: ' ', fg: C_DEFAULT_FG, bg: color });
        Ok(())
    }

    fn blit(&mut self, key: SpriteKey, dest: Rect) -> io::Result<()> {
        let area = self.grid.cell_rect(dest);
        self.grid.draw_sprite(self.sheet.get(key), area);
        Ok(())
    }

    fn text(&mut self, text: &str, color: Rgb, _antialias: bool, center: (i32, i32)) -> io::Result<()> {
        let width = text.chars().count() as i32;
        let row = self.grid.row(center.1);
        let left = self.grid.col(center.0) - width / 2;
        for (i, ch) in text.chars().enumerate() {
            self.grid.put(left + i as i32, row, ch, color);
        }
        Ok(())
    }

    fn present(&mut self) -> io::Result<()> {
        let mut current: Option<(Rgb, Rgb)> = None;
        for row in 0..self.grid.rows {
            self.out.queue(cursor::MoveTo(0, row))?;
            for cell in self.grid.row_cells(row) {
                if current != Some((cell.fg, cell.bg)) {
                    self.out.queue(style::SetForegroundColor(to_color(cell.fg)))?;
                    self.out.queue(style::SetBackgroundColor(to_color(cell.bg)))?;
                    current = Some((cell.fg, cell.bg));
                }
                self.out.queue(Print(cell.ch))?;
            }
        }

        // Reset colours, leave the cursor on the last row and start the next
        // frame from a blank grid.
        self.out.queue(style::ResetColor)?;
        self.out.queue(cursor::MoveTo(0, self.grid.rows.saturating_sub(1)))?;
        self.out.flush()?;
        self.grid.clear(Cell::blank());
        Ok(())
    }
}
