use std::io::Write;

use asteroids_core::constants::ASTEROID_SPLIT_THRESHOLD;
use asteroids_core::{Entity, Playfield, Renderer, SeededRng, Vec2};

pub const STAR_COUNT: usize = 150;

const STAR: char = '.';
const SHIP: char = 'A';
const LARGE_ASTEROID: char = 'O';
const SMALL_ASTEROID: char = 'o';
const BULLET: char = '*';

/// Rasterises the playfield onto a `columns x rows` character grid and writes
/// every `render_every`-th frame to `out`.
pub struct TerminalRenderer<W: Write> {
    out: W,
    playfield: Playfield,
    columns: usize,
    rows: usize,
    render_every: u64,
    clear_screen: bool,
    rng: SeededRng,
    stars: Vec<(usize, usize)>,
    grid: Vec<char>,
    hud: Vec<String>,
    frames: u64,
    frames_written: u64,
    write_failed: bool,
}

impl<W: Write> TerminalRenderer<W> {
    pub fn new(out: W, playfield: Playfield, columns: usize, rows: usize, seed: u32) -> Self {
        let columns = columns.max(1);
        let rows = rows.max(1);
        let mut renderer = Self {
            out,
            playfield,
            columns,
            rows,
            render_every: 1,
            clear_screen: false,
            rng: SeededRng::new(seed),
            stars: Vec::with_capacity(STAR_COUNT),
            grid: vec![' '; columns * rows],
            hud: Vec::new(),
            frames: 0,
            frames_written: 0,
            write_failed: false,
        };
        renderer.scatter_stars();
        renderer
    }

    /// Only every n-th presented frame reaches the writer. Zero is treated as one.
    pub fn render_every(mut self, n: u64) -> Self {
        self.render_every = n.max(1);
        self
    }

    /// Prefix each frame with an ANSI clear-and-home sequence.
    pub fn clear_screen(mut self, clear: bool) -> Self {
        self.clear_screen = clear;
        self
    }

    pub fn frames_written(&self) -> u64 {
        self.frames_written
    }

    pub fn stars(&self) -> &[(usize, usize)] {
        &self.stars
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    /// The grid as text, one line per row.
    pub fn grid_text(&self) -> String {
        let mut text = String::with_capacity((self.columns + 1) * self.rows);
        for row in self.grid.chunks(self.columns) {
            text.extend(row.iter());
            text.push('\n');
        }
        text
    }

    fn scatter_stars(&mut self) {
        self.stars.clear();
        for _ in 0..STAR_COUNT {
            let column = self.rng.next_int(self.columns as u32) as usize;
            let row = self.rng.next_int(self.rows as u32) as usize;
            self.stars.push((column, row));
        }
    }

    fn cell(&self, position: Vec2) -> Option<(usize, usize)> {
        if !self.playfield.contains(position) {
            return None;
        }
        let column = (position.x / self.playfield.width * self.columns as f64) as usize;
        let row = (position.y / self.playfield.height * self.rows as f64) as usize;
        Some((column.min(self.columns - 1), row.min(self.rows - 1)))
    }

    fn plot(&mut self, position: Vec2, symbol: char) {
        if let Some((column, row)) = self.cell(position) {
            self.grid[row * self.columns + column] = symbol;
        }
    }

    /// Fills every cell whose centre lies inside the circle, or at least the
    /// centre cell when the circle is smaller than a cell.
    fn fill_disc(&mut self, center: Vec2, radius: f64, symbol: char) {
        let cell_w = self.playfield.width / self.columns as f64;
        let cell_h = self.playfield.height / self.rows as f64;

        let first_col = ((center.x - radius) / cell_w).floor().max(0.0) as usize;
        let last_col = ((center.x + radius) / cell_w).ceil().max(0.0) as usize;
        let first_row = ((center.y - radius) / cell_h).floor().max(0.0) as usize;
        let last_row = ((center.y + radius) / cell_h).ceil().max(0.0) as usize;

        for row in first_row..last_row.min(self.rows) {
            for column in first_col..last_col.min(self.columns) {
                let cell_center = Vec2::new(
                    (column as f64 + 0.5) * cell_w,
                    (row as f64 + 0.5) * cell_h,
                );
                if cell_center.distance(center) <= radius {
                    self.grid[row * self.columns + column] = symbol;
                }
            }
        }
        self.plot(center, symbol);
    }

    fn flush_frame(&mut self) {
        let mut frame = String::new();
        if self.clear_screen {
            frame.push_str("\x1b[2J\x1b[H");
        }
        frame.push_str(&self.hud.join("   "));
        frame.push('\n');
        frame.push_str(&self.grid_text());

        let result = self
            .out
            .write_all(frame.as_bytes())
            .and_then(|()| self.out.flush());
        match result {
            Ok(()) => self.frames_written += 1,
            Err(err) if !self.write_failed => {
                self.write_failed = true;
                tracing::warn!("terminal output failed, frames will be dropped: {err}");
            }
            Err(_) => {}
        }
    }
}

impl<W: Write> Renderer for TerminalRenderer<W> {
    fn clear_and_redraw_background(&mut self) {
        self.grid.fill(' ');
        self.hud.clear();
        for &(column, row) in &self.stars {
            self.grid[row * self.columns + column] = STAR;
        }
    }

    fn draw_entity(&mut self, entity: Entity<'_>) {
        match entity {
            Entity::Ship { ship, .. } => self.plot(ship.position, SHIP),
            Entity::Bullet(bullet) => self.plot(bullet.position, BULLET),
            Entity::Asteroid(asteroid) => {
                let symbol = if asteroid.radius > ASTEROID_SPLIT_THRESHOLD {
                    LARGE_ASTEROID
                } else {
                    SMALL_ASTEROID
                };
                self.fill_disc(asteroid.position, asteroid.radius, symbol);
            }
        }
    }

    fn regenerate_background(&mut self) {
        self.scatter_stars();
    }

    fn draw_time_text(&mut self, label: &str, value: &str) {
        self.hud.push(format!("{label}: {value}"));
    }

    fn present(&mut self) {
        self.frames += 1;
        if self.frames % self.render_every == 0 {
            self.flush_frame();
        }
    }
}
