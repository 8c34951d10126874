use std::{fmt::Display, str::FromStr};

use clap::ValueEnum;
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::{
    error::MazeError,
    grid::{Grid, Point},
    palette::{Palette, Rgba, SemanticColors},
};

/// A decoded indexed-color image: what the loader hands over and the saver takes back
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct IndexedImage {
    pub grid: Grid,
    pub palette: Palette,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Marker {
    Start,
    End,
}

impl Display for Marker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Marker::Start => "start",
                Marker::End => "end",
            }
        )
    }
}

/// Palette positions of the semantic colors, resolved once when the maze is built
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Indices {
    pub white: u8,
    pub black: u8,
    pub red: u8,
    pub green: u8,
    pub blue: u8,
    pub pink: u8,
    pub mint: u8,
    pub teal: u8,
}

/// Which algorithm to run over the maze
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Strategy {
    /// depth-first search, painting the path red and dead ends mint
    #[default]
    Solve,
    /// fill dead ends until only the path is left
    DeadEnd,
    /// paint every branch with a rotating set of colors
    Routes,
}

impl Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Strategy::Solve => "solve",
                Strategy::DeadEnd => "dead-end",
                Strategy::Routes => "routes",
            }
        )
    }
}

impl FromStr for Strategy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "solve" => Ok(Strategy::Solve),
            "dead-end" => Ok(Strategy::DeadEnd),
            "routes" => Ok(Strategy::Routes),
            _ => Err(anyhow::anyhow!("Invalid strategy: {}", s)),
        }
    }
}

/// A maze drawn as an indexed image: white cells are open, green marks the start and blue the
/// end. Anything else is a wall. The searches paint directly into the grid.
#[derive(Clone, Debug)]
pub struct Maze {
    grid: Grid,
    palette: Palette,
    indices: Indices,
    start: Point,
    end: Point,
}

impl Maze {
    pub fn new(image: IndexedImage) -> Result<Self, MazeError> {
        Self::with_colors(image, &SemanticColors::default())
    }

    /// Builds a maze, resolving the semantic colors against the image palette.
    ///
    /// Paint colors missing from the palette are appended to it. The markers are not: if either
    /// one is absent from the palette or the grid, this fails with [`MazeError::MissingMarker`].
    pub fn with_colors(image: IndexedImage, colors: &SemanticColors) -> Result<Self, MazeError> {
        let IndexedImage { grid, mut palette } = image;

        // an index past the palette would alias whatever paint color gets appended there
        if let Some(&index) = grid
            .pixels()
            .iter()
            .find(|&&index| index as usize >= palette.len())
        {
            return Err(MazeError::InvalidIndex(index));
        }

        let green = palette
            .index_of(colors.green)
            .ok_or(MazeError::MissingMarker(Marker::Start))?;
        let blue = palette
            .index_of(colors.blue)
            .ok_or(MazeError::MissingMarker(Marker::End))?;

        let indices = Indices {
            white: ensure(&mut palette, colors.white, "white")?,
            black: ensure(&mut palette, colors.black, "black")?,
            red: ensure(&mut palette, colors.red, "red")?,
            green,
            blue,
            pink: ensure(&mut palette, colors.pink, "pink")?,
            mint: ensure(&mut palette, colors.mint, "mint")?,
            teal: ensure(&mut palette, colors.teal, "teal")?,
        };

        // the first marker in scan order wins
        let mut start = None;
        let mut end = None;
        for (point, index) in grid.cells() {
            if index == green && start.is_none() {
                start = Some(point);
            }
            if index == blue && end.is_none() {
                end = Some(point);
            }
        }
        let start = start.ok_or(MazeError::MissingMarker(Marker::Start))?;
        let end = end.ok_or(MazeError::MissingMarker(Marker::End))?;

        debug!(
            "loaded {}x{} maze with {} palette entries, start {} end {}",
            grid.width(),
            grid.height(),
            palette.len(),
            start,
            end
        );

        Ok(Self {
            grid,
            palette,
            indices,
            start,
            end,
        })
    }

    pub fn start(&self) -> Point {
        self.start
    }

    pub fn end(&self) -> Point {
        self.end
    }

    pub fn width(&self) -> usize {
        self.grid.width()
    }

    pub fn height(&self) -> usize {
        self.grid.height()
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn indices(&self) -> &Indices {
        &self.indices
    }

    pub fn get(&self, point: Point) -> Option<u8> {
        self.grid.get(point)
    }

    pub(crate) fn set(&mut self, point: Point, index: u8) {
        self.grid.set(point, index);
    }

    pub(crate) fn grid_mut(&mut self) -> &mut Grid {
        &mut self.grid
    }

    /// Number of cells currently holding `index`
    pub fn count(&self, index: u8) -> usize {
        self.grid.count(index)
    }

    /// A cell is open while it is still white. Points outside the grid never are.
    pub fn is_open(&self, point: Point) -> bool {
        self.grid.get(point) == Some(self.indices.white)
    }

    /// Open cells around `point`, in up, left, right, down order
    pub fn open_neighbors(&self, point: Point) -> impl Iterator<Item = Point> + '_ {
        self.grid
            .neighbors_four(point)
            .filter(move |&p| self.is_open(p))
    }

    /// Whether any of the four cells around `point` holds `index`
    pub fn is_next_to(&self, point: Point, index: u8) -> bool {
        self.grid
            .neighbors_four(point)
            .any(|p| self.grid.get(p) == Some(index))
    }

    pub fn at_start(&self, point: Point) -> bool {
        self.is_next_to(point, self.indices.green)
    }

    pub fn at_end(&self, point: Point) -> bool {
        self.is_next_to(point, self.indices.blue)
    }

    /// The first open cell next to the start marker, where every traversal begins
    pub fn initial_cell(&self) -> Option<Point> {
        self.open_neighbors(self.start).next()
    }

    /// Runs `strategy` and reports whether the result is worth saving
    pub fn run(&mut self, strategy: Strategy) -> bool {
        match strategy {
            Strategy::Solve => self.solve(),
            Strategy::DeadEnd => self.solve_dead_ends(),
            Strategy::Routes => {
                self.color_routes();
                true
            }
        }
    }

    pub fn into_image(self) -> IndexedImage {
        IndexedImage {
            grid: self.grid,
            palette: self.palette,
        }
    }

    fn symbol(&self, index: u8) -> char {
        let i = &self.indices;
        match index {
            _ if index == i.white => '.',
            _ if index == i.green => 'S',
            _ if index == i.blue => 'E',
            _ if index == i.red => '*',
            _ if index == i.mint => 'x',
            _ if index == i.pink => 'p',
            _ if index == i.teal => 't',
            _ => '#',
        }
    }
}

fn ensure(palette: &mut Palette, color: Rgba, name: &str) -> Result<u8, MazeError> {
    match palette.index_of(color) {
        Some(index) => Ok(index),
        None => {
            warn!("palette has no {} ({}), adding it", name, color);
            palette.push(color)
        }
    }
}

impl Display for Maze {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for y in 0..self.height() {
            for x in 0..self.width() {
                let index = self.grid.get(Point { x, y }).unwrap_or(self.indices.black);
                write!(f, "{}", self.symbol(index))?;
            }
            writeln!(f)?;
        }

        Ok(())
    }
}

/// Builds mazes from text pictures for the tests: `#` wall, `.` open, `S` start, `E` end.
#[cfg(test)]
pub(crate) mod fixture {
    use super::*;

    pub fn picture(text: &str) -> IndexedImage {
        let rows: Vec<&str> = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();
        let width = rows[0].len();

        // only the drawing colors, the paint colors get appended by the maze
        let palette = Palette::new(vec![Rgba::WHITE, Rgba::BLACK, Rgba::GREEN, Rgba::BLUE]).unwrap();
        let pix = rows
            .iter()
            .flat_map(|row| row.chars())
            .map(|c| match c {
                '.' => 0,
                'S' => 2,
                'E' => 3,
                _ => 1,
            })
            .collect();

        IndexedImage {
            grid: Grid::new(pix, width).unwrap(),
            palette,
        }
    }

    pub fn maze(text: &str) -> Maze {
        Maze::new(picture(text)).unwrap()
    }

    /// The picture with surrounding whitespace stripped, as `Maze`'s `Display` prints it
    pub fn expect(text: &str) -> String {
        text.lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(|line| format!("{}\n", line))
            .collect()
    }
}
