use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::error::MazeError;

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct Point {
    pub x: usize,
    pub y: usize,
}

impl Point {
    pub fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }
}

impl Display for Point {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Left,
    Right,
    Down,
}

impl Direction {
    /// All directions, in the order the searches try them
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Left,
        Direction::Right,
        Direction::Down,
    ];
}

impl Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Direction::Up => "up",
                Direction::Left => "left",
                Direction::Right => "right",
                Direction::Down => "down",
            }
        )
    }
}

/// A rectangular buffer of palette indices, one byte per cell, stored row by row.
/// The height is implied by the buffer length and the stride.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Grid {
    pix: Vec<u8>,
    stride: usize,
}

impl Grid {
    pub fn new(pix: Vec<u8>, stride: usize) -> Result<Self, MazeError> {
        if stride == 0 || pix.is_empty() || pix.len() % stride != 0 {
            return Err(MazeError::InvalidDimensions {
                len: pix.len(),
                stride,
            });
        }
        Ok(Self { pix, stride })
    }

    /// A `width` x `height` grid with every cell set to `index`
    pub fn filled(width: usize, height: usize, index: u8) -> Result<Self, MazeError> {
        Self::new(vec![index; width * height], width)
    }

    pub fn width(&self) -> usize {
        self.stride
    }

    pub fn height(&self) -> usize {
        self.pix.len() / self.stride
    }

    pub fn contains(&self, point: Point) -> bool {
        point.x < self.stride && point.y < self.height()
    }

    /// Returns the index at `point`, or `None` outside the grid so that the far edges read as
    /// walls.
    pub fn get(&self, point: Point) -> Option<u8> {
        if self.contains(point) {
            Some(self.pix[point.y * self.stride + point.x])
        } else {
            None
        }
    }

    /// Writes `index` at `point`.
    ///
    /// # Panics
    /// Panics if `point` lies outside the grid.
    pub fn set(&mut self, point: Point, index: u8) {
        assert!(
            self.contains(point),
            "point {} outside of {}x{} grid",
            point,
            self.width(),
            self.height()
        );
        self.pix[point.y * self.stride + point.x] = index;
    }

    /// The point stored at `offset` in the row-major buffer
    pub fn point_at(&self, offset: usize) -> Point {
        Point {
            x: offset % self.stride,
            y: offset / self.stride,
        }
    }

    /// Moves one cell from `point` in `direction`, staying inside the grid
    pub fn step(&self, point: Point, direction: Direction) -> Option<Point> {
        let next = match direction {
            Direction::Up => Point {
                x: point.x,
                y: point.y.checked_sub(1)?,
            },
            Direction::Left => Point {
                x: point.x.checked_sub(1)?,
                y: point.y,
            },
            Direction::Right => Point {
                x: point.x + 1,
                y: point.y,
            },
            Direction::Down => Point {
                x: point.x,
                y: point.y + 1,
            },
        };
        self.contains(next).then_some(next)
    }

    /// Returns the neighbouring points for the given point, in up, left, right, down order.
    /// Only points inside the grid will be returned
    pub fn neighbors_four(&self, point: Point) -> impl Iterator<Item = Point> + '_ {
        Direction::ALL
            .into_iter()
            .filter_map(move |direction| self.step(point, direction))
    }

    /// Every cell with its index, in row-major order
    pub fn cells(&self) -> impl Iterator<Item = (Point, u8)> + '_ {
        self.pix
            .iter()
            .enumerate()
            .map(|(offset, &index)| (self.point_at(offset), index))
    }

    /// Rewrites every cell holding `from` to `to` and returns how many changed
    pub fn replace(&mut self, from: u8, to: u8) -> usize {
        let mut changed = 0;
        for index in self.pix.iter_mut().filter(|index| **index == from) {
            *index = to;
            changed += 1;
        }
        changed
    }

    pub fn count(&self, index: u8) -> usize {
        self.pix.iter().filter(|&&i| i == index).count()
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pix
    }
}
