mod error;
mod grid;
mod maze;
mod palette;
mod route;
mod solve;
pub mod util;

pub use error::MazeError;
pub use grid::{Direction, Grid, Point};
pub use maze::{Indices, IndexedImage, Marker, Maze, Strategy};
pub use palette::{Palette, Rgba, SemanticColors};
pub use route::{ColorerState, RouteColorer};
pub use solve::{PathResult, Solver, SolverState};
