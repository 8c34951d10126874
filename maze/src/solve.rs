use log::{debug, info, trace};

use crate::{
    grid::{Direction, Point},
    maze::Maze,
};

#[derive(Debug, PartialEq, Clone, Eq)]
pub struct PathResult {
    /// The red cells in walking order, from the cell next to the start marker to the one next to
    /// the end marker
    pub path: Vec<Point>,
    pub start: Point,
    pub goal: Point,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SolverState {
    Computing,
    NoPathFound,
    PathFound(PathResult),
}

impl SolverState {
    pub fn is_done(&self) -> bool {
        !matches!(self, SolverState::Computing)
    }
}

/// One level of the search: a red cell and the next direction to try from it
#[derive(Debug)]
struct Frame {
    point: Point,
    next: usize,
}

/// Depth-first search over the open cells of a [`Maze`], one cell move per [`Solver::step`].
///
/// Entered cells are painted red. A cell whose directions are all exhausted is painted mint and
/// dropped from the path. The search succeeds on the first cell that touches the end marker; the
/// marker itself is never painted.
#[derive(Debug)]
pub struct Solver {
    start: Point,
    goal: Point,
    stack: Vec<Frame>,
    pending: Option<Point>,
    state: SolverState,
}

impl Solver {
    pub fn new(maze: &Maze) -> Self {
        Self {
            start: maze.start(),
            goal: maze.end(),
            stack: Vec::new(),
            pending: maze.initial_cell(),
            state: SolverState::Computing,
        }
    }

    pub fn finish(mut self, maze: &mut Maze) -> SolverState {
        loop {
            match self.step(maze) {
                SolverState::Computing => {}
                s => return s,
            }
        }
    }

    pub fn step(&mut self, maze: &mut Maze) -> SolverState {
        if self.state.is_done() {
            return self.state.clone();
        }

        if let Some(point) = self.pending.take() {
            maze.set(point, maze.indices().red);
            self.stack.push(Frame { point, next: 0 });

            if maze.at_end(point) {
                info!("found end next to {}: length={}", point, self.stack.len());

                self.state = SolverState::PathFound(PathResult {
                    path: self.stack.iter().map(|frame| frame.point).collect(),
                    start: self.start,
                    goal: self.goal,
                });
            }
            return self.state.clone();
        }

        let Some(frame) = self.stack.last_mut() else {
            info!("no path from {} to {}", self.start, self.goal);
            self.state = SolverState::NoPathFound;
            return self.state.clone();
        };

        while frame.next < Direction::ALL.len() {
            let direction = Direction::ALL[frame.next];
            frame.next += 1;

            // checked on the way in, a deeper branch may have painted it since
            if let Some(next) = maze.grid().step(frame.point, direction) {
                if maze.is_open(next) {
                    trace!("{} -> {} ({})", frame.point, next, direction);
                    self.pending = Some(next);
                    return self.state.clone();
                }
            }
        }

        // dead end, back up
        maze.set(frame.point, maze.indices().mint);
        self.stack.pop();

        self.state.clone()
    }

    pub fn state(&self) -> &SolverState {
        &self.state
    }

    /// The cells currently painted red, in walking order
    pub fn path(&self) -> impl Iterator<Item = Point> + '_ {
        self.stack.iter().map(|frame| frame.point)
    }

    pub fn start(&self) -> Point {
        self.start
    }

    pub fn goal(&self) -> Point {
        self.goal
    }
}

impl Maze {
    /// Searches for a path from start to end, leaving it painted red. Returns `false` if none
    /// exists, in which case every reachable cell ends up mint.
    pub fn solve(&mut self) -> bool {
        let solver = Solver::new(self);
        matches!(solver.finish(self), SolverState::PathFound(_))
    }

    /// Solves by filling dead ends: every corridor that ends in a wall is painted mint back to
    /// its first branch, then whatever is still open is painted red.
    ///
    /// Loops are never filled, so on a maze with cycles more than the path may end up red.
    /// Returns whether any red cell touches the end marker.
    pub fn solve_dead_ends(&mut self) -> bool {
        let white = self.indices().white;
        let red = self.indices().red;
        let mint = self.indices().mint;

        let mut filled = 0;
        for offset in 0..self.grid().pixels().len() {
            let mut point = self.grid().point_at(offset);
            if !self.is_open(point) {
                continue;
            }

            loop {
                let options: Vec<Point> = self.open_neighbors(point).collect();
                if options.len() != 1 || self.at_start(point) || self.at_end(point) {
                    break;
                }
                self.set(point, mint);
                filled += 1;
                point = options[0];
            }
        }

        let remaining = self.grid_mut().replace(white, red);
        debug!("filled {} dead end cells, {} left on the path", filled, remaining);

        let end = self.end();
        let solved = self
            .grid()
            .neighbors_four(end)
            .any(|p| self.get(p) == Some(red));
        if solved {
            info!("dead end filling reached the end at {}", end);
        } else {
            info!("dead end filling left no path to {}", end);
        }
        solved
    }
}
