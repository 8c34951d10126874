use log::{debug, trace};

use crate::{
    grid::{Direction, Point},
    maze::Maze,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorerState {
    Coloring,
    Done { painted: usize },
}

#[derive(Debug)]
struct Frame {
    point: Point,
    next: usize,
    /// position in the color cycle handed to the next branch
    offset: usize,
}

/// Walks every cell reachable from the start and paints it, switching to the next color of the
/// pink, mint, teal cycle for each further branch taken at a fork. Unlike [`crate::Solver`] it
/// does not stop at the end marker.
#[derive(Debug)]
pub struct RouteColorer {
    cycle: [u8; 3],
    stack: Vec<Frame>,
    pending: Option<(Point, usize)>,
    painted: usize,
    state: ColorerState,
}

impl RouteColorer {
    pub fn new(maze: &Maze) -> Self {
        let indices = maze.indices();
        Self {
            cycle: [indices.pink, indices.mint, indices.teal],
            stack: Vec::new(),
            pending: maze.initial_cell().map(|point| (point, 0)),
            painted: 0,
            state: ColorerState::Coloring,
        }
    }

    pub fn finish(mut self, maze: &mut Maze) -> ColorerState {
        loop {
            match self.step(maze) {
                ColorerState::Coloring => {}
                s => return s,
            }
        }
    }

    pub fn step(&mut self, maze: &mut Maze) -> ColorerState {
        if let ColorerState::Done { .. } = self.state {
            return self.state;
        }

        if let Some((point, offset)) = self.pending.take() {
            maze.set(point, self.cycle[offset % self.cycle.len()]);
            self.painted += 1;
            self.stack.push(Frame {
                point,
                next: 0,
                offset,
            });
            return self.state;
        }

        let Some(frame) = self.stack.last_mut() else {
            debug!("colored {} cells", self.painted);
            self.state = ColorerState::Done {
                painted: self.painted,
            };
            return self.state;
        };

        while frame.next < Direction::ALL.len() {
            let direction = Direction::ALL[frame.next];
            frame.next += 1;

            if let Some(next) = maze.grid().step(frame.point, direction) {
                if maze.is_open(next) {
                    trace!("{} -> {} ({})", frame.point, next, direction);
                    self.pending = Some((next, frame.offset));
                    return self.state;
                }
            }
        }

        self.stack.pop();
        // the branch is finished, its siblings get the next color
        if let Some(parent) = self.stack.last_mut() {
            parent.offset += 1;
        }

        self.state
    }

    pub fn state(&self) -> ColorerState {
        self.state
    }
}

impl Maze {
    /// Paints every branch of the maze for display. Returns the number of cells painted.
    pub fn color_routes(&mut self) -> usize {
        match RouteColorer::new(self).finish(self) {
            ColorerState::Done { painted } => painted,
            ColorerState::Coloring => 0,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::maze::fixture::{expect, maze};

    #[test]
    fn test_single_corridor_keeps_one_color() {
        let mut maze = maze(
            "
            S...
            ###.
            E...
            ",
        );
        assert_eq!(maze.color_routes(), 7);
        assert_eq!(
            maze.to_string(),
            expect(
                "
                Sppp
                ###p
                Eppp
                "
            )
        );
    }

    #[test]
    fn test_branches_rotate_colors() {
        // a fork three ways from the first cell below the start
        let mut maze = maze(
            "
            ##S##
            #...#
            ##.##
            #...#
            ###E#
            ",
        );
        assert_eq!(maze.color_routes(), 7);
        // the first cell and its first branch (left) share pink, right gets mint and down gets
        // teal. The fork below carries teal on, and its second branch wraps back to pink.
        assert_eq!(
            maze.to_string(),
            expect(
                "
                ##S##
                #ppx#
                ##t##
                #ttp#
                ###E#
                "
            )
        );
    }

    #[test]
    fn test_every_reachable_cell_painted() {
        let mut maze = maze(
            "
            #########
            S.....#.#
            #.###.#.#
            #.#.....#
            #.#.###.#
            #...#...E
            #########
            ",
        );
        let open = maze.count(maze.indices().white);
        let painted = maze.color_routes();
        assert_eq!(painted, open);
        assert_eq!(maze.count(maze.indices().white), 0);
        // the end marker is passed by, never painted
        assert_eq!(maze.get(maze.end()), Some(maze.indices().blue));
    }

    #[test]
    fn test_unreachable_cells_untouched() {
        let mut maze = maze(
            "
            S..#..
            ####.E
            ",
        );
        assert_eq!(maze.color_routes(), 2);
        assert_eq!(maze.count(maze.indices().white), 3);
    }

    #[test]
    fn test_start_walled_in() {
        let mut maze = maze(
            "
            S#
            #E
            ",
        );
        let mut colorer = RouteColorer::new(&maze);
        assert_eq!(
            colorer.step(&mut maze),
            ColorerState::Done { painted: 0 }
        );
        assert_eq!(colorer.state(), ColorerState::Done { painted: 0 });
    }
}
