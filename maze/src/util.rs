use std::{
    collections::HashMap,
    path::{Path, PathBuf},
};

use image::{DynamicImage, RgbaImage};
use log::debug;

use crate::{
    error::MazeError,
    grid::Grid,
    maze::IndexedImage,
    palette::{Palette, Rgba},
};

/// Reads a maze image in any format `image` can decode (GIF, PNG, BMP)
pub fn load_image(path: &Path) -> Result<IndexedImage, MazeError> {
    let img = image::open(path).map_err(|source| MazeError::Load {
        path: path.to_path_buf(),
        source,
    })?;
    parse_img(&img)
}

/// Indexes the colors of `img`, in the order they first appear
pub fn parse_img(img: &DynamicImage) -> Result<IndexedImage, MazeError> {
    let rgba = img.to_rgba8();
    let width = rgba.width() as usize;

    let mut colors: Vec<Rgba> = Vec::new();
    let mut seen: HashMap<Rgba, usize> = HashMap::new();
    let mut indices = Vec::with_capacity(rgba.as_raw().len() / 4);

    for p in rgba.pixels() {
        let color = Rgba(p.0);
        let index = *seen.entry(color).or_insert_with(|| {
            colors.push(color);
            colors.len() - 1
        });
        indices.push(index);
    }

    if colors.len() > 256 {
        return Err(MazeError::TooManyColors {
            count: colors.len(),
        });
    }
    debug!(
        "indexed {}x{} image with {} colors",
        width,
        rgba.height(),
        colors.len()
    );

    let pix = indices.into_iter().map(|i| i as u8).collect();
    Ok(IndexedImage {
        grid: Grid::new(pix, width)?,
        palette: Palette::new(colors)?,
    })
}

/// Expands the indices back through the palette into an RGBA image
pub fn render_img(image: &IndexedImage) -> Result<RgbaImage, MazeError> {
    let grid = &image.grid;
    let dimensions_error = || MazeError::InvalidDimensions {
        len: grid.pixels().len(),
        stride: grid.width(),
    };

    let mut data = Vec::with_capacity(grid.pixels().len() * 4);
    for &index in grid.pixels() {
        let color = image
            .palette
            .get(index)
            .ok_or(MazeError::InvalidIndex(index))?;
        data.extend_from_slice(&color.0);
    }

    let width = u32::try_from(grid.width()).map_err(|_| dimensions_error())?;
    let height = u32::try_from(grid.height()).map_err(|_| dimensions_error())?;
    RgbaImage::from_raw(width, height, data).ok_or_else(dimensions_error)
}

/// Writes the image to `path`, the format is picked from the extension
pub fn save_image(image: &IndexedImage, path: &Path) -> Result<(), MazeError> {
    render_img(image)?
        .save(path)
        .map_err(|source| MazeError::Save {
            path: path.to_path_buf(),
            source,
        })
}

/// Where the solved version of `input` goes: `maze.gif` becomes `maze-solved.gif`
pub fn solved_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = match input.extension() {
        Some(ext) => format!("{}-solved.{}", stem, ext.to_string_lossy()),
        None => format!("{}-solved", stem),
    };
    input.with_file_name(name)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::maze::{fixture::expect, Marker, Maze};

    fn rgba_image(width: u32, height: u32, colors: &[Rgba]) -> DynamicImage {
        let data = colors.iter().flat_map(|c| c.0).collect();
        DynamicImage::ImageRgba8(RgbaImage::from_raw(width, height, data).unwrap())
    }

    #[test]
    fn test_parse_img() {
        let img = rgba_image(
            3,
            1,
            &[Rgba::BLACK, Rgba::WHITE, Rgba::BLACK],
        );
        let image = parse_img(&img).unwrap();
        assert_eq!(image.palette.colors(), &[Rgba::BLACK, Rgba::WHITE]);
        assert_eq!(image.grid.pixels(), &[0, 1, 0]);
        assert_eq!(image.grid.width(), 3);
    }

    #[test]
    fn test_too_many_colors() {
        let colors: Vec<Rgba> = (0..300u32)
            .map(|i| Rgba([(i % 256) as u8, (i / 256) as u8, 0, 0xFF]))
            .collect();
        assert!(matches!(
            parse_img(&rgba_image(300, 1, &colors)),
            Err(MazeError::TooManyColors { count: 300 })
        ));
    }

    #[test]
    fn test_render_invalid_index() {
        let image = IndexedImage {
            grid: Grid::new(vec![0, 1], 2).unwrap(),
            palette: Palette::new(vec![Rgba::WHITE]).unwrap(),
        };
        assert!(matches!(
            render_img(&image),
            Err(MazeError::InvalidIndex(1))
        ));
    }

    #[test]
    fn test_solved_path() {
        assert_eq!(
            solved_path(Path::new("mazes/big.gif")),
            PathBuf::from("mazes/big-solved.gif")
        );
        // only the extension is cut, not every trailing 'g', 'i', 'f' or '.'
        assert_eq!(
            solved_path(Path::new("fig.gif")),
            PathBuf::from("fig-solved.gif")
        );
        assert_eq!(solved_path(Path::new("maze")), PathBuf::from("maze-solved"));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            load_image(&dir.path().join("nope.png")),
            Err(MazeError::Load { .. })
        ));
    }

    #[test]
    fn test_load_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("maze.png");
        std::fs::write(&path, b"definitely not a png").unwrap();
        assert!(matches!(load_image(&path), Err(MazeError::Load { .. })));
    }

    #[test]
    fn test_save_unwritable() {
        let dir = tempfile::tempdir().unwrap();
        let image = IndexedImage {
            grid: Grid::new(vec![0], 1).unwrap(),
            palette: Palette::new(vec![Rgba::WHITE]).unwrap(),
        };
        let path = dir.path().join("missing-dir").join("out.png");
        assert!(matches!(
            save_image(&image, &path),
            Err(MazeError::Save { .. })
        ));
    }

    #[test]
    fn test_missing_start_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("maze.png");
        let (w, b, e) = (Rgba::WHITE, Rgba::BLACK, Rgba::BLUE);
        rgba_image(3, 2, &[w, w, b, b, w, e])
            .save(&path)
            .unwrap();

        let image = load_image(&path).unwrap();
        assert!(matches!(
            Maze::new(image),
            Err(MazeError::MissingMarker(Marker::Start))
        ));
    }

    fn corridor_maze() -> Vec<Rgba> {
        let (w, b, s, e) = (Rgba::WHITE, Rgba::BLACK, Rgba::GREEN, Rgba::BLUE);
        vec![
            s, b, b, b, b, //
            w, b, b, b, b, //
            w, b, b, b, b, //
            w, b, b, b, b, //
            w, w, w, w, e, //
        ]
    }

    #[test]
    fn test_solve_end_to_end() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("maze.png");
        rgba_image(5, 5, &corridor_maze()).save(&input).unwrap();

        let mut maze = Maze::new(load_image(&input).unwrap()).unwrap();
        assert!(maze.solve());

        let output = solved_path(&input);
        save_image(&maze.into_image(), &output).unwrap();

        let solved = Maze::new(load_image(&output).unwrap()).unwrap();
        assert_eq!(
            solved.to_string(),
            expect(
                "
                S####
                *####
                *####
                *####
                ****E
                "
            )
        );
        let red = image::open(&output).unwrap().to_rgba8();
        assert_eq!(red.get_pixel(3, 4).0, Rgba::RED.0);
    }

    #[test]
    fn test_gif_keeps_colors() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("maze.gif");
        save_image(
            &parse_img(&rgba_image(5, 5, &corridor_maze())).unwrap(),
            &input,
        )
        .unwrap();

        let mut maze = Maze::new(load_image(&input).unwrap()).unwrap();
        assert!(maze.solve());
        assert_eq!(maze.count(maze.indices().red), 7);
    }
}
