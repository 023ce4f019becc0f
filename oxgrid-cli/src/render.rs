//! Turn a finished hit grid into an RGB image: annotation stripes first,
//! then alignment dots, then the borders between sequences on top.

use image::{Rgb, RgbImage};
use oxgrid_core::{Bp, GridImage};

use crate::color::parse_color;

pub struct Palette {
    pub background: Rgb<u8>,
    pub forward: Rgb<u8>,
    pub reverse: Rgb<u8>,
    pub overlap: Rgb<u8>,
    pub border: Rgb<u8>,
}

impl Palette {
    pub fn new(forward: Rgb<u8>, reverse: Rgb<u8>, border: Rgb<u8>, background: Rgb<u8>) -> Self {
        let overlap = Rgb([
            ((forward.0[0] as u16 + reverse.0[0] as u16) / 2) as u8,
            ((forward.0[1] as u16 + reverse.0[1] as u16) / 2) as u8,
            ((forward.0[2] as u16 + reverse.0[2] as u16) / 2) as u8,
        ]);
        Self {
            background,
            forward,
            reverse,
            overlap,
            border,
        }
    }
}

fn clamp(v: Bp, limit: u32) -> u32 {
    v.clamp(0, limit as Bp) as u32
}

fn fill(im: &mut RgbImage, x0: u32, y0: u32, x1: u32, y1: u32, color: Rgb<u8>) {
    for y in y0..y1 {
        for x in x0..x1 {
            im.put_pixel(x, y, color);
        }
    }
}

pub fn draw(grid_image: &GridImage, palette: &Palette, border_pixels: Bp) -> RgbImage {
    let width = grid_image.grid.width as u32;
    let height = grid_image.grid.height as u32;
    let mut im = RgbImage::from_pixel(width, height, palette.background);

    for b in &grid_image.boxes {
        // Validated when the annotation files were read.
        let color = parse_color(&b.color).unwrap_or(palette.background);
        let beg = clamp(b.pix_beg, if b.is_top { width } else { height });
        let end = clamp(b.pix_end, if b.is_top { width } else { height });
        if b.is_top {
            fill(&mut im, beg, 0, end, height, color);
        } else {
            fill(&mut im, 0, beg, width, end, color);
        }
    }

    for y in 0..height {
        for x in 0..width {
            match grid_image.grid.at(x as usize, y as usize) {
                1 => im.put_pixel(x, y, palette.forward),
                2 => im.put_pixel(x, y, palette.reverse),
                3 => im.put_pixel(x, y, palette.overlap),
                _ => {}
            }
        }
    }

    for &beg in grid_image.range_pix_begs1.iter().skip(1) {
        fill(
            &mut im,
            clamp(beg - border_pixels, width),
            0,
            clamp(beg, width),
            height,
            palette.border,
        );
    }
    for &beg in grid_image.range_pix_begs2.iter().skip(1) {
        fill(
            &mut im,
            0,
            clamp(beg - border_pixels, height),
            width,
            clamp(beg, height),
            palette.border,
        );
    }
    im
}
