#![forbid(unsafe_code)]

/// Unit tag for canvas pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Pixels;

pub type PixelPoint = euclid::Point2D<i32, Pixels>;
pub type PixelSize = euclid::Size2D<i32, Pixels>;

pub fn point(x: i32, y: i32) -> PixelPoint {
    euclid::point2(x, y)
}

pub fn size(width: i32, height: i32) -> PixelSize {
    euclid::size2(width, height)
}
