use cgmath::Point2;

/// A rectangle, with top-left corner at `min`, and bottom-right corner at `max`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Rect {
    pub min: Point2<i32>,
    pub max: Point2<i32>,
}

impl Rect {
    #[inline]
    pub fn new(min: Point2<i32>, max: Point2<i32>) -> Self {
        Rect { min, max }
    }

    #[inline]
    pub fn with_dimensions(min: Point2<i32>, width: i32, height: i32) -> Self {
        Rect {
            min,
            max: Point2::new(min.x + width, min.y + height),
        }
    }

    #[inline]
    pub fn width(&self) -> i32 {
        self.max.x - self.min.x
    }

    #[inline]
    pub fn height(&self) -> i32 {
        self.max.y - self.min.y
    }

    #[inline]
    pub fn size(&self) -> i32 {
        self.width() * self.height()
    }

    #[inline]
    pub fn contains<P>(&self, p: P) -> bool
    where
        P: Into<Point2<i32>>,
    {
        let p = p.into();
        p.x >= self.min.x && p.x < self.max.x && p.y >= self.min.y && p.y < self.max.y
    }
}
