use serde::{Deserialize, Serialize};

/// Top-left corner of a rendered page in rendering-surface coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PageOrigin {
    pub left: f64,
    pub top: f64,
}

impl PageOrigin {
    pub fn new(left: f64, top: f64) -> Self {
        Self { left, top }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BoundingBox {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl BoundingBox {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Re-express a surface-relative box relative to the page origin.
    pub fn to_page_local(&self, origin: PageOrigin) -> Self {
        Self {
            left: self.left - origin.left,
            top: self.top - origin.top,
            width: self.width,
            height: self.height,
        }
    }

    /// Grow the box to at least `min_width` x `min_height`, keeping the
    /// top-left corner in place.
    pub fn with_min_size(&self, min_width: f64, min_height: f64) -> Self {
        Self {
            left: self.left,
            top: self.top,
            width: self.width.max(min_width),
            height: self.height.max(min_height),
        }
    }

    pub fn area(&self) -> f64 {
        self.width * self.height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_local_translation() {
        let surface_box = BoundingBox::new(150.0, 240.0, 80.0, 12.0);
        let local = surface_box.to_page_local(PageOrigin::new(100.0, 200.0));
        assert_eq!(local, BoundingBox::new(50.0, 40.0, 80.0, 12.0));
    }

    #[test]
    fn test_min_size_floor() {
        let tiny = BoundingBox::new(3.0, 4.0, 5.0, 3.0).with_min_size(20.0, 16.0);
        assert_eq!(tiny, BoundingBox::new(3.0, 4.0, 20.0, 16.0));

        // Boxes already large enough are untouched
        let big = BoundingBox::new(0.0, 0.0, 120.0, 18.0).with_min_size(20.0, 16.0);
        assert_eq!(big.width, 120.0);
        assert_eq!(big.height, 18.0);
    }

    #[test]
    fn test_degenerate_box_becomes_visible() {
        let zero = BoundingBox::default().with_min_size(20.0, 16.0);
        assert!(zero.area() > 0.0);
    }
}
