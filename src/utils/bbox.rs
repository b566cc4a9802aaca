use crate::EPS;

/// Bounding box in the format (x, y, width, height)
///
/// The coordinates are image-plane pixels with the origin at the top-left
/// corner of the box.
#[derive(Clone, Default, Debug, Copy)]
pub struct BoundingBox {
    _x: f32,
    _y: f32,
    _width: f32,
    _height: f32,
}

impl BoundingBox {
    /// Constructor
    ///
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            _x: x,
            _y: y,
            _width: width,
            _height: height,
        }
    }

    pub fn x(&self) -> f32 {
        self._x
    }

    pub fn y(&self) -> f32 {
        self._y
    }

    pub fn width(&self) -> f32 {
        self._width
    }

    pub fn height(&self) -> f32 {
        self._height
    }

    pub fn area(&self) -> f32 {
        self._width * self._height
    }

    /// Center of the box (x, y)
    ///
    pub fn center(&self) -> (f32, f32) {
        (self._x + self._width / 2.0, self._y + self._height / 2.0)
    }

    /// Returns the box translated by (dx, dy)
    ///
    pub fn shifted(&self, dx: f32, dy: f32) -> Self {
        Self {
            _x: self._x + dx,
            _y: self._y + dy,
            _width: self._width,
            _height: self._height,
        }
    }

    /// Euclidean distance between box centers
    ///
    pub fn center_distance(l: &BoundingBox, r: &BoundingBox) -> f32 {
        let (lx, ly) = l.center();
        let (rx, ry) = r.center();
        let (dx, dy) = (lx - rx, ly - ry);
        (dx * dx + dy * dy).sqrt()
    }

    /// Overlap area of two boxes. A box with non-positive width or height is
    /// a point or a line and overlaps nothing; callers may submit such
    /// geometry and it must score as zero, not panic.
    pub fn intersection(l: &BoundingBox, r: &BoundingBox) -> f64 {
        if l._width <= 0.0 || l._height <= 0.0 || r._width <= 0.0 || r._height <= 0.0 {
            return 0.0;
        }

        let (ax0, ay0, ax1, ay1) = (l._x, l._y, l._x + l._width, l._y + l._height);
        let (bx0, by0, bx1, by1) = (r._x, r._y, r._x + r._width, r._y + r._height);

        let (x1, y1) = (ax0.max(bx0), ay0.max(by0));
        let (x2, y2) = (ax1.min(bx1), ay1.min(by1));

        let int_width = x2 - x1;
        let int_height = y2 - y1;

        if int_width > 0.0 && int_height > 0.0 {
            (int_width * int_height) as f64
        } else {
            0.0_f64
        }
    }

    /// Intersection-over-union of two boxes. Disjoint or degenerate boxes
    /// yield 0.0.
    ///
    pub fn iou(l: &BoundingBox, r: &BoundingBox) -> f32 {
        let intersection = BoundingBox::intersection(l, r);
        let union = (l.area() + r.area()) as f64 - intersection;
        if union <= 0.0 {
            0.0
        } else {
            (intersection / union) as f32
        }
    }

    /// Allows comparing bboxes
    ///
    pub fn almost_same(&self, other: &Self, eps: f32) -> bool {
        (self._x - other._x).abs() < eps
            && (self._y - other._y).abs() < eps
            && (self._width - other._width).abs() < eps
            && (self._height - other._height).abs() < eps
    }
}

impl PartialEq<Self> for BoundingBox {
    fn eq(&self, other: &Self) -> bool {
        self.almost_same(other, EPS)
    }
}

#[cfg(test)]
mod tests {
    use crate::utils::bbox::BoundingBox;
    use crate::EPS;

    #[test]
    fn test_iou() {
        let bb1 = BoundingBox::new(-1.0, -1.0, 2.0, 2.0);
        let bb2 = BoundingBox::new(-0.9, -0.9, 2.0, 2.0);
        let bb3 = BoundingBox::new(1.0, 1.0, 3.0, 3.0);

        assert!(BoundingBox::iou(&bb1, &bb1) > 0.999);
        assert!(BoundingBox::iou(&bb2, &bb2) > 0.999);
        assert!(BoundingBox::iou(&bb1, &bb2) > 0.8);
        assert!(BoundingBox::iou(&bb1, &bb3) < 0.001);
        assert!(BoundingBox::iou(&bb2, &bb3) < 0.001);
    }

    #[test]
    fn test_center_distance() {
        let bb1 = BoundingBox::new(0.0, 0.0, 10.0, 10.0);
        let bb2 = BoundingBox::new(30.0, 40.0, 10.0, 10.0);
        assert!((BoundingBox::center_distance(&bb1, &bb1)).abs() < EPS);
        assert!((BoundingBox::center_distance(&bb1, &bb2) - 50.0).abs() < EPS);
    }

    #[test]
    fn test_degenerate_boxes_overlap_nothing() {
        let point = BoundingBox::new(5.0, 5.0, 0.0, 0.0);
        let line = BoundingBox::new(0.0, 0.0, 10.0, 0.0);
        let bb = BoundingBox::new(0.0, 0.0, 10.0, 10.0);

        assert_eq!(BoundingBox::intersection(&point, &bb), 0.0);
        assert_eq!(BoundingBox::intersection(&bb, &line), 0.0);
        assert!(BoundingBox::iou(&point, &bb).abs() < EPS);
        assert!(BoundingBox::iou(&bb, &line).abs() < EPS);
        assert!(BoundingBox::iou(&point, &point).abs() < EPS);
    }

    #[test]
    fn test_shifted() {
        let bb = BoundingBox::new(5.0, 5.0, 4.0, 2.0).shifted(-5.0, 5.0);
        assert_eq!(bb, BoundingBox::new(0.0, 10.0, 4.0, 2.0));
    }
}
