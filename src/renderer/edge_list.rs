//! Per-polygon scanline table
//!
//! One `EdgeList` is built per polygon per frame and discarded right
//! after compositing. Each integer row in the polygon's vertical extent
//! holds a left and a right (x, z) boundary sample.

/// Left/right boundary samples for one scanline row.
///
/// A fresh row is empty: left at +inf, right at -inf. A row that no edge
/// walk ever touched stays inverted and is skipped at composite time.
#[derive(Debug, Clone, Copy)]
pub struct Row {
    pub x_left: f32,
    pub z_left: f32,
    pub x_right: f32,
    pub z_right: f32,
}

impl Row {
    const EMPTY: Row = Row {
        x_left: f32::INFINITY,
        z_left: 0.0,
        x_right: f32::NEG_INFINITY,
        z_right: 0.0,
    };
}

/// Scanline edge table for a single polygon, covering the integer rows
/// `start_y..=end_y`.
#[derive(Debug, Clone)]
pub struct EdgeList {
    start_y: i32,
    end_y: i32,
    rows: Vec<Row>,
}

impl EdgeList {
    /// Create an empty table for rows `start_y..=end_y` (start_y <= end_y)
    pub fn new(start_y: i32, end_y: i32) -> Self {
        debug_assert!(start_y <= end_y);
        Self {
            start_y,
            end_y,
            rows: vec![Row::EMPTY; (end_y - start_y + 1) as usize],
        }
    }

    pub fn start_y(&self) -> i32 {
        self.start_y
    }

    pub fn end_y(&self) -> i32 {
        self.end_y
    }

    /// Record a left boundary sample. Rows outside `start_y..=end_y` on
    /// either end are rejected.
    pub fn add_left(&mut self, y: i32, x: f32, z: f32) {
        if y < self.start_y || y > self.end_y {
            return;
        }
        let row = &mut self.rows[(y - self.start_y) as usize];
        row.x_left = x;
        row.z_left = z;
    }

    /// Record a right boundary sample, same bounds rule as `add_left`
    pub fn add_right(&mut self, y: i32, x: f32, z: f32) {
        if y < self.start_y || y > self.end_y {
            return;
        }
        let row = &mut self.rows[(y - self.start_y) as usize];
        row.x_right = x;
        row.z_right = z;
    }

    /// The samples for row `y`, or None outside the vertical extent
    pub fn row(&self, y: i32) -> Option<&Row> {
        if y < self.start_y || y > self.end_y {
            return None;
        }
        Some(&self.rows[(y - self.start_y) as usize])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_and_read_back() {
        let mut el = EdgeList::new(2, 5);
        el.add_left(3, 1.0, 0.5);
        el.add_right(3, 8.0, 2.5);
        let row = el.row(3).unwrap();
        assert_eq!(row.x_left, 1.0);
        assert_eq!(row.z_left, 0.5);
        assert_eq!(row.x_right, 8.0);
        assert_eq!(row.z_right, 2.5);
    }

    #[test]
    fn test_rejects_rows_outside_both_bounds() {
        let mut el = EdgeList::new(2, 5);
        el.add_left(1, 9.0, 9.0);
        el.add_left(6, 9.0, 9.0);
        el.add_right(-3, 9.0, 9.0);
        el.add_right(100, 9.0, 9.0);
        for y in 2..=5 {
            let row = el.row(y).unwrap();
            assert!(row.x_left.is_infinite());
            assert!(row.x_right.is_infinite());
        }
    }

    #[test]
    fn test_untouched_row_is_inverted() {
        let mut el = EdgeList::new(0, 2);
        el.add_left(0, 1.0, 0.0);
        el.add_right(0, 2.0, 0.0);
        // row 1 never written: left stays above right, so compositing skips it
        let row = el.row(1).unwrap();
        assert!(row.x_left > row.x_right);
    }

    #[test]
    fn test_row_lookup_outside_extent() {
        let el = EdgeList::new(0, 2);
        assert!(el.row(-1).is_none());
        assert!(el.row(3).is_none());
    }
}
