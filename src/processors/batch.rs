use crate::models::Point;

/// Fixed-capacity buffer of points awaiting a write.
///
/// Allocated once per file and cleared in place after every flush, so the
/// backing storage is reused for the lifetime of the import.
pub struct PointBatch {
    points: Vec<Point>,
    capacity: usize,
}

impl PointBatch {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            points: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Append a point; returns `true` once the batch is full and due a flush.
    pub fn push(&mut self, point: Point) -> bool {
        self.points.push(point);
        self.is_full()
    }

    pub fn is_full(&self) -> bool {
        self.points.len() >= self.capacity
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}
