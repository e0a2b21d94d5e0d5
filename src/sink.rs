use crate::location::Point;

/// Which sinks have been struck while evaluating a single placement.
#[derive(Clone, Debug)]
pub struct SinkTracker<'a> {
    sinks: &'a [Point],
    hits: Vec<bool>,
    remaining: usize,
}

impl<'a> SinkTracker<'a> {
    /// Track `sinks`, none of them hit yet.
    pub fn new(sinks: &'a [Point]) -> Self {
        Self {
            sinks,
            hits: vec![false; sinks.len()],
            remaining: sinks.len(),
        }
    }

    /// Clear every hit flag; flags never carry over between placements.
    pub fn reset(&mut self) {
        self.hits.fill(false);
        self.remaining = self.sinks.len();
    }

    /// Record a ray passing through `point`. Duplicate sinks at one point are all marked.
    pub fn mark(&mut self, point: Point) {
        for (sink, hit) in self.sinks.iter().zip(self.hits.iter_mut()) {
            if *sink == point && !*hit {
                *hit = true;
                self.remaining -= 1;
            }
        }
    }

    /// Whether every sink has been hit.
    pub fn all_hit(&self) -> bool {
        self.remaining == 0
    }

    /// One flag per sink, in order.
    pub fn hits(&self) -> &[bool] {
        &self.hits
    }
}

#[cfg(test)]
mod tests {
    use super::SinkTracker;
    use crate::location::Point;

    #[test]
    fn marks_and_resets() {
        let sinks = [Point(1, 2), Point(3, 4)];
        let mut tracker = SinkTracker::new(&sinks);
        assert!(!tracker.all_hit());

        tracker.mark(Point(3, 4));
        tracker.mark(Point(3, 4));
        tracker.mark(Point(0, 0));
        assert_eq!(tracker.hits(), &[false, true]);

        tracker.mark(Point(1, 2));
        assert!(tracker.all_hit());

        tracker.reset();
        assert_eq!(tracker.hits(), &[false, false]);
        assert!(!tracker.all_hit());
    }

    #[test]
    fn no_sinks_is_trivially_covered() {
        let tracker = SinkTracker::new(&[]);
        assert!(tracker.all_hit());
    }
}
