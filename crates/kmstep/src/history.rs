/// The two most recent centroid generations, enough to step back once.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CentroidHistory {
    previous: Option<Vec<f32>>,
    before_previous: Option<Vec<f32>>,
}

impl CentroidHistory {
    /// Shifts the generations back by one and records `current` as the newest.
    pub fn push(&mut self, current: &[f32]) {
        // Reuse the oldest buffer, it's about to fall off anyway
        let mut recycled = self.before_previous.take().unwrap_or_default();
        recycled.clear();
        recycled.extend_from_slice(current);
        self.before_previous = self.previous.replace(recycled);
    }

    pub fn previous(&self) -> Option<&[f32]> {
        self.previous.as_deref()
    }

    pub fn before_previous(&self) -> Option<&[f32]> {
        self.before_previous.as_deref()
    }

    pub fn take_before_previous(&mut self) -> Option<Vec<f32>> {
        self.before_previous.take()
    }

    pub fn clear(&mut self) {
        self.previous = None;
        self.before_previous = None;
    }

    pub fn is_empty(&self) -> bool {
        self.previous.is_none() && self.before_previous.is_none()
    }
}
