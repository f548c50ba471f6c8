pub const STAR_COUNT: usize = 5;

/// Star scale shown next to the user name.
#[derive(Debug, Clone, PartialEq)]
pub struct RatingBlock {
    rating: f64,
    review_count: usize,
}

impl RatingBlock {
    /// Nothing is shown for users without reviews or without a positive average.
    pub fn new(rating: f64, review_count: usize) -> Option<Self> {
        if review_count == 0 || !(rating > 0.0) {
            None
        } else {
            Some(Self { rating: rating.min(STAR_COUNT as f64), review_count })
        }
    }

    pub fn filled(&self) -> usize {
        self.rating.round() as usize
    }

    pub fn stars(&self) -> [bool; STAR_COUNT] {
        let filled = self.filled();
        let mut stars = [false; STAR_COUNT];
        for (i, star) in stars.iter_mut().enumerate() {
            *star = i < filled;
        }
        stars
    }

    pub fn label(&self) -> String {
        format!("{:.1} ({} reviews)", self.rating, self.review_count)
    }
}
