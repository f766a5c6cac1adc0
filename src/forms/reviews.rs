use serde::Deserialize;
use validator::Validate;

use crate::domain::review::ReviewPayload;
use crate::domain::types::{Rating, RecordId};
use crate::forms::FormError;

#[derive(Debug, Deserialize, Validate)]
pub struct ReviewForm {
    #[validate(range(min = 1, max = 5))]
    pub rating: u8,
    #[validate(length(min = 1, max = 1000))]
    pub comment: String,
}

impl ReviewForm {
    pub fn into_payload(self, course_id: RecordId) -> Result<ReviewPayload, FormError> {
        self.validate()?;
        Ok(ReviewPayload {
            course_id,
            comment: self.comment.trim().to_string(),
            rating: Rating::new(self.rating)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rating_out_of_range_fails() {
        let form = ReviewForm {
            rating: 6,
            comment: "Great".into(),
        };
        assert!(form.into_payload(RecordId::new("c1").unwrap()).is_err());
    }
}
