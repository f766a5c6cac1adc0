use serde::Deserialize;

use crate::domain::payout::{NewPayout, PayoutStatus, PayoutStatusChange};
use crate::forms::{FormError, parse_id};

#[derive(Debug, Deserialize)]
pub struct PayoutStatusForm {
    pub status: PayoutStatus,
    #[serde(default)]
    pub comment: String,
    #[serde(default)]
    pub next: Option<String>,
}

impl TryFrom<PayoutStatusForm> for PayoutStatusChange {
    type Error = FormError;

    fn try_from(form: PayoutStatusForm) -> Result<Self, Self::Error> {
        let comment = form.comment.trim().to_string();
        if form.status == PayoutStatus::Rejected && comment.is_empty() {
            return Err(FormError::Invalid(
                "A reason is required to reject a payout".to_string(),
            ));
        }
        Ok(Self {
            status: form.status,
            comment,
        })
    }
}

/// Purchases selected for a payout request. Posted as repeated
/// `purchase_id` fields, so it is parsed with `serde_html_form`.
#[derive(Debug, Default, Deserialize)]
pub struct NewPayoutForm {
    #[serde(default)]
    pub purchase_id: Vec<String>,
    #[serde(default)]
    pub next: Option<String>,
}

impl NewPayoutForm {
    pub fn parse(bytes: &[u8]) -> Result<Self, FormError> {
        serde_html_form::from_bytes(bytes).map_err(|err| FormError::Invalid(err.to_string()))
    }
}

impl TryFrom<&NewPayoutForm> for NewPayout {
    type Error = FormError;

    fn try_from(form: &NewPayoutForm) -> Result<Self, Self::Error> {
        let mut ids = form
            .purchase_id
            .iter()
            .map(|id| parse_id(id))
            .collect::<Result<Vec<_>, _>>()?;
        ids.sort();
        ids.dedup();
        if ids.is_empty() {
            return Err(FormError::Invalid("Select at least one purchase".to_string()));
        }
        Ok(NewPayout::from_purchases(ids))
    }
}
