use serde::Deserialize;
use validator::Validate;

use crate::domain::category::CategoryPayload;
use crate::domain::types::{RecordId, Title};
use crate::forms::{FormError, non_blank};

#[derive(Debug, Deserialize, Validate)]
pub struct CategoryForm {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[serde(default)]
    #[validate(length(max = 500))]
    pub description: String,
    #[serde(default)]
    pub parent_category_id: Option<String>,
    #[serde(default)]
    pub next: Option<String>,
}

impl TryFrom<CategoryForm> for CategoryPayload {
    type Error = FormError;

    fn try_from(form: CategoryForm) -> Result<Self, Self::Error> {
        form.validate()?;
        Ok(Self {
            name: Title::new(form.name).map_err(|_| FormError::InvalidName)?,
            description: form.description.trim().to_string(),
            parent_category_id: non_blank(form.parent_category_id)
                .map(RecordId::new)
                .transpose()?,
        })
    }
}
