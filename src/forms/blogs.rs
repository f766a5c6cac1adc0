use serde::Deserialize;
use validator::Validate;

use crate::domain::blog::BlogPayload;
use crate::domain::types::{MediaUrl, RecordId, RichText, Title};
use crate::forms::{FormError, parse_id};

#[derive(Debug, Deserialize, Validate)]
pub struct BlogForm {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    pub category_id: String,
    #[validate(url)]
    pub image_url: String,
    #[serde(default)]
    #[validate(length(max = 1000))]
    pub description: String,
    #[validate(length(min = 1))]
    pub content: String,
}

impl TryFrom<BlogForm> for BlogPayload {
    type Error = FormError;

    fn try_from(form: BlogForm) -> Result<Self, Self::Error> {
        form.validate()?;
        let category_id: RecordId = parse_id(&form.category_id)?;
        Ok(Self {
            name: Title::new(form.name).map_err(|_| FormError::InvalidName)?,
            category_id,
            image_url: MediaUrl::new(form.image_url)?,
            description: form.description.trim().to_string(),
            content: RichText::new(form.content),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blog_content_is_sanitized() {
        let payload = BlogPayload::try_from(BlogForm {
            name: "Hello".into(),
            category_id: "c1".into(),
            image_url: "https://cdn.example.com/a.png".into(),
            description: String::new(),
            content: "<p>ok</p><script>x()</script>".into(),
        })
        .unwrap();
        assert_eq!(payload.content.as_str(), "<p>ok</p>");
    }

    #[test]
    fn blog_requires_category() {
        assert!(
            BlogPayload::try_from(BlogForm {
                name: "Hello".into(),
                category_id: " ".into(),
                image_url: "https://cdn.example.com/a.png".into(),
                description: String::new(),
                content: "body".into(),
            })
            .is_err()
        );
    }
}
