//! CRUD surface for per-user recurring expense templates.

use tracing::info;

use crate::core::services::{validate_category_name, validate_positive_amount};
use crate::domain::entry::Tag;
use crate::domain::recurring::RecurringTemplate;
use crate::errors::{LedgerError, LedgerResult};
use crate::storage::TemplateStore;

/// Manages the templates consulted (read-only) at month creation.
/// Template changes never touch months that already exist.
pub struct RecurringService {
    templates: Box<dyn TemplateStore>,
}

impl RecurringService {
    pub fn new(templates: Box<dyn TemplateStore>) -> Self {
        Self { templates }
    }

    pub fn list(&self, user_id: &str) -> LedgerResult<Vec<RecurringTemplate>> {
        self.templates.list_templates(user_id)
    }

    pub fn create(
        &self,
        user_id: &str,
        category: &str,
        amount: f64,
        note: &str,
        tag: Option<Tag>,
    ) -> LedgerResult<RecurringTemplate> {
        validate_category_name(category)?;
        validate_positive_amount(amount)?;
        let template =
            RecurringTemplate::new(user_id, category, amount, note, tag.unwrap_or_default());
        let saved = self.templates.insert_template(&template)?;
        info!(user_id, category, amount, "created recurring template");
        Ok(saved)
    }

    pub fn update(
        &self,
        id: &str,
        category: &str,
        amount: f64,
        note: &str,
        tag: Option<Tag>,
    ) -> LedgerResult<RecurringTemplate> {
        validate_category_name(category)?;
        validate_positive_amount(amount)?;
        let mut template = self
            .templates
            .find_template(id)?
            .ok_or_else(|| LedgerError::NotFound(format!("recurring template {id}")))?;
        template.category = category.to_string();
        template.amount = amount;
        template.note = note.to_string();
        if let Some(tag) = tag {
            template.tag = tag;
        }
        self.templates.update_template(&template)
    }

    pub fn delete(&self, id: &str) -> LedgerResult<()> {
        self.templates
            .find_template(id)?
            .ok_or_else(|| LedgerError::NotFound(format!("recurring template {id}")))?;
        self.templates.delete_template(id)
    }
}
