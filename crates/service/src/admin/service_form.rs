//! Create/edit form of a single service.
//!
//! The form is bound either to an existing service (loaded with its features
//! before anything is editable) or to an empty record. Nothing reaches the
//! backend until the fields validate; a failed submit keeps every field and
//! feature so the user can retry.

use models::slug::{is_valid_slug, slugify};
use models::validation::{max_chars, require};
use models::{FieldErrors, Service, ServiceIcon, ServicePayload, ServiceUpdate};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use super::feature_editor::{EditorMode, FeatureDraft, FeatureEditor, FeatureItem, MAX_FEATURE_TITLE};
use crate::context::SiteContext;
use crate::errors::ServiceError;
use crate::notify::Notifier;
use crate::query_cache::{QueryKey, QueryScope};

pub const MAX_TITLE: usize = 200;
pub const MAX_META_TITLE: usize = 60;
pub const MAX_META_DESCRIPTION: usize = 160;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "mode", content = "id", rename_all = "snake_case")]
pub enum FormMode {
    Create,
    Edit(i64),
}

/// Top-level editable fields.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ServiceFields {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub short_description: String,
    #[serde(default)]
    pub full_description: String,
    #[serde(default)]
    pub icon: Option<ServiceIcon>,
    #[serde(default)]
    pub featured: bool,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(default)]
    pub display_order: i64,
    #[serde(default)]
    pub meta_title: String,
    #[serde(default)]
    pub meta_description: String,
    #[serde(default)]
    pub meta_keywords: String,
}

fn default_active() -> bool { true }

impl Default for ServiceFields {
    fn default() -> Self {
        Self {
            title: String::new(),
            slug: String::new(),
            short_description: String::new(),
            full_description: String::new(),
            icon: None,
            featured: false,
            is_active: true,
            display_order: 0,
            meta_title: String::new(),
            meta_description: String::new(),
            meta_keywords: String::new(),
        }
    }
}

impl From<&Service> for ServiceFields {
    fn from(s: &Service) -> Self {
        Self {
            title: s.title.clone(),
            slug: s.slug.clone(),
            short_description: s.short_description.clone(),
            full_description: s.full_description.clone(),
            icon: s.icon,
            featured: s.featured,
            is_active: s.is_active,
            display_order: s.display_order,
            meta_title: s.meta_title.clone(),
            meta_description: s.meta_description.clone(),
            meta_keywords: s.meta_keywords.clone(),
        }
    }
}

/// A feature as submitted in one go (server endpoint).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureInput {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub icon: Option<ServiceIcon>,
}

/// Whole-form payload: fields plus features in display order.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ServiceFormInput {
    #[serde(flatten)]
    pub fields: ServiceFields,
    #[serde(default)]
    pub features: Vec<FeatureInput>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct IconOption {
    pub value: ServiceIcon,
    pub label: &'static str,
    pub selected: bool,
}

/// Serializable snapshot for rendering.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ServiceFormView {
    pub mode: FormMode,
    pub fields: ServiceFields,
    pub features: Vec<FeatureItem>,
    pub feature_editor: EditorMode,
    pub feature_draft: FeatureDraft,
    pub icons: Vec<IconOption>,
    pub errors: FieldErrors,
    pub submitting: bool,
}

#[derive(Clone, Debug)]
pub struct ServiceForm {
    mode: FormMode,
    fields: ServiceFields,
    slug_touched: bool,
    features: FeatureEditor,
    errors: FieldErrors,
    submitting: bool,
}

impl Default for ServiceForm {
    fn default() -> Self {
        Self::new()
    }
}

impl ServiceForm {
    /// Empty form for a new service.
    pub fn new() -> Self {
        Self {
            mode: FormMode::Create,
            fields: ServiceFields::default(),
            slug_touched: false,
            features: FeatureEditor::new(),
            errors: FieldErrors::new(),
            submitting: false,
        }
    }

    /// Form over a fully loaded record.
    pub fn from_service(service: &Service) -> Self {
        Self {
            mode: FormMode::Edit(service.id),
            fields: ServiceFields::from(service),
            slug_touched: true,
            features: FeatureEditor::from_features(&service.features),
            errors: FieldErrors::new(),
            submitting: false,
        }
    }

    /// Load the full record (features included) and bind the form to it.
    #[instrument(skip(ctx))]
    pub async fn open_existing(ctx: &SiteContext, id: i64) -> Result<Self, ServiceError> {
        let api = ctx.services.clone();
        let service = ctx
            .cache
            .get_or_fetch(QueryKey::Service(id), || async move { api.get_service(id).await })
            .await?;
        Ok(Self::from_service(&service))
    }

    pub fn mode(&self) -> FormMode {
        self.mode
    }

    pub fn fields(&self) -> &ServiceFields {
        &self.fields
    }

    /// Direct access to the plain fields. Title and slug changes should go
    /// through [`set_title`](Self::set_title) / [`set_slug`](Self::set_slug)
    /// to keep slug generation consistent.
    pub fn fields_mut(&mut self) -> &mut ServiceFields {
        &mut self.fields
    }

    pub fn features(&self) -> &FeatureEditor {
        &self.features
    }

    pub fn features_mut(&mut self) -> &mut FeatureEditor {
        &mut self.features
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// Set the title; in create mode an untouched slug follows it.
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.fields.title = title.into();
        if self.mode == FormMode::Create && !self.slug_touched {
            self.fields.slug = slugify(&self.fields.title);
        }
    }

    /// A non-empty manual slug sticks; clearing it hands control back to the title.
    pub fn set_slug(&mut self, slug: impl Into<String>) {
        self.fields.slug = slug.into();
        self.slug_touched = !self.fields.slug.trim().is_empty();
    }

    pub fn set_icon(&mut self, icon: ServiceIcon) {
        self.fields.icon = Some(icon);
    }

    /// Replace fields and features with a submitted payload.
    pub fn apply(&mut self, input: ServiceFormInput) {
        let ServiceFormInput { fields, features } = input;
        let slug = fields.slug.clone();
        let title = fields.title.clone();
        self.fields = fields;
        if self.mode == FormMode::Create {
            self.slug_touched = false;
            self.set_slug(slug);
            self.set_title(title);
        }

        let loaded: Vec<models::Feature> = features
            .into_iter()
            .enumerate()
            .map(|(idx, f)| models::Feature {
                id: f.id,
                title: f.title,
                description: f.description,
                icon: f.icon,
                display_order: idx as i64,
            })
            .collect();
        self.features = FeatureEditor::from_features(&loaded);
    }

    /// Check every rule and build the wire payload. Errors are kept on the form.
    pub fn validate(&mut self) -> Result<ServicePayload, FieldErrors> {
        let f = &self.fields;
        let mut errors = FieldErrors::new();

        require(&mut errors, "title", &f.title, "Title is required");
        max_chars(&mut errors, "title", &f.title, MAX_TITLE);
        require(&mut errors, "short_description", &f.short_description, "Short description is required");
        if f.icon.is_none() {
            errors.add("icon", "Please select an icon");
        }
        let display_order = u32::try_from(f.display_order).ok();
        if f.display_order < 0 {
            errors.add("display_order", "Display order must be 0 or greater");
        } else if display_order.is_none() {
            errors.add("display_order", format!("Display order must be at most {}", u32::MAX));
        }
        let slug = f.slug.trim();
        if !slug.is_empty() && !is_valid_slug(slug) {
            errors.add("slug", "Slug may only contain lowercase letters, numbers and single hyphens");
        }
        max_chars(&mut errors, "meta_title", &f.meta_title, MAX_META_TITLE);
        max_chars(&mut errors, "meta_description", &f.meta_description, MAX_META_DESCRIPTION);
        for (idx, item) in self.features.items().iter().enumerate() {
            let field = format!("features.{idx}.title");
            require(&mut errors, &field, &item.title, "Feature title is required");
            max_chars(&mut errors, &field, &item.title, MAX_FEATURE_TITLE);
        }

        let (icon, display_order) = match (errors.is_empty(), f.icon, display_order) {
            (true, Some(icon), Some(order)) => (icon, order),
            _ => {
                self.errors = errors.clone();
                return Err(errors);
            }
        };
        let slug = match (slug.is_empty(), self.mode) {
            (false, _) => Some(slug.to_string()),
            (true, FormMode::Create) => Some(slugify(&f.title)).filter(|s| !s.is_empty()),
            (true, FormMode::Edit(_)) => None,
        };
        let payload = ServicePayload {
            title: f.title.trim().to_string(),
            slug,
            short_description: f.short_description.trim().to_string(),
            full_description: f.full_description.clone(),
            icon,
            featured: f.featured,
            is_active: f.is_active,
            display_order,
            meta_title: f.meta_title.trim().to_string(),
            meta_description: f.meta_description.trim().to_string(),
            meta_keywords: f.meta_keywords.trim().to_string(),
            features: self.features.to_payload(),
        };
        self.errors = FieldErrors::new();
        Ok(payload)
    }

    /// Validate, then create or update in one call.
    ///
    /// On success: notify, invalidate the services scope of the cache, run
    /// `on_success` (list refresh) and close the form. On failure: notify with
    /// the backend's message or a generic one and keep all local state.
    #[instrument(skip(self, ctx, notifier, on_success), fields(mode = ?self.mode))]
    pub async fn submit<F>(
        &mut self,
        ctx: &SiteContext,
        notifier: &dyn Notifier,
        on_success: F,
    ) -> Result<Service, ServiceError>
    where
        F: FnOnce(&Service),
    {
        let payload = match self.validate() {
            Ok(p) => p,
            Err(errors) => {
                warn!(event = "service_form_invalid", fields = errors.len());
                return Err(ServiceError::Validation(errors));
            }
        };

        self.submitting = true;
        let result = match self.mode {
            FormMode::Create => ctx.services.create_service(&payload).await,
            FormMode::Edit(id) => ctx.services.update_service(id, &ServiceUpdate::Full(payload)).await,
        };
        self.submitting = false;

        match result {
            Ok(saved) => {
                let verb = match self.mode {
                    FormMode::Create => "created",
                    FormMode::Edit(_) => "updated",
                };
                info!(event = "service_saved", id = saved.id, verb, features = saved.features.len());
                notifier.success(&format!("Service {verb} successfully"));
                ctx.cache.invalidate_scope(QueryScope::Services).await;
                on_success(&saved);
                self.close();
                Ok(saved)
            }
            Err(e) => {
                warn!(event = "service_save_failed", error = %e);
                notifier.error(&e.user_message("Failed to save service"));
                Err(e)
            }
        }
    }

    /// Drop all local state and return to an empty create form.
    pub fn close(&mut self) {
        *self = Self::new();
    }

    pub fn view(&self) -> ServiceFormView {
        ServiceFormView {
            mode: self.mode,
            fields: self.fields.clone(),
            features: self.features.items().to_vec(),
            feature_editor: self.features.mode(),
            feature_draft: self.features.draft().clone(),
            icons: ServiceIcon::ALL
                .into_iter()
                .map(|icon| IconOption { value: icon, label: icon.label(), selected: self.fields.icon == Some(icon) })
                .collect(),
            errors: self.errors.clone(),
            submitting: self.submitting,
        }
    }
}
