//! Admin dashboard: service table, service form and its feature sub-editor.

pub mod feature_editor;
pub mod service_form;
pub mod service_table;

pub use feature_editor::{EditorMode, FeatureDraft, FeatureEditor, FeatureKey};
pub use service_form::{FormMode, ServiceForm, ServiceFormInput, ServiceFormView};
pub use service_table::{ServiceRow, ServiceTable, ServiceTableView, TableState};
