//! Inline editor for the ordered features of one service.
//!
//! States: `Idle`, `Adding`, `Editing(key)`. Items are addressed by
//! [`FeatureKey`], which keeps a backend id apart from a local placeholder, so
//! a pending item can never be mistaken for a persisted one when the list is
//! serialized.

use models::{Feature, FeaturePayload, ServiceIcon};
use serde::Serialize;
use thiserror::Error;

pub const MAX_FEATURE_TITLE: usize = 100;

/// Identifier handed out by one editor. Never reused within that editor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct LocalId(u64);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum FeatureKey {
    /// Saved on the backend under this id.
    Persisted(i64),
    /// Exists only in this editor.
    Pending(LocalId),
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FeatureItem {
    pub key: FeatureKey,
    pub title: String,
    pub description: String,
    pub icon: Option<ServiceIcon>,
}

/// Input buffer of the sub-form.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct FeatureDraft {
    pub title: String,
    pub description: String,
    pub icon: Option<ServiceIcon>,
}

impl FeatureDraft {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self { title: title.into(), description: description.into(), icon: None }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "key", rename_all = "snake_case")]
pub enum EditorMode {
    #[default]
    Idle,
    Adding,
    Editing(FeatureKey),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FeatureEditError {
    #[error("Feature title is required")]
    BlankTitle,
    #[error("Feature title must be at most {0} characters")]
    TitleTooLong(usize),
    #[error("no feature with key {0:?}")]
    UnknownFeature(FeatureKey),
}

#[derive(Clone, Debug, Default)]
pub struct FeatureEditor {
    items: Vec<FeatureItem>,
    mode: EditorMode,
    draft: FeatureDraft,
    next_local: u64,
}

impl FeatureEditor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load features as the backend returned them, ordered by `display_order`.
    pub fn from_features(features: &[Feature]) -> Self {
        let mut sorted: Vec<&Feature> = features.iter().collect();
        sorted.sort_by_key(|f| f.display_order);
        let mut editor = Self::new();
        for f in sorted {
            let key = match f.id {
                Some(id) => FeatureKey::Persisted(id),
                None => editor.alloc_key(),
            };
            editor.items.push(FeatureItem {
                key,
                title: f.title.clone(),
                description: f.description.clone(),
                icon: f.icon,
            });
        }
        editor
    }

    fn alloc_key(&mut self) -> FeatureKey {
        self.next_local += 1;
        FeatureKey::Pending(LocalId(self.next_local))
    }

    pub fn items(&self) -> &[FeatureItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn mode(&self) -> EditorMode {
        self.mode
    }

    pub fn draft(&self) -> &FeatureDraft {
        &self.draft
    }

    pub fn draft_mut(&mut self) -> &mut FeatureDraft {
        &mut self.draft
    }

    pub fn get(&self, key: FeatureKey) -> Option<&FeatureItem> {
        self.items.iter().find(|i| i.key == key)
    }

    fn position(&self, key: FeatureKey) -> Result<usize, FeatureEditError> {
        self.items
            .iter()
            .position(|i| i.key == key)
            .ok_or(FeatureEditError::UnknownFeature(key))
    }

    fn reset_buffer(&mut self) {
        self.draft = FeatureDraft::default();
        self.mode = EditorMode::Idle;
    }

    /// Open an empty buffer for a new feature. Abandons an edit in progress.
    pub fn start_adding(&mut self) {
        self.draft = FeatureDraft::default();
        self.mode = EditorMode::Adding;
    }

    /// Commit the buffer: append when idle or adding, replace in place when
    /// editing. A blank title is rejected and the state is left untouched.
    pub fn save(&mut self) -> Result<FeatureKey, FeatureEditError> {
        let title = self.draft.title.trim().to_string();
        if title.is_empty() {
            return Err(FeatureEditError::BlankTitle);
        }
        if title.chars().count() > MAX_FEATURE_TITLE {
            return Err(FeatureEditError::TitleTooLong(MAX_FEATURE_TITLE));
        }
        let description = self.draft.description.trim().to_string();
        let icon = self.draft.icon;

        let key = match self.mode {
            EditorMode::Editing(key) => {
                let idx = self.position(key)?;
                let item = &mut self.items[idx];
                item.title = title;
                item.description = description;
                item.icon = icon;
                key
            }
            EditorMode::Idle | EditorMode::Adding => {
                let key = self.alloc_key();
                self.items.push(FeatureItem { key, title, description, icon });
                key
            }
        };
        self.reset_buffer();
        Ok(key)
    }

    /// Append a new feature in one step. An edit in progress is abandoned on
    /// success and kept on rejection.
    pub fn add(&mut self, draft: FeatureDraft) -> Result<FeatureKey, FeatureEditError> {
        let prev_mode = self.mode;
        let prev_draft = std::mem::replace(&mut self.draft, draft);
        self.mode = EditorMode::Adding;
        match self.save() {
            Ok(key) => Ok(key),
            Err(e) => {
                self.mode = prev_mode;
                self.draft = prev_draft;
                Err(e)
            }
        }
    }

    /// Load a feature into the buffer for editing.
    pub fn edit(&mut self, key: FeatureKey) -> Result<(), FeatureEditError> {
        let idx = self.position(key)?;
        let item = &self.items[idx];
        self.draft = FeatureDraft { title: item.title.clone(), description: item.description.clone(), icon: item.icon };
        self.mode = EditorMode::Editing(key);
        Ok(())
    }

    /// Discard the buffer.
    pub fn cancel(&mut self) {
        self.reset_buffer();
    }

    /// Remove by key. Deleting the item under edit also clears the buffer.
    pub fn delete(&mut self, key: FeatureKey) -> Result<FeatureItem, FeatureEditError> {
        let idx = self.position(key)?;
        let removed = self.items.remove(idx);
        if self.mode == EditorMode::Editing(key) {
            self.reset_buffer();
        }
        Ok(removed)
    }

    pub fn move_up(&mut self, key: FeatureKey) -> Result<(), FeatureEditError> {
        let idx = self.position(key)?;
        if idx > 0 {
            self.items.swap(idx, idx - 1);
        }
        Ok(())
    }

    pub fn move_down(&mut self, key: FeatureKey) -> Result<(), FeatureEditError> {
        let idx = self.position(key)?;
        if idx + 1 < self.items.len() {
            self.items.swap(idx, idx + 1);
        }
        Ok(())
    }

    /// Wire form: `display_order` is the position in the list right now.
    pub fn to_payload(&self) -> Vec<FeaturePayload> {
        self.items
            .iter()
            .enumerate()
            .map(|(idx, item)| FeaturePayload {
                id: match item.key {
                    FeatureKey::Persisted(id) => Some(id),
                    FeatureKey::Pending(_) => None,
                },
                title: item.title.clone(),
                description: item.description.clone(),
                icon: item.icon,
                display_order: u32::try_from(idx).unwrap_or(u32::MAX),
            })
            .collect()
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn persisted(id: i64, title: &str, order: i64) -> Feature {
        Feature { id: Some(id), title: title.into(), description: String::new(), icon: None, display_order: order }
    }

    fn editor() -> FeatureEditor {
        FeatureEditor::from_features(&[persisted(10, "Responsive", 1), persisted(11, "Fast", 0)])
    }

    #[test]
    fn loads_in_display_order() {
        let e = editor();
        let titles: Vec<&str> = e.items().iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, vec!["Fast", "Responsive"]);
        assert_eq!(e.items()[0].key, FeatureKey::Persisted(11));
    }

    #[test]
    fn add_then_delete_restores_original_list() {
        let mut e = editor();
        let before = e.items().to_vec();
        let key = e.add(FeatureDraft::new("SEO", "Ranks well")).unwrap();
        assert_eq!(e.len(), 3);
        e.delete(key).unwrap();
        assert_eq!(e.items(), before.as_slice());
        assert_eq!(e.mode(), EditorMode::Idle);
    }

    #[test]
    fn blank_title_is_rejected_without_state_change() {
        let mut e = editor();
        e.start_adding();
        e.draft_mut().title = "   ".into();
        assert_eq!(e.save(), Err(FeatureEditError::BlankTitle));
        assert_eq!(e.mode(), EditorMode::Adding);
        assert_eq!(e.len(), 2);

        assert_eq!(e.add(FeatureDraft::new("", "x")), Err(FeatureEditError::BlankTitle));
        assert_eq!(e.mode(), EditorMode::Adding);
        assert_eq!(e.draft().title, "   ");
    }

    #[test]
    fn editing_replaces_in_place_and_returns_to_idle() {
        let mut e = editor();
        e.edit(FeatureKey::Persisted(10)).unwrap();
        assert_eq!(e.mode(), EditorMode::Editing(FeatureKey::Persisted(10)));
        assert_eq!(e.draft().title, "Responsive");

        e.draft_mut().title = "Fully responsive".into();
        let key = e.save().unwrap();
        assert_eq!(key, FeatureKey::Persisted(10));
        assert_eq!(e.items()[1].title, "Fully responsive");
        assert_eq!(e.len(), 2);
        assert_eq!(e.mode(), EditorMode::Idle);
        assert_eq!(e.draft(), &FeatureDraft::default());
    }

    #[test]
    fn cancel_discards_buffer() {
        let mut e = editor();
        e.edit(FeatureKey::Persisted(11)).unwrap();
        e.draft_mut().title = "changed".into();
        e.cancel();
        assert_eq!(e.mode(), EditorMode::Idle);
        assert_eq!(e.items()[0].title, "Fast");
        assert!(e.draft().title.is_empty());
    }

    #[test]
    fn deleting_the_edited_item_resets_buffer() {
        let mut e = editor();
        e.edit(FeatureKey::Persisted(11)).unwrap();
        e.delete(FeatureKey::Persisted(11)).unwrap();
        assert_eq!(e.mode(), EditorMode::Idle);
        assert!(e.draft().title.is_empty());

        e.edit(FeatureKey::Persisted(10)).unwrap();
        let pending = {
            let mut other = e.clone();
            other.cancel();
            other.add(FeatureDraft::new("Tmp", "")).unwrap()
        };
        assert!(e.delete(pending).is_err());
        assert_eq!(e.mode(), EditorMode::Editing(FeatureKey::Persisted(10)));
    }

    #[test]
    fn pending_keys_never_collide() {
        let mut e = FeatureEditor::new();
        let a = e.add(FeatureDraft::new("A", "")).unwrap();
        let b = e.add(FeatureDraft::new("B", "")).unwrap();
        assert_ne!(a, b);
        e.delete(a).unwrap();
        let c = e.add(FeatureDraft::new("C", "")).unwrap();
        assert_ne!(a, c);
        assert_ne!(b, c);
    }

    #[test]
    fn payload_order_is_list_position() {
        let mut e = FeatureEditor::from_features(&[persisted(1, "A", 7), persisted(2, "B", 3)]);
        e.add(FeatureDraft::new("C", "")).unwrap();
        e.move_up(FeatureKey::Persisted(1)).unwrap();

        let payload = e.to_payload();
        let summary: Vec<(Option<i64>, &str, u32)> =
            payload.iter().map(|f| (f.id, f.title.as_str(), f.display_order)).collect();
        assert_eq!(summary, vec![(Some(1), "A", 0), (Some(2), "B", 1), (None, "C", 2)]);
    }

    #[test]
    fn move_at_edges_is_a_no_op() {
        let mut e = editor();
        let first = e.items()[0].key;
        let last = e.items()[1].key;
        e.move_up(first).unwrap();
        e.move_down(last).unwrap();
        assert_eq!(e.items()[0].key, first);
        assert!(e.move_up(FeatureKey::Persisted(99)).is_err());
    }
}
