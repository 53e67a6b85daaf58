use crate::entity::CodeCartItem;

use super::{FormMode, ItemForm};

/// The overlay holding the add or edit form. At most one form is open.
#[derive(Debug, Clone, Default)]
pub struct Modal {
    open: bool,
    mode: FormMode,
    editing: Option<CodeCartItem>,
}

impl Modal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open_add(&mut self) {
        self.open = true;
        self.mode = FormMode::Add;
        self.editing = None;
    }

    pub fn open_edit(&mut self, item: CodeCartItem) {
        self.open = true;
        self.mode = FormMode::Edit;
        self.editing = Some(item);
    }

    pub fn close(&mut self) {
        self.open = false;
        self.editing = None;
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn mode(&self) -> FormMode {
        self.mode
    }

    pub fn editing(&self) -> Option<&CodeCartItem> {
        self.editing.as_ref()
    }

    pub fn title(&self) -> &'static str {
        match self.mode {
            FormMode::Edit => "Edit Code Cart / P-Bag",
            FormMode::Add => "Add New Code Cart / P-Bag",
        }
    }

    /// The form shown in the modal: blank for add, pre-filled for edit.
    pub fn form(&self) -> ItemForm {
        match &self.editing {
            Some(item) if self.mode == FormMode::Edit => ItemForm::from_item(item),
            _ => ItemForm::empty(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::ItemData;
    use chrono::Utc;

    fn item() -> CodeCartItem {
        CodeCartItem::new(
            ItemData {
                identifier: "CC-9".to_string(),
                location: "lab".to_string(),
                employee_initials: "QA".to_string(),
                ..ItemData::default()
            },
            Utc::now(),
        )
    }

    #[test]
    fn test_starts_closed() {
        let modal = Modal::new();
        assert!(!modal.is_open());
        assert!(modal.editing().is_none());
    }

    #[test]
    fn test_add_mode() {
        let mut modal = Modal::new();
        modal.open_add();
        assert!(modal.is_open());
        assert_eq!(modal.title(), "Add New Code Cart / P-Bag");
        assert_eq!(modal.form(), ItemForm::empty());
    }

    #[test]
    fn test_edit_mode_prefills_and_close_clears() {
        let mut modal = Modal::new();
        let item = item();
        modal.open_edit(item.clone());

        assert_eq!(modal.mode(), FormMode::Edit);
        assert_eq!(modal.title(), "Edit Code Cart / P-Bag");
        assert_eq!(modal.form().identifier, "CC-9");
        assert_eq!(modal.editing().map(|i| i.id), Some(item.id));

        modal.close();
        assert!(!modal.is_open());
        assert!(modal.editing().is_none());
    }

    #[test]
    fn test_switching_to_add_drops_edit_target() {
        let mut modal = Modal::new();
        modal.open_edit(item());
        modal.open_add();
        assert!(modal.editing().is_none());
    }
}
