//! What a front-end should draw, derived purely from controller state.

use uuid::Uuid;

use crate::controller::PageController;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowView {
    pub id: Uuid,
    /// The draft text while this row is being edited.
    pub text: String,
    pub completed: bool,
    pub editing: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageView {
    pub rows: Vec<RowView>,
    pub loading: bool,
    pub page_label: String,
    pub prev_enabled: bool,
    pub next_enabled: bool,
    pub error: Option<String>,
}

impl PageView {
    pub fn project(controller: &PageController) -> Self {
        let state = controller.state();
        let edit = controller.edit_session();
        let rows = state
            .items
            .iter()
            .map(|item| {
                let editing = edit.is_editing(item.id);
                RowView {
                    id: item.id,
                    text: if editing {
                        edit.draft_text.clone()
                    } else {
                        item.text.clone()
                    },
                    completed: item.completed,
                    editing,
                }
            })
            .collect();
        Self {
            rows,
            loading: state.loading,
            page_label: format!("Page {} of {}", state.page_index + 1, controller.total_pages()),
            prev_enabled: controller.can_go_prev(),
            next_enabled: controller.can_go_next(),
            error: state.last_error.as_ref().map(ToString::to_string),
        }
    }
}
