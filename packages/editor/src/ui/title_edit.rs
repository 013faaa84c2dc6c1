/// Inline editor for the page title.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TitleEdit {
    #[default]
    Viewing,
    Editing {
        draft: String,
        error: Option<String>,
    },
}

impl TitleEdit {
    pub fn begin(&mut self, current: &str) {
        *self = TitleEdit::Editing {
            draft: current.to_string(),
            error: None,
        };
    }

    pub fn set_draft(&mut self, value: String) {
        if let TitleEdit::Editing { draft, .. } = self {
            *draft = value;
        }
    }

    /// Discard the draft.
    pub fn cancel(&mut self) {
        *self = TitleEdit::Viewing;
    }

    pub fn is_editing(&self) -> bool {
        matches!(self, TitleEdit::Editing { .. })
    }

    pub fn draft(&self) -> Option<&str> {
        match self {
            TitleEdit::Editing { draft, .. } => Some(draft),
            TitleEdit::Viewing => None,
        }
    }

    /// Keep editing and show why the save failed.
    pub fn fail(&mut self, message: String) {
        if let TitleEdit::Editing { error, .. } = self {
            *error = Some(message);
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            TitleEdit::Editing { error, .. } => error.as_deref(),
            TitleEdit::Viewing => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edit_cycle() {
        let mut edit = TitleEdit::default();
        edit.set_draft("ignored".into());
        assert_eq!(edit, TitleEdit::Viewing);

        edit.begin("Notes");
        edit.set_draft("Journal".into());
        assert_eq!(edit.draft(), Some("Journal"));

        edit.fail("Page not found".into());
        assert!(edit.is_editing());
        assert_eq!(edit.error(), Some("Page not found"));

        edit.cancel();
        assert_eq!(edit, TitleEdit::Viewing);
    }
}
