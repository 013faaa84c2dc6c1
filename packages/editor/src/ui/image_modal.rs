use super::InsertionPoint;

/// URL entry for a new image block. Carries the insertion point chosen in
/// the block menu.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ImageModal {
    #[default]
    Closed,
    Open {
        at: InsertionPoint,
        url: String,
        error: Option<String>,
    },
}

impl ImageModal {
    pub fn open(&mut self, at: InsertionPoint) {
        *self = ImageModal::Open {
            at,
            url: String::new(),
            error: None,
        };
    }

    pub fn close(&mut self) {
        *self = ImageModal::Closed;
    }

    pub fn is_open(&self) -> bool {
        matches!(self, ImageModal::Open { .. })
    }

    /// Editing the URL clears a previous error.
    pub fn set_url(&mut self, value: String) {
        if let ImageModal::Open { url, error, .. } = self {
            *url = value;
            *error = None;
        }
    }

    pub fn fail(&mut self, message: String) {
        if let ImageModal::Open { error, .. } = self {
            *error = Some(message);
        }
    }

    /// URL and insertion point to submit, if open.
    pub fn submission(&self) -> Option<(String, InsertionPoint)> {
        match self {
            ImageModal::Open { at, url, .. } => Some((url.trim().to_string(), at.clone())),
            ImageModal::Closed => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            ImageModal::Open { error, .. } => error.as_deref(),
            ImageModal::Closed => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closed_modal_ignores_edits() {
        let mut modal = ImageModal::default();
        modal.set_url("https://x.png".into());
        modal.fail("nope".into());
        assert_eq!(modal, ImageModal::Closed);
        assert_eq!(modal.submission(), None);
    }

    #[test]
    fn test_edit_clears_error() {
        let mut modal = ImageModal::default();
        modal.open(InsertionPoint::End);
        modal.fail("bad url".into());
        assert_eq!(modal.error(), Some("bad url"));

        modal.set_url(" https://x.png ".into());
        assert_eq!(modal.error(), None);
        assert_eq!(
            modal.submission(),
            Some(("https://x.png".to_string(), InsertionPoint::End))
        );
    }
}
