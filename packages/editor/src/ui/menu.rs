use blockpad_document::BlockId;

/// Where a block created from the menu will go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InsertionPoint {
    After(BlockId),
    End,
}

impl InsertionPoint {
    pub fn anchor(&self) -> Option<&BlockId> {
        match self {
            InsertionPoint::After(id) => Some(id),
            InsertionPoint::End => None,
        }
    }
}

/// Screen position the menu is anchored to, in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MenuPosition {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub enum BlockMenu {
    #[default]
    Closed,
    Open {
        position: MenuPosition,
        at: InsertionPoint,
    },
}

impl BlockMenu {
    /// Opening replaces whatever was open before.
    pub fn open(&mut self, position: MenuPosition, at: InsertionPoint) {
        *self = BlockMenu::Open { position, at };
    }

    pub fn close(&mut self) {
        *self = BlockMenu::Closed;
    }

    pub fn is_open(&self) -> bool {
        matches!(self, BlockMenu::Open { .. })
    }

    /// Close the menu, handing back its insertion point if it was open.
    pub fn take(&mut self) -> Option<InsertionPoint> {
        match std::mem::take(self) {
            BlockMenu::Open { at, .. } => Some(at),
            BlockMenu::Closed => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ORIGIN: MenuPosition = MenuPosition { x: 0.0, y: 0.0 };

    #[test]
    fn test_open_replaces_prior_state() {
        let mut menu = BlockMenu::default();
        menu.open(ORIGIN, InsertionPoint::End);
        menu.open(MenuPosition { x: 5.0, y: 9.0 }, InsertionPoint::After(BlockId::from("b")));

        assert_eq!(
            menu,
            BlockMenu::Open {
                position: MenuPosition { x: 5.0, y: 9.0 },
                at: InsertionPoint::After(BlockId::from("b")),
            }
        );
    }

    #[test]
    fn test_take_closes() {
        let mut menu = BlockMenu::default();
        assert_eq!(menu.take(), None);

        menu.open(ORIGIN, InsertionPoint::End);
        assert_eq!(menu.take(), Some(InsertionPoint::End));
        assert!(!menu.is_open());
    }
}
