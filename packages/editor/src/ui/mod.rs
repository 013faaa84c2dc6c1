//! # UI State Machines
//!
//! Small exclusive-choice machines for the transient parts of the editor.
//! None of them touch the document; they only decide what the next intent
//! means. Transitions that don't apply in the current state are ignored.

mod drag;
mod focus;
mod image_modal;
mod menu;
mod selection;
mod title_edit;

pub use drag::{DragState, DropRequest};
pub use focus::Focus;
pub use image_modal::ImageModal;
pub use menu::{BlockMenu, InsertionPoint, MenuPosition};
pub use selection::Selection;
pub use title_edit::TitleEdit;
