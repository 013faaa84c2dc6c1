//! # Blockpad Editor
//!
//! Client-side editing engine: optimistic mutations over the page list,
//! persisted through a pluggable gateway.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ EditSession: Intent → UI state machines     │
//! │  - selection, block menu, image modal       │
//! │  - title edit, drag-and-drop, focus         │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ Coordinator: snapshot → apply → persist     │
//! │  - publishes DocumentState on a watch       │
//! │  - rolls back on any gateway failure        │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ PersistenceGateway                          │
//! │  - HttpGateway  → blockpad-server           │
//! │  - LocalGateway → PageStore                 │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Core Principles
//!
//! 1. **Local first**: the UI sees every change before the network does
//! 2. **Whole resources**: each persistence call carries a full page
//! 3. **Client ids**: pages and blocks are named before they are stored
//! 4. **Exact rollback**: a failed call restores its own pre-image
//!
//! ## Usage
//!
//! ```rust,ignore
//! use blockpad_editor::{Coordinator, EditSession, HttpGateway, HttpImageProbe, Intent};
//! use tokio_util::sync::CancellationToken;
//!
//! let gateway = HttpGateway::new("http://127.0.0.1:3030")?;
//! let mut session = EditSession::new(Coordinator::new(gateway), HttpImageProbe::default());
//!
//! session.load(&CancellationToken::new()).await?;
//! session.dispatch(Intent::CreatePage { title: "Notes".into() }).await?;
//! ```

pub mod coordinator;
pub mod errors;
pub mod gateway;
pub mod probe;
pub mod session;
pub mod state;
pub mod ui;

pub use coordinator::{Coordinator, RenameOutcome};
pub use errors::EditorError;
pub use gateway::{GatewayError, GatewayResult, HttpGateway, LocalGateway, PersistenceGateway};
pub use probe::{FixedProbe, HttpImageProbe, ImageDimensions, ImageProbe, ProbeError};
pub use session::{EditSession, Intent};
pub use state::DocumentState;
