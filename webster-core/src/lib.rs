//! # Webster Core
//!
//! Canvas editing model for the Webster design studio. This crate holds
//! everything the editor manipulates — no rendering, no I/O.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │                webster-core                 │
//! ├─────────────────────────────────────────────┤
//! │  Stage            │  Frame                  │
//! │  - Objects        │  - Dimensions / zoom    │
//! │  - Selection      │  - Presets              │
//! │  - Z-ordering     │  - Background sizing    │
//! ├─────────────────────────────────────────────┤
//! │  History          │  Document               │
//! │  - Snapshots      │  - Serialized form      │
//! │  - Undo / redo    │  - Content validation   │
//! └─────────────────────────────────────────────┘
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod document;
pub mod error;
pub mod filter;
pub mod frame;
pub mod history;
pub mod object;
pub mod stage;

pub use document::{parse_content, serialize_content, CanvasDocument};
pub use error::{CanvasError, CanvasResult};
pub use filter::{FilterChain, FilterKind, FilterValues};
pub use frame::{Frame, StandardDimension, STANDARD_DIMENSIONS};
pub use history::History;
pub use object::{
    Bounds, FontStyle, ObjectId, ObjectKind, ShapeType, StageObject, TextAlign, TextDecoration,
    Transform,
};
pub use stage::Stage;

/// Webster core version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
