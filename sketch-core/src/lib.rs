//! # Sketch Core
//!
//! Core logic of the diagram workbench sketch canvas: a tool-driven vector
//! drawing surface that accumulates primitives and serializes them to SVG.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │                 sketch-core                 │
//! ├─────────────────────────────────────────────┤
//! │  Input Translator │  Session State Machine  │
//! │  - Pointer/touch  │  - Committed list       │
//! │  - Surface coords │  - Tool/color/width     │
//! │                   │  - Text input requests  │
//! ├─────────────────────────────────────────────┤
//! │  Primitive Model  │  Geometry + Serializer  │
//! │  - Six tools      │  - Shared outlines      │
//! │  - Validation     │  - SVG export           │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! Rendering to pixels lives in `sketch-renderer`; this crate does no I/O.

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod error;
pub mod event;
pub mod geometry;
pub mod input;
pub mod primitive;
pub mod session;
pub mod svg;

pub use config::{SessionConfig, SurfaceSize};
pub use error::{CanvasError, CanvasResult};
pub use event::{InputEvent, PointerEvent, PointerPhase, TouchEvent, TouchPhase, TouchPoint};
pub use geometry::{Outline, StrokeStyle, ARROW_HEAD_LENGTH};
pub use input::{InputTranslator, SurfaceBounds};
pub use primitive::{Color, Point, Primitive, StrokeWidth, Tool, TEXT_SIZE_FACTOR};
pub use session::{RenderRequest, SessionState, SketchSession};

/// Sketch core version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
