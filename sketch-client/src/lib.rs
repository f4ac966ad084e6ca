//! # Sketch Client
//!
//! Talks to the diagram service that turns sketches into publication-style
//! figures, and keeps the workbench state around it.
//!
//! ```text
//! SketchSession ──export_svg──▶ Workbench ──▶ DiagramClient ──HTTP──▶ /api/diagram/*
//!                                   │
//!                                   └─ current SVG, TikZ, chat history
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod client;
pub mod config;
pub mod error;
pub mod replay;
pub mod workbench;

pub use client::{
    DiagramClient, GenerateRequest, GeneratedDiagram, IterateRequest, IteratedDiagram,
    RefineRequest, RefinedDiagram, StyleCatalog, StyleInfo, TikzRequest, DEFAULT_DIAGRAM_TYPE,
    DEFAULT_STYLE,
};
pub use config::{ClientConfig, RetryConfig, DEFAULT_BASE_URL};
pub use error::{DiagramError, DiagramResult};
pub use replay::{replay, replay_json, ReplaySummary};
pub use workbench::{Workbench, HISTORY_WINDOW};
