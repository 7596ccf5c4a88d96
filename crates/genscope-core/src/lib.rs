//! Core types and traits for genscope.
//!
//! This crate provides foundational types used throughout genscope:
//! - Geometric primitives: [`Point`], [`Size`], [`Rect`]
//! - Colors: [`Color`]
//! - Layout constraints: [`Constraints`]
//! - Input events: [`Event`]
//! - The [`Widget`] and [`Canvas`] traits plus [`RecordingCanvas`]
//! - Row virtualization: [`VirtualRows`], [`ViewportProbe`], [`LoadMoreTrigger`]

mod canvas;
mod color;
mod constraints;
mod draw;
mod event;
mod geometry;
pub mod virtualization;
pub mod widget;

pub use canvas::RecordingCanvas;
pub use color::Color;
pub use constraints::Constraints;
pub use draw::DrawCommand;
pub use event::{Event, MouseButton};
pub use geometry::{Point, Rect, Size};
pub use virtualization::{
    LoadMoreTrigger, ViewportMetrics, ViewportProbe, VirtualItem, VirtualRows, VirtualRowsConfig,
    VirtualWindow, DEFAULT_LOAD_MORE_THRESHOLD,
};
pub use widget::{
    AccessibleRole, Canvas, CursorStyle, FontWeight, LayoutResult, TextStyle, TypeId, Widget,
};
