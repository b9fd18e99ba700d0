//! Document model for Deck presentations: slides, positioned elements, rich
//! text, tables, layouts, and the pure geometry behind drag, resize, and crop.

pub mod crop;
pub mod datauri;
pub mod error;
pub mod geometry;
pub mod id;
pub mod layout;
pub mod model;
pub mod patch;
pub mod richtext;
pub mod table;

pub use crop::{CropRect, CroppedImage, crop_image};
pub use datauri::DataUri;
pub use error::{Error, Result};
pub use geometry::{Bounds, ResizeHandle};
pub use id::{CommentId, ElementId, SlideId};
pub use layout::{LayoutKind, SlideField};
pub use model::*;
pub use patch::{ElementPatch, SlidePatch};
pub use richtext::{RichText, RunStyle, TextRun};
pub use table::{CellRange, CellStyle, TableData, TableTheme};
