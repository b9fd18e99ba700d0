//! Editing engine for Deck presentations: the document store, undo/redo
//! history, durable persistence, pointer gesture tools, keyboard shortcuts,
//! file import, and slideshow navigation.

pub mod config;
pub mod history;
pub mod import;
pub mod input;
pub mod persist;
pub mod presenter;
pub mod shortcuts;
pub mod store;
pub mod tools;

pub use config::{EditorConfig, StorageKeys};
pub use history::History;
pub use import::{FileDescriptor, ImportError};
pub use input::{InputEvent, Modifiers};
pub use persist::{MemoryStorage, Persistence, Storage, StorageError};
pub use presenter::Presenter;
pub use shortcuts::{ShortcutAction, ShortcutMap};
pub use store::DocumentStore;
pub use tools::ToolKind;
