pub mod item;
pub mod timestamp;

pub use item::{Item, ItemDraft, ItemEdit, NOTES_LIMIT, Price};
