//! Card commands

mod mv;
mod remove;
mod reorder;

pub use mv::MoveCard;
pub use remove::RemoveCard;
pub use reorder::ReorderCard;
