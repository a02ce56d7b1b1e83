//! Column commands

mod add;
mod reorder;

pub use add::AddColumn;
pub use reorder::ReorderColumn;
