//! Form rendering

mod edit_page;
mod field_renderer;

pub use edit_page::draw_edit_page;
