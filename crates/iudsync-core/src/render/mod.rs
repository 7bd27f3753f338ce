pub mod table_render;

pub use table_render::render_table;
