mod page_renderer;

pub use page_renderer::{render_page, render_reports_list};
