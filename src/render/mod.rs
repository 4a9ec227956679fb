pub mod html;

pub use html::{page_file_name, render_to_string, PageContext, YearLinks};
