pub mod blaze_html;
pub mod dom_indices;
