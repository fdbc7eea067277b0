pub mod icons;
pub mod render;

pub use render::{print_error, print_success, print_warning, spinner};
