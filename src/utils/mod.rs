pub mod constants;
pub mod url_utils;

pub use constants::*;
pub use url_utils::{get_mirror_path, normalize_root, relative_href};
