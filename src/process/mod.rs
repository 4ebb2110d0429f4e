mod process_handle;

pub use process_handle::*;
