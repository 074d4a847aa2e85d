pub mod clear;
pub mod list;
pub mod root;
pub mod submit;

pub use clear::clear_handler;
pub use kv_test::kv_test_handler;
pub use list::list_handler;
pub use root::root_handler;
pub use submit::submit_handler;
