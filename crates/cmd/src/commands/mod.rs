pub mod cat;
pub mod chmod;
pub mod copy;
pub mod link;
pub mod list;
pub mod mkdir;
pub mod remove;
pub mod touch;
pub mod write;

pub use cat::cat_command;
pub use chmod::chmod_command;
pub use copy::{copy_command, move_command};
pub use link::link_command;
pub use list::list_command;
pub use mkdir::mkdir_command;
pub use remove::remove_command;
pub use touch::touch_command;
pub use write::write_command;
