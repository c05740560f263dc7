pub mod command;
pub mod detect;
pub mod fs;

pub use command::{CommandError, CommandRunner, SystemCommandRunner};
pub use detect::{Platform, detect, detect_install_path};
pub use fs::{Filesystem, LocalFs};
