//! Port definitions — traits that adapters implement.
//!
//! Ports are the boundaries between the application core and the outside world.
//! They are defined here (in `app`) so that both the use-case layer and the
//! adapter layer can depend on them without creating circular dependencies.

pub mod command_source;
pub mod robot_link;
pub mod scanner;

pub use command_source::CommandSource;
pub use robot_link::RobotLink;
pub use scanner::{Advertisement, RobotScanner};
