pub mod cross;
pub mod door;
pub mod goto;

pub use cross::Cross;
pub use door::{CloseDoor, OpenDoor};
pub use goto::GoTo;
