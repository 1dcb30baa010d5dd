pub mod enums;
pub mod intake;
pub mod summary;
pub mod vitals;

pub use enums::*;
pub use intake::*;
pub use summary::*;
pub use vitals::*;
