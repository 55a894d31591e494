#![doc = "Virtual-time execution engine for robosim."]

pub mod controller;
pub mod driver;
pub mod io_stub;
pub mod oracle;
pub mod recorder;
pub mod result;

pub use controller::*;
pub use driver::*;
pub use io_stub::*;
pub use oracle::*;
pub use recorder::*;
pub use result::*;
