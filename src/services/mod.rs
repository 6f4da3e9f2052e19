pub mod droid;
pub mod harvester;
pub mod page;
pub mod record_writer;
pub mod reveal_driver;

#[cfg(test)]
pub(crate) mod testing;

pub use droid::*;
pub use harvester::*;
pub use page::*;
pub use record_writer::*;
pub use reveal_driver::*;
