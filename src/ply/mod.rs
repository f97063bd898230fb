//! Definitions used to model PLY headers and decoded point sets.

mod property;
mod ply_data_structure;
mod key_map;
mod sample;

pub use self::property::*;
pub use self::ply_data_structure::*;
pub use self::key_map::*;
pub use self::sample::*;
