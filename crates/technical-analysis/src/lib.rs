pub mod indicators;
pub mod snapshot;
pub mod volume_profile;


pub use indicators::*;
pub use snapshot::*;
pub use volume_profile::*;
