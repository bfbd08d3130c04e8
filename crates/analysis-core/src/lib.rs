pub mod error;
pub mod metrics;
pub mod statements;
pub mod stats;
pub mod thresholds;
pub mod traits;
pub mod types;

pub use error::*;
pub use metrics::*;
pub use statements::*;
pub use thresholds::*;
pub use traits::*;
pub use types::*;
