pub mod balancer;
pub mod distributor;
pub mod metrics;
pub mod splitter;
pub mod tuner;

pub use crate::domain::model::{Player, Role, Team, TeamCount};
pub use crate::domain::ports::{ConfigProvider, Storage};
pub use crate::utils::error::Result;
