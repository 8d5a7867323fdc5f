//! # Gas Physics Engine
//!
//! Hard-disk particle physics for an ideal gas in a 2D container: particle
//! kinematics, overlapping-region spatial partitioning, elastic collision
//! response and container geometry (movable left wall, lid, divider).

pub mod bounds;
pub mod collision;
pub mod constants;
pub mod container;
pub mod divided;
pub mod ensemble;
pub mod error;
pub mod particle;
pub mod region;

pub use bounds::*;
pub use collision::*;
pub use constants::*;
pub use container::*;
pub use divided::*;
pub use error::*;
pub use particle::*;
pub use region::*;
