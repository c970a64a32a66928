pub mod model;

pub use model::{Team, TeamMember};
