pub mod model;

pub use model::{Favourite, RecentEntry};
