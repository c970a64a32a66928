//! Drive entity models and listing views.

pub mod model;
pub mod view;

pub use model::{CreateEntity, Entity, UpdateEntity};
pub use view::{EntityView, SharedEntityView};
