//! Repository implementations. All SQL lives here.

pub mod activity;
pub mod entity;
pub mod grant;
pub mod listing;
pub mod quota;
pub mod tag;
pub mod team;
pub mod user;

pub use activity::ActivityRepository;
pub use entity::EntityRepository;
pub use grant::{GrantRepository, GrantUpdate};
pub use listing::ListingRepository;
pub use quota::QuotaRepository;
pub use tag::TagRepository;
pub use team::TeamRepository;
pub use user::UserRepository;
