//! # drive-store
//!
//! SQLite-backed persistence for Team Drive: the connection pool wrapper,
//! embedded schema migrations, and the repositories that own all SQL.

pub mod connection;
pub mod migration;
pub mod repositories;

pub use connection::DatabasePool;

#[cfg(test)]
pub(crate) mod testing {
    //! Shared fixtures for repository tests.

    use uuid::Uuid;

    use drive_entity::{Team, User};

    use crate::connection::DatabasePool;

    pub async fn pool() -> DatabasePool {
        DatabasePool::open_in_memory().await.unwrap()
    }

    pub async fn seed_user(db: &DatabasePool, email: &str) -> User {
        crate::repositories::user::UserRepository::new(db.pool().clone())
            .create(email, email.split('@').next().unwrap())
            .await
            .unwrap()
    }

    pub async fn seed_team(db: &DatabasePool, title: &str, members: &[Uuid]) -> Team {
        let repo = crate::repositories::team::TeamRepository::new(db.pool().clone());
        let team = repo.create(title).await.unwrap();
        for member in members {
            repo.add_member(team.id, *member).await.unwrap();
        }
        team
    }
}
