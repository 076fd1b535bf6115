//! Repository layer for database operations

pub mod settings;
pub mod tags;
pub mod users;
pub mod visitors;
pub mod visits;

use sqlx::{Pool, Postgres};

/// Main repository struct holding database connection pool
#[derive(Clone)]
pub struct Repository {
    pub pool: Pool<Postgres>,
    pub tags: tags::TagsRepository,
    pub visits: visits::VisitsRepository,
    pub visitors: visitors::VisitorsRepository,
    pub users: users::UsersRepository,
    pub settings: settings::SettingsRepository,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            tags: tags::TagsRepository::new(pool.clone()),
            visits: visits::VisitsRepository::new(pool.clone()),
            visitors: visitors::VisitorsRepository::new(pool.clone()),
            users: users::UsersRepository::new(pool.clone()),
            settings: settings::SettingsRepository::new(pool.clone()),
            pool,
        }
    }
}
