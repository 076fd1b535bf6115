//! Business logic services

pub mod settings;
pub mod stats;
pub mod sweep;
pub mod tags;
pub mod users;
pub mod visitors;
pub mod visits;

use std::sync::Arc;

use crate::{config::AuthConfig, repository::Repository};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub users: users::UsersService,
    pub visitors: visitors::VisitorsService,
    pub visits: visits::VisitsService,
    pub tags: tags::TagsService,
    pub sweep: sweep::SweepService,
    pub settings: settings::SettingsService,
    pub stats: stats::StatsService,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(
        repository: Repository,
        auth_config: AuthConfig,
        notifier: Arc<dyn sweep::AutoCheckoutNotifier>,
    ) -> Self {
        let visits = visits::VisitsService::new(repository.clone());
        Self {
            users: users::UsersService::new(repository.clone(), auth_config),
            visitors: visitors::VisitorsService::new(repository.clone()),
            visits: visits.clone(),
            tags: tags::TagsService::new(repository.clone()),
            sweep: sweep::SweepService::new(repository.clone(), visits, notifier),
            settings: settings::SettingsService::new(repository.clone()),
            stats: stats::StatsService::new(repository),
        }
    }
}
