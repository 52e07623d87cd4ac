use std::sync::Arc;

use crate::config::Config;
use crate::metrics::Metrics;
use crate::routes::tasks::queries::TaskRepository;
use crate::routes::tasks::service::TaskService;
use crate::store::KeyValueStore;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub store: Arc<dyn KeyValueStore>,
    pub tasks: TaskService,
    pub metrics: Metrics,
}

impl AppState {
    pub fn new(config: Config, store: Arc<dyn KeyValueStore>) -> Result<Self, prometheus::Error> {
        let metrics = Metrics::new()?;
        let repository = TaskRepository::new(store.clone());

        Ok(Self {
            config: Arc::new(config),
            tasks: TaskService::new(repository, metrics.clone()),
            store,
            metrics,
        })
    }
}
