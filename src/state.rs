use crate::store::AnalyticsStore;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub store: AnalyticsStore,
    pub whatsapp_number: Arc<str>,
}

impl AppState {
    pub fn new(store: AnalyticsStore, whatsapp_number: &str) -> Self {
        Self {
            store,
            whatsapp_number: Arc::from(whatsapp_number),
        }
    }
}
