use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Default)]
pub struct Metrics {
    store_hits: AtomicU64,
    store_leads: AtomicU64,
    flight_joins: AtomicU64,
    upstream_fetches: AtomicU64,
    upstream_errors: AtomicU64,
}

impl Metrics {
    pub fn record_store_hit(&self) {
        self.store_hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_store_lead(&self) {
        self.store_leads.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_flight_join(&self) {
        self.flight_joins.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_upstream_fetch(&self) {
        self.upstream_fetches.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_upstream_error(&self) {
        self.upstream_errors.fetch_add(1, Ordering::Relaxed);
    }

    pub fn render_prometheus(&self) -> String {
        let hits = self.store_hits.load(Ordering::Relaxed);
        let leads = self.store_leads.load(Ordering::Relaxed);
        let joins = self.flight_joins.load(Ordering::Relaxed);
        let fetches = self.upstream_fetches.load(Ordering::Relaxed);
        let errors = self.upstream_errors.load(Ordering::Relaxed);

        format!(
            "# TYPE turnout_store_hits_total counter\n\
turnout_store_hits_total {}\n\
# TYPE turnout_store_leads_total counter\n\
turnout_store_leads_total {}\n\
# TYPE turnout_flight_joins_total counter\n\
turnout_flight_joins_total {}\n\
# TYPE turnout_upstream_fetches_total counter\n\
turnout_upstream_fetches_total {}\n\
# TYPE turnout_upstream_errors_total counter\n\
turnout_upstream_errors_total {}\n",
            hits, leads, joins, fetches, errors
        )
    }
}
