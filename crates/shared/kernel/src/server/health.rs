use super::state::ApiState;
use axum::Json;
use axum::extract::State;
use axum::http::header;
use axum::response::IntoResponse;
use std::collections::BTreeMap;
use std::sync::LazyLock;
use std::time::Instant;
use zelo_derive::{api_handler, api_model};
use zelo_domain::constants::SYSTEM_TAG;
use zelo_domain::registry::SliceStatus;

static START_TIME: LazyLock<Instant> = LazyLock::new(Instant::now);

/// Liveness plus the condition of every registered feature.
#[api_model]
struct HealthResponse {
    /// `up`, or `degraded` when any feature runs on a fallback.
    status: &'static str,
    version: &'static str,
    /// Seconds since the first health request of this process.
    uptime: u64,
    /// Feature name to `ready` or the reason it is degraded.
    features: BTreeMap<String, String>,
}

impl HealthResponse {
    fn from_state(state: &ApiState) -> Self {
        let mut degraded = false;
        let features = state
            .slices()
            .map(|slice| {
                let status = match slice.state.status() {
                    SliceStatus::Ready => "ready".to_owned(),
                    SliceStatus::Degraded(reason) => {
                        degraded = true;
                        reason
                    },
                };
                (slice.short_name().to_owned(), status)
            })
            .collect();

        Self {
            status: if degraded { "degraded" } else { "up" },
            version: env!("CARGO_PKG_VERSION"),
            uptime: START_TIME.elapsed().as_secs(),
            features,
        }
    }
}

#[api_handler(
    get,
    path = "/health",
    responses((status = OK, description = "Service and feature health", body = HealthResponse)),
    tag = SYSTEM_TAG,
)]
pub(super) async fn health_handler(State(state): State<ApiState>) -> impl IntoResponse {
    (
        [
            (header::CACHE_CONTROL, "no-store, no-cache, must-revalidate"),
            (header::PRAGMA, "no-cache"),
        ],
        Json(HealthResponse::from_state(&state)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::any::Any;
    use zelo_domain::config::ApiConfig;
    use zelo_domain::registry::{FeatureSlice, InitializedSlice};

    #[derive(Debug)]
    struct Fallback;

    impl FeatureSlice for Fallback {
        fn as_any(&self) -> &dyn Any {
            self
        }

        fn status(&self) -> SliceStatus {
            SliceStatus::Degraded("using defaults".to_owned())
        }
    }

    #[derive(Debug)]
    struct Steady;

    impl FeatureSlice for Steady {
        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    fn state(slices: Vec<InitializedSlice>) -> ApiState {
        ApiState::builder().config(ApiConfig::default()).register_slices(slices).build().unwrap()
    }

    #[test]
    fn all_ready_is_up() {
        let report = HealthResponse::from_state(&state(vec![InitializedSlice::new(Steady)]));
        assert_eq!(report.status, "up");
        assert_eq!(report.features["Steady"], "ready");
    }

    #[test]
    fn one_fallback_degrades_the_service() {
        let report = HealthResponse::from_state(&state(vec![
            InitializedSlice::new(Steady),
            InitializedSlice::new(Fallback),
        ]));
        assert_eq!(report.status, "degraded");
        assert_eq!(report.features["Fallback"], "using defaults");
        assert_eq!(report.features.len(), 2);
    }
}
