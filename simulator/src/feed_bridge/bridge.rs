use crate::feed_bridge::model::FixtureModel;
use anyhow::Context;
use serde_json::json;
use std::{
    collections::HashMap,
    net::SocketAddr,
    sync::{Arc, RwLock},
};
use warp::{http::StatusCode, reply::Response, Filter, Reply};

pub fn fixture_bind_address(port: u16) -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], port))
}

fn error_reply(status: StatusCode, message: &str) -> Response {
    warp::reply::with_status(warp::reply::json(&json!({ "error": message })), status)
        .into_response()
}

fn answer(params: &HashMap<String, String>, state: &RwLock<FixtureModel>) -> Response {
    let model = match state.read() {
        Ok(guard) => guard,
        Err(_) => return error_reply(StatusCode::INTERNAL_SERVER_ERROR, "fixture state poisoned"),
    };

    if let Some(code) = model.fail_status {
        let status = StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        log::info!("[fixture] forced failure {}", status);
        return error_reply(status, "forced failure");
    }

    match model.query(params) {
        Ok(collection) => {
            log::info!("[fixture] serving {} features", collection.features.len());
            warp::reply::json(&collection).into_response()
        }
        Err(rejection) => {
            log::warn!("[fixture] rejected query: {}", rejection.message);
            let status = StatusCode::from_u16(rejection.status).unwrap_or(StatusCode::BAD_REQUEST);
            error_reply(status, &rejection.message)
        }
    }
}

pub fn routes(
    state: Arc<RwLock<FixtureModel>>,
) -> impl Filter<Extract = (Response,), Error = warp::Rejection> + Clone {
    let state_filter = warp::any().map(move || state.clone());

    warp::path!("fdsnws" / "event" / "1" / "query")
        .and(warp::get())
        .and(warp::query::<HashMap<String, String>>())
        .and(state_filter)
        .map(
            |params: HashMap<String, String>, state: Arc<RwLock<FixtureModel>>| {
                answer(&params, &state)
            },
        )
}

/// Local stand-in for the FDSN event service, serving a synthetic catalog.
pub struct FeedBridge {
    state: Arc<RwLock<FixtureModel>>,
    addr: SocketAddr,
}

impl FeedBridge {
    /// Binds `addr` (port 0 picks a free port) and serves on the current runtime.
    pub async fn bind(model: FixtureModel, addr: SocketAddr) -> anyhow::Result<Self> {
        let state = Arc::new(RwLock::new(model));
        let query_route = routes(state.clone());

        let (bound, server) = warp::serve(query_route)
            .try_bind_ephemeral(addr)
            .with_context(|| format!("binding fixture feed on {addr}"))?;
        tokio::spawn(server);

        Ok(Self { state, addr: bound })
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub fn query_url(&self) -> String {
        format!("http://{}/fdsnws/event/1/query", self.addr)
    }

    pub fn set_fail_status(&self, status: Option<u16>) -> anyhow::Result<()> {
        let mut guard = self
            .state
            .write()
            .map_err(|_| anyhow::anyhow!("fixture state poisoned"))?;
        guard.fail_status = status;
        Ok(())
    }

    pub fn publish_status(&self, message: &str) {
        log::info!("[fixture] {}", message);
    }

    #[cfg(test)]
    pub fn snapshot(&self) -> FixtureModel {
        self.state.read().unwrap().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::catalog::{generate_catalog, GeneratorConfig};
    use chrono::Utc;
    use quakecore::feed::parse_feature_collection;

    async fn bridge() -> FeedBridge {
        let catalog = generate_catalog(
            &GeneratorConfig {
                count: 25,
                ..Default::default()
            },
            Utc::now(),
        )
        .unwrap();
        FeedBridge::bind(FixtureModel::new(catalog), fixture_bind_address(0))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn route_serves_filtered_geojson() {
        let catalog = generate_catalog(&GeneratorConfig::default(), Utc::now()).unwrap();
        let expected = catalog
            .iter()
            .filter(|f| f.properties.mag.is_some_and(|m| m >= 4.0))
            .count();
        let state = Arc::new(RwLock::new(FixtureModel::new(catalog)));

        let response = warp::test::request()
            .method("GET")
            .path("/fdsnws/event/1/query?format=geojson&minmagnitude=4&orderby=time")
            .reply(&routes(state))
            .await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = std::str::from_utf8(response.body()).unwrap();
        let collection = parse_feature_collection(body).unwrap();
        assert_eq!(collection.features.len(), expected);
    }

    #[tokio::test]
    async fn bound_bridge_reports_real_port() {
        let bridge = bridge().await;
        assert_ne!(bridge.addr().port(), 0);
        assert!(bridge.query_url().ends_with("/fdsnws/event/1/query"));
        assert_eq!(bridge.snapshot().features.len(), 25);
    }

    #[tokio::test]
    async fn fail_status_can_be_toggled() {
        let bridge = bridge().await;
        bridge.set_fail_status(Some(503)).unwrap();
        assert_eq!(bridge.snapshot().fail_status, Some(503));
        bridge.set_fail_status(None).unwrap();
        let snapshot = bridge.snapshot();
        assert_eq!(snapshot.fail_status, None);
        assert_eq!(snapshot.features.len(), 25);
    }

    #[test]
    fn forced_failure_uses_configured_status() {
        let state = RwLock::new(FixtureModel {
            features: Vec::new(),
            fail_status: Some(502),
        });
        let response = answer(&HashMap::new(), &state);
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn bad_query_is_bad_request() {
        let state = RwLock::new(FixtureModel::default());
        let params = HashMap::from([("format".to_string(), "csv".to_string())]);
        assert_eq!(answer(&params, &state).status(), StatusCode::BAD_REQUEST);
    }
}
