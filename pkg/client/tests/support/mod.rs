//! In-process mock of the k3rs API server for one resource kind.
//!
//! Objects live in memory; every mutation bumps a global version counter,
//! lands in an event log, and is broadcast to open watches as SSE.

use axum::{
    Json, Router,
    extract::{Path, Query, Request, State},
    http::{StatusCode, header},
    middleware::{self, Next},
    response::{
        IntoResponse, Response,
        sse::{Event, KeepAlive, Sse},
    },
    routing::get,
};
use chrono::Utc;
use pkg_types::{Resource, ResourceList, Selector, Status, StatusReason, WatchEvent};
use std::collections::{BTreeMap, HashMap};
use std::convert::Infallible;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::{RwLock, broadcast};
use tokio_stream::StreamExt;
use tokio_stream::wrappers::BroadcastStream;

#[derive(Clone)]
struct Recorded<K> {
    version: u64,
    namespace: String,
    event: WatchEvent<K>,
}

struct Registry<K> {
    version: u64,
    objects: BTreeMap<(String, String), K>,
    log: Vec<Recorded<K>>,
}

#[derive(Clone)]
pub struct MockApi<K> {
    registry: Arc<RwLock<Registry<K>>>,
    sender: broadcast::Sender<Recorded<K>>,
    token: Option<String>,
}

impl<K: Resource> MockApi<K> {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(1024);
        Self {
            registry: Arc::new(RwLock::new(Registry {
                version: 0,
                objects: BTreeMap::new(),
                log: Vec::new(),
            })),
            sender,
            token: None,
        }
    }

    pub fn with_token(mut self, token: &str) -> Self {
        self.token = Some(token.to_string());
        self
    }

    fn router(self) -> Router {
        let collection = format!("/api/v1/namespaces/{{ns}}/{}", K::PLURAL);
        let item = format!("{}/{{name}}", collection);
        let feed = format!("/api/v1/watch/namespaces/{{ns}}/{}", K::PLURAL);
        Router::new()
            .route(&collection, get(list::<K>).post(create::<K>))
            .route(&item, get(fetch::<K>).put(update::<K>).delete(remove::<K>))
            .route(&feed, get(watch::<K>))
            .route_layer(middleware::from_fn_with_state(self.clone(), auth::<K>))
            .with_state(self)
    }

    /// Bind to an ephemeral port and return the base URL.
    pub async fn serve(self) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let app = self.router();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    /// Record a mutation. Caller holds the write lock so log order is
    /// version order.
    fn emit(&self, registry: &mut Registry<K>, namespace: &str, event: WatchEvent<K>) {
        let recorded = Recorded {
            version: registry.version,
            namespace: namespace.to_string(),
            event,
        };
        registry.log.push(recorded.clone());
        let _ = self.sender.send(recorded);
    }
}

fn status_response(reason: StatusReason, message: String) -> Response {
    let status = Status::new(reason, message);
    let code = StatusCode::from_u16(status.code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (code, Json(status)).into_response()
}

fn selector(query: &HashMap<String, String>, key: &str) -> Result<Selector, Response> {
    Selector::parse(query.get(key).map(String::as_str).unwrap_or(""))
        .map_err(|e| status_response(StatusReason::BadRequest, e.to_string()))
}

fn selected<K: Resource>(obj: &K, labels: &Selector, fields: &Selector) -> bool {
    labels.matches(obj.labels()) && fields.matches(&obj.field_set())
}

async fn auth<K: Resource>(
    State(api): State<MockApi<K>>,
    req: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let Some(expected) = &api.token else {
        return Ok(next.run(req).await);
    };
    let presented = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "));
    if presented == Some(expected.as_str()) {
        Ok(next.run(req).await)
    } else {
        Err(StatusCode::UNAUTHORIZED)
    }
}

async fn list<K: Resource>(
    State(api): State<MockApi<K>>,
    Path(ns): Path<String>,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    let labels = match selector(&query, "labels") {
        Ok(s) => s,
        Err(resp) => return resp,
    };
    let registry = api.registry.read().await;
    let items: Vec<K> = registry
        .objects
        .iter()
        .filter(|((obj_ns, _), obj)| *obj_ns == ns && labels.matches(obj.labels()))
        .map(|(_, obj)| obj.clone())
        .collect();
    let list = ResourceList {
        resource_version: registry.version.to_string(),
        items,
    };
    (StatusCode::OK, Json(list)).into_response()
}

async fn fetch<K: Resource>(
    State(api): State<MockApi<K>>,
    Path((ns, name)): Path<(String, String)>,
) -> Response {
    let registry = api.registry.read().await;
    match registry.objects.get(&(ns, name.clone())) {
        Some(obj) => (StatusCode::OK, Json(obj.clone())).into_response(),
        None => status_response(StatusReason::NotFound, format!("{} '{}' not found", K::KIND, name)),
    }
}

async fn create<K: Resource>(
    State(api): State<MockApi<K>>,
    Path(ns): Path<String>,
    Json(mut obj): Json<K>,
) -> Response {
    let mut registry = api.registry.write().await;
    let key = (ns.clone(), obj.name().to_string());
    if registry.objects.contains_key(&key) {
        return status_response(
            StatusReason::AlreadyExists,
            format!("{} '{}' already exists", K::KIND, obj.name()),
        );
    }
    registry.version += 1;
    let meta = obj.metadata_mut();
    meta.namespace = ns.clone();
    meta.resource_version = registry.version.to_string();
    meta.created_at = Some(Utc::now());
    registry.objects.insert(key, obj.clone());
    api.emit(&mut registry, &ns, WatchEvent::Added(obj.clone()));
    (StatusCode::CREATED, Json(obj)).into_response()
}

async fn update<K: Resource>(
    State(api): State<MockApi<K>>,
    Path((ns, name)): Path<(String, String)>,
    Json(mut obj): Json<K>,
) -> Response {
    let mut registry = api.registry.write().await;
    let key = (ns.clone(), name.clone());
    let Some(current) = registry.objects.get(&key) else {
        return status_response(StatusReason::NotFound, format!("{} '{}' not found", K::KIND, name));
    };
    if current.resource_version() != obj.resource_version() {
        return status_response(
            StatusReason::Conflict,
            format!(
                "{} '{}' has been modified: stored version {}, update carries {}",
                K::KIND,
                name,
                current.resource_version(),
                obj.resource_version()
            ),
        );
    }
    let created_at = current.metadata().created_at;
    registry.version += 1;
    let meta = obj.metadata_mut();
    meta.name = name;
    meta.namespace = ns.clone();
    meta.resource_version = registry.version.to_string();
    meta.created_at = created_at;
    registry.objects.insert(key, obj.clone());
    api.emit(&mut registry, &ns, WatchEvent::Modified(obj.clone()));
    (StatusCode::OK, Json(obj)).into_response()
}

async fn remove<K: Resource>(
    State(api): State<MockApi<K>>,
    Path((ns, name)): Path<(String, String)>,
) -> Response {
    let mut registry = api.registry.write().await;
    let Some(mut obj) = registry.objects.remove(&(ns.clone(), name.clone())) else {
        return status_response(StatusReason::NotFound, format!("{} '{}' not found", K::KIND, name));
    };
    registry.version += 1;
    obj.metadata_mut().resource_version = registry.version.to_string();
    api.emit(&mut registry, &ns, WatchEvent::Deleted(obj));
    StatusCode::NO_CONTENT.into_response()
}

async fn watch<K: Resource>(
    State(api): State<MockApi<K>>,
    Path(ns): Path<String>,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    let (labels, fields) = match (selector(&query, "labels"), selector(&query, "fields")) {
        (Ok(l), Ok(f)) => (l, f),
        (Err(resp), _) | (_, Err(resp)) => return resp,
    };

    // Subscribe before reading the log so no mutation falls in between.
    let rx = api.sender.subscribe();
    let registry = api.registry.read().await;
    let from = match query.get("resourceVersion").map(String::as_str) {
        None | Some("") => registry.version,
        Some(v) => match v.parse::<u64>() {
            Ok(v) => v,
            Err(_) => {
                return status_response(StatusReason::BadRequest, format!("bad resourceVersion '{}'", v));
            }
        },
    };
    let last = registry.version.max(from);

    let wanted = {
        let ns = ns.clone();
        move |rec: &Recorded<K>| {
            rec.namespace == ns
                && rec
                    .event
                    .object()
                    .is_some_and(|obj| selected(obj, &labels, &fields))
        }
    };
    let to_sse = |rec: Recorded<K>| {
        let data = serde_json::to_string(&rec.event).unwrap_or_default();
        Ok::<_, Infallible>(Event::default().data(data))
    };

    let buffered: Vec<Recorded<K>> = registry
        .log
        .iter()
        .filter(|rec| rec.version > from && wanted(*rec))
        .cloned()
        .collect();
    drop(registry);

    let live = BroadcastStream::new(rx).filter_map(move |result| match result {
        Ok(rec) if rec.version > last && wanted(&rec) => Some(to_sse(rec)),
        _ => None,
    });
    let combined = tokio_stream::iter(buffered.into_iter().map(to_sse)).chain(live);

    Sse::new(combined)
        .keep_alive(KeepAlive::default())
        .into_response()
}
