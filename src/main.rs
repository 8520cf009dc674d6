use std::time::Duration;

use crate::endpoints::openapi;
use axum::{
    Router,
    extract::{DefaultBodyLimit, MatchedPath},
    response::Response,
    routing::{get, post},
};
use config::Config;
use http::{HeaderValue, Method, header, header::USER_AGENT};
use opentelemetry::{global, trace::TracerProvider as _};
use opentelemetry_otlp::{SpanExporter, WithExportConfig};
use opentelemetry_sdk::{
    Resource,
    propagation::TraceContextPropagator,
    trace::{Sampler, SdkTracerProvider},
};
use opentelemetry_semantic_conventions::{
    attribute::OTEL_STATUS_CODE,
    trace::{
        HTTP_REQUEST_METHOD, HTTP_RESPONSE_STATUS_CODE, HTTP_ROUTE, NETWORK_PROTOCOL_VERSION,
        USER_AGENT_ORIGINAL,
    },
};
use tokio::{net::TcpListener, signal};
use tower_http::{cors::CorsLayer, limit::RequestBodyLimitLayer, trace::TraceLayer};
use tracing::field::Empty;
use tracing_opentelemetry::OpenTelemetryLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub mod config;
pub mod endpoints;
pub mod error;
pub mod ledger;

#[tokio::main]
async fn main() {
    let config = Config::new().expect("config");

    let tracer_provider = init_tracing(&config);

    let api = routes(&config);

    let listener = TcpListener::bind(config.bind_address())
        .await
        .expect("error binding listener");
    tracing::debug!(
        "listening on {}",
        listener.local_addr().expect("listener address")
    );
    axum::serve(listener, api)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("error running server");

    if let Some(tracer_provider) = tracer_provider {
        if let Err(err) = tracer_provider.shutdown() {
            tracing::error!("error shutting down tracer provider: {}", err);
        }
    }
}

fn init_tracing(config: &Config) -> Option<SdkTracerProvider> {
    let service_name = env!("CARGO_CRATE_NAME");

    let tracer_provider = config.otel_enabled.then(|| {
        global::set_text_map_propagator(TraceContextPropagator::new());
        let exporter = SpanExporter::builder()
            .with_tonic()
            .with_timeout(Duration::from_secs(3))
            .build()
            .expect("error creating trace exporter");

        let tracer_provider = SdkTracerProvider::builder()
            .with_resource(Resource::builder().with_service_name(service_name).build())
            .with_batch_exporter(exporter)
            .with_sampler(Sampler::AlwaysOn)
            .build();

        global::set_tracer_provider(tracer_provider.clone());

        tracer_provider
    });

    let otel_layer = tracer_provider.as_ref().map(|provider| {
        OpenTelemetryLayer::new(provider.tracer(service_name)).with_location(false)
    });

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("{service_name}=debug,tower_http=info,axum::rejection=trace").into()
            }),
        )
        .with(otel_layer)
        .with(
            tracing_subscriber::fmt::layer()
                .with_line_number(false)
                .with_file(false),
        )
        .init();

    tracer_provider
}

pub fn routes(config: &Config) -> Router {
    let v1_ledger = Router::new()
        .route("/preview", post(endpoints::ledger::preview))
        .route("/export", post(endpoints::ledger::export));

    let v1 = Router::new()
        .nest("/ledger", v1_ledger)
        .route("/openapi.json", get(openapi));

    let mut routes = Router::new()
        .nest("/v1", v1)
        .route("/health", get(health_check))
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(config.max_upload_bytes));

    if let Some(cors) = cors(config) {
        routes = routes.layer(cors);
    }

    Router::new().nest("/api", routes).layer(
        TraceLayer::new_for_http()
            .make_span_with(|request: &http::Request<axum::body::Body>| {
                let matched_path = request
                    .extensions()
                    .get::<MatchedPath>()
                    .map(MatchedPath::as_str)
                    .unwrap_or("{unknown}");

                tracing::info_span!(
                    "request",
                    otel.name = format!("{} {}", request.method(), matched_path),
                    { OTEL_STATUS_CODE } = Empty,
                    { HTTP_RESPONSE_STATUS_CODE } = Empty,
                    { HTTP_REQUEST_METHOD } = ?request.method(),
                    { HTTP_ROUTE } = %request.uri().path(),
                    { NETWORK_PROTOCOL_VERSION } = ?request.version(),
                    { USER_AGENT_ORIGINAL } = %request.headers().get(USER_AGENT).and_then(|h| h.to_str().ok()).unwrap_or_default()
                )
            })
            .on_response(|response: &Response, _latency: Duration, span: &tracing::Span| {
                let status_code = response.status().as_u16();
                let is_failure = if status_code < 300 { "ok" } else { "error" };
                span.record(OTEL_STATUS_CODE, is_failure);
                span.record(HTTP_RESPONSE_STATUS_CODE, status_code);
            })
            .on_failure(|_, _, span: &tracing::Span| {
                span.record(OTEL_STATUS_CODE, "error");
            }),
    )
}

#[tracing::instrument(skip(config))]
fn cors(config: &Config) -> Option<CorsLayer> {
    let origin = config.front_base_url.as_ref()?;

    Some(
        CorsLayer::new()
            .allow_methods([Method::OPTIONS, Method::HEAD, Method::GET, Method::POST])
            .allow_headers([header::CONTENT_TYPE, header::ACCEPT, header::ACCEPT_ENCODING])
            .expose_headers([header::CONTENT_DISPOSITION])
            .allow_origin(origin.parse::<HeaderValue>().expect("allow origin value")),
    )
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("error installing ctrl+c handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("error installing signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

async fn health_check() -> &'static str {
    "OK"
}

#[cfg(test)]
mod test {
    use axum::{
        Router,
        body::{Body, to_bytes},
    };
    use http::{Request, StatusCode, header};
    use serde_json::Value;
    use tower::ServiceExt;

    use crate::{config::Config, routes};

    const BOUNDARY: &str = "ledger-test-boundary";

    fn app() -> Router {
        routes(&Config {
            port: 8000,
            host: "127.0.0.1".to_owned(),
            max_upload_bytes: 1024 * 1024,
            front_base_url: None,
            otel_enabled: false,
        })
    }

    fn upload(uri: &str, file_name: &str, contents: &str) -> Request<Body> {
        let body = format!(
            "--{BOUNDARY}\r\n\
             Content-Disposition: form-data; name=\"file\"; filename=\"{file_name}\"\r\n\
             Content-Type: application/octet-stream\r\n\r\n\
             {contents}\r\n\
             --{BOUNDARY}--\r\n"
        );

        Request::builder()
            .method("POST")
            .uri(uri)
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .expect("request")
    }

    async fn body_text(response: axum::response::Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");
        String::from_utf8(bytes.to_vec()).expect("utf8 body")
    }

    const EXPORT: &str = "Customer balance,,,,\n\
                          Name,Transaction type,No.,Date,Open balance\n\
                          Alice,Invoice,'INV-1',13/02/2024,\"1,500\"\n\
                          Bob,Invoice,'INV-2',14/02/2024,-42.5\n\
                          Carol,Invoice,'INV-3',15/02/2024,0\n\
                          TOTAL,,,,\"1,457.5\"\n";

    #[tokio::test]
    async fn test_health() {
        let response = app()
            .oneshot(Request::get("/api/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_text(response).await, "OK");
    }

    #[tokio::test]
    async fn test_export() {
        let response = app()
            .oneshot(upload("/api/v1/ledger/export", "balances.csv", EXPORT))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "text/csv");
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"processed_data.csv\""
        );
        assert_eq!(
            body_text(response).await,
            "Debtor Reference,Transaction Type,Document Number,Document Date,Document Balance\n\
             Alice,INV,INV-1,13/02/2024,1500.00\n\
             Bob,CRD,INV-2,14/02/2024,-42.50\n"
        );
    }

    #[tokio::test]
    async fn test_preview() {
        let response = app()
            .oneshot(upload("/api/v1/ledger/preview", "balances.csv", EXPORT))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let body: Value = serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(body["file_name"], "balances.csv");
        assert_eq!(body["row_count"], 2);
        assert_eq!(body["records"][1]["Debtor Reference"], "Bob");
        assert_eq!(body["records"][1]["Transaction Type"], "CRD");
        assert_eq!(body["records"][1]["Document Balance"], "-42.50");
    }

    #[tokio::test]
    async fn test_unsupported_format() {
        let response = app()
            .oneshot(upload("/api/v1/ledger/export", "balances.txt", EXPORT))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body: Value = serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(
            body["error"],
            "Unsupported file format. Please upload a CSV or Excel file."
        );
    }

    #[tokio::test]
    async fn test_header_not_found() {
        let response = app()
            .oneshot(upload(
                "/api/v1/ledger/preview",
                "balances.csv",
                "Customer,Balance\nAlice,10\n",
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_missing_file_field() {
        let body = format!(
            "--{BOUNDARY}\r\n\
             Content-Disposition: form-data; name=\"note\"\r\n\r\n\
             hello\r\n\
             --{BOUNDARY}--\r\n"
        );
        let request = Request::builder()
            .method("POST")
            .uri("/api/v1/ledger/preview")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap();

        let response = app().oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: Value = serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(body["error"], "Missing file");
    }

    #[tokio::test]
    async fn test_openapi() {
        let response = app()
            .oneshot(
                Request::get("/api/v1/openapi.json")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body: Value = serde_json::from_str(&body_text(response).await).unwrap();
        assert!(body["paths"]["/v1/ledger/export"].is_object());
    }
}
