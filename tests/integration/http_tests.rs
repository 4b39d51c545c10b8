//! HTTP source tests against a local axum server.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use axum::http::{StatusCode, Uri};
use axum::response::IntoResponse;
use axum::Router;
use serde_json::Value;

use ngff_stats::error::FetchError;
use ngff_stats::io::{DocumentSource, FilesystemSource, HttpSource, RoutingSource};
use ngff_stats::stats::StatsEngine;
use ngff_stats::report::StatsRow;

use super::test_utils::{array_doc, image_root, ro_crate};

/// Path answered with a server error.
const BROKEN_PATH: &str = "/broken/zarr.json";

/// Path answered only after a delay.
const SLOW_PATH: &str = "/slow/zarr.json";

/// Serve `docs` (absolute path, JSON) on an ephemeral port and return the base URL.
async fn spawn_server(docs: Vec<(&str, Value)>) -> String {
    let docs: Arc<HashMap<String, String>> = Arc::new(
        docs.into_iter()
            .map(|(path, doc)| (path.to_string(), doc.to_string()))
            .collect(),
    );

    let app = Router::new().fallback(move |uri: Uri| {
        let docs = Arc::clone(&docs);
        async move {
            match uri.path() {
                BROKEN_PATH => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
                SLOW_PATH => {
                    tokio::time::sleep(Duration::from_secs(2)).await;
                    (StatusCode::OK, "{}").into_response()
                }
                path => match docs.get(path) {
                    Some(body) => (StatusCode::OK, body.clone()).into_response(),
                    None => StatusCode::NOT_FOUND.into_response(),
                },
            }
        }
    });

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{}", addr)
}

#[tokio::test]
async fn test_fetch_status_mapping() {
    let base = spawn_server(vec![("/img.zarr/zarr.json", image_root(&["0"]))]).await;
    let source = HttpSource::new(Duration::from_secs(5)).unwrap();

    let body = source
        .fetch(&format!("{}/img.zarr/zarr.json", base))
        .await
        .unwrap();
    let doc: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(doc, image_root(&["0"]));

    let missing = source.fetch(&format!("{}/nothing.json", base)).await;
    assert!(matches!(missing, Err(FetchError::NotFound(_))));

    let broken = source.fetch(&format!("{}{}", base, BROKEN_PATH)).await;
    assert!(matches!(broken, Err(FetchError::Status { status: 500, .. })));
}

#[tokio::test]
async fn test_probe() {
    let base = spawn_server(vec![("/img.zarr/zarr.json", image_root(&["0"]))]).await;
    let source = HttpSource::new(Duration::from_secs(5)).unwrap();

    assert!(source
        .probe(&format!("{}/img.zarr/zarr.json", base))
        .await
        .unwrap());
    assert!(!source
        .probe(&format!("{}/img.zarr/OME/METADATA.ome.xml", base))
        .await
        .unwrap());
}

#[tokio::test]
async fn test_request_timeout() {
    let base = spawn_server(Vec::new()).await;
    let source = HttpSource::new(Duration::from_millis(100)).unwrap();

    let result = source.fetch(&format!("{}{}", base, SLOW_PATH)).await;
    assert!(matches!(result, Err(FetchError::Timeout(_))));
}

#[tokio::test]
async fn test_invalid_location() {
    let source = HttpSource::default();
    let result = source.fetch("http://").await;
    assert!(matches!(result, Err(FetchError::InvalidLocation(_))));
}

#[tokio::test]
async fn test_evaluate_over_http() {
    let base = spawn_server(vec![
        ("/img.zarr/zarr.json", image_root(&["0", "1"])),
        ("/img.zarr/0/zarr.json", array_doc(&[2, 64, 64], "uint16", &[1, 32, 32])),
        ("/img.zarr/1/zarr.json", array_doc(&[2, 32, 32], "uint16", &[1, 32, 32])),
        (
            "/img.zarr/ro-crate-metadata.json",
            ro_crate("CC-BY-4.0", "NCBI:txid9606", "obo:FBbi_00000246"),
        ),
    ])
    .await;

    let source = RoutingSource::new(
        HttpSource::new(Duration::from_secs(5)).unwrap(),
        FilesystemSource::default(),
    );
    let engine = StatsEngine::new(source);

    let store = format!("{}/img.zarr", base);
    let row = StatsRow::from(&engine.evaluate(&store).await);

    assert_eq!(row.url, store);
    assert_eq!(row.ome_zarr_kind, "image_with_multiscales");
    assert_eq!(row.written, 2 * (2 * 64 * 64 + 2 * 32 * 32));
    assert_eq!(row.written_human_readable, "20.00 KB");
    assert_eq!(row.shape, "2,64,64");
    assert_eq!(row.chunks, "1,32,32");
    assert_eq!(row.license, "CC-BY-4.0");
    assert_eq!(row.organism_id, "NCBI:txid9606");
}

#[tokio::test]
async fn test_evaluate_server_errors_degrade() {
    let base = spawn_server(Vec::new()).await;
    let engine = StatsEngine::new(HttpSource::new(Duration::from_secs(5)).unwrap());

    let stats = engine.evaluate(&format!("{}/broken", base)).await;
    assert_eq!(stats.written, 0);
    assert!(!stats.provenance.found);
}
