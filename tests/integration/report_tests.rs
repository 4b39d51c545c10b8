//! Sample list to CSV report, against stores on the local filesystem.

use std::path::Path;

use ngff_stats::io::FilesystemSource;
use ngff_stats::report::{load_sample_urls, CsvReport, StatsRow, WriteMode};
use ngff_stats::stats::StatsEngine;

use super::test_utils::{array_doc, image_root, plate_root, write_store};

fn read_rows(path: &Path) -> Vec<StatsRow> {
    csv::Reader::from_path(path)
        .unwrap()
        .deserialize()
        .collect::<Result<Vec<StatsRow>, _>>()
        .unwrap()
}

/// Evaluate every sample not yet in the report and append it.
async fn run(samples: &Path, output: &Path, mode: WriteMode) {
    let urls = load_sample_urls(samples).unwrap();
    let mut report = CsvReport::open(output, mode).unwrap();
    let engine = StatsEngine::new(FilesystemSource::default());

    let pending: Vec<String> = urls.into_iter().filter(|u| !report.contains(u)).collect();
    for url in &pending {
        let stats = engine.evaluate(url).await;
        report.write_row(&StatsRow::from(&stats)).unwrap();
    }
    report.finish().unwrap();
}

#[tokio::test]
async fn test_local_stores_to_csv() {
    let dir = tempfile::tempdir().unwrap();
    let image = dir.path().join("image.zarr");
    let plate = dir.path().join("plate.zarr");

    write_store(
        &image,
        &[
            ("zarr.json", image_root(&["0"])),
            ("0/zarr.json", array_doc(&[10, 10], "uint8", &[5, 5])),
        ],
    );
    write_store(
        &plate,
        &[
            ("zarr.json", plate_root(&["A/1", "A/2"], Some(2))),
            ("A/1/0/zarr.json", image_root(&["0"])),
            ("A/1/0/0/zarr.json", array_doc(&[512], "uint16", &[256])),
        ],
    );

    let samples = dir.path().join("config.yaml");
    std::fs::write(
        &samples,
        format!(
            "samples:\n  - {}\nextended_samples:\n  - url: file://{}\n",
            image.display(),
            plate.display()
        ),
    )
    .unwrap();

    let output = dir.path().join("zarrs_metadata.csv");
    run(&samples, &output, WriteMode::Overwrite).await;

    let rows = read_rows(&output);
    assert_eq!(rows.len(), 2);

    assert_eq!(rows[0].url, image.display().to_string());
    assert_eq!(rows[0].ome_zarr_kind, "image_with_multiscales");
    assert_eq!(rows[0].written, 100);
    assert_eq!(rows[0].shape, "10,10");
    assert_eq!(rows[0].chunks, "5,5");

    assert_eq!(rows[1].ome_zarr_kind, "plate");
    // One 1024-byte sample scaled to 2 wells x 2 fields
    assert_eq!(rows[1].written, 4096);
    assert_eq!(rows[1].written_human_readable, "4.00 KB");
    assert_eq!(rows[1].shape, "512");
}

#[tokio::test]
async fn test_append_skips_existing_stores() {
    let dir = tempfile::tempdir().unwrap();
    let first = dir.path().join("first.zarr");
    let second = dir.path().join("second.zarr");
    for store in [&first, &second] {
        write_store(
            store,
            &[
                ("zarr.json", image_root(&["0"])),
                ("0/zarr.json", array_doc(&[4, 4], "int16", &[4, 4])),
            ],
        );
    }

    let samples = dir.path().join("config.yaml");
    let output = dir.path().join("out.csv");

    std::fs::write(&samples, format!("samples: {}\n", first.display())).unwrap();
    run(&samples, &output, WriteMode::Append).await;

    std::fs::write(
        &samples,
        format!("samples:\n  - {}\n  - {}\n", first.display(), second.display()),
    )
    .unwrap();
    run(&samples, &output, WriteMode::Append).await;

    let rows = read_rows(&output);
    let urls: Vec<&str> = rows.iter().map(|r| r.url.as_str()).collect();
    assert_eq!(
        urls,
        vec![first.display().to_string(), second.display().to_string()]
    );
    assert!(rows.iter().all(|r| r.written == 32));

    // Overwrite starts from scratch
    run(&samples, &output, WriteMode::Overwrite).await;
    assert_eq!(read_rows(&output).len(), 2);
}

#[tokio::test]
async fn test_missing_local_store() {
    let dir = tempfile::tempdir().unwrap();
    let engine = StatsEngine::new(FilesystemSource::default());

    let missing = dir.path().join("missing.zarr");
    let row = StatsRow::from(&engine.evaluate(missing.to_str().unwrap()).await);
    assert_eq!(row.ome_zarr_kind, "image_no_multiscales");
    assert_eq!(row.written_human_readable, "0.00 B");
}
