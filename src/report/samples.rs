//! Sample list input.
//!
//! ```yaml
//! samples:
//!   - https://example.org/a.zarr
//!   - https://example.org/b.zarr
//! extended_samples:
//!   - url: https://example.org/c.zarr
//!     note: anything else is ignored
//! ```
//!
//! `sample` is accepted as an alias of `samples`.

use std::collections::HashSet;
use std::path::Path;

use serde::Deserialize;
use serde_yaml::Value;
use tracing::error;

use crate::error::ReportError;

#[derive(Debug, Default, Deserialize)]
struct SampleFile {
    #[serde(default)]
    samples: Option<Value>,

    #[serde(default)]
    sample: Option<Value>,

    #[serde(default)]
    extended_samples: Option<Vec<ExtendedSample>>,
}

#[derive(Debug, Deserialize)]
struct ExtendedSample {
    url: String,
}

/// Read store URLs from a YAML file.
pub fn load_sample_urls(path: impl AsRef<Path>) -> Result<Vec<String>, ReportError> {
    let text = std::fs::read_to_string(path)?;
    parse_sample_urls(&text)
}

/// Parse store URLs from YAML text, de-duplicated in first-seen order.
pub fn parse_sample_urls(text: &str) -> Result<Vec<String>, ReportError> {
    let file: Option<SampleFile> = serde_yaml::from_str(text)?;
    let file = file.unwrap_or_default();

    if file.samples.is_none() && file.sample.is_none() && file.extended_samples.is_none() {
        error!("Config does not contain 'samples' or 'extended_samples' keys");
    }

    let mut urls = Vec::new();
    for value in [&file.samples, &file.sample].into_iter().flatten() {
        collect_strings(value, &mut urls);
    }
    urls.extend(
        file.extended_samples
            .unwrap_or_default()
            .into_iter()
            .map(|s| s.url),
    );

    let mut seen = HashSet::new();
    urls.retain(|u| seen.insert(u.clone()));
    Ok(urls)
}

/// A single string, or the string entries of a list.
fn collect_strings(value: &Value, out: &mut Vec<String>) {
    match value {
        Value::String(s) => out.push(s.clone()),
        Value::Sequence(items) => {
            out.extend(items.iter().filter_map(|v| v.as_str().map(str::to_string)))
        }
        _ => {}
    }
}
