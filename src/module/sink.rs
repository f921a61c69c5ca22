//! Persistence boundary. The pipeline only ever emits filenames and JSON
//! bodies; everything on-disk (directory layout, manifest, error log) is
//! behind the `Sink` trait so tests can run against memory.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::PathBuf;

use crate::config::HarvestConfig;
use crate::model::record::FailureEntry;

pub trait Sink {
    fn persist(&self, source_id: &str, filename: &str, json: &str) -> io::Result<()>;

    /// Called exactly once per successful ingestion.
    fn append_manifest(&self, source_id: &str, filename: &str) -> io::Result<()>;

    /// Best-effort; callers log failures here instead of escalating them.
    fn record_failure(&self, entry: &FailureEntry) -> io::Result<()>;
}

/// Filesystem sink using the published directory layout:
/// `<data_dir>/<id>_data/<file>` with a `manifest.json` array per source
/// and one JSON document per failure under the error directory.
pub struct FileSink {
    data_dir: PathBuf,
    error_dir: PathBuf,
    sink_dirs: HashMap<String, PathBuf>,
}

impl FileSink {
    pub fn new(config: &HarvestConfig) -> Self {
        let sink_dirs = config
            .sources
            .iter()
            .map(|spec| (spec.id.clone(), spec.resolve_sink_dir(&config.data_dir)))
            .collect();

        Self {
            data_dir: config.data_dir.clone(),
            error_dir: config.error_dir.clone(),
            sink_dirs,
        }
    }

    fn dir_for(&self, source_id: &str) -> PathBuf {
        self.sink_dirs.get(source_id).cloned().unwrap_or_else(|| {
            self.data_dir.join(format!("{source_id}_data"))
        })
    }
}

impl Sink for FileSink {
    fn persist(&self, source_id: &str, filename: &str, json: &str) -> io::Result<()> {
        let dir = self.dir_for(source_id);
        fs::create_dir_all(&dir)?;
        fs::write(dir.join(filename), json)
    }

    // Load-append-write is safe here: each job owns its own source's
    // manifest and no two jobs run concurrently.
    fn append_manifest(&self, source_id: &str, filename: &str) -> io::Result<()> {
        let dir = self.dir_for(source_id);
        fs::create_dir_all(&dir)?;
        let path = dir.join("manifest.json");

        let mut manifest: Vec<String> = if path.exists() {
            serde_json::from_str(&fs::read_to_string(&path)?)?
        } else {
            Vec::new()
        };
        manifest.push(filename.to_string());

        fs::write(&path, serde_json::to_string_pretty(&manifest)?)
    }

    fn record_failure(&self, entry: &FailureEntry) -> io::Result<()> {
        fs::create_dir_all(&self.error_dir)?;
        let path = self
            .error_dir
            .join(format!("{}_{}.json", entry.source_id, entry.timestamp));
        fs::write(path, serde_json::to_string_pretty(entry)?)
    }
}
