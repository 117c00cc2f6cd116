//! ABI file scanner - discovers ABI files on disk and registers them

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use walkdir::WalkDir;

use crate::domain::abi::{InterfaceDescriptor, InterfaceRegistry};

/// Files above this size are skipped
const MAX_FILE_BYTES: u64 = 5 * 1024 * 1024;

/// Outcome of a scan
#[derive(Debug, Default, Clone)]
pub struct ScanReport {
    /// Number of files scanned
    pub scanned_files: usize,
    /// Contract names registered, in discovery order
    pub registered: Vec<String>,
    /// Per-file errors
    pub errors: Vec<String>,
    /// Scan duration in milliseconds
    pub scan_ms: u128,
}

impl ScanReport {
    /// Merge another report into this one
    pub fn merge(&mut self, other: Self) {
        self.scanned_files = self.scanned_files.saturating_add(other.scanned_files);
        self.registered.extend(other.registered);
        self.errors.extend(other.errors);
    }
}

/// ABI file scanner
pub struct AbiScanner;

impl AbiScanner {
    /// Scan a single root directory for ABI files
    pub fn scan(root: impl AsRef<Path>, registry: &mut InterfaceRegistry) -> ScanReport {
        let started = Instant::now();
        let root = root.as_ref();
        let mut report = ScanReport::default();

        for entry in WalkDir::new(root)
            .follow_links(false)
            .into_iter()
            .filter_entry(|e| !Self::is_ignored_dir(e.path()))
        {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    report.errors.push(err.to_string());
                    continue;
                }
            };

            if !entry.file_type().is_file() {
                continue;
            }

            let path = entry.path();
            if path.extension().and_then(|s| s.to_str()) != Some("json") {
                continue;
            }

            let metadata = match entry.metadata() {
                Ok(meta) => meta,
                Err(err) => {
                    report.errors.push(format!("{}: {}", path.display(), err));
                    continue;
                }
            };
            if metadata.len() > MAX_FILE_BYTES {
                tracing::debug!(path = %path.display(), "skipping oversized file");
                continue;
            }

            report.scanned_files += 1;

            match Self::load_abi_file(path, registry) {
                Ok(Some(name)) => report.registered.push(name),
                Ok(None) => {}
                Err(err) => {
                    tracing::warn!(path = %path.display(), error = %err, "failed to load ABI file");
                    report.errors.push(format!("{}: {:#}", path.display(), err));
                }
            }
        }

        report.scan_ms = started.elapsed().as_millis();
        tracing::info!(
            root = %root.display(),
            scanned = report.scanned_files,
            registered = report.registered.len(),
            errors = report.errors.len(),
            "ABI scan finished"
        );
        report
    }

    /// Scan multiple root directories
    pub fn scan_roots(roots: &[PathBuf], registry: &mut InterfaceRegistry) -> ScanReport {
        let started = Instant::now();
        let mut report = ScanReport::default();

        for root in roots {
            report.merge(Self::scan(root, registry));
        }

        report.scan_ms = started.elapsed().as_millis();
        report
    }

    /// Read a descriptor from a file without registering it
    ///
    /// Accepts a raw ABI array or a build artifact with an `abi` field.
    /// Returns `Ok(None)` for JSON files that carry no ABI.
    pub fn read_descriptor(path: &Path) -> Result<Option<(String, InterfaceDescriptor)>> {
        let content = fs::read_to_string(path)?;
        let value: serde_json::Value = serde_json::from_str(&content)?;

        let (abi_value, artifact_name) = if value.is_array() {
            (value, None)
        } else if let Some(abi) = value.get("abi") {
            let name = value
                .get("contractName")
                .and_then(|name| name.as_str())
                .map(str::to_string);
            (abi.clone(), name)
        } else {
            return Ok(None); // No ABI found, skip silently
        };

        let name = match artifact_name {
            Some(name) => name,
            None => Self::contract_name(path)
                .with_context(|| format!("no contract name for {}", path.display()))?,
        };

        let descriptor = InterfaceDescriptor::from_value(abi_value)?;
        Ok(Some((name, descriptor)))
    }

    /// Load a single ABI file into the registry
    fn load_abi_file(path: &Path, registry: &mut InterfaceRegistry) -> Result<Option<String>> {
        let Some((name, descriptor)) = Self::read_descriptor(path)? else {
            return Ok(None);
        };
        registry.register(name.clone(), descriptor)?;
        Ok(Some(name))
    }

    /// Contract name from the file stem (e.g. "ListRecords.json" -> "ListRecords")
    fn contract_name(path: &Path) -> Option<String> {
        path.file_stem()
            .and_then(|stem| stem.to_str())
            .map(|stem| stem.trim_end_matches(".abi").to_string())
            .filter(|stem| !stem.is_empty())
    }

    /// Check if a path should be ignored
    fn is_ignored_dir(path: &Path) -> bool {
        path.file_name()
            .and_then(|n| n.to_str())
            .map(|name| {
                matches!(
                    name,
                    ".git" | "target" | "node_modules" | ".next" | "dist" | "build"
                )
            })
            .unwrap_or(false)
    }
}
