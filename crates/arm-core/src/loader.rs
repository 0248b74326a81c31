//! Asset loading bookkeeping
//!
//! The actual fetching happens elsewhere (file reads natively, `fetch` in the
//! browser). This module only decides what to request and tracks arrivals until
//! every expected mesh is present, at which point completion is reported once.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::mesh::{MeshAsset, MeshError, load_stl_from_bytes};

/// One mesh file to load, keyed by the name the layout refers to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetSpec {
    pub name: String,
    pub path: String,
}

impl AssetSpec {
    pub fn new(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
        }
    }
}

/// Request handed to a fetcher
pub type LoadRequest = AssetSpec;

/// Result of one fetch, delivered back to the loader
#[derive(Debug, Clone)]
pub enum LoadEvent {
    Loaded { name: String, bytes: Vec<u8> },
    Failed { name: String, reason: String },
}

impl LoadEvent {
    pub fn name(&self) -> &str {
        match self {
            LoadEvent::Loaded { name, .. } | LoadEvent::Failed { name, .. } => name,
        }
    }
}

/// Outcome of recording an arrival
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadProgress {
    /// Still waiting for more assets
    Pending { loaded: usize, expected: usize },
    /// The last expected asset arrived; reported exactly once
    Complete,
    /// Arrival did not count (already complete, unknown or duplicate name)
    Ignored,
}

/// Expected vs. loaded counter. Invariant: `loaded <= expected`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadCounter {
    expected: usize,
    loaded: usize,
    completed: bool,
}

impl LoadCounter {
    pub fn new(expected: usize) -> Self {
        Self {
            expected,
            loaded: 0,
            completed: false,
        }
    }

    pub fn expected(&self) -> usize {
        self.expected
    }

    pub fn loaded(&self) -> usize {
        self.loaded
    }

    pub fn is_complete(&self) -> bool {
        self.completed
    }

    /// Count one arrival
    pub fn record(&mut self) -> LoadProgress {
        if self.completed || self.loaded >= self.expected {
            return LoadProgress::Ignored;
        }

        self.loaded += 1;
        if self.loaded == self.expected {
            self.completed = true;
            LoadProgress::Complete
        } else {
            LoadProgress::Pending {
                loaded: self.loaded,
                expected: self.expected,
            }
        }
    }
}

/// Tracks the set of meshes a viewer is waiting for
#[derive(Debug, Default)]
pub struct AssetLoader {
    counter: LoadCounter,
    pending: Vec<String>,
    assets: HashMap<String, MeshAsset>,
    failure: Option<LoadError>,
}

impl AssetLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset and return one request per asset.
    ///
    /// With nothing to load completion could never fire, so an empty list is
    /// an error and leaves the loader failed.
    pub fn begin(&mut self, specs: &[AssetSpec]) -> Result<Vec<LoadRequest>, LoadError> {
        self.counter = LoadCounter::new(specs.len());
        self.pending = specs.iter().map(|s| s.name.clone()).collect();
        self.assets.clear();
        self.failure = None;

        if specs.is_empty() {
            self.failure = Some(LoadError::NoAssets);
            return Err(LoadError::NoAssets);
        }

        tracing::info!("Loading {} mesh assets", specs.len());
        Ok(specs.to_vec())
    }

    pub fn counter(&self) -> &LoadCounter {
        &self.counter
    }

    pub fn failure(&self) -> Option<&LoadError> {
        self.failure.as_ref()
    }

    /// Record a fetch result.
    ///
    /// Parsed meshes are stored by name. After a failure nothing else counts,
    /// so completion can never fire with an asset missing.
    pub fn receive(&mut self, event: LoadEvent) -> Result<LoadProgress, LoadError> {
        if let Some(failure) = &self.failure {
            tracing::warn!("Ignoring '{}' after earlier failure", event.name());
            return Err(failure.clone());
        }

        if self.counter.is_complete() {
            tracing::warn!("Ignoring '{}': all assets already loaded", event.name());
            return Ok(LoadProgress::Ignored);
        }

        let Some(slot) = self.pending.iter().position(|n| n == event.name()) else {
            tracing::warn!("Ignoring unexpected or duplicate asset '{}'", event.name());
            return Ok(LoadProgress::Ignored);
        };

        let mesh = match event {
            LoadEvent::Loaded { name, bytes } => load_stl_from_bytes(name.clone(), &bytes)
                .map_err(|e| LoadError::Mesh { name, source: e }),
            LoadEvent::Failed { name, reason } => Err(LoadError::Failed { name, reason }),
        };

        let mesh = match mesh {
            Ok(mesh) => mesh,
            Err(err) => {
                tracing::error!("{}", err);
                self.failure = Some(err.clone());
                return Err(err);
            }
        };

        self.pending.swap_remove(slot);
        tracing::debug!("Loaded mesh '{}'", mesh.name);
        self.assets.insert(mesh.name.clone(), mesh);

        Ok(self.counter.record())
    }

    /// Hand the loaded meshes over (leaves the loader empty)
    pub fn take_assets(&mut self) -> HashMap<String, MeshAsset> {
        std::mem::take(&mut self.assets)
    }
}

/// Asset loading errors
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LoadError {
    #[error("Failed to load '{name}': {reason}")]
    Failed { name: String, reason: String },
    #[error("Failed to parse '{name}': {source}")]
    Mesh { name: String, source: MeshError },
    #[error("No mesh assets configured")]
    NoAssets,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{humerus_event, torso_event};

    fn specs() -> Vec<AssetSpec> {
        vec![
            AssetSpec::new("torso", "./models/torso.stl"),
            AssetSpec::new("humerus", "./models/humerus.stl"),
        ]
    }

    #[test]
    fn test_counter_completes_once() {
        let mut counter = LoadCounter::new(2);
        assert_eq!(
            counter.record(),
            LoadProgress::Pending {
                loaded: 1,
                expected: 2
            }
        );
        assert_eq!(counter.record(), LoadProgress::Complete);
        assert_eq!(counter.record(), LoadProgress::Ignored);
        assert_eq!(counter.loaded(), 2);
    }

    #[test]
    fn test_begin_issues_one_request_per_path() {
        let mut loader = AssetLoader::new();
        let requests = loader.begin(&specs()).unwrap();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].path, "./models/torso.stl");
        assert_eq!(loader.counter().expected(), 2);
    }

    #[test]
    fn test_empty_asset_list_is_rejected() {
        let mut loader = AssetLoader::new();
        assert_eq!(loader.begin(&[]).unwrap_err(), LoadError::NoAssets);
        assert_eq!(loader.failure(), Some(&LoadError::NoAssets));
        assert!(loader.receive(torso_event()).is_err());
    }

    #[test]
    fn test_completion_is_order_independent() {
        for reversed in [false, true] {
            let mut loader = AssetLoader::new();
            loader.begin(&specs()).unwrap();

            let mut events = vec![torso_event(), humerus_event()];
            if reversed {
                events.reverse();
            }

            let first = loader.receive(events.remove(0)).unwrap();
            assert!(matches!(first, LoadProgress::Pending { loaded: 1, .. }));
            assert_eq!(loader.receive(events.remove(0)).unwrap(), LoadProgress::Complete);

            let assets = loader.take_assets();
            assert!(assets.contains_key("torso"));
            assert!(assets.contains_key("humerus"));
        }
    }

    #[test]
    fn test_duplicate_does_not_complete() {
        let mut loader = AssetLoader::new();
        loader.begin(&specs()).unwrap();

        loader.receive(torso_event()).unwrap();
        assert_eq!(loader.receive(torso_event()).unwrap(), LoadProgress::Ignored);
        assert!(!loader.counter().is_complete());
    }

    #[test]
    fn test_excess_after_completion_is_ignored() {
        let mut loader = AssetLoader::new();
        loader.begin(&specs()).unwrap();
        loader.receive(torso_event()).unwrap();
        loader.receive(humerus_event()).unwrap();

        assert_eq!(loader.receive(torso_event()).unwrap(), LoadProgress::Ignored);
        assert_eq!(loader.counter().loaded(), 2);
    }

    #[test]
    fn test_failure_blocks_completion() {
        let mut loader = AssetLoader::new();
        loader.begin(&specs()).unwrap();

        let err = loader
            .receive(LoadEvent::Failed {
                name: "torso".into(),
                reason: "404".into(),
            })
            .unwrap_err();
        assert!(matches!(err, LoadError::Failed { .. }));

        assert!(loader.receive(humerus_event()).is_err());
        assert!(!loader.counter().is_complete());
        assert!(loader.failure().is_some());
    }

    #[test]
    fn test_unparsable_bytes_fail() {
        let mut loader = AssetLoader::new();
        loader.begin(&specs()).unwrap();

        let err = loader
            .receive(LoadEvent::Loaded {
                name: "torso".into(),
                bytes: vec![1, 2, 3],
            })
            .unwrap_err();
        assert!(matches!(err, LoadError::Mesh { .. }));
    }
}
