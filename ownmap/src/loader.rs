use std::sync::Arc;

use egui::Context;
use futures::channel::oneshot;

use crate::{io::Fetch, io::runtime::Runtime, metadata, topology, world::WorldData};

/// Where the map data comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sources {
    /// TopoJSON topology or GeoJSON feature collection with country boundaries.
    pub topology: String,

    /// Table of countries with their coordinates and preferred zoom levels.
    pub metadata: String,

    /// Name of the topology object holding the countries.
    pub object: String,
}

impl Default for Sources {
    fn default() -> Self {
        Self {
            topology: "https://cdn.jsdelivr.net/npm/world-atlas@2/countries-110m.json".to_owned(),
            metadata: "https://atozmap.com/worldcountriesstates.json".to_owned(),
            object: "countries".to_owned(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoadError {
    #[error("could not fetch '{url}': {reason}")]
    NetworkFailure { url: String, reason: String },

    #[error("could not parse '{url}': {reason}")]
    ParseFailure { url: String, reason: String },
}

impl LoadError {
    fn network(url: &str, reason: impl ToString) -> Self {
        Self::NetworkFailure {
            url: url.to_owned(),
            reason: reason.to_string(),
        }
    }

    fn parse(url: &str, reason: impl ToString) -> Self {
        Self::ParseFailure {
            url: url.to_owned(),
            reason: reason.to_string(),
        }
    }
}

/// Fetch the boundaries and the country table concurrently, then decode and join them.
pub async fn load(fetch: &impl Fetch, sources: &Sources) -> Result<WorldData, LoadError> {
    log::debug!("Loading map data...");

    let (topology, metadata) = futures::future::join(
        fetch.fetch(&sources.topology),
        fetch.fetch(&sources.metadata),
    )
    .await;

    let topology = topology.map_err(|err| LoadError::network(&sources.topology, err))?;
    let metadata = metadata.map_err(|err| LoadError::network(&sources.metadata, err))?;

    let boundaries = topology::decode(&topology, &sources.object)
        .map_err(|err| LoadError::parse(&sources.topology, err))?;
    let countries =
        metadata::decode(&metadata).map_err(|err| LoadError::parse(&sources.metadata, err))?;

    log::debug!(
        "Decoded {} boundaries and {} countries.",
        boundaries.len(),
        countries.len()
    );

    Ok(WorldData::new(boundaries, countries))
}

#[derive(Debug, Clone)]
pub enum LoadState {
    Loading,
    Loaded(Arc<WorldData>),
    Failed(LoadError),
}

/// Loads the map data in the background. It must persist between frames.
pub struct WorldLoader {
    state: LoadState,
    result_rx: Option<oneshot::Receiver<Result<WorldData, LoadError>>>,

    /// Reported if the IO thread goes away without a result.
    topology_url: String,

    #[expect(dead_code)] // Significant Drop
    runtime: Runtime,
}

impl WorldLoader {
    /// Start loading. `egui_ctx` is asked to repaint once the result is there.
    pub fn spawn(
        fetch: impl Fetch + Send + Sync + 'static,
        sources: Sources,
        egui_ctx: Context,
    ) -> Self {
        let (result_tx, result_rx) = oneshot::channel();
        let topology_url = sources.topology.clone();

        let runtime = Runtime::new(async move {
            let result = load(&fetch, &sources).await;
            match &result {
                Ok(_) => log::info!("Map loaded successfully."),
                Err(err) => log::warn!("Error loading map: {err}."),
            }

            if result_tx.send(result).is_err() {
                log::debug!("Loader is gone, nobody is interested in the map data.");
            }
            egui_ctx.request_repaint();
        });

        Self {
            state: LoadState::Loading,
            result_rx: Some(result_rx),
            topology_url,
            runtime,
        }
    }

    /// Current state of loading. Never blocks.
    pub fn poll(&mut self) -> &LoadState {
        if let Some(result_rx) = &mut self.result_rx {
            match result_rx.try_recv() {
                Ok(Some(result)) => {
                    self.state = match result {
                        Ok(world) => LoadState::Loaded(Arc::new(world)),
                        Err(err) => LoadState::Failed(err),
                    };
                    self.result_rx = None;
                }
                Ok(None) => {}
                Err(oneshot::Canceled) => {
                    log::error!("IO thread went away before loading the map.");
                    self.state = LoadState::Failed(LoadError::network(
                        &self.topology_url,
                        "loading was interrupted",
                    ));
                    self.result_rx = None;
                }
            }
        }
        &self.state
    }
}
