#[cfg(feature = "_debug")]
pub mod kmeans;
#[cfg(not(feature = "_debug"))]
mod kmeans;
#[cfg(feature = "_debug")]
pub mod rng;
#[cfg(not(feature = "_debug"))]
mod rng;
#[cfg(feature = "_debug")]
pub mod debug_helpers;

mod colors;
mod command;
mod config;
mod history;
mod points;

pub use colors::{Color, ColorMap};
pub use command::{Command, CommandOutcome};
pub use config::{DEFAULT_COORDINATE_RANGE, DEFAULT_RUN_THROUGH_LIMIT, EngineConfig};
pub use history::CentroidHistory;
pub use kmeans::MIN_K;
pub use kmeans::init::InitMode;
pub use points::{MIN_COUNT, MIN_DIMENSION, PointFileError, PointSet};
pub use rng::{DEFAULT_SEED, DefaultRng};

use kmeans::{init, lloyds};
use log::{debug, info, trace, warn};
use rand::RngExt;
use snafu::prelude::*;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
#[non_exhaustive]
pub enum EngineError {
    #[snafu(display("invalid {name}: {reason}"))]
    InvalidParameter { name: &'static str, reason: String },

    #[snafu(context(false), display("{source}"))]
    Io { source: PointFileError },

    #[snafu(display("no centroids yet, initialize first"))]
    NotInitialized,

    #[snafu(display("nothing to step back to"))]
    NothingToUndo,

    #[snafu(display("can't step back at iteration {iteration}, two steps of history are needed"))]
    TooEarly { iteration: usize },
}

/// Why a run-through stopped. Every variant is a successful outcome.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// A step left the energy bit-for-bit unchanged.
    Converged,
    /// The iteration counter hit the configured limit.
    IterationLimitReached,
    /// The cancellation flag was raised between two steps.
    Cancelled,
}

/// Everything the presentation layer draws. Read-only from the outside; only
/// [`Engine`] operations mutate it, and each one completes before returning.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClusterState {
    points: PointSet,
    k: usize,
    centroids: Vec<f32>,
    assignments: Vec<usize>,
    color_map: ColorMap,
    seeds: Vec<usize>,
    history: CentroidHistory,
    energy: Option<f32>,
    iteration: usize,
}

impl ClusterState {
    fn with_points(points: PointSet) -> Self {
        Self {
            points,
            ..Self::default()
        }
    }

    pub fn points(&self) -> &PointSet {
        &self.points
    }

    pub fn dimension(&self) -> usize {
        self.points.dimension()
    }

    /// Cluster count, zero until the first initialization.
    pub fn k(&self) -> usize {
        self.k
    }

    /// `k * dimension` coordinates, row-major.
    pub fn centroids(&self) -> &[f32] {
        &self.centroids
    }

    /// # Panics
    ///
    /// Panics if `j >= self.k()`.
    pub fn centroid(&self, j: usize) -> &[f32] {
        kmeans::centroid(&self.centroids, self.dimension(), j)
    }

    pub fn assignments(&self) -> &[usize] {
        &self.assignments
    }

    pub fn color_map(&self) -> &ColorMap {
        &self.color_map
    }

    pub fn color_of(&self, point: usize) -> Option<Color> {
        colors::color_of(&self.assignments, &self.color_map, point)
    }

    pub fn point_colors(&self) -> Vec<Color> {
        colors::point_colors(&self.assignments, &self.color_map)
    }

    /// Point indices that seeded each centroid slot (sample and farthest-point
    /// modes only).
    pub fn seed_indices(&self) -> &[usize] {
        &self.seeds
    }

    pub fn cluster_sizes(&self) -> Vec<usize> {
        let mut sizes = vec![0; self.k];
        for &j in &self.assignments {
            sizes[j] += 1;
        }
        sizes
    }

    pub fn history(&self) -> &CentroidHistory {
        &self.history
    }

    /// Sum of point-to-centroid distances, `None` until the first step.
    pub fn energy(&self) -> Option<f32> {
        self.energy
    }

    pub fn iteration(&self) -> usize {
        self.iteration
    }

    pub fn is_initialized(&self) -> bool {
        self.k > 0
    }
}

/// The clustering engine: owns the state and the one long-lived random
/// generator every stochastic operation draws from.
#[derive(Debug)]
pub struct Engine<R = DefaultRng> {
    state: ClusterState,
    rng: R,
    config: EngineConfig,
}

impl Engine<DefaultRng> {
    pub fn new() -> Self {
        Self::with_rng(rng::new(), EngineConfig::default())
    }

    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(rng::from_seed(seed), EngineConfig::default())
    }
}

impl Default for Engine<DefaultRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: RngExt> Engine<R> {
    pub fn with_rng(rng: R, config: EngineConfig) -> Self {
        Self {
            state: ClusterState::default(),
            rng,
            config,
        }
    }

    pub fn state(&self) -> &ClusterState {
        &self.state
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Replaces the point set with `count` random points. Centroids,
    /// assignments, history and the counter are discarded.
    pub fn generate(
        &mut self,
        dimension: usize,
        count: usize,
    ) -> Result<&ClusterState, EngineError> {
        let points =
            PointSet::generate(&mut self.rng, dimension, count, self.config.coordinate_range)?;
        debug!("generated {count} points in {dimension} dimensions");
        Ok(self.set_points(points))
    }

    pub fn load_from_file(
        &mut self,
        path: impl AsRef<Path>,
    ) -> Result<&ClusterState, EngineError> {
        let path = path.as_ref();
        let points = PointSet::load_from_file(path)?;
        debug!(
            "loaded {} points in {} dimensions from {}",
            points.len(),
            points.dimension(),
            path.display()
        );
        Ok(self.set_points(points))
    }

    pub fn set_points(&mut self, points: PointSet) -> &ClusterState {
        self.state = ClusterState::with_points(points);
        &self.state
    }

    /// Seeds `k` centroids with `mode`, regenerates the color map and resets
    /// assignments, history, energy and the iteration counter.
    pub fn initialize(&mut self, k: usize, mode: InitMode) -> Result<&ClusterState, EngineError> {
        let n = self.state.points.len();
        ensure!(
            (MIN_K..=n).contains(&k),
            InvalidParameterSnafu {
                name: "k",
                reason: format!("{k} is outside {MIN_K}..={n}"),
            }
        );
        if mode == InitMode::UniformRandom {
            config::check_coordinate_range(self.config.coordinate_range)?;
        }

        let initial = init::find_initial(
            &mut self.rng,
            &self.state.points,
            k,
            mode,
            self.config.coordinate_range,
        );
        let color_map = ColorMap::random(&mut self.rng, k);

        let state = &mut self.state;
        state.k = k;
        state.centroids = initial.centroids;
        state.seeds = initial.seeds;
        state.color_map = color_map;
        state.assignments.clear();
        state.assignments.resize(n, 0);
        state.history.clear();
        state.energy = None;
        state.iteration = 0;

        debug!("initialized {k} centroids with {mode:?}");
        Ok(&self.state)
    }

    /// One Lloyd iteration: assign every point, move every centroid to the
    /// mean of its points, recompute the energy.
    pub fn step(&mut self) -> Result<&ClusterState, EngineError> {
        self.advance()?;
        Ok(&self.state)
    }

    fn advance(&mut self) -> Result<(), EngineError> {
        ensure!(self.state.is_initialized(), NotInitializedSnafu);

        let state = &mut self.state;
        state.history.push(&state.centroids);

        lloyds::assign_points(
            &mut self.rng,
            &state.points,
            &state.centroids,
            &mut state.assignments,
        );
        let update = lloyds::update_centroids(
            &state.points,
            state.k,
            &state.assignments,
            &mut state.centroids,
        );
        for j in update.empty_clusters() {
            warn!("cluster {j} received no points, centroid left in place");
        }

        let energy = lloyds::energy(&state.points, &state.centroids, &state.assignments);
        state.energy = Some(energy);
        state.iteration += 1;

        trace!("iteration {}: energy {energy}", state.iteration);
        Ok(())
    }

    /// Restores the centroids from two generations back and takes one fresh
    /// step from there. This re-derives assignments and energy rather than
    /// restoring them; the observed iteration counter drops by two.
    pub fn step_back(&mut self) -> Result<&ClusterState, EngineError> {
        ensure!(self.state.is_initialized(), NotInitializedSnafu);
        ensure!(self.state.history.previous().is_some(), NothingToUndoSnafu);

        let iteration = self.state.iteration;
        ensure!(iteration >= 2, TooEarlySnafu { iteration });
        let restored = self
            .state
            .history
            .take_before_previous()
            .context(TooEarlySnafu { iteration })?;

        self.state.history.clear();
        self.state.centroids = restored;
        self.advance()?;

        // A second step back needs fresh history
        self.state.history.clear();
        self.state.iteration = iteration - 2;

        debug!("stepped back from iteration {iteration} to {}", self.state.iteration);
        Ok(&self.state)
    }

    /// Steps until the energy stops changing or the iteration limit is hit.
    pub fn run_through(&mut self) -> Result<RunOutcome, EngineError> {
        self.run(None)
    }

    /// Like [`Engine::run_through`], but checks `cancel` before every step.
    pub fn run_through_cancellable(
        &mut self,
        cancel: &AtomicBool,
    ) -> Result<RunOutcome, EngineError> {
        self.run(Some(cancel))
    }

    fn run(&mut self, cancel: Option<&AtomicBool>) -> Result<RunOutcome, EngineError> {
        ensure!(self.state.is_initialized(), NotInitializedSnafu);

        let start = self.state.iteration;
        let limit = self.config.run_through_limit;

        let outcome = loop {
            if self.state.iteration >= limit {
                break RunOutcome::IterationLimitReached;
            }
            if cancel.is_some_and(|c| c.load(Ordering::Relaxed)) {
                break RunOutcome::Cancelled;
            }

            let before = self.state.energy;
            self.advance()?;
            // Exact comparison, an oscillating configuration runs into the limit
            if before == self.state.energy {
                break RunOutcome::Converged;
            }
        };

        info!(
            "run-through {outcome:?} after {} steps, energy {:?}",
            self.state.iteration - start,
            self.state.energy
        );
        Ok(outcome)
    }
}
