//! Routing engine built on the shortest-path primitives.
//!
//! Only single-vehicle greedy sequencing is implemented: from the vehicle's
//! position, repeatedly drive to the nearest destination not yet visited,
//! skipping any stop that would leave the rest of the route unreachable.
//! Requests needing more than that fail with [`EngineError::Unsupported`].

use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::time::{Duration, Instant};

use rayon::prelude::*;
use tracing::{info, warn};

use crate::builder::build_graph_within;
use crate::error::EngineError;
use crate::graph::{Graph, NodeIndex};
use crate::haversine::HaversineDistances;
use crate::job::{
    DEFAULT_MAX_COMPUTATION_SECS, JobFailure, Objective, OptimizationJob, OptimizationRequest, RoutePlan, RouteStop,
    VehicleRoute,
};
use crate::shortest_path::{Budget, DistanceMap, dijkstra_all_within};
use crate::traits::{DistanceSource, Waypoint};

/// Average driving speed assumption for time estimation.
const DEFAULT_SPEED_KMH: f64 = 40.0;

#[derive(Debug, Clone)]
pub struct SolveOptions {
    /// Assumed average driving speed in km/h.
    pub average_speed_kmh: f64,
    /// Budget for requests that do not set one. `None` means unbounded.
    pub default_budget: Option<Duration>,
    /// Settled nodes between budget checks.
    pub budget_check_interval: usize,
}

impl Default for SolveOptions {
    fn default() -> Self {
        Self {
            average_speed_kmh: DEFAULT_SPEED_KMH,
            default_budget: Some(Duration::from_secs(DEFAULT_MAX_COMPUTATION_SECS)),
            budget_check_interval: 64,
        }
    }
}

/// Solves optimization requests.
///
/// The engine holds no per-request state; every solve builds its own graph,
/// so one engine can serve many jobs concurrently.
#[derive(Debug, Clone)]
pub struct Engine<S = HaversineDistances> {
    source: S,
    options: SolveOptions,
}

impl Engine<HaversineDistances> {
    pub fn new(options: SolveOptions) -> Self {
        Self {
            source: HaversineDistances,
            options,
        }
    }
}

impl Default for Engine<HaversineDistances> {
    fn default() -> Self {
        Self::new(SolveOptions::default())
    }
}

impl<S: DistanceSource> Engine<S> {
    /// Uses `source` for edge weights instead of straight-line distance.
    pub fn with_source(source: S, options: SolveOptions) -> Self {
        Self { source, options }
    }

    pub fn options(&self) -> &SolveOptions {
        &self.options
    }

    /// Budget for `request`, starting now.
    pub fn budget_for(&self, request: &OptimizationRequest) -> Budget {
        let limit = request.computation_budget().or(self.options.default_budget);
        let budget = match limit {
            Some(limit) => Budget::with_limit(limit),
            None => Budget::unlimited(),
        };
        budget.check_every(self.options.budget_check_interval)
    }

    /// Plans a request with the budget it asks for.
    pub fn solve(&self, request: &OptimizationRequest) -> Result<RoutePlan, EngineError> {
        self.solve_within(request, &self.budget_for(request))
    }

    pub fn solve_within(&self, request: &OptimizationRequest, budget: &Budget) -> Result<RoutePlan, EngineError> {
        self.check_supported(request)?;
        budget.check()?;

        let vehicle = &request.vehicles[0];
        let mut points = Vec::with_capacity(request.destinations.len() + 1);
        points.push(Waypoint {
            id: vehicle.vehicle_id.clone(),
            coordinate: vehicle.position,
        });
        points.extend(request.destinations.iter().map(|destination| Waypoint {
            id: destination.location_id.clone(),
            coordinate: destination.coordinate,
        }));

        let graph = match build_graph_within(&self.source, &points, budget) {
            Ok(graph) => graph,
            Err(err) => {
                // A spent budget outranks whatever the source reported.
                budget.check()?;
                return Err(err);
            }
        };
        budget.check()?;

        let mut tree = dijkstra_all_within(&graph, 0, budget)?;
        let unreachable: Vec<String> = (1..points.len())
            .filter(|&node| !tree.is_reachable(node))
            .map(|node| points[node].id.clone())
            .collect();
        if !unreachable.is_empty() {
            return Err(EngineError::Unreachable {
                destinations: unreachable,
            });
        }

        let mut unvisited: Vec<NodeIndex> = (1..points.len()).collect();
        let mut current: NodeIndex = 0;
        let mut cumulative_km = 0.0;
        let mut stops = Vec::with_capacity(unvisited.len());

        while !unvisited.is_empty() {
            let Some((position, onward)) = next_stop(&graph, &tree, &unvisited, budget)? else {
                return Err(EngineError::Stranded {
                    at: points[current].id.clone(),
                    remaining: unvisited.iter().map(|&node| points[node].id.clone()).collect(),
                });
            };
            let next = unvisited[position];

            let leg = tree.path_to(next);
            let nodes = leg.nodes();
            let via = nodes[1..nodes.len() - 1]
                .iter()
                .map(|&node| points[node].id.clone())
                .collect();

            cumulative_km += leg.distance();
            stops.push(RouteStop {
                location_id: points[next].id.clone(),
                coordinate: points[next].coordinate,
                leg_distance_km: leg.distance(),
                cumulative_distance_km: cumulative_km,
                arrival_minutes: self.minutes_for(cumulative_km),
                via,
            });

            unvisited.remove(position);
            current = next;
            tree = onward;
        }

        budget.check()?;

        let total_time_minutes = self.minutes_for(cumulative_km);
        Ok(RoutePlan {
            vehicle_routes: vec![VehicleRoute {
                vehicle_id: vehicle.vehicle_id.clone(),
                stops,
                total_distance_km: cumulative_km,
                estimated_time_minutes: total_time_minutes,
            }],
            total_distance_km: cumulative_km,
            total_time_minutes,
        })
    }

    /// Runs a pending job to completion or failure. Never panics on bad input.
    pub fn run(&self, job: &mut OptimizationJob) {
        let budget = self.budget_for(&job.request);
        self.run_with_budget(job, budget);
    }

    /// Like [`Engine::run`], aborting with a timeout once `cancel` is set.
    pub fn run_cancellable(&self, job: &mut OptimizationJob, cancel: Arc<AtomicBool>) {
        let budget = self.budget_for(&job.request).cancellable(cancel);
        self.run_with_budget(job, budget);
    }

    fn run_with_budget(&self, job: &mut OptimizationJob, budget: Budget) {
        if !job.start() {
            warn!(job_id = %job.job_id, status = ?job.status(), "job is not pending; skipping");
            return;
        }
        info!(
            job_id = %job.job_id,
            vehicles = job.request.vehicles.len(),
            destinations = job.request.destinations.len(),
            "optimization job started"
        );

        let started = Instant::now();
        match self.solve_within(&job.request, &budget) {
            Ok(plan) => {
                let elapsed = started.elapsed();
                info!(
                    job_id = %job.job_id,
                    total_distance_km = plan.total_distance_km,
                    elapsed_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX),
                    "optimization job completed"
                );
                job.complete(plan, elapsed);
            }
            Err(err) => {
                let elapsed = started.elapsed();
                warn!(job_id = %job.job_id, kind = ?err.kind(), error = %err, "optimization job failed");
                job.fail(JobFailure::from(&err), elapsed);
            }
        }
    }

    /// Runs independent jobs in parallel. Each job gets its own graph.
    pub fn run_jobs(&self, jobs: &mut [OptimizationJob])
    where
        S: Sync,
    {
        jobs.par_iter_mut().for_each(|job| self.run(job));
    }

    fn check_supported(&self, request: &OptimizationRequest) -> Result<(), EngineError> {
        if !(self.options.average_speed_kmh.is_finite() && self.options.average_speed_kmh > 0.0) {
            return Err(EngineError::InvalidInput(format!(
                "average speed must be positive, got {}",
                self.options.average_speed_kmh
            )));
        }
        if request.vehicles.is_empty() {
            return Err(EngineError::EmptyInput("at least one vehicle is required"));
        }
        if let Some(destination) = request
            .destinations
            .iter()
            .find(|destination| !(destination.demand.is_finite() && destination.demand > 0.0))
        {
            return Err(EngineError::InvalidInput(format!(
                "destination {} has non-positive demand {}",
                destination.location_id, destination.demand
            )));
        }

        if request.objective == Objective::BalanceLoad {
            return Err(EngineError::Unsupported(
                "balance_load requires multi-vehicle assignment, which is not implemented".to_string(),
            ));
        }
        if request.vehicles.len() > 1 {
            return Err(EngineError::Unsupported(format!(
                "multi-vehicle routing is not implemented ({} vehicles requested)",
                request.vehicles.len()
            )));
        }
        if let Some(destination) = request
            .destinations
            .iter()
            .find(|destination| destination.time_window.is_some())
        {
            return Err(EngineError::Unsupported(format!(
                "time windows are not implemented (destination {})",
                destination.location_id
            )));
        }

        Ok(())
    }

    fn minutes_for(&self, km: f64) -> f64 {
        km / self.options.average_speed_kmh * 60.0
    }
}

/// Nearest unvisited node from which every other unvisited node is still
/// reachable, returned with the search tree rooted at it.
///
/// `unvisited` is ascending and the sort is stable, so equal distances go to
/// the lower index.
fn next_stop(
    graph: &Graph,
    tree: &DistanceMap,
    unvisited: &[NodeIndex],
    budget: &Budget,
) -> Result<Option<(usize, DistanceMap)>, EngineError> {
    let mut candidates: Vec<usize> = (0..unvisited.len())
        .filter(|&position| tree.is_reachable(unvisited[position]))
        .collect();
    candidates.sort_by(|&a, &b| tree.get(unvisited[a]).total_cmp(&tree.get(unvisited[b])));

    for position in candidates {
        let onward = dijkstra_all_within(graph, unvisited[position], budget)?;
        if unvisited.iter().all(|&node| onward.is_reachable(node)) {
            return Ok(Some((position, onward)));
        }
    }
    Ok(None)
}
