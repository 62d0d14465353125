//! Optimization job contract.
//!
//! These types are the boundary with the external API and storage layers. The
//! engine reads an [`OptimizationRequest`], drives an [`OptimizationJob`]
//! through its lifecycle, and leaves persistence to the caller.

use std::time::Duration;

use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, FailureKind};
use crate::haversine::Coordinate;

/// Default computation budget when a request does not name one.
pub const DEFAULT_MAX_COMPUTATION_SECS: u64 = 300;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Pending,
    Running,
    Completed,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Objective {
    #[default]
    MinimizeDistance,
    MinimizeTime,
    BalanceLoad,
}

/// A vehicle and where it currently is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleStart {
    pub vehicle_id: String,
    pub position: Coordinate,
}

impl VehicleStart {
    pub fn new(vehicle_id: impl Into<String>, latitude: f64, longitude: f64) -> Self {
        Self {
            vehicle_id: vehicle_id.into(),
            position: Coordinate::new(latitude, longitude),
        }
    }
}

/// Earliest and latest delivery time of day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Destination {
    pub location_id: String,
    pub coordinate: Coordinate,
    /// Delivery demand in kg.
    pub demand: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_window: Option<TimeWindow>,
}

impl Destination {
    pub fn new(location_id: impl Into<String>, latitude: f64, longitude: f64, demand: f64) -> Self {
        Self {
            location_id: location_id.into(),
            coordinate: Coordinate::new(latitude, longitude),
            demand,
            time_window: None,
        }
    }

    pub fn with_time_window(mut self, start: NaiveTime, end: NaiveTime) -> Self {
        self.time_window = Some(TimeWindow { start, end });
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizationRequest {
    pub vehicles: Vec<VehicleStart>,
    pub destinations: Vec<Destination>,
    #[serde(default)]
    pub objective: Objective,
    /// Budget in whole seconds; `None` falls back to the engine default.
    #[serde(default = "default_max_computation_secs")]
    pub max_computation_secs: Option<u64>,
    /// Sub-second budget set through [`OptimizationRequest::max_computation_time`].
    #[serde(skip)]
    exact_budget: Option<Duration>,
}

fn default_max_computation_secs() -> Option<u64> {
    Some(DEFAULT_MAX_COMPUTATION_SECS)
}

impl OptimizationRequest {
    pub fn new(vehicles: Vec<VehicleStart>, destinations: Vec<Destination>) -> Self {
        Self {
            vehicles,
            destinations,
            objective: Objective::default(),
            max_computation_secs: default_max_computation_secs(),
            exact_budget: None,
        }
    }

    pub fn objective(mut self, objective: Objective) -> Self {
        self.objective = objective;
        self
    }

    /// Sets the budget at full precision. The serialized field holds it
    /// rounded up to whole seconds.
    pub fn max_computation_time(mut self, budget: Option<Duration>) -> Self {
        self.max_computation_secs = budget.map(whole_secs_rounded_up);
        self.exact_budget = budget;
        self
    }

    /// The requested budget, or `None` to use the engine default.
    ///
    /// A precise budget only applies while `max_computation_secs` still
    /// matches it; assigning the field directly takes precedence.
    pub fn computation_budget(&self) -> Option<Duration> {
        match (self.max_computation_secs, self.exact_budget) {
            (Some(secs), Some(exact)) if whole_secs_rounded_up(exact) == secs => Some(exact),
            (secs, _) => secs.map(Duration::from_secs),
        }
    }
}

fn whole_secs_rounded_up(budget: Duration) -> u64 {
    budget.as_secs().saturating_add(u64::from(budget.subsec_nanos() > 0))
}

/// One stop on a vehicle's route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteStop {
    pub location_id: String,
    pub coordinate: Coordinate,
    /// Distance from the previous stop (or the start) in km.
    pub leg_distance_km: f64,
    pub cumulative_distance_km: f64,
    /// Estimated arrival, in minutes after departure.
    pub arrival_minutes: f64,
    /// Other locations the leg passes through on its shortest path.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub via: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleRoute {
    pub vehicle_id: String,
    pub stops: Vec<RouteStop>,
    pub total_distance_km: f64,
    pub estimated_time_minutes: f64,
}

/// Successful engine output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutePlan {
    pub vehicle_routes: Vec<VehicleRoute>,
    pub total_distance_km: f64,
    pub total_time_minutes: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobFailure {
    pub kind: FailureKind,
    pub message: String,
}

impl From<&EngineError> for JobFailure {
    fn from(err: &EngineError) -> Self {
        Self {
            kind: err.kind(),
            message: err.to_string(),
        }
    }
}

/// Snapshot handed back to the external caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizationResult {
    pub job_id: String,
    pub status: JobStatus,
    pub vehicle_routes: Option<Vec<VehicleRoute>>,
    pub total_distance_km: Option<f64>,
    pub total_time_minutes: Option<f64>,
    pub execution_time_ms: Option<u64>,
    pub error_kind: Option<FailureKind>,
    pub error_message: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// One request's lifecycle: pending, running, then completed or failed.
///
/// Transition methods return `false` and leave the job untouched when the
/// move is not allowed from the current status. Jobs serialize for storage
/// but are only built through [`OptimizationJob::new`], so every state is one
/// the transitions can reach.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OptimizationJob {
    pub job_id: String,
    pub request: OptimizationRequest,
    status: JobStatus,
    plan: Option<RoutePlan>,
    failure: Option<JobFailure>,
    execution_time_ms: Option<u64>,
    created_at: DateTime<Utc>,
    started_at: Option<DateTime<Utc>>,
    completed_at: Option<DateTime<Utc>>,
}

impl OptimizationJob {
    pub fn new(job_id: impl Into<String>, request: OptimizationRequest) -> Self {
        Self {
            job_id: job_id.into(),
            request,
            status: JobStatus::Pending,
            plan: None,
            failure: None,
            execution_time_ms: None,
            created_at: Utc::now(),
            started_at: None,
            completed_at: None,
        }
    }

    pub fn status(&self) -> JobStatus {
        self.status
    }

    pub fn plan(&self) -> Option<&RoutePlan> {
        self.plan.as_ref()
    }

    pub fn failure(&self) -> Option<&JobFailure> {
        self.failure.as_ref()
    }

    pub fn execution_time_ms(&self) -> Option<u64> {
        self.execution_time_ms
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    pub fn is_finished(&self) -> bool {
        matches!(self.status, JobStatus::Completed | JobStatus::Failed)
    }

    /// Pending -> running.
    pub fn start(&mut self) -> bool {
        if self.status != JobStatus::Pending {
            return false;
        }
        self.status = JobStatus::Running;
        self.started_at = Some(Utc::now());
        true
    }

    /// Running -> completed.
    pub fn complete(&mut self, plan: RoutePlan, execution_time: Duration) -> bool {
        if self.status != JobStatus::Running {
            return false;
        }
        self.status = JobStatus::Completed;
        self.plan = Some(plan);
        self.finish(execution_time);
        true
    }

    /// Pending or running -> failed.
    pub fn fail(&mut self, failure: JobFailure, execution_time: Duration) -> bool {
        if self.is_finished() {
            return false;
        }
        self.status = JobStatus::Failed;
        self.failure = Some(failure);
        self.finish(execution_time);
        true
    }

    fn finish(&mut self, execution_time: Duration) {
        self.execution_time_ms = Some(u64::try_from(execution_time.as_millis()).unwrap_or(u64::MAX));
        self.completed_at = Some(Utc::now());
    }

    pub fn result(&self) -> OptimizationResult {
        OptimizationResult {
            job_id: self.job_id.clone(),
            status: self.status,
            vehicle_routes: self.plan.as_ref().map(|plan| plan.vehicle_routes.clone()),
            total_distance_km: self.plan.as_ref().map(|plan| plan.total_distance_km),
            total_time_minutes: self.plan.as_ref().map(|plan| plan.total_time_minutes),
            execution_time_ms: self.execution_time_ms,
            error_kind: self.failure.as_ref().map(|failure| failure.kind),
            error_message: self.failure.as_ref().map(|failure| failure.message.clone()),
            created_at: self.created_at,
        }
    }
}
