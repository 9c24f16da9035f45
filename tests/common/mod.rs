//! Records modelled after the chaos experimentation API, shared by the
//! integration tests and benchmarks.

#![allow(dead_code)]

use record_guard::prelude::*;
use record_guard::rules::{ItemsRule, Range, Rule, WellKnown};
use std::collections::HashMap;
use std::sync::LazyLock;

macro_rules! validate_via_descriptor {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl Validate for $ty {
                fn validate_with(&self, ctx: &mut Context) -> Result<(), ValidationError> {
                    ctx.check(self)
                }
            }
        )+
    };
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Timestamp {
    pub seconds: i64,
    pub nanos: i32,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExperimentConfig {
    pub kind: String,
    pub percentage: u32,
    pub upstream: String,
    pub labels: HashMap<String, String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Experiment {
    pub id: u64,
    pub config: Option<ExperimentConfig>,
    pub start_time: Option<Timestamp>,
    pub end_time: Option<Timestamp>,
}

#[derive(Debug, Clone, Default)]
pub struct CreateExperimentRequest {
    pub config: Option<ExperimentConfig>,
    pub start_time: Option<Timestamp>,
    pub end_time: Option<Timestamp>,
}

#[derive(Debug, Clone, Default)]
pub struct CreateExperimentResponse {
    pub experiment: Option<Experiment>,
}

#[derive(Debug, Clone, Default)]
pub struct GetExperimentsResponse {
    pub experiments: Vec<Experiment>,
}

/// Run details come from another service and carry no validation rules.
#[derive(Debug, Clone, Default)]
pub struct RunDetails {
    pub status: String,
}

#[derive(Debug, Clone, Default)]
pub struct GetExperimentRunDetailsResponse {
    pub run_details: Option<RunDetails>,
}

#[derive(Debug, Clone, Default)]
pub struct StopExperimentsRequest {
    pub ids: Vec<u64>,
}

#[derive(Debug, Clone, Default)]
pub struct ExperimentIndex {
    pub by_name: HashMap<String, Experiment>,
}

/// A self-referential record, used to exercise the depth budget.
#[derive(Debug, Clone, Default)]
pub struct Node {
    pub next: Option<Box<Node>>,
}

static TIMESTAMP: LazyLock<RecordDescriptor> = LazyLock::new(|| {
    RecordDescriptor::new("Timestamp")
        .field(FieldDescriptor::scalar("Seconds"))
        .field(
            FieldDescriptor::scalar("Nanos")
                .rule(Rule::Within(Range::new(0, true, 1_000_000_000, false))),
        )
});

static EXPERIMENT_CONFIG: LazyLock<RecordDescriptor> = LazyLock::new(|| {
    RecordDescriptor::new("ExperimentConfig")
        .field(FieldDescriptor::scalar("Kind").rule(Rule::one_of(["abort", "latency"])))
        .field(
            FieldDescriptor::scalar("Percentage").rule(Rule::Within(Range::new(0, false, 100, true))),
        )
        .field(FieldDescriptor::scalar("Upstream").rule(Rule::Format(WellKnown::Address)))
        .field(
            FieldDescriptor::map("Labels")
                .key_rule(Rule::pattern("^[a-z][a-z0-9_]*$").expect("label key pattern"))
                .rule(Rule::MaxLen(63))
                .items(ItemsRule::MaxItems(8)),
        )
});

static EXPERIMENT: LazyLock<RecordDescriptor> = LazyLock::new(|| {
    RecordDescriptor::new("Experiment")
        .field(FieldDescriptor::scalar("Id"))
        .field(FieldDescriptor::message("Config"))
        .field(FieldDescriptor::message("StartTime"))
        .field(FieldDescriptor::message("EndTime"))
});

static CREATE_EXPERIMENT_REQUEST: LazyLock<RecordDescriptor> = LazyLock::new(|| {
    RecordDescriptor::new("CreateExperimentRequest")
        .field(FieldDescriptor::message("Config").required())
        .field(FieldDescriptor::message("StartTime"))
        .field(FieldDescriptor::message("EndTime"))
});

static CREATE_EXPERIMENT_RESPONSE: LazyLock<RecordDescriptor> = LazyLock::new(|| {
    RecordDescriptor::new("CreateExperimentResponse")
        .field(FieldDescriptor::message("Experiment"))
});

static GET_EXPERIMENTS_RESPONSE: LazyLock<RecordDescriptor> = LazyLock::new(|| {
    RecordDescriptor::new("GetExperimentsResponse")
        .field(FieldDescriptor::repeated_messages("Experiments"))
});

static GET_EXPERIMENT_RUN_DETAILS_RESPONSE: LazyLock<RecordDescriptor> = LazyLock::new(|| {
    RecordDescriptor::new("GetExperimentRunDetailsResponse")
        .field(FieldDescriptor::message("RunDetails"))
});

static STOP_EXPERIMENTS_REQUEST: LazyLock<RecordDescriptor> = LazyLock::new(|| {
    RecordDescriptor::new("StopExperimentsRequest").field(
        FieldDescriptor::repeated("Ids")
            .items(ItemsRule::MinItems(1))
            .items(ItemsRule::Unique)
            .rule(Rule::Gt(0u64.into())),
    )
});

static EXPERIMENT_INDEX: LazyLock<RecordDescriptor> = LazyLock::new(|| {
    RecordDescriptor::new("ExperimentIndex").field(
        FieldDescriptor::map("ByName").key_rule(Rule::pattern("^[a-z0-9-]+$").expect("name pattern")),
    )
});

static NODE: LazyLock<RecordDescriptor> =
    LazyLock::new(|| RecordDescriptor::new("Node").field(FieldDescriptor::message("Next")));

impl Record for Node {
    fn descriptor(&self) -> &'static RecordDescriptor {
        &NODE
    }

    fn field(&self, name: &str) -> FieldValue<'_> {
        match name {
            "Next" => FieldValue::message(self.next.as_deref()),
            _ => FieldValue::Missing,
        }
    }
}

impl Record for Timestamp {
    fn descriptor(&self) -> &'static RecordDescriptor {
        &TIMESTAMP
    }

    fn field(&self, name: &str) -> FieldValue<'_> {
        match name {
            "Seconds" => FieldValue::scalar(self.seconds),
            "Nanos" => FieldValue::scalar(self.nanos),
            _ => FieldValue::Missing,
        }
    }
}

impl Record for ExperimentConfig {
    fn descriptor(&self) -> &'static RecordDescriptor {
        &EXPERIMENT_CONFIG
    }

    fn field(&self, name: &str) -> FieldValue<'_> {
        match name {
            "Kind" => FieldValue::scalar(&self.kind),
            "Percentage" => FieldValue::scalar(self.percentage),
            "Upstream" => FieldValue::scalar(&self.upstream),
            "Labels" => FieldValue::scalar_map(&self.labels),
            _ => FieldValue::Missing,
        }
    }
}

impl Record for Experiment {
    fn descriptor(&self) -> &'static RecordDescriptor {
        &EXPERIMENT
    }

    fn field(&self, name: &str) -> FieldValue<'_> {
        match name {
            "Id" => FieldValue::scalar(self.id),
            "Config" => FieldValue::message(self.config.as_ref()),
            "StartTime" => FieldValue::message(self.start_time.as_ref()),
            "EndTime" => FieldValue::message(self.end_time.as_ref()),
            _ => FieldValue::Missing,
        }
    }
}

impl Record for CreateExperimentRequest {
    fn descriptor(&self) -> &'static RecordDescriptor {
        &CREATE_EXPERIMENT_REQUEST
    }

    fn field(&self, name: &str) -> FieldValue<'_> {
        match name {
            "Config" => FieldValue::message(self.config.as_ref()),
            "StartTime" => FieldValue::message(self.start_time.as_ref()),
            "EndTime" => FieldValue::message(self.end_time.as_ref()),
            _ => FieldValue::Missing,
        }
    }
}

impl Record for CreateExperimentResponse {
    fn descriptor(&self) -> &'static RecordDescriptor {
        &CREATE_EXPERIMENT_RESPONSE
    }

    fn field(&self, name: &str) -> FieldValue<'_> {
        match name {
            "Experiment" => FieldValue::message(self.experiment.as_ref()),
            _ => FieldValue::Missing,
        }
    }
}

impl Record for GetExperimentsResponse {
    fn descriptor(&self) -> &'static RecordDescriptor {
        &GET_EXPERIMENTS_RESPONSE
    }

    fn field(&self, name: &str) -> FieldValue<'_> {
        match name {
            "Experiments" => FieldValue::messages(&self.experiments),
            _ => FieldValue::Missing,
        }
    }
}

impl Record for GetExperimentRunDetailsResponse {
    fn descriptor(&self) -> &'static RecordDescriptor {
        &GET_EXPERIMENT_RUN_DETAILS_RESPONSE
    }

    fn field(&self, name: &str) -> FieldValue<'_> {
        match name {
            "RunDetails" => FieldValue::opaque(self.run_details.as_ref()),
            _ => FieldValue::Missing,
        }
    }
}

impl Record for StopExperimentsRequest {
    fn descriptor(&self) -> &'static RecordDescriptor {
        &STOP_EXPERIMENTS_REQUEST
    }

    fn field(&self, name: &str) -> FieldValue<'_> {
        match name {
            "Ids" => FieldValue::scalars(self.ids.iter().copied()),
            _ => FieldValue::Missing,
        }
    }
}

impl Record for ExperimentIndex {
    fn descriptor(&self) -> &'static RecordDescriptor {
        &EXPERIMENT_INDEX
    }

    fn field(&self, name: &str) -> FieldValue<'_> {
        match name {
            "ByName" => FieldValue::message_map(&self.by_name),
            _ => FieldValue::Missing,
        }
    }
}

validate_via_descriptor!(
    Timestamp,
    ExperimentConfig,
    Experiment,
    CreateExperimentRequest,
    CreateExperimentResponse,
    GetExperimentsResponse,
    GetExperimentRunDetailsResponse,
    StopExperimentsRequest,
    ExperimentIndex,
    Node,
);

pub fn timestamp(seconds: i64) -> Timestamp {
    Timestamp { seconds, nanos: 0 }
}

pub fn valid_config() -> ExperimentConfig {
    ExperimentConfig {
        kind: "abort".to_string(),
        percentage: 50,
        upstream: "backend.internal".to_string(),
        labels: HashMap::from([("team".to_string(), "chaos".to_string())]),
    }
}

pub fn valid_experiment(id: u64) -> Experiment {
    Experiment {
        id,
        config: Some(valid_config()),
        start_time: Some(timestamp(1_700_000_000)),
        end_time: Some(timestamp(1_700_003_600)),
    }
}

/// A linked chain of `len` nodes.
pub fn node_chain(len: usize) -> Node {
    let mut head = Node::default();
    for _ in 1..len {
        head = Node {
            next: Some(Box::new(head)),
        };
    }
    head
}

/// An experiment whose config fails on its `Kind` field.
pub fn invalid_experiment(id: u64) -> Experiment {
    let mut experiment = valid_experiment(id);
    if let Some(config) = experiment.config.as_mut() {
        config.kind = "drop".to_string();
    }
    experiment
}
