//! Per-run engine configuration

use std::collections::BTreeSet;

use super::request::{FailureLimit, Profile, ValidationRequest};

/// Document features extracted alongside validation
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FeatureObjectType {
    Annotation,
    DocumentSecurity,
    EmbeddedFile,
    Font,
    InformationDictionary,
    Action,
    Colorspace,
}

/// Work the engine performs for each file
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TaskType {
    Validate,
    ExtractFeatures,
}

/// Report serialization produced by the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    /// Machine-readable XML report
    Mrr,
}

impl ReportFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            ReportFormat::Mrr => "mrr",
        }
    }
}

/// Engine configuration for exactly one validation run.
///
/// Built inside the engine lock from a [`ValidationRequest`] and dropped when
/// the run ends. Never cached or handed to another run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationRunConfig {
    pub profile: Profile,
    pub max_failures: FailureLimit,
    pub max_failures_displayed: FailureLimit,
    pub features: BTreeSet<FeatureObjectType>,
    pub tasks: BTreeSet<TaskType>,
    pub format: ReportFormat,
    pub include_passes: bool,
}

impl ValidationRunConfig {
    pub fn from_request(request: &ValidationRequest) -> Self {
        Self {
            profile: Profile::from_code(request.profile_code()),
            max_failures: FailureLimit::from_raw(request.max_failures()),
            max_failures_displayed: FailureLimit::from_raw(request.max_failures_displayed()),
            features: BTreeSet::from([
                FeatureObjectType::Annotation,
                FeatureObjectType::DocumentSecurity,
                FeatureObjectType::EmbeddedFile,
                FeatureObjectType::Font,
                FeatureObjectType::InformationDictionary,
                FeatureObjectType::Action,
                FeatureObjectType::Colorspace,
            ]),
            tasks: BTreeSet::from([TaskType::Validate, TaskType::ExtractFeatures]),
            format: ReportFormat::Mrr,
            include_passes: true,
        }
    }

    pub fn has_task(&self, task: TaskType) -> bool {
        self.tasks.contains(&task)
    }
}
