//! The guided-tour plan: stage order, auto-install eligibility, and the
//! settle delay between chained stages.

use crate::core::StageKind;
use std::collections::HashSet;
use std::time::Duration;

/// Settle delay between chained stage entries on the guided tour.
pub const SETTLE_DELAY: Duration = Duration::from_millis(1200);

/// Ordered stage plan for one process run.
#[derive(Debug, Clone)]
pub struct TourPlan {
    stages: Vec<StageKind>,
    auto_install: HashSet<StageKind>,
    settle_delay: Duration,
}

impl TourPlan {
    /// Creates a plan over the given stage order with every stage
    /// auto-install-eligible.
    #[must_use]
    pub fn new(stages: Vec<StageKind>) -> Self {
        let auto_install = stages.iter().copied().collect();
        Self {
            stages,
            auto_install,
            settle_delay: SETTLE_DELAY,
        }
    }

    /// The standard first-boot tour over all six provisioning categories.
    #[must_use]
    pub fn standard() -> Self {
        Self::new(vec![
            StageKind::WindowsSettings,
            StageKind::GroupPolicy,
            StageKind::ProgramUninstall,
            StageKind::DependencyInstall,
            StageKind::PythonDependencyInstall,
            StageKind::ProgramInstall,
        ])
    }

    /// Restricts auto-install eligibility to the given stages.
    #[must_use]
    pub fn with_auto_install(mut self, stages: impl IntoIterator<Item = StageKind>) -> Self {
        self.auto_install = stages.into_iter().collect();
        self
    }

    /// Overrides the settle delay.
    #[must_use]
    pub fn with_settle_delay(mut self, delay: Duration) -> Self {
        self.settle_delay = delay;
        self
    }

    /// Number of stages in the plan.
    #[must_use]
    pub fn len(&self) -> usize {
        self.stages.len()
    }

    /// Returns true if the plan has no stages.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// The stage at one index.
    #[must_use]
    pub fn stage_at(&self, index: usize) -> Option<StageKind> {
        self.stages.get(index).copied()
    }

    /// Whether a stage may auto-install.
    #[must_use]
    pub fn is_auto_install(&self, stage: StageKind) -> bool {
        self.auto_install.contains(&stage)
    }

    /// Whether an index is the final stage.
    #[must_use]
    pub fn is_final(&self, index: usize) -> bool {
        !self.stages.is_empty() && index == self.stages.len() - 1
    }

    /// The settle delay between chained entries.
    #[must_use]
    pub fn settle_delay(&self) -> Duration {
        self.settle_delay
    }
}

impl Default for TourPlan {
    fn default() -> Self {
        Self::standard()
    }
}
