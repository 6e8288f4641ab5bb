use crate::{config::ExitPolicy, model::ObjectKey};

/// What happened to one city during a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CityOutcome {
    Saved(ObjectKey),
    FetchFailed(String),
    /// The provider answered, but without the fields the summary needs.
    InvalidResponse(String),
    PersistFailed(String),
}

impl CityOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, CityOutcome::Saved(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CityReport {
    pub city: String,
    pub outcome: CityOutcome,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    cities: Vec<CityReport>,
}

impl RunReport {
    pub fn push(&mut self, city: impl Into<String>, outcome: CityOutcome) {
        self.cities.push(CityReport {
            city: city.into(),
            outcome,
        });
    }

    pub fn cities(&self) -> &[CityReport] {
        &self.cities
    }

    pub fn failures(&self) -> impl Iterator<Item = &CityReport> {
        self.cities.iter().filter(|c| !c.outcome.is_success())
    }

    pub fn saved(&self) -> usize {
        self.cities.iter().filter(|c| c.outcome.is_success()).count()
    }

    /// Process exit status for this run under `policy`.
    pub fn exit_code(&self, policy: ExitPolicy) -> u8 {
        match policy {
            ExitPolicy::AlwaysSuccess => 0,
            ExitPolicy::FailOnPartial if self.failures().next().is_some() => 1,
            ExitPolicy::FailOnPartial => 0,
        }
    }
}
