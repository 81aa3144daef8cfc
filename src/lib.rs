pub mod arbiter;
pub mod candidate;
pub mod catalog;
pub mod config;
pub mod error;
pub mod picker;
pub mod resolver;
pub mod surface;
pub mod telemetry;
pub mod terminal;

#[cfg(test)]
mod test_helpers;

pub use arbiter::{CandidateSource, FormatterArbiter, StaticCandidateSource};
pub use candidate::{CandidateList, Document, FormatKind, FormatterCandidate};
pub use catalog::{KnownExtension, ProviderCatalog};
pub use config::{
    ConfigurationStore, FileConfigurationStore, MemoryConfigurationStore, SettingScope,
};
pub use error::{ArbiterError, ArbiterResult};
pub use picker::{InteractivePicker, OnDemandChoice};
pub use resolver::{ConflictResolver, ResolutionMode};
pub use telemetry::{SelectionOutcome, TelemetryEvent, TelemetryReporter};
