use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

/// One of the two networks the bridge spans.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumIter,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum Network {
    Source,
    Destination,
}

/// Identifies a unit of pipeline work.
///
/// Variant order is the order of the standard bridge pipeline.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumIter,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum StepId {
    SourceAsset,
    DestinationAsset,
    Gateway,
    InitializeDestination,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum TemplateKind {
    SourceAsset,
    DestinationAsset,
    Gateway,
}

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn step_ids_iterate_in_pipeline_order() {
        let steps: Vec<_> = StepId::iter().collect();

        assert_eq!(
            steps,
            vec![
                StepId::SourceAsset,
                StepId::DestinationAsset,
                StepId::Gateway,
                StepId::InitializeDestination,
            ]
        );
        assert!(steps.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn display_is_kebab_case() {
        assert_eq!(StepId::InitializeDestination.to_string(), "initialize-destination");
        assert_eq!(Network::Destination.to_string(), "destination");
    }
}
