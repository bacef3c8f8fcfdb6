//! Liftover outcomes

use serde::Serialize;

use crate::gl::{GlNode, GlResource};
use crate::history::{AlleleId, DbVersion};

/// Something that happened to one locus during a liftover
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum LiftoverEvent {
    /// The locus maps to a different name at the target version
    Renamed {
        from: String,
        to: String,
        id: AlleleId,
    },
    /// The locus does not exist at the source version
    DroppedAtSource { locus: String },
    /// The locus has no name at the target version
    DroppedAtTarget { locus: String, id: AlleleId },
    /// The locus mapped, but the other member of its genotype did not
    DroppedWithGenotype { locus: String },
    /// Removed as a duplicate of an earlier sibling
    Collapsed { locus: String },
}

impl LiftoverEvent {
    /// Returns true if this event removed a locus from the output
    pub fn is_drop(&self) -> bool {
        matches!(
            self,
            LiftoverEvent::DroppedAtSource { .. }
                | LiftoverEvent::DroppedAtTarget { .. }
                | LiftoverEvent::DroppedWithGenotype { .. }
        )
    }

    /// The source locus this event is about
    pub fn locus(&self) -> &str {
        match self {
            LiftoverEvent::Renamed { from, .. } => from,
            LiftoverEvent::DroppedAtSource { locus }
            | LiftoverEvent::DroppedAtTarget { locus, .. }
            | LiftoverEvent::DroppedWithGenotype { locus }
            | LiftoverEvent::Collapsed { locus } => locus,
        }
    }
}

/// Overall outcome of a liftover
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LiftoverStatus {
    /// Every locus has a name at the target version
    Converted,
    /// Some loci were dropped but a target GL String remains
    PartiallyConverted,
    /// Nothing representable remains at the target version
    Empty,
}

impl LiftoverStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LiftoverStatus::Converted => "converted",
            LiftoverStatus::PartiallyConverted => "partially_converted",
            LiftoverStatus::Empty => "empty",
        }
    }
}

/// Result of lifting one GL String.
#[derive(Debug, Clone, PartialEq)]
pub struct LiftoverResult {
    /// Source GL String as given
    pub source: String,
    /// Source database version
    pub source_version: DbVersion,
    /// Target database version
    pub target_version: DbVersion,
    /// Lifted tree; `None` when nothing survived
    pub target: Option<GlNode>,
    /// Per-locus events in source order
    pub events: Vec<LiftoverEvent>,
}

impl LiftoverResult {
    pub fn status(&self) -> LiftoverStatus {
        if self.target.is_none() {
            LiftoverStatus::Empty
        } else if self.events.iter().any(LiftoverEvent::is_drop) {
            LiftoverStatus::PartiallyConverted
        } else {
            LiftoverStatus::Converted
        }
    }

    /// True when no locus was dropped and the result is not empty
    pub fn fully_converted(&self) -> bool {
        self.status() == LiftoverStatus::Converted
    }

    pub fn is_empty(&self) -> bool {
        self.target.is_none()
    }

    /// Lifted GL String text, `None` when empty
    pub fn target_text(&self) -> Option<String> {
        self.target.as_ref().map(GlNode::to_string)
    }

    /// Resource type of the lifted tree, which may be narrower than the source's
    pub fn target_resource(&self) -> Option<GlResource> {
        self.target.as_ref().map(GlNode::resource)
    }

    /// Source loci that did not make it to the target
    pub fn dropped(&self) -> Vec<&str> {
        self.events
            .iter()
            .filter(|e| e.is_drop())
            .map(LiftoverEvent::locus)
            .collect()
    }

    /// Source loci that were renamed, with their new names
    pub fn renamed(&self) -> Vec<(&str, &str)> {
        self.events
            .iter()
            .filter_map(|e| match e {
                LiftoverEvent::Renamed { from, to, .. } => Some((from.as_str(), to.as_str())),
                _ => None,
            })
            .collect()
    }
}
