//! Host-supplied link configuration.

use setld_model::{Anchor, Platform, Sequence};
use setld_result::{Error, Result};

/// Bound on the resolver's fixed-point iteration.
pub const DEFAULT_MAX_RESOLVE_PASSES: usize = 8;

/// Numeric layout of the reserved anchors in the ordering domain.
///
/// Supplied by the build host as configuration; the anchors must be listed
/// in execution order with strictly increasing positions.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AnchorLayout {
    positions: Vec<(Anchor, Sequence)>,
}

impl AnchorLayout {
    pub fn new(positions: Vec<(Anchor, Sequence)>) -> Result<Self> {
        if positions.len() != Anchor::ALL.len() {
            return Err(Error::SchemaViolation(format!(
                "anchor layout must place all {} anchors, got {}",
                Anchor::ALL.len(),
                positions.len()
            )));
        }
        for (supplied, expected) in positions.iter().zip(Anchor::ALL) {
            if supplied.0 != expected {
                return Err(Error::SchemaViolation(format!(
                    "anchor layout must list anchors in execution order: expected {expected}, \
                     got {}",
                    supplied.0
                )));
            }
        }
        for pair in positions.windows(2) {
            if pair[1].1 <= pair[0].1 {
                return Err(Error::SchemaViolation(format!(
                    "anchor layout positions must be strictly increasing: {} ({}) then {} ({})",
                    pair[0].0, pair[0].1, pair[1].0, pair[1].1
                )));
            }
        }
        Ok(Self { positions })
    }

    /// Anchors with their positions, in execution order.
    pub fn ordered(&self) -> &[(Anchor, Sequence)] {
        &self.positions
    }

    pub fn position(&self, anchor: Anchor) -> Sequence {
        // Construction guarantees every anchor is present.
        self.positions
            .iter()
            .find(|(a, _)| *a == anchor)
            .map(|(_, pos)| *pos)
            .unwrap_or(0)
    }
}

impl Default for AnchorLayout {
    fn default() -> Self {
        Self {
            positions: vec![
                (Anchor::CostInitialize, 800),
                (Anchor::CostFinalize, 1000),
                (Anchor::InstallInitialize, 1500),
                (Anchor::InstallFinalize, 6600),
            ],
        }
    }
}

/// Build-time parameters the linking core depends on from its host.
#[derive(Clone, Debug)]
pub struct LinkOptions {
    /// Target platform of this build.
    pub platform: Platform,
    /// Numeric layout of the reserved anchors.
    pub anchors: AnchorLayout,
    /// Cap on the resolver's fixed-point iteration; exceeding it with
    /// unresolved symbols remaining is an error, never silent success.
    pub max_resolve_passes: usize,
}

impl LinkOptions {
    pub fn new(platform: Platform) -> Self {
        Self {
            platform,
            anchors: AnchorLayout::default(),
            max_resolve_passes: DEFAULT_MAX_RESOLVE_PASSES,
        }
    }

    pub fn with_anchors(mut self, anchors: AnchorLayout) -> Self {
        self.anchors = anchors;
        self
    }

    pub fn with_max_resolve_passes(mut self, passes: usize) -> Self {
        self.max_resolve_passes = passes;
        self
    }
}
