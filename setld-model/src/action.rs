//! Custom actions, sequencing constraints, and ordering anchors.

use std::fmt;

use bitflags::bitflags;

use crate::platform::BindingPolicy;

bitflags! {
    /// Execution-mode bits of a custom action.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct ActionFlags: u32 {
        /// Runs from the installation script rather than immediately.
        const DEFERRED = 1 << 0;
        /// Scheduled in the rollback script. Placement is derived from the
        /// forward action that pairs it, never declared.
        const ROLLBACK = 1 << 1;
        /// Does not block the installation on completion.
        const ASYNC = 1 << 2;
        /// Runs in the system context instead of the installing user's.
        const NO_IMPERSONATE = 1 << 3;
    }
}

impl ActionFlags {
    /// Immediate actions execute during scheduling, not from a script.
    #[inline]
    pub fn is_immediate(self) -> bool {
        !self.contains(ActionFlags::DEFERRED) && !self.contains(ActionFlags::ROLLBACK)
    }

    #[inline]
    pub fn is_rollback(self) -> bool {
        self.contains(ActionFlags::ROLLBACK)
    }
}

/// A fixed, reserved position in the action ordering domain representing a
/// well-known compiler-internal checkpoint.
///
/// The numeric layout of the anchors is host configuration, not part of the
/// model; see the linker options.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Anchor {
    CostInitialize,
    CostFinalize,
    InstallInitialize,
    InstallFinalize,
}

impl Anchor {
    pub const ALL: [Anchor; 4] = [
        Anchor::CostInitialize,
        Anchor::CostFinalize,
        Anchor::InstallInitialize,
        Anchor::InstallFinalize,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Anchor::CostInitialize => "CostInitialize",
            Anchor::CostFinalize => "CostFinalize",
            Anchor::InstallInitialize => "InstallInitialize",
            Anchor::InstallFinalize => "InstallFinalize",
        }
    }
}

impl fmt::Display for Anchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The far side of a sequencing constraint: another action or an anchor.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OrderTarget {
    Action(String),
    Anchor(Anchor),
}

/// A directed ordering constraint declared by an action.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SequencingConstraint {
    Before(OrderTarget),
    After(OrderTarget),
}

impl SequencingConstraint {
    pub fn before_action(id: impl Into<String>) -> Self {
        SequencingConstraint::Before(OrderTarget::Action(id.into()))
    }

    pub fn after_action(id: impl Into<String>) -> Self {
        SequencingConstraint::After(OrderTarget::Action(id.into()))
    }

    pub fn before_anchor(anchor: Anchor) -> Self {
        SequencingConstraint::Before(OrderTarget::Anchor(anchor))
    }

    pub fn after_anchor(anchor: Anchor) -> Self {
        SequencingConstraint::After(OrderTarget::Anchor(anchor))
    }
}

/// A custom action contributed by a module.
///
/// The action is emitted as a row of the `CustomAction` table whose identity
/// carries the platform qualifier chosen by its [`BindingPolicy`] at resolve
/// time.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CustomAction {
    pub id: String,
    pub flags: ActionFlags,
    /// Reference into the `Binary` table naming the action's payload.
    pub source: String,
    pub entry_point: String,
    pub condition: Option<String>,
    pub binding: BindingPolicy,
    pub constraints: Vec<SequencingConstraint>,
    /// Identifier of the rollback action paired 1:1 with this forward action.
    pub rollback: Option<String>,
}

impl CustomAction {
    pub fn new(
        id: impl Into<String>,
        flags: ActionFlags,
        source: impl Into<String>,
        entry_point: impl Into<String>,
        binding: BindingPolicy,
    ) -> Self {
        Self {
            id: id.into(),
            flags,
            source: source.into(),
            entry_point: entry_point.into(),
            condition: None,
            binding,
            constraints: Vec::new(),
            rollback: None,
        }
    }

    pub fn with_condition(mut self, condition: impl Into<String>) -> Self {
        self.condition = Some(condition.into());
        self
    }

    pub fn with_constraint(mut self, constraint: SequencingConstraint) -> Self {
        self.constraints.push(constraint);
        self
    }

    pub fn with_rollback(mut self, rollback: impl Into<String>) -> Self {
        self.rollback = Some(rollback.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flag_classification() {
        let immediate = ActionFlags::empty();
        assert!(immediate.is_immediate());
        assert!(!immediate.is_rollback());

        let deferred = ActionFlags::DEFERRED | ActionFlags::NO_IMPERSONATE;
        assert!(!deferred.is_immediate());

        let rollback = ActionFlags::ROLLBACK;
        assert!(rollback.is_rollback());
        assert!(!rollback.is_immediate());
    }
}
