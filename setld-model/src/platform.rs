//! The two-valued architecture axis and per-action binding policy.

use std::fmt;

/// Target platform of a build, or the architecture a row variant is built for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Platform {
    X86,
    X64,
}

impl Platform {
    pub const ALL: [Platform; 2] = [Platform::X86, Platform::X64];

    /// Identifier qualifier appended to architecture-variant symbols.
    #[inline]
    pub fn suffix(self) -> &'static str {
        match self {
            Platform::X86 => "X86",
            Platform::X64 => "X64",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.suffix())
    }
}

/// Per-action declaration of how its payload binary binds to an architecture.
///
/// Declared by the module that owns the action, never inferred by the core
/// and never overridden by the build host.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BindingPolicy {
    /// Always selects the 32-bit variant, irrespective of the build's target
    /// platform. Used by actions with no pointer-width-sensitive behavior,
    /// which can run uniformly under emulation regardless of target.
    FixedX86,
    /// Selects the variant matching the platform supplied for this build.
    TracksTargetPlatform,
}

impl BindingPolicy {
    /// The platform this policy resolves to for a build targeting `target`.
    #[inline]
    pub fn bound_platform(self, target: Platform) -> Platform {
        match self {
            BindingPolicy::FixedX86 => Platform::X86,
            BindingPolicy::TracksTargetPlatform => target,
        }
    }
}
