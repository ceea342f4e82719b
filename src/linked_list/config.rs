/// Whether copy-assignment adopts the source list's allocator.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum AssignPolicy {
    /// Keep the destination's allocator and copy only the elements.
    #[default]
    Retain,
    /// Replace the destination's allocator with the source's.
    Propagate,
}

/// Per-list allocator policy, fixed when the list is constructed.
///
/// Copies of a list carry the same configuration.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ListConfig {
    pub assign: AssignPolicy,
}

impl ListConfig {
    pub const fn new() -> Self {
        ListConfig {
            assign: AssignPolicy::Retain,
        }
    }

    /// Set the copy-assignment policy.
    ///
    /// # Returns
    /// The config for method chaining
    pub const fn with_assign_policy(mut self, assign: AssignPolicy) -> Self {
        self.assign = assign;
        self
    }

    pub(crate) fn propagates(&self) -> bool {
        self.assign == AssignPolicy::Propagate
    }
}
