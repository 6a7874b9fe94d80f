bitflags::bitflags! {
    /// Governs what happens to a resource once it is no longer required.
    ///
    /// `DISPOSE_ON_REMOVE` wins over `RELEASE_HANDLE_ON_REMOVE` when both are
    /// set. With neither set, unhosted resources are retained intact.
    /// `HOST_ALWAYS` disables viewport-driven hosting altogether.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    #[cfg_attr(feature = "serde", serde(transparent))]
    pub struct MemoryPolicy: u8 {
        const HOST_ALWAYS = 0b0001;
        const RELEASE_HANDLE_ON_REMOVE = 0b0010;
        const DISPOSE_ON_REMOVE = 0b0100;
    }
}

impl Default for MemoryPolicy {
    fn default() -> Self {
        MemoryPolicy::RELEASE_HANDLE_ON_REMOVE
    }
}

impl MemoryPolicy {
    pub fn hosts_always(&self) -> bool {
        self.contains(MemoryPolicy::HOST_ALWAYS)
    }

    pub fn disposes_on_remove(&self) -> bool {
        self.contains(MemoryPolicy::DISPOSE_ON_REMOVE)
    }

    pub fn releases_handle_on_remove(&self) -> bool {
        self.contains(MemoryPolicy::RELEASE_HANDLE_ON_REMOVE)
    }
}
