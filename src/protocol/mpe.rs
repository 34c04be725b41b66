//! MPE member channel allocation

/// Hands out MPE member channels for per-note expression.
///
/// The lower zone uses channel 1 as master and channels `2..=1+n` as
/// members; the upper zone uses channel 16 as master and `16-n..=15` as
/// members. A channel stays taken until released, so overlapping zones
/// never hand out the same channel twice.
#[derive(Debug, Clone, Default)]
pub struct MpeChannelAllocator {
    lower_members: u8,
    upper_members: u8,
    in_use: [bool; 16],
}

impl MpeChannelAllocator {
    /// Maximum member channels per zone
    pub const MAX_MEMBERS: u8 = 15;

    /// Create an allocator with both zones disabled
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the lower zone size; 0 disables it.
    pub fn configure_lower_zone(&mut self, members: u8) {
        self.lower_members = members.min(Self::MAX_MEMBERS);
    }

    /// Set the upper zone size; 0 disables it.
    pub fn configure_upper_zone(&mut self, members: u8) {
        self.upper_members = members.min(Self::MAX_MEMBERS);
    }

    /// Lower zone member count
    #[must_use]
    pub const fn lower_zone(&self) -> u8 {
        self.lower_members
    }

    /// Upper zone member count
    #[must_use]
    pub const fn upper_zone(&self) -> u8 {
        self.upper_members
    }

    /// Claim a free member channel, trying the preferred zone first.
    ///
    /// Returns the user-facing channel (1..=16), or `None` when both zones
    /// are exhausted or disabled.
    pub fn allocate(&mut self, prefer_lower: bool) -> Option<u8> {
        let (first, second) = if prefer_lower {
            (self.lower_range(), self.upper_range())
        } else {
            (self.upper_range(), self.lower_range())
        };

        let channel = first
            .chain(second)
            .find(|&channel| !self.in_use[usize::from(channel - 1)])?;
        self.in_use[usize::from(channel - 1)] = true;
        Some(channel)
    }

    /// Return a channel to the pool; channels outside 1..=16 are ignored.
    pub fn release(&mut self, channel: u8) {
        if (1..=16).contains(&channel) {
            self.in_use[usize::from(channel - 1)] = false;
        }
    }

    /// Check whether a channel is currently allocated
    #[must_use]
    pub fn in_use(&self, channel: u8) -> bool {
        (1..=16).contains(&channel) && self.in_use[usize::from(channel - 1)]
    }

    fn lower_range(&self) -> std::ops::RangeInclusive<u8> {
        2..=1 + self.lower_members
    }

    fn upper_range(&self) -> std::ops::RangeInclusive<u8> {
        16 - self.upper_members..=15
    }
}
