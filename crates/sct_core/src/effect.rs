/// Independently owned portion of the monitor state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Slice {
    Status,
    TestRecords,
    Console,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// A slice changed; its subscribers should receive a fresh snapshot.
    Publish(Slice),
}
