use crate::ConsoleEntry;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MonitorViewModel {
    pub state: Option<String>,
    pub error_message: Option<String>,
    pub record_count: usize,
    pub console: Vec<ConsoleEntry>,
    pub dirty: bool,
}
