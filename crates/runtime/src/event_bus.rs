/// Severity of a user-facing notice.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum NoticeLevel {
    Success,
    Info,
}

/// Transient user-facing notification ("toast").
///
/// Notices are recorded in emission order; `seq` is a monotonically increasing
/// counter so replays can be compared deterministically.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub seq: u64,
    pub level: NoticeLevel,
    pub message: String,
}

#[derive(Debug, Default)]
pub struct EventBus {
    next_seq: u64,
    notices: Vec<Notice>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn emit(&mut self, level: NoticeLevel, message: impl Into<String>) {
        let message = message.into();
        tracing::info!(?level, %message, "notice");
        self.notices.push(Notice {
            seq: self.next_seq,
            level,
            message,
        });
        self.next_seq = self.next_seq.wrapping_add(1);
    }

    pub fn success(&mut self, message: impl Into<String>) {
        self.emit(NoticeLevel::Success, message);
    }

    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    pub fn drain(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }
}

#[cfg(test)]
mod tests {
    use super::{EventBus, NoticeLevel};

    #[test]
    fn records_notices_in_order() {
        let mut bus = EventBus::new();
        bus.success("first");
        bus.emit(NoticeLevel::Info, "second");
        assert_eq!(bus.notices().len(), 2);
        assert_eq!(bus.notices()[0].seq, 0);
        assert_eq!(bus.notices()[1].seq, 1);
        assert_eq!(bus.notices()[1].level, NoticeLevel::Info);
    }

    #[test]
    fn drain_clears_but_keeps_sequence() {
        let mut bus = EventBus::new();
        bus.success("m");
        let drained = bus.drain();
        assert_eq!(drained.len(), 1);
        assert!(bus.notices().is_empty());
        bus.success("n");
        assert_eq!(bus.notices()[0].seq, 1);
    }
}
