// Request generation gate - Only the newest fetch may replace the snapshot
/// Ticket handed out when a fetch begins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RequestTicket(u64);

impl RequestTicket {
    pub fn generation(&self) -> u64 {
        self.0
    }
}

#[derive(Debug)]
pub struct RequestGate<T> {
    issued: u64,
    /// Newest generation that resolved, with data or with an error
    settled: u64,
    value: Option<T>,
}

impl<T> Default for RequestGate<T> {
    fn default() -> Self {
        Self {
            issued: 0,
            settled: 0,
            value: None,
        }
    }
}

impl<T> RequestGate<T> {
    pub fn begin(&mut self) -> RequestTicket {
        self.issued += 1;
        RequestTicket(self.issued)
    }

    pub fn is_latest(&self, ticket: RequestTicket) -> bool {
        ticket.0 == self.issued
    }

    /// Store `value` if `ticket` is the most recent one issued. Returns whether it was applied.
    pub fn apply(&mut self, ticket: RequestTicket, value: T) -> bool {
        if !self.is_latest(ticket) {
            tracing::debug!(
                "Discarding stale response for request {} (latest is {})",
                ticket.0,
                self.issued
            );
            return false;
        }
        self.settled = ticket.0;
        self.value = Some(value);
        true
    }

    /// Settle `ticket` without data. The previous value stays current.
    pub fn fail(&mut self, ticket: RequestTicket) -> bool {
        if !self.is_latest(ticket) {
            return false;
        }
        self.settled = ticket.0;
        true
    }

    pub fn current(&self) -> Option<&T> {
        self.value.as_ref()
    }

    /// True while the latest request has not resolved.
    pub fn is_pending(&self) -> bool {
        self.settled < self.issued
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latest_response_wins() {
        let mut gate = RequestGate::default();
        let first = gate.begin();
        let second = gate.begin();

        assert!(gate.apply(second, "second"));
        assert!(!gate.apply(first, "first"));
        assert_eq!(gate.current(), Some(&"second"));
        assert!(!gate.is_pending());
    }

    #[test]
    fn test_stale_response_before_latest_is_dropped() {
        let mut gate = RequestGate::default();
        let first = gate.begin();
        let second = gate.begin();

        assert!(!gate.apply(first, 1));
        assert!(gate.current().is_none());
        assert!(gate.is_pending());

        assert!(gate.apply(second, 2));
        assert!(!gate.is_pending());
        assert_eq!(gate.current(), Some(&2));
    }

    #[test]
    fn test_fresh_gate_is_idle() {
        let gate: RequestGate<u8> = RequestGate::default();
        assert!(!gate.is_pending());
        assert!(gate.current().is_none());
    }

    #[test]
    fn test_failed_latest_request_settles_and_keeps_value() {
        let mut gate = RequestGate::default();
        let first = gate.begin();
        assert!(gate.apply(first, "first"));

        let second = gate.begin();
        assert!(gate.is_pending());
        assert!(gate.fail(second));
        assert!(!gate.is_pending());
        assert_eq!(gate.current(), Some(&"first"));
    }

    #[test]
    fn test_failed_stale_request_leaves_newer_pending() {
        let mut gate: RequestGate<&str> = RequestGate::default();
        let first = gate.begin();
        let _second = gate.begin();
        assert!(!gate.fail(first));
        assert!(gate.is_pending());
    }
}
