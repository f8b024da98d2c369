/// Delayed triggers on a virtual clock.
///
/// Time only moves when [`Scheduler::advance`] is called, so choreography
/// can be tested by stepping the clock instead of sleeping.
#[derive(Debug, Clone)]
pub struct Scheduler<T> {
    now_ms: f64,
    next_seq: u64,
    pending: Vec<Scheduled<T>>,
}

#[derive(Debug, Clone)]
struct Scheduled<T> {
    due_ms: f64,
    seq: u64,
    trigger: T,
}

impl<T> Scheduler<T> {
    pub fn new() -> Self {
        Self {
            now_ms: 0.0,
            next_seq: 0,
            pending: Vec::new(),
        }
    }

    /// Current virtual time in milliseconds.
    pub fn now_ms(&self) -> f64 {
        self.now_ms
    }

    /// Fire `trigger` once `delay_ms` of virtual time has passed.
    pub fn schedule(&mut self, delay_ms: f32, trigger: T) {
        let due_ms = self.now_ms + f64::from(delay_ms.max(0.0));
        self.pending.push(Scheduled {
            due_ms,
            seq: self.next_seq,
            trigger,
        });
        self.next_seq += 1;
    }

    /// Move the clock forward and return every trigger that came due,
    /// earliest first. Triggers due at the same instant keep scheduling order.
    pub fn advance(&mut self, dt_ms: f32) -> Vec<T> {
        self.now_ms += f64::from(dt_ms.max(0.0));
        let now = self.now_ms;

        let (mut due, rest): (Vec<_>, Vec<_>) =
            std::mem::take(&mut self.pending)
                .into_iter()
                .partition(|s| s.due_ms <= now);
        self.pending = rest;

        due.sort_by(|a, b| a.due_ms.total_cmp(&b.due_ms).then(a.seq.cmp(&b.seq)));
        due.into_iter().map(|s| s.trigger).collect()
    }

    /// Whether any pending trigger matches.
    pub fn any(&self, mut pred: impl FnMut(&T) -> bool) -> bool {
        self.pending.iter().any(|s| pred(&s.trigger))
    }

    /// Drop every pending trigger. The clock keeps its value.
    pub fn clear(&mut self) {
        self.pending.clear();
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self::new()
    }
}
