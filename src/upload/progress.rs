use std::sync::mpsc::Sender;

/// Turns byte counts into `sent / total` fractions for an optional sink.
///
/// Fractions are clamped to `[0, 1]` and never go backwards. With a zero
/// total nothing is reported, the length is not computable.
#[derive(Debug)]
pub struct ProgressReporter {
    total: u64,
    sent: u64,
    last: f32,
    sink: Option<Sender<f32>>,
}

impl ProgressReporter {
    pub fn new(total: u64, sink: Option<Sender<f32>>) -> Self {
        Self {
            total,
            sent: 0,
            last: 0.0,
            sink,
        }
    }

    pub fn advance(&mut self, bytes: u64) {
        self.sent = self.sent.saturating_add(bytes);
        if self.total == 0 {
            return;
        }

        let fraction = (self.sent as f64 / self.total as f64).clamp(0.0, 1.0) as f32;
        if fraction < self.last {
            return;
        }
        self.last = fraction;

        if let Some(sink) = &self.sink {
            sink.send(fraction).unwrap_or_default();
        }
    }

    pub fn fraction(&self) -> f32 {
        self.last
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc::channel;

    #[test]
    fn test_reports_fractions() {
        let (sender, receiver) = channel();
        let mut reporter = ProgressReporter::new(200, Some(sender));
        reporter.advance(50);
        reporter.advance(150);
        drop(reporter);

        let ticks: Vec<f32> = receiver.iter().collect();
        assert_eq!(ticks, vec![0.25, 1.0]);
    }

    #[test]
    fn test_overshoot_is_clamped() {
        let (sender, receiver) = channel();
        let mut reporter = ProgressReporter::new(10, Some(sender));
        reporter.advance(25);
        assert_eq!(reporter.fraction(), 1.0);
        drop(reporter);
        assert_eq!(receiver.iter().collect::<Vec<_>>(), vec![1.0]);
    }

    #[test]
    fn test_unknown_total_reports_nothing() {
        let (sender, receiver) = channel();
        let mut reporter = ProgressReporter::new(0, Some(sender));
        reporter.advance(1024);
        drop(reporter);
        assert!(receiver.iter().next().is_none());
    }

    #[test]
    fn test_without_sink() {
        let mut reporter = ProgressReporter::new(4, None);
        reporter.advance(1);
        assert_eq!(reporter.fraction(), 0.25);
    }
}
