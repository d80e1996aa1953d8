// Progress reporting for long-running model calls.

use std::fmt;

/// Percent-complete callback wrapper.
///
/// Values are clamped to 0..=100 and only forwarded when they move forward,
/// so the callback sees a non-decreasing sequence.
pub struct Progress<'a> {
    sink: Option<Box<dyn FnMut(u8) + 'a>>,
    last: Option<u8>,
}

impl<'a> Progress<'a> {
    pub fn new(sink: impl FnMut(u8) + 'a) -> Self {
        Self {
            sink: Some(Box::new(sink)),
            last: None,
        }
    }

    /// A reporter that drops everything.
    pub fn silent() -> Self {
        Self {
            sink: None,
            last: None,
        }
    }

    pub fn report(&mut self, percent: u8) {
        let percent = percent.min(100);
        if matches!(self.last, Some(last) if percent <= last) {
            return;
        }
        self.last = Some(percent);
        if let Some(sink) = self.sink.as_mut() {
            sink(percent);
        }
    }

    pub fn finish(&mut self) {
        self.report(100);
    }

    pub fn last(&self) -> Option<u8> {
        self.last
    }

    pub fn is_finished(&self) -> bool {
        self.last == Some(100)
    }

    /// Child reporter whose 0..=100 maps onto `start..=end` of this one.
    pub fn scoped(&mut self, start: u8, end: u8) -> Progress<'_> {
        let start = start.min(100);
        let end = end.clamp(start, 100);
        Progress::new(move |p: u8| {
            let span = u32::from(end - start);
            let mapped = u32::from(start) + span * u32::from(p) / 100;
            self.report(mapped as u8);
        })
    }
}

impl fmt::Debug for Progress<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Progress")
            .field("last", &self.last)
            .field("silent", &self.sink.is_none())
            .finish()
    }
}
