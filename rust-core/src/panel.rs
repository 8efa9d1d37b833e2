//! Record-at-a-time driver shared by every panel filter
//!
//! A filter absorbs one record per call and emits at most one record per
//! call. Once the input is exhausted the driver keeps pushing `None` until the
//! filter stops producing output, which flushes the trailing half-neighborhood.

use crate::error::FilterError;
use crate::record::Trace;

/// A streaming filter over a panel of records
pub trait PanelFilter {
    /// Push one record (`None` once the input is exhausted) and return the
    /// filtered center record, if the neighborhood is ready.
    fn process(&mut self, trace: Option<&Trace>) -> Result<Option<Trace>, FilterError>;
}

impl<F: PanelFilter + ?Sized> PanelFilter for Box<F> {
    fn process(&mut self, trace: Option<&Trace>) -> Result<Option<Trace>, FilterError> {
        (**self).process(trace)
    }
}

/// Run `filter` over every record of `input`, then drain it, handing each
/// emitted record to `emit` in panel order.
///
/// Returns the number of emitted records.
pub fn stream_panel<F, I, E>(filter: &mut F, input: I, mut emit: E) -> Result<usize, FilterError>
where
    F: PanelFilter + ?Sized,
    I: IntoIterator<Item = Trace>,
    E: FnMut(Trace),
{
    let mut emitted = 0;
    for trace in input {
        if let Some(out) = filter.process(Some(&trace))? {
            emit(out);
            emitted += 1;
        }
    }
    while let Some(out) = filter.process(None)? {
        emit(out);
        emitted += 1;
    }
    log::debug!("panel finished: {} records emitted", emitted);
    Ok(emitted)
}

/// Filter a whole panel held in memory
pub fn run_panel<F>(filter: &mut F, traces: &[Trace]) -> Result<Vec<Trace>, FilterError>
where
    F: PanelFilter + ?Sized,
{
    let mut output = Vec::with_capacity(traces.len());
    stream_panel(filter, traces.iter().cloned(), |trace| output.push(trace))?;
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Echoes each record one call late
    struct Delay {
        held: Option<Trace>,
    }

    impl PanelFilter for Delay {
        fn process(&mut self, trace: Option<&Trace>) -> Result<Option<Trace>, FilterError> {
            Ok(std::mem::replace(&mut self.held, trace.cloned()))
        }
    }

    #[test]
    fn test_drains_after_input() {
        let traces: Vec<Trace> = (0..4).map(|i| Trace::new(vec![i], vec![i as f32])).collect();
        let mut filter = Delay { held: None };
        let output = run_panel(&mut filter, &traces).unwrap();
        assert_eq!(output, traces);
    }

    #[test]
    fn test_boxed_filter() {
        let mut filter: Box<dyn PanelFilter> = Box::new(Delay { held: None });
        let mut seen = Vec::new();
        let count = stream_panel(
            &mut filter,
            vec![Trace::new(vec![1], vec![1.0])],
            |trace| seen.push(trace.header[0]),
        )
        .unwrap();
        assert_eq!(count, 1);
        assert_eq!(seen, vec![1]);
    }
}
