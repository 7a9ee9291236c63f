use super::errors::LookupError;
use super::signal::SignalChange;

/// Finds the index of the last change whose time is at or before
/// `desired_time`. `timeline` must be ordered by non-decreasing time.
pub(crate) fn ordered_binary_lookup(
    timeline: &[SignalChange],
    desired_time: u64,
) -> Result<usize, LookupError> {
    // timeline must not be empty
    let (timeline_start_time, timeline_end_time) = match (timeline.first(), timeline.last()) {
        (Some(first), Some(last)) => (first.time, last.time),
        _ => return Err(LookupError::EmptyTimeline),
    };

    // check if we're requesting a value that occurs before the recorded
    // start of the timeline
    if desired_time < timeline_start_time {
        return Err(LookupError::PreTimeline {
            desired_time,
            timeline_start_time,
        });
    }

    // check if we're requesting a value that occurs at or beyond the end of
    // the timeline, if so, return the last value in this timeline
    if desired_time >= timeline_end_time {
        return Ok(timeline.len() - 1);
    }

    // From here on the timeline holds at least two entries and
    //     timeline[lower_idx].time <= desired_time < timeline[upper_idx].time
    // holds on every iteration. Performance is log2(n), where n is the
    // number of changes on the timeline.
    let mut lower_idx = 0usize;
    let mut upper_idx = timeline.len() - 1;

    while upper_idx - lower_idx > 1 {
        let mid_idx = lower_idx + ((upper_idx - lower_idx) / 2);
        if timeline[mid_idx].time <= desired_time {
            lower_idx = mid_idx;
        } else {
            upper_idx = mid_idx;
        }
    }

    Ok(lower_idx)
}
