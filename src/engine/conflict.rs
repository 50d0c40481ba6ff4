use crate::model::*;

use super::neighbors::LaneView;
use super::EngineError;

pub(crate) fn validate_span(span: &Span) -> Result<(), EngineError> {
    use crate::limits::*;
    if span.start >= span.end {
        return Err(EngineError::InvalidSpan {
            start: span.start,
            end: span.end,
        });
    }
    if span.start < MIN_VALID_TIMESTAMP_MS || span.end > MAX_VALID_TIMESTAMP_MS {
        return Err(EngineError::LimitExceeded("timestamp out of range"));
    }
    if span.duration_ms() > MAX_SPAN_DURATION_MS {
        return Err(EngineError::LimitExceeded("span too wide"));
    }
    Ok(())
}

pub(crate) fn validate_payload(payload: &ItemPayload) -> Result<(), EngineError> {
    use crate::limits::*;
    if payload.title.len() > MAX_TITLE_LEN {
        return Err(EngineError::LimitExceeded("title too long"));
    }
    if payload.location.len() > MAX_LOCATION_LEN {
        return Err(EngineError::LimitExceeded("location too long"));
    }
    if payload.description.len() > MAX_DESCRIPTION_LEN {
        return Err(EngineError::LimitExceeded("description too long"));
    }
    if payload.color.as_ref().is_some_and(|c| c.len() > MAX_COLOR_LEN) {
        return Err(EngineError::LimitExceeded("color too long"));
    }
    Ok(())
}

/// Any item of the lane (other than `exclude`) overlapping `span` is a conflict.
pub(crate) fn check_no_conflict<L: LaneView + ?Sized>(
    lane: &L,
    span: &Span,
    exclude: Option<ItemId>,
) -> Result<(), EngineError> {
    match lane.first_overlap(span, exclude) {
        Some(other) => Err(EngineError::Conflict(other.id)),
        None => Ok(()),
    }
}
