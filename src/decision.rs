//! Admission decision record and its wire encoding.

use serde::{Deserialize, Serialize};

use crate::error::{Result, SlidegateError};

/// The outcome of a single `limit` or `check` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decision {
    /// Capacity left after this call: `max_requests` minus the number of
    /// live entries, including any entry this call recorded. Signed because
    /// lowering `max_requests` while old entries survive can put the count
    /// above the new capacity.
    pub remaining_requests: i64,

    /// Timestamp (ms since epoch) at which the oldest surviving entry falls
    /// out of the window, or the call's own timestamp when nothing survives.
    pub next_available_at: u64,

    /// Whether the call was over limit, decided before any entry was
    /// recorded by this call.
    pub is_limited: bool,
}

impl Decision {
    /// Encode the decision into the engine wire format:
    /// `"<remaining>,<next_available>,<is_limited>"`.
    pub fn to_wire(&self) -> String {
        format!(
            "{},{},{}",
            self.remaining_requests, self.next_available_at, self.is_limited
        )
    }

    /// Decode an engine result string.
    ///
    /// Anything that does not split into exactly three fields, with the
    /// first two parseable as integers and the third the literal `true` or
    /// `false`, is a protocol violation. A violation is never coerced into
    /// a default decision.
    pub fn from_wire(raw: &str) -> Result<Self> {
        let fields: Vec<&str> = raw.split(',').collect();
        if fields.len() != 3 {
            return Err(SlidegateError::Protocol(format!(
                "expected 3 fields in engine result, got {}: {:?}",
                fields.len(),
                raw
            )));
        }

        let remaining_requests = fields[0].parse::<i64>().map_err(|_| {
            SlidegateError::Protocol(format!("remaining is not an integer: {:?}", fields[0]))
        })?;
        let next_available_at = fields[1].parse::<u64>().map_err(|_| {
            SlidegateError::Protocol(format!(
                "next available timestamp is not an integer: {:?}",
                fields[1]
            ))
        })?;
        let is_limited = match fields[2] {
            "true" => true,
            "false" => false,
            other => {
                return Err(SlidegateError::Protocol(format!(
                    "limited flag is not a boolean literal: {:?}",
                    other
                )))
            }
        };

        Ok(Self {
            remaining_requests,
            next_available_at,
            is_limited,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_well_formed_result() {
        let decision = Decision::from_wire("4,1700000060000,false").unwrap();
        assert_eq!(
            decision,
            Decision {
                remaining_requests: 4,
                next_available_at: 1_700_000_060_000,
                is_limited: false,
            }
        );
    }

    #[test]
    fn test_decode_negative_remaining() {
        let decision = Decision::from_wire("-3,1000,true").unwrap();
        assert_eq!(decision.remaining_requests, -3);
        assert!(decision.is_limited);
    }

    #[test]
    fn test_decode_rejects_wrong_field_count() {
        assert!(matches!(
            Decision::from_wire("4,1000"),
            Err(SlidegateError::Protocol(_))
        ));
        assert!(matches!(
            Decision::from_wire("4,1000,false,extra"),
            Err(SlidegateError::Protocol(_))
        ));
    }

    #[test]
    fn test_decode_rejects_non_integer_fields() {
        assert!(matches!(
            Decision::from_wire("four,1000,false"),
            Err(SlidegateError::Protocol(_))
        ));
        assert!(matches!(
            Decision::from_wire("4,later,false"),
            Err(SlidegateError::Protocol(_))
        ));
    }

    #[test]
    fn test_decode_rejects_non_literal_boolean() {
        for bad in ["TRUE", "1", "yes", ""] {
            let raw = format!("4,1000,{}", bad);
            assert!(
                matches!(Decision::from_wire(&raw), Err(SlidegateError::Protocol(_))),
                "{:?} should not decode",
                raw
            );
        }
    }
}
