//! Flex charging commands and their request bodies

use std::fmt;
use std::str::FromStr;

use chrono::NaiveTime;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::FlexRequestError;

const DEPARTURE_FORMAT: &str = "%H:%M";

/// Departure time of day, exchanged with the backend as `HH:MM`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct DepartureTime(NaiveTime);

impl DepartureTime {
    pub fn new(hour: u32, minute: u32) -> Option<Self> {
        NaiveTime::from_hms_opt(hour, minute, 0).map(Self)
    }
}

impl FromStr for DepartureTime {
    type Err = FlexRequestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NaiveTime::parse_from_str(s.trim(), DEPARTURE_FORMAT)
            .map(Self)
            .map_err(|_| FlexRequestError::InvalidDepartureTime(s.to_string()))
    }
}

impl fmt::Display for DepartureTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(DEPARTURE_FORMAT))
    }
}

impl Serialize for DepartureTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for DepartureTime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Complete flex configuration sent when enabling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlexSchedule {
    pub phase_count: u8,
    pub departure_time: DepartureTime,
    pub desired_range_kwh: u32,
}

impl FlexSchedule {
    pub fn new(
        phase_count: u8,
        departure_time: DepartureTime,
        desired_range_kwh: u32,
    ) -> Result<Self, FlexRequestError> {
        if !(1..=3).contains(&phase_count) {
            return Err(FlexRequestError::InvalidPhaseCount(phase_count));
        }
        Ok(Self {
            phase_count,
            departure_time,
            desired_range_kwh,
        })
    }
}

/// Request to switch flex charging on with a full schedule, or off
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlexRequest {
    Enable(FlexSchedule),
    Disable,
}

impl FlexRequest {
    /// Assemble a request from loosely typed inputs, as an action handler
    /// receives them. Enabling needs all three settings; disabling takes none.
    pub fn from_parts(
        enable: bool,
        phase_count: Option<u8>,
        departure_time: Option<&str>,
        desired_range_kwh: Option<u32>,
    ) -> Result<Self, FlexRequestError> {
        if !enable {
            if phase_count.is_some() {
                return Err(FlexRequestError::UnexpectedField("phase count"));
            }
            if departure_time.is_some() {
                return Err(FlexRequestError::UnexpectedField("departure time"));
            }
            if desired_range_kwh.is_some() {
                return Err(FlexRequestError::UnexpectedField("desired range"));
            }
            return Ok(Self::Disable);
        }

        let phase_count = phase_count.ok_or(FlexRequestError::MissingField("phase count"))?;
        let departure_time = departure_time
            .ok_or(FlexRequestError::MissingField("departure time"))?
            .parse()?;
        let desired_range_kwh =
            desired_range_kwh.ok_or(FlexRequestError::MissingField("desired range"))?;

        FlexSchedule::new(phase_count, departure_time, desired_range_kwh).map(Self::Enable)
    }

    pub fn is_enable(&self) -> bool {
        matches!(self, Self::Enable(_))
    }
}

/// Body of the flex `migrate` call
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FlexMigrationBody {
    #[serde(rename = "configuredEffect")]
    pub configured_effect: PhaseCountBody,
    #[serde(rename = "departureTime")]
    pub departure_time: DepartureTimeBody,
    #[serde(rename = "desiredRange")]
    pub desired_range: DesiredRangeBody,
}

impl From<&FlexSchedule> for FlexMigrationBody {
    fn from(schedule: &FlexSchedule) -> Self {
        Self {
            configured_effect: PhaseCountBody {
                phase_count: schedule.phase_count,
            },
            departure_time: DepartureTimeBody {
                time: schedule.departure_time,
            },
            desired_range: DesiredRangeBody {
                range: schedule.desired_range_kwh,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PhaseCountBody {
    #[serde(rename = "phaseCount")]
    pub phase_count: u8,
}

/// Body of the flex `schedule` call, also nested in `migrate`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DepartureTimeBody {
    pub time: DepartureTime,
}

/// Body of the flex `range` call, also nested in `migrate`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DesiredRangeBody {
    pub range: u32,
}

/// Body of the flex `enable` call
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FlexEnableBody {
    pub enable: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_departure_time_format() {
        let t: DepartureTime = "6:05".parse().unwrap();
        assert_eq!(t.to_string(), "06:05");
        assert!("25:00".parse::<DepartureTime>().is_err());
        assert!("0600".parse::<DepartureTime>().is_err());
    }

    #[test]
    fn test_enable_requires_every_setting() {
        assert_eq!(
            FlexRequest::from_parts(true, Some(3), None, Some(20)),
            Err(FlexRequestError::MissingField("departure time"))
        );
        assert_eq!(
            FlexRequest::from_parts(true, None, Some("06:00"), Some(20)),
            Err(FlexRequestError::MissingField("phase count"))
        );
        assert!(FlexRequest::from_parts(true, Some(3), Some("06:00"), Some(20))
            .unwrap()
            .is_enable());
    }

    #[test]
    fn test_disable_takes_no_settings() {
        assert_eq!(
            FlexRequest::from_parts(false, None, None, None),
            Ok(FlexRequest::Disable)
        );
        assert_eq!(
            FlexRequest::from_parts(false, None, None, Some(20)),
            Err(FlexRequestError::UnexpectedField("desired range"))
        );
    }

    #[test]
    fn test_phase_count_bounds() {
        let t = DepartureTime::new(6, 0).unwrap();
        assert_eq!(
            FlexSchedule::new(4, t, 20),
            Err(FlexRequestError::InvalidPhaseCount(4))
        );
    }

    #[test]
    fn test_migration_body_shape() {
        let schedule = FlexSchedule::new(3, DepartureTime::new(6, 0).unwrap(), 20).unwrap();
        let body = serde_json::to_value(FlexMigrationBody::from(&schedule)).unwrap();
        assert_eq!(
            body,
            json!({
                "configuredEffect": {"phaseCount": 3},
                "departureTime": {"time": "06:00"},
                "desiredRange": {"range": 20}
            })
        );
    }
}
