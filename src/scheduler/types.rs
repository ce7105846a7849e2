/*!
 * Scheduler Types
 * Algorithm tag shared by configuration, metrics and events
 */

use crate::core::errors::SchedulerError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Scheduling algorithm tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Algorithm {
    /// First come, first served (non-preemptive FIFO)
    #[default]
    Fcfs,
    /// Static priority, lower number first (non-preemptive)
    Priority,
    /// Static priority that interrupts the running process for a better arrival
    PriorityPreemptive,
    /// Shortest remaining burst first (non-preemptive)
    Sjf,
    /// FIFO with a fixed quantum per turn
    RoundRobin,
}

impl Algorithm {
    pub const ALL: [Algorithm; 5] = [
        Self::Fcfs,
        Self::Priority,
        Self::PriorityPreemptive,
        Self::Sjf,
        Self::RoundRobin,
    ];

    /// Convert to string representation
    ///
    /// # Performance
    /// Hot path - attached to every recorded event
    #[inline(always)]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Fcfs => "FCFS",
            Self::Priority => "PRIORITY",
            Self::PriorityPreemptive => "PRIORITY_PREEMPTIVE",
            Self::Sjf => "SJF",
            Self::RoundRobin => "RR",
        }
    }

    /// Whether the algorithm needs a quantum to be constructed
    #[inline(always)]
    pub const fn requires_quantum(&self) -> bool {
        matches!(self, Self::RoundRobin)
    }
}

impl FromStr for Algorithm {
    type Err = SchedulerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "fcfs" | "fifo" => Ok(Self::Fcfs),
            "priority" | "prio" => Ok(Self::Priority),
            "priority_preemptive" | "prio_preemptive" => Ok(Self::PriorityPreemptive),
            "sjf" | "srt" | "shortest" => Ok(Self::Sjf),
            "rr" | "round_robin" | "roundrobin" => Ok(Self::RoundRobin),
            _ => Err(SchedulerError::UnknownAlgorithm(s.to_string())),
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Algorithm {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Algorithm {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
