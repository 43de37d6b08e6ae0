use serde::{Deserialize, Serialize};

/// Kind of gathering being planned.
///
/// Anything unrecognized becomes [`EventKind::Generic`]: it is scored like any
/// other event but gets no event-specific advice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    Parade,
    Concert,
    Sports,
    Picnic,
    Gardening,
    Festival,
    #[default]
    #[serde(other, rename = "event")]
    Generic,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Parade => "parade",
            EventKind::Concert => "concert",
            EventKind::Sports => "sports",
            EventKind::Picnic => "picnic",
            EventKind::Gardening => "gardening",
            EventKind::Festival => "festival",
            EventKind::Generic => "event",
        }
    }

    /// Human-facing name, e.g. "Sports Game".
    pub fn display_name(&self) -> &'static str {
        match self {
            EventKind::Parade => "Parade",
            EventKind::Concert => "Concert",
            EventKind::Sports => "Sports Game",
            EventKind::Picnic => "Picnic",
            EventKind::Gardening => "Gardening",
            EventKind::Festival => "Festival",
            EventKind::Generic => "Event",
        }
    }

    pub const fn all() -> &'static [EventKind] {
        &[
            EventKind::Parade,
            EventKind::Concert,
            EventKind::Sports,
            EventKind::Picnic,
            EventKind::Gardening,
            EventKind::Festival,
        ]
    }

    /// Case-insensitive lookup; never fails.
    pub fn parse(value: &str) -> Self {
        let lower = value.trim().to_lowercase();

        Self::all()
            .iter()
            .copied()
            .find(|kind| kind.as_str() == lower)
            .unwrap_or(EventKind::Generic)
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_kind_as_str_roundtrip() {
        for kind in EventKind::all() {
            assert_eq!(EventKind::parse(kind.as_str()), *kind);
        }
    }

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!(EventKind::parse("  Festival "), EventKind::Festival);
    }

    #[test]
    fn unknown_event_falls_back_to_generic() {
        let kind = EventKind::parse("wedding");
        assert_eq!(kind, EventKind::Generic);
        assert_eq!(kind.display_name(), "Event");
    }

    #[test]
    fn unknown_event_deserializes_to_generic() {
        let kind: EventKind = serde_json::from_str("\"wedding\"").expect("should deserialize");
        assert_eq!(kind, EventKind::Generic);
    }
}
