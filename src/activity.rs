use std::fmt;

use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Activity-type tag used for elementarity. Not the same as an activity id:
/// several activities in the candidate set may share a group. Encoded on the
/// wire as the integer tag from spec.md §3 (0=Home .. 7=ServiceStation) so
/// that the JSON activity files the CLI reads match the original C struct's
/// `activity_type` field layout.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Hash)]
pub enum ActivityGroup {
    Home,
    Education,
    Errands,
    Escort,
    Leisure,
    Shopping,
    Work,
    ServiceStation,
}

impl Serialize for ActivityGroup {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.index() as u8)
    }
}

impl<'de> Deserialize<'de> for ActivityGroup {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let tag = u8::deserialize(deserializer)?;
        if (tag as usize) >= NUM_GROUPS {
            return Err(DeError::custom(format!("activity group tag {} out of range 0..{}", tag, NUM_GROUPS - 1)));
        }
        Ok(ActivityGroup::from_index(tag as usize))
    }
}

pub const NUM_GROUPS: usize = 8;

impl ActivityGroup {
    pub const ALL: [ActivityGroup; NUM_GROUPS] = [
        ActivityGroup::Home,
        ActivityGroup::Education,
        ActivityGroup::Errands,
        ActivityGroup::Escort,
        ActivityGroup::Leisure,
        ActivityGroup::Shopping,
        ActivityGroup::Work,
        ActivityGroup::ServiceStation,
    ];

    /// Index into the coefficient arrays supplied at initialisation.
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(i: usize) -> ActivityGroup {
        Self::ALL[i]
    }
}

impl fmt::Display for ActivityGroup {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let s = match self {
            ActivityGroup::Home => "Home",
            ActivityGroup::Education => "Education",
            ActivityGroup::Errands => "Errands",
            ActivityGroup::Escort => "Escort",
            ActivityGroup::Leisure => "Leisure",
            ActivityGroup::Shopping => "Shopping",
            ActivityGroup::Work => "Work",
            ActivityGroup::ServiceStation => "ServiceStation",
        };
        write!(f, "{}", s)
    }
}

/// Charging mode selectable for an activity. `None` means the activity does
/// not support charging at all. Wire tag 0..3 per spec.md §3.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Hash)]
pub enum ChargeMode {
    None,
    Slow,
    Fast,
    Rapid,
}

impl ChargeMode {
    const ALL: [ChargeMode; 4] = [ChargeMode::None, ChargeMode::Slow, ChargeMode::Fast, ChargeMode::Rapid];

    fn tag(self) -> u8 {
        self as u8
    }
}

impl Serialize for ChargeMode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.tag())
    }
}

impl<'de> Deserialize<'de> for ChargeMode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let tag = u8::deserialize(deserializer)?;
        ChargeMode::ALL
            .get(tag as usize)
            .copied()
            .ok_or_else(|| DeError::custom(format!("charge mode tag {} out of range 0..3", tag)))
    }
}

/// A small bitset over `ActivityGroup`, used as label group-memory and as the
/// per-activity forbidden-group set injected by DSSR. Eight groups fit in a
/// single machine word, so the set is `Copy` and needs no allocation.
#[derive(Copy, Clone, Eq, PartialEq, Default, Debug)]
pub struct GroupSet(u8);

impl GroupSet {
    pub fn empty() -> GroupSet {
        GroupSet(0)
    }

    pub fn singleton(g: ActivityGroup) -> GroupSet {
        GroupSet(1 << g.index())
    }

    pub fn contains(self, g: ActivityGroup) -> bool {
        self.0 & (1 << g.index()) != 0
    }

    pub fn insert(&mut self, g: ActivityGroup) {
        self.0 |= 1 << g.index();
    }

    pub fn with(self, g: ActivityGroup) -> GroupSet {
        GroupSet(self.0 | (1 << g.index()))
    }

    pub fn union(self, other: GroupSet) -> GroupSet {
        GroupSet(self.0 | other.0)
    }

    /// `self` contains every group in `other`.
    pub fn is_superset_of(self, other: GroupSet) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn intersects(self, other: GroupSet) -> bool {
        self.0 & other.0 != 0
    }
}

/// Unique index of an activity in the input array. Activity 0 is always
/// "dawn"; the last activity is always "dusk".
pub type ActivityId = usize;

/// Immutable (save for `forbidden_groups`) description of a candidate
/// activity, supplied once per solve by the calling collaborator. The
/// `Deserialize` impl lets `main.rs` read a plain JSON array of these
/// straight off disk; `forbidden_groups` is never part of that file — it is
/// always seeded empty and owned thereafter by DSSR (spec.md §3).
#[derive(Clone, Debug, Deserialize)]
pub struct Activity {
    pub id: ActivityId,
    pub x: f64,
    pub y: f64,
    pub group: ActivityGroup,
    pub earliest_start: i64,
    pub latest_start: i64,
    pub min_duration: i64,
    pub max_duration: i64,
    pub des_start_time: i64,
    pub des_duration: i64,
    pub charge_mode: ChargeMode,
    pub is_charging: bool,
    pub is_service_station: bool,
    /// Mutable set-of-groups populated by the DSSR outer loop. Reset to
    /// empty at the start of every solve; owned by DSSR, read by the
    /// feasibility oracle.
    #[serde(skip, default)]
    pub forbidden_groups: GroupSet,
}

impl Activity {
    pub fn is_dawn(&self) -> bool {
        self.id == 0
    }

    pub fn reset_forbidden_groups(&mut self) {
        self.forbidden_groups = GroupSet::empty();
    }
}
