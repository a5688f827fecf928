// ********* Categories ***********

use std::error::Error;
use std::fmt::Display;

/// The religion categories recorded by the census tables.
///
/// The set is closed: the columns of every table (yearly counts and changes)
/// are taken from these eight categories.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash, Ord, PartialOrd)]
pub enum Religion {
    Catholic,
    Calvinist,
    Lutheran,
    OrthodoxChristian,
    OtherChristian,
    Jewish,
    Other,
    Atheist,
}

impl Religion {
    /// All the categories, in the order used by the dashboard selectors.
    pub const ALL: [Religion; 8] = [
        Religion::Catholic,
        Religion::Calvinist,
        Religion::Lutheran,
        Religion::OrthodoxChristian,
        Religion::OtherChristian,
        Religion::Jewish,
        Religion::Other,
        Religion::Atheist,
    ];

    /// The machine key, as used for the column names of the yearly tables.
    pub fn key(&self) -> &'static str {
        match self {
            Religion::Catholic => "catholic",
            Religion::Calvinist => "calvinist",
            Religion::Lutheran => "lutheran",
            Religion::OrthodoxChristian => "orthodox_christian",
            Religion::OtherChristian => "other_christian",
            Religion::Jewish => "jewish",
            Religion::Other => "other",
            Religion::Atheist => "atheist",
        }
    }

    /// The column name of this category in the change table.
    pub fn change_key(&self) -> &'static str {
        match self {
            Religion::Catholic => "change_catholic",
            Religion::Calvinist => "change_calvinist",
            Religion::Lutheran => "change_lutheran",
            Religion::OrthodoxChristian => "change_orthodox_christian",
            Religion::OtherChristian => "change_other_christian",
            Religion::Jewish => "change_jewish",
            Religion::Other => "change_other",
            Religion::Atheist => "change_atheist",
        }
    }

    /// The label displayed in the selectors and chart legends.
    pub fn label(&self) -> &'static str {
        match self {
            Religion::Catholic => "Katolikus",
            Religion::Calvinist => "Református",
            Religion::Lutheran => "Evangélikus",
            Religion::OrthodoxChristian => "Ortodox keresztény",
            Religion::OtherChristian => "Más keresztény",
            Religion::Jewish => "Zsidó",
            Religion::Other => "Egyéb",
            Religion::Atheist => "Ateista",
        }
    }

    pub fn change_label(&self) -> &'static str {
        match self {
            Religion::Catholic => "Változás a katolikus népességben",
            Religion::Calvinist => "Változás a református népességben",
            Religion::Lutheran => "Változás az evangélikus népességben",
            Religion::OrthodoxChristian => "Változás az ortodox keresztény népességben",
            Religion::OtherChristian => "Változás az más keresztény népességekben",
            Religion::Jewish => "Változás a zsidó népességben",
            Religion::Other => "Változás az egyéb népességekben",
            Religion::Atheist => "Változás az ateista népességben",
        }
    }

    pub fn from_key(key: &str) -> Result<Religion, StatsError> {
        Religion::ALL
            .iter()
            .find(|r| r.key() == key)
            .copied()
            .ok_or_else(|| StatsError::InvalidArgument {
                key: key.to_string(),
            })
    }

    pub fn from_change_key(key: &str) -> Result<Religion, StatsError> {
        Religion::ALL
            .iter()
            .find(|r| r.change_key() == key)
            .copied()
            .ok_or_else(|| StatsError::InvalidArgument {
                key: key.to_string(),
            })
    }

    fn index(&self) -> usize {
        match self {
            Religion::Catholic => 0,
            Religion::Calvinist => 1,
            Religion::Lutheran => 2,
            Religion::OrthodoxChristian => 3,
            Religion::OtherChristian => 4,
            Religion::Jewish => 5,
            Religion::Other => 6,
            Religion::Atheist => 7,
        }
    }
}

impl Display for Religion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.key())
    }
}

/// The census years with published tables.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash, Ord, PartialOrd)]
pub enum CensusYear {
    Y2011,
    Y2022,
}

impl CensusYear {
    pub const ALL: [CensusYear; 2] = [CensusYear::Y2011, CensusYear::Y2022];

    pub fn from_number(year: u32) -> Option<CensusYear> {
        match year {
            2011 => Some(CensusYear::Y2011),
            2022 => Some(CensusYear::Y2022),
            _ => None,
        }
    }

    pub fn number(&self) -> u32 {
        match self {
            CensusYear::Y2011 => 2011,
            CensusYear::Y2022 => 2022,
        }
    }
}

impl Display for CensusYear {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.number())
    }
}

/// What a value in a table measures.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
pub enum Measure {
    /// Number of people declaring the religion in a census year.
    Count,
    /// Change of the share of the religion between the two censuses.
    Change,
}

/// The group of a long-format row: a religion measured in a given way.
///
/// It is rendered as `catholic` for counts and `change_catholic` for changes,
/// which are the names of the columns the rows were read from.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
pub struct Group {
    pub religion: Religion,
    pub measure: Measure,
}

impl Group {
    pub fn count(religion: Religion) -> Group {
        Group {
            religion,
            measure: Measure::Count,
        }
    }

    pub fn change(religion: Religion) -> Group {
        Group {
            religion,
            measure: Measure::Change,
        }
    }

    pub fn key(&self) -> &'static str {
        match self.measure {
            Measure::Count => self.religion.key(),
            Measure::Change => self.religion.change_key(),
        }
    }

    pub fn label(&self) -> &'static str {
        match self.measure {
            Measure::Count => self.religion.label(),
            Measure::Change => self.religion.change_label(),
        }
    }
}

impl Display for Group {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.key())
    }
}

// ********* Input data structures ***********

/// The values of one row, per religion category.
///
/// A table does not have to carry every category: the missing ones are `None`.
#[derive(PartialEq, Debug, Clone, Copy, Default)]
pub struct ReligionValues([Option<f64>; 8]);

impl ReligionValues {
    /// A row with a value for every category.
    pub fn from_fn<F: Fn(Religion) -> f64>(f: F) -> ReligionValues {
        ReligionValues::from_partial_fn(|r| Some(f(r)))
    }

    pub fn from_partial_fn<F: Fn(Religion) -> Option<f64>>(f: F) -> ReligionValues {
        let mut values = [None; 8];
        for r in Religion::ALL {
            values[r.index()] = f(r);
        }
        ReligionValues(values)
    }

    pub fn get(&self, religion: Religion) -> Option<f64> {
        self.0[religion.index()]
    }

    pub fn has(&self, religion: Religion) -> bool {
        self.get(religion).is_some()
    }
}

/// A row of a wide table, before the county is attached.
#[derive(PartialEq, Debug, Clone)]
pub struct WideRecord {
    pub id: String,
    pub values: ReligionValues,
}

/// A row of a wide table with its county.
///
/// For the change table the values are still fractions.
#[derive(PartialEq, Debug, Clone)]
pub struct DistrictRecord {
    pub id: String,
    pub county: String,
    pub values: ReligionValues,
}

/// A county and the districts that belong to it, as listed in the lookup file.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct CountyEntry {
    pub name: String,
    pub ids: Vec<String>,
}

/// Policy for the districts that the county lookup does not know.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum JoinMode {
    /// The unknown districts are dropped from the joined table and reported.
    Permissive,
    /// Any unknown district fails the join.
    Strict,
}

impl Default for JoinMode {
    fn default() -> Self {
        JoinMode::Permissive
    }
}

// ******** Output data structures *********

#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct JoinReport {
    pub joined: usize,
    /// The identifiers that were dropped, in input order.
    pub dropped: Vec<String>,
}

#[derive(PartialEq, Debug, Clone)]
pub struct LongRow {
    pub id: String,
    pub county: String,
    pub group: Group,
    pub value: f64,
}

#[derive(PartialEq, Debug, Clone)]
pub struct CountyAggregate {
    pub county: String,
    pub value: f64,
}

/// Errors raised by the pipeline.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum StatsError {
    /// A district identifier has no owning county.
    LookupError { id: String },
    /// A district identifier is listed under two counties.
    DuplicateDistrict {
        id: String,
        first: String,
        second: String,
    },
    /// The caller asked for a religion key that does not exist.
    InvalidArgument { key: String },
}

impl Error for StatsError {}

impl Display for StatsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StatsError::LookupError { id } => {
                write!(f, "district {:?} does not belong to any county", id)
            }
            StatsError::DuplicateDistrict { id, first, second } => write!(
                f,
                "district {:?} is listed in both {:?} and {:?}",
                id, first, second
            ),
            StatsError::InvalidArgument { key } => write!(f, "unknown religion key {:?}", key),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_are_distinct_and_parse_back() {
        for r in Religion::ALL {
            assert_eq!(Religion::from_key(r.key()), Ok(r));
            assert_eq!(Religion::from_change_key(r.change_key()), Ok(r));
            assert_eq!(r.change_key(), format!("change_{}", r.key()));
        }
        assert_eq!(
            Religion::from_key("change_catholic"),
            Err(StatsError::InvalidArgument {
                key: "change_catholic".to_string()
            })
        );
    }

    #[test]
    fn group_keys() {
        assert_eq!(Group::count(Religion::Jewish).key(), "jewish");
        assert_eq!(
            Group::change(Religion::OrthodoxChristian).to_string(),
            "change_orthodox_christian"
        );
        assert_eq!(Group::count(Religion::Atheist).label(), "Ateista");
    }

    #[test]
    fn census_years() {
        assert_eq!(CensusYear::from_number(2022), Some(CensusYear::Y2022));
        assert_eq!(CensusYear::from_number(2001), None);
        assert_eq!(CensusYear::Y2011.to_string(), "2011");
    }

    #[test]
    fn values_by_religion() {
        let values = ReligionValues::from_fn(|r| match r {
            Religion::Lutheran => 3.0,
            _ => 1.0,
        });
        assert_eq!(values.get(Religion::Lutheran), Some(3.0));
        assert_eq!(values.get(Religion::Atheist), Some(1.0));

        let partial = ReligionValues::from_partial_fn(|r| match r {
            Religion::Jewish => Some(12.0),
            _ => None,
        });
        assert_eq!(partial.get(Religion::Jewish), Some(12.0));
        assert!(!partial.has(Religion::Catholic));
        assert_eq!(ReligionValues::default().get(Religion::Other), None);
    }
}
