//! The operator taxonomy. Each variant is a leaf condition's verb; the
//! variant itself is the "operator table" — matching on it in [`crate::eval`]
//! plays the role a trait-object registry would, without the indirection,
//! since every operator here is implemented in this crate.

use serde::{Deserialize, Serialize};

/// A recognized condition operator name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Op {
    // Comparison
    Eq,
    Ne,
    Lt,
    Lte,
    Gt,
    Gte,

    // Presence
    Present,
    Absent,

    // Range
    Between,
    Modulo,

    // String
    Contains,
    StartsWith,
    EndsWith,
    Matches,

    // Collection
    ContainsAll,
    ContainsAny,
    Intersects,
    SubsetOf,

    // Temporal
    BeforeDate,
    AfterDate,
    WithinDays,
    DayOfWeek,
    HourOfDay,
    DayOfMonth,
    Month,
    Year,
    WeekOfYear,

    // Temporal arithmetic
    AddDays,
    SubtractDays,
    AddHours,
    SubtractHours,
    AddMinutes,
    SubtractMinutes,

    // Duration
    DurationSeconds,
    DurationMinutes,
    DurationHours,
    DurationDays,

    // Geospatial
    WithinRadius,
    InPolygon,

    // Math
    Sin,
    Cos,
    Tan,
    Asin,
    Acos,
    Atan,
    Atan2,
    Sinh,
    Cosh,
    Tanh,
    Sqrt,
    Cbrt,
    Power,
    Exp,
    Log,
    Log10,
    Log2,
    Round,
    Floor,
    Ceil,
    Truncate,
    Abs,
    Factorial,
    Gcd,
    Lcm,

    // Aggregations
    Min,
    Max,
    Sum,
    #[serde(alias = "mean")]
    Average,
    Median,
    Stddev,
    Variance,
    Percentile,
    Count,
    Length,
    Join,

    // Moving window
    MovingAverage,
    MovingSum,
    MovingMax,
    MovingMin,

    // Rate
    RatePerSecond,
    RatePerMinute,
    RatePerHour,

    // Financial
    CompoundInterest,
    PresentValue,
    FutureValue,

    // External
    FetchFromApi,
}

impl Op {
    /// Short operator family, used for grouping in documentation/diagnostics.
    pub fn family(self) -> &'static str {
        use Op::*;
        match self {
            Eq | Ne | Lt | Lte | Gt | Gte => "comparison",
            Present | Absent => "presence",
            Between | Modulo => "range",
            Contains | StartsWith | EndsWith | Matches => "string",
            ContainsAll | ContainsAny | Intersects | SubsetOf => "collection",
            BeforeDate | AfterDate | WithinDays | DayOfWeek | HourOfDay | DayOfMonth | Month
            | Year | WeekOfYear => "temporal",
            AddDays | SubtractDays | AddHours | SubtractHours | AddMinutes | SubtractMinutes => {
                "temporal_arithmetic"
            }
            DurationSeconds | DurationMinutes | DurationHours | DurationDays => "duration",
            WithinRadius | InPolygon => "geospatial",
            Sin | Cos | Tan | Asin | Acos | Atan | Atan2 | Sinh | Cosh | Tanh | Sqrt | Cbrt
            | Power | Exp | Log | Log10 | Log2 | Round | Floor | Ceil | Truncate | Abs
            | Factorial | Gcd | Lcm => "math",
            Min | Max | Sum | Average | Median | Stddev | Variance | Percentile | Count
            | Length | Join => "aggregation",
            MovingAverage | MovingSum | MovingMax | MovingMin => "moving_window",
            RatePerSecond | RatePerMinute | RatePerHour => "rate",
            CompoundInterest | PresentValue | FutureValue => "financial",
            FetchFromApi => "external",
        }
    }
}
