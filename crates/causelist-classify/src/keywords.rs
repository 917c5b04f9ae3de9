//! Keyword tables for officer matching. All entries are lower-case and are
//! matched by substring against lower-cased respondent text.

/// District whose cases are kept.
pub const TARGET_DISTRICT: &str = "hyderabad";

pub const COLLECTOR: &str = "collector";

/// Rendered officer entry for any collector respondent.
pub const DISTRICT_COLLECTOR: &str = "District Collector Hyderabad";

/// Spellings of "tahsildar" seen in respondent names.
pub const TAHSILDAR: &[&str] = &["tahsildar", "tahshildhar"];

/// Mandals under the Hyderabad collectorate. A tahsildar counts only when the
/// address names one of these.
pub const LOCALITIES: &[&str] = &[
    "saidabad",
    "khairatabad",
    "amberpet",
    "ameerpet",
    "shaikpet",
    "himayatnagar",
    "maredpally",
    "ramgopalpet",
    "bahadurpura",
    "bandlaguda",
    "golconda",
    "asif nagar",
    "secunderabad",
    "musheerabad",
    "tirumalagiri",
    "charminar",
    "nampally",
];

/// Revenue and municipal offices rendered as name plus address.
pub const REVENUE_OFFICES: &[&str] = &[
    "mandal revenue officer",
    "greater hyderabad municipal corporation",
    "rdo",
    "revenue divisional officer",
    "the mandal revenue officer",
    "the rdo",
    "the revenue divisional officer",
    "the greater hyderabad municipal corporation",
];

pub const GHMC: &str = "greater hyderabad municipal corporation";

/// Marker used to count collector entries in the rendered officer list.
pub const COLLECTOR_MARKER: &str = "District Collector";
