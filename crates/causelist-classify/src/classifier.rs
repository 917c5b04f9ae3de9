//! Rule-based respondent classification.
//!
//! Each respondent is checked against an ordered rule list. Matching rules
//! append a rendered officer entry; an exclusive rule stops evaluation for
//! that respondent. The accumulated entries then pass a post-filter that
//! drops cases naming only municipal or collector offices.

use std::collections::BTreeSet;

use causelist_core::{CaseIdentifier, CaseRecord, ClassificationResult, DiagnosticRow};
use tracing::debug;

use crate::keywords::{
    COLLECTOR, COLLECTOR_MARKER, DISTRICT_COLLECTOR, GHMC, LOCALITIES, REVENUE_OFFICES,
    TAHSILDAR, TARGET_DISTRICT,
};

/// One officer-matching rule, applied to a lower-cased respondent name and
/// address.
pub struct Rule {
    pub label: &'static str,
    applies: fn(name: &str, address: &str) -> bool,
    render: fn(name: &str, address: &str) -> String,
    /// When this rule fires, later rules are skipped for the same respondent.
    pub exclusive: bool,
}

impl Rule {
    pub fn applies(&self, name: &str, address: &str) -> bool {
        (self.applies)(name, address)
    }

    pub fn render(&self, name: &str, address: &str) -> String {
        (self.render)(name, address)
    }
}

/// Officer rules in evaluation order.
pub static RULES: &[Rule] = &[
    Rule {
        label: "collector",
        applies: |name, _| name.contains(COLLECTOR),
        render: |_, _| DISTRICT_COLLECTOR.to_string(),
        exclusive: true,
    },
    Rule {
        label: "tahsildar",
        applies: |name, address| {
            TAHSILDAR.iter().any(|t| name.contains(*t))
                && LOCALITIES.iter().any(|l| address.contains(*l))
        },
        render: |_, address| {
            let mandal = address.split(',').next().unwrap_or_default();
            format!("Tahsildar {}", capitalize(mandal))
        },
        exclusive: false,
    },
    Rule {
        label: "revenue office",
        applies: |name, _| REVENUE_OFFICES.iter().any(|o| name.contains(*o)),
        render: |name, address| format!("{} {}", capitalize(name), address),
        exclusive: false,
    },
];

/// Officer entries for one respondent, in rule order.
pub fn officers_for(name: &str, address: &str) -> Vec<String> {
    let name = name.to_lowercase();
    let address = address.to_lowercase();

    let mut out = Vec::new();
    for rule in RULES {
        if rule.applies(&name, &address) {
            out.push(rule.render(&name, &address));
            if rule.exclusive {
                break;
            }
        }
    }
    out
}

/// Classification outcome for one fetched case.
#[derive(Debug, Clone)]
pub struct Classified {
    /// `None` means the case is excluded from the court table.
    pub result: Option<ClassificationResult>,
    pub diagnostic: DiagnosticRow,
}

/// Applies the district filter and officer rules to fetched case records.
pub struct RespondentClassifier {
    district: String,
}

impl Default for RespondentClassifier {
    fn default() -> Self {
        Self::new(TARGET_DISTRICT)
    }
}

impl RespondentClassifier {
    /// Build a classifier keeping cases whose district equals `district`
    /// (case-insensitive).
    pub fn new(district: &str) -> Self {
        Self {
            district: district.to_lowercase(),
        }
    }

    /// Classify one case record.
    ///
    /// The diagnostic row is produced for every case, including excluded ones.
    pub fn classify(
        &self,
        case_no: &CaseIdentifier,
        court_no: u32,
        record: &CaseRecord,
    ) -> Classified {
        let diagnostic = DiagnosticRow {
            court_no,
            case_no: case_no.clone(),
            respondents: record
                .resdetails
                .iter()
                .map(|r| format!("{}{}", r.rname.to_lowercase(), r.address.to_lowercase()))
                .collect::<Vec<_>>()
                .join(", "),
        };

        let result = self.evaluate(case_no, record);
        Classified { result, diagnostic }
    }

    fn evaluate(
        &self,
        case_no: &CaseIdentifier,
        record: &CaseRecord,
    ) -> Option<ClassificationResult> {
        let district = record.district.to_lowercase();
        if district != self.district {
            debug!(case = %case_no, %district, "outside target district");
            return None;
        }

        let officers: Vec<String> = record
            .resdetails
            .iter()
            .flat_map(|r| officers_for(&r.rname, &r.address))
            .collect();

        if officers.is_empty() {
            debug!(case = %case_no, "no officer respondents");
            return None;
        }
        if only_municipal_or_collector(&officers) {
            debug!(case = %case_no, count = officers.len(), "only GHMC/collector respondents");
            return None;
        }

        let judge = record
            .orderdetails
            .first()
            .map(|o| o.judgename.clone())
            .unwrap_or_default();

        Some(ClassificationResult {
            judge,
            petitioners: join_unique(record.petdetails.iter().map(|p| p.pname.as_str())),
            officers: join_unique(officers.iter().map(String::as_str)),
            subject: record.prayer.clone(),
            respondent_advocate: record.respondentadv.clone(),
        })
    }
}

// ── Helpers ──

/// True when every entry is accounted for by GHMC entries alone, or by GHMC
/// and collector entries together.
fn only_municipal_or_collector(officers: &[String]) -> bool {
    let ghmc_count = officers
        .iter()
        .filter(|o| o.to_lowercase().contains(GHMC))
        .count();
    let collector_count = officers
        .iter()
        .filter(|o| o.contains(COLLECTOR_MARKER))
        .count();

    officers.len() == ghmc_count || officers.len() == ghmc_count + collector_count
}

/// Deduplicate and join with `", "` in lexicographic order.
fn join_unique<'a>(items: impl Iterator<Item = &'a str>) -> String {
    items
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect::<Vec<_>>()
        .join(", ")
}

/// Upper-case the first character and lower-case the rest.
fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}
