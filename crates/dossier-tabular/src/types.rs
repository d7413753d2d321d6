//! Service-record data types and duration arithmetic

use dossier_domain::{FieldMap, FieldValue};
use serde::{Deserialize, Serialize};

/// Legal conversion: one service year is 360 premium days
pub const DAYS_PER_YEAR: u32 = 360;

/// Legal conversion: one service month is 30 premium days
pub const DAYS_PER_MONTH: u32 = 30;

/// Insurance branch a table row belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InsuranceBranch {
    /// Employed contributions (branch code 4a)
    Employed,
    /// Self-employed contributions (branch code 4b)
    SelfEmployed,
}

/// Header fields of the service record
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServiceHeader {
    /// Full name, uppercased
    pub full_name: Option<String>,

    /// 11-digit national identity number
    pub national_id: Option<String>,

    /// First employment entry date (dd.mm.yyyy)
    pub first_entry_date: Option<String>,

    /// Last employment exit date (dd.mm.yyyy)
    pub last_exit_date: Option<String>,

    /// Total premium day count as declared on the document
    pub declared_premium_days: Option<u32>,
}

/// One contribution row of the service table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceRow {
    /// Insurance branch
    pub branch: InsuranceBranch,

    /// Contribution period (YYYY/MM)
    pub period: String,

    /// Registry number
    pub registry_no: String,

    /// Employer number
    pub employer_no: String,

    /// Entry date, when printed
    pub start_date: Option<String>,

    /// Premium days in this row
    pub days: u32,

    /// Exit date, when printed
    pub end_date: Option<String>,

    /// Role/occupation free text
    pub role: String,

    /// Internship row: starred branch marker or internship keyword in the
    /// role text. Excluded from every total.
    pub internship: bool,
}

/// One employer from the trailing listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employer {
    /// Employer number
    pub number: String,

    /// Employer name
    pub name: String,
}

/// Computed service durations
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExperienceTotals {
    /// Total service, whole years
    pub total_years: u32,

    /// Remaining months of total service (0-11)
    pub total_months: u32,

    /// Employed-branch years
    pub employed_years: u32,

    /// Employed-branch remaining months
    pub employed_months: u32,

    /// Self-employed-branch years
    pub self_employed_years: u32,

    /// Self-employed-branch remaining months
    pub self_employed_months: u32,

    /// Employed-branch day total (internships excluded)
    pub employed_days: u32,

    /// Self-employed-branch day total (internships excluded)
    pub self_employed_days: u32,

    /// Internship day total, kept separately
    pub internship_days: u32,
}

impl ExperienceTotals {
    /// Compute totals from table rows
    ///
    /// Internship rows contribute to no branch. Branch day totals convert
    /// to years/months independently, then the pairs sum and any month
    /// total of 12+ folds into additional years.
    pub fn from_rows(rows: &[ServiceRow]) -> Self {
        let mut employed_days = 0;
        let mut self_employed_days = 0;
        let mut internship_days = 0;

        for row in rows {
            if row.internship {
                internship_days += row.days;
                continue;
            }
            match row.branch {
                InsuranceBranch::Employed => employed_days += row.days,
                InsuranceBranch::SelfEmployed => self_employed_days += row.days,
            }
        }

        let (employed_years, employed_months) = days_to_years_months(employed_days);
        let (self_employed_years, self_employed_months) = days_to_years_months(self_employed_days);

        let mut total_years = employed_years + self_employed_years;
        let mut total_months = employed_months + self_employed_months;
        if total_months >= 12 {
            total_years += total_months / 12;
            total_months %= 12;
        }

        Self {
            total_years,
            total_months,
            employed_years,
            employed_months,
            self_employed_years,
            self_employed_months,
            employed_days,
            self_employed_days,
            internship_days,
        }
    }

    /// Combined branch day total
    pub fn total_days(&self) -> u32 {
        self.employed_days + self.self_employed_days
    }
}

/// Fully parsed service record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceRecord {
    /// Header fields
    pub header: ServiceHeader,

    /// Table rows in document order
    pub rows: Vec<ServiceRow>,

    /// Trailing employer listing
    pub employers: Vec<Employer>,

    /// Computed durations
    pub totals: ExperienceTotals,
}

impl ServiceRecord {
    /// Render as a field map for the merge pipeline
    ///
    /// Sector experience keys are deliberately absent: the service record
    /// carries no sector information, so sector subtotals may only come
    /// from sector employment certificates.
    pub fn to_field_map(&self) -> FieldMap {
        let mut map = FieldMap::new();

        if let Some(name) = &self.header.full_name {
            map.insert("full_name".into(), FieldValue::Text(name.clone()));
        }
        if let Some(id) = &self.header.national_id {
            map.insert("national_id".into(), FieldValue::Text(id.clone()));
        }
        if let Some(date) = &self.header.first_entry_date {
            map.insert("first_entry_date".into(), FieldValue::Text(date.clone()));
        }
        if let Some(date) = &self.header.last_exit_date {
            map.insert("last_exit_date".into(), FieldValue::Text(date.clone()));
        }
        if let Some(days) = self.header.declared_premium_days {
            map.insert("total_premium_days".into(), FieldValue::Int(days as i64));
        }

        map.insert(
            "total_experience_years".into(),
            FieldValue::Int(self.totals.total_years as i64),
        );
        map.insert(
            "total_experience_months".into(),
            FieldValue::Int(self.totals.total_months as i64),
        );
        map.insert(
            "employed_days".into(),
            FieldValue::Int(self.totals.employed_days as i64),
        );
        map.insert(
            "self_employed_days".into(),
            FieldValue::Int(self.totals.self_employed_days as i64),
        );
        map.insert(
            "internship_days".into(),
            FieldValue::Int(self.totals.internship_days as i64),
        );
        map.insert(
            "record_count".into(),
            FieldValue::Int(self.rows.len() as i64),
        );
        map.insert(
            "employer_count".into(),
            FieldValue::Int(self.employers.len() as i64),
        );

        if !self.employers.is_empty() {
            map.insert(
                "employers".into(),
                FieldValue::List(
                    self.employers
                        .iter()
                        .map(|e| {
                            let mut entry = FieldMap::new();
                            entry.insert("number".into(), FieldValue::Text(e.number.clone()));
                            entry.insert("name".into(), FieldValue::Text(e.name.clone()));
                            FieldValue::Map(entry)
                        })
                        .collect(),
                ),
            );
        }

        map
    }
}

/// Convert a premium day count into (years, months) under the 360/30 rule
pub fn days_to_years_months(days: u32) -> (u32, u32) {
    let years = days / DAYS_PER_YEAR;
    let months = (days % DAYS_PER_YEAR) / DAYS_PER_MONTH;
    (years, months)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(branch: InsuranceBranch, days: u32, internship: bool) -> ServiceRow {
        ServiceRow {
            branch,
            period: "2016/03".to_string(),
            registry_no: "2012045271701".to_string(),
            employer_no: "1005766".to_string(),
            start_date: None,
            days,
            end_date: None,
            role: String::new(),
            internship,
        }
    }

    #[test]
    fn test_370_days_is_one_year_one_month() {
        // 370 / 360 = 1 remainder 10; 10 / 30 = 0 months... the remainder
        // rule works on days: 370 - 360 = 10 days -> 0 months.
        assert_eq!(days_to_years_months(370), (1, 0));
        // 390 days: 1 year plus 30 remaining days -> 1 month.
        assert_eq!(days_to_years_months(390), (1, 1));
        assert_eq!(days_to_years_months(0), (0, 0));
        assert_eq!(days_to_years_months(359), (0, 11));
    }

    #[test]
    fn test_totals_exclude_internships() {
        let rows = vec![
            row(InsuranceBranch::Employed, 300, false),
            row(InsuranceBranch::Employed, 90, true),
            row(InsuranceBranch::SelfEmployed, 120, false),
        ];
        let totals = ExperienceTotals::from_rows(&rows);

        assert_eq!(totals.employed_days, 300);
        assert_eq!(totals.self_employed_days, 120);
        assert_eq!(totals.internship_days, 90);
        assert_eq!(totals.total_days(), 420);
    }

    #[test]
    fn test_branch_totals_convert_independently_then_sum() {
        // 350 employed days (0y 11m) + 350 self-employed days (0y 11m):
        // month sum 22 folds into 1 year 10 months.
        let rows = vec![
            row(InsuranceBranch::Employed, 350, false),
            row(InsuranceBranch::SelfEmployed, 350, false),
        ];
        let totals = ExperienceTotals::from_rows(&rows);

        assert_eq!(totals.employed_years, 0);
        assert_eq!(totals.employed_months, 11);
        assert_eq!(totals.total_years, 1);
        assert_eq!(totals.total_months, 10);
    }
}
