use crate::models::Applicant;

/// Applicant attributes a candidate search can constrain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CandidateField {
    Industry,
    Location,
    WorkType,
}

impl CandidateField {
    pub fn value_of<'a>(&self, applicant: &'a Applicant) -> Option<&'a str> {
        match self {
            CandidateField::Industry => applicant.industry.as_deref(),
            CandidateField::Location => applicant.location.as_deref(),
            CandidateField::WorkType => applicant.work_type.as_deref(),
        }
    }
}

/// Ordered set of optional equality constraints on candidate attributes.
///
/// Stores translate the constraints into bound query parameters; values are
/// never spliced into SQL text. Absent and blank values add no constraint, and
/// at most one constraint is kept per field (the latest wins).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CandidateFilter {
    constraints: Vec<(CandidateField, String)>,
}

impl CandidateFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with<V: Into<String>>(mut self, field: CandidateField, value: Option<V>) -> Self {
        let Some(value) = value.map(Into::into) else {
            return self;
        };
        if value.trim().is_empty() {
            return self;
        }
        self.constraints.retain(|(existing, _)| *existing != field);
        self.constraints.push((field, value));
        self
    }

    pub fn industry<V: Into<String>>(self, value: Option<V>) -> Self {
        self.with(CandidateField::Industry, value)
    }

    pub fn location<V: Into<String>>(self, value: Option<V>) -> Self {
        self.with(CandidateField::Location, value)
    }

    pub fn work_type<V: Into<String>>(self, value: Option<V>) -> Self {
        self.with(CandidateField::WorkType, value)
    }

    pub fn constraints(&self) -> &[(CandidateField, String)] {
        &self.constraints
    }

    pub fn is_empty(&self) -> bool {
        self.constraints.is_empty()
    }

    /// In-process evaluation, equivalent to the SQL translation.
    pub fn matches(&self, applicant: &Applicant) -> bool {
        self.constraints
            .iter()
            .all(|(field, value)| field.value_of(applicant) == Some(value.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn applicant(industry: Option<&str>, location: Option<&str>) -> Applicant {
        Applicant {
            id: Uuid::now_v7(),
            user_id: Uuid::now_v7(),
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
            email: "ada@example.com".into(),
            phone: None,
            location: location.map(String::from),
            industry: industry.map(String::from),
            work_type: None,
            bio: None,
            skills: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn blank_and_missing_values_add_nothing() {
        let filter = CandidateFilter::new()
            .industry(None::<String>)
            .location(Some("  "))
            .work_type(Some(""));
        assert!(filter.is_empty());
        assert!(filter.matches(&applicant(None, None)));
    }

    #[test]
    fn latest_value_per_field_wins() {
        let filter = CandidateFilter::new()
            .industry(Some("Retail"))
            .location(Some("Austin"))
            .industry(Some("Tech"));

        assert_eq!(
            filter.constraints(),
            &[
                (CandidateField::Location, "Austin".to_string()),
                (CandidateField::Industry, "Tech".to_string()),
            ]
        );
    }

    #[test]
    fn every_constraint_must_hold() {
        let filter = CandidateFilter::new().industry(Some("Tech")).location(Some("Austin"));

        assert!(filter.matches(&applicant(Some("Tech"), Some("Austin"))));
        assert!(!filter.matches(&applicant(Some("Tech"), Some("Denver"))));
        assert!(!filter.matches(&applicant(Some("Tech"), None)));
    }
}
