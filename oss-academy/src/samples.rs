//! Starter records written when a tenant is first bootstrapped.

use chrono::{Duration, NaiveDate, Weekday};
use oss_core::{StoreResult, TenantId, TenantStore};

use crate::models::{
    Belt, Branch, Championship, ClassSession, Payment, PaymentStatus, Student, Teacher,
};
use crate::Dataset;

/// Monthly fee used for the sample payments, in cents.
const MONTHLY_FEE_CENTS: u64 = 18_000;

/// One starter collection per dataset, every record stamped with the
/// tenant it was built for. Students, classes and payments reference the
/// sample branches and teachers by id.
#[derive(Debug, Clone)]
pub struct SampleSet {
    pub branches: Vec<Branch>,
    pub teachers: Vec<Teacher>,
    pub students: Vec<Student>,
    pub championships: Vec<Championship>,
    pub classes: Vec<ClassSession>,
    pub payments: Vec<Payment>,
}

impl SampleSet {
    /// Build the starter data for `tenant`, with dates relative to `today`.
    pub fn build(tenant: &TenantId, today: NaiveDate) -> Self {
        let t = tenant.as_str();
        let years_ago = |years: i64| today - Duration::days(years * 365);

        let mut downtown = Branch::new(t, "Downtown", "São Paulo");
        downtown.address = "Rua Augusta, 1200".to_string();
        downtown.phone = Some("+55 11 3000-1000".to_string());
        let mut riverside = Branch::new(t, "Riverside", "São Paulo");
        riverside.address = "Av. Marginal, 455".to_string();
        let branches = vec![downtown, riverside];

        let mut head = Teacher::new(t, "Rafael Costa", "rafael@academy.example", Belt::Black, &branches[0].id);
        head.specialties = vec!["gi".to_string(), "competition".to_string()];
        let mut assistant = Teacher::new(t, "Marina Alves", "marina@academy.example", Belt::Brown, &branches[1].id);
        assistant.specialties = vec!["no-gi".to_string(), "kids".to_string()];
        let teachers = vec![head, assistant];

        let student = |name: &str, age: i64, belt: Belt, stripes: u8, branch: usize, since: i64| {
            let mut s = Student::new(
                t,
                name,
                years_ago(age),
                belt,
                &branches[branch].id,
                today - Duration::days(since),
            )
            .with_stripes(stripes);
            s.teacher_id = Some(teachers[branch].id.clone());
            s
        };
        let mut students = vec![
            student("Lucas Pereira", 27, Belt::Blue, 2, 0, 720),
            student("Ana Souza", 31, Belt::Purple, 1, 0, 1500),
            student("Pedro Lima", 19, Belt::White, 3, 0, 200),
            student("Beatriz Rocha", 10, Belt::Grey, 2, 1, 400),
            student("João Martins", 35, Belt::White, 0, 1, 30),
        ];
        students[0].email = Some("lucas@example.com".to_string());
        students[1].email = Some("ana@example.com".to_string());

        let mut open = Championship::new(
            t,
            "Open Paulista",
            "Ginásio do Ibirapuera",
            today + Duration::days(45),
            today + Duration::days(30),
        );
        open.registered_student_ids = vec![students[0].id.clone(), students[1].id.clone()];
        let kids_cup = Championship::new(
            t,
            "Kids Cup",
            "Centro Esportivo Riverside",
            today + Duration::days(90),
            today + Duration::days(75),
        );
        let championships = vec![open, kids_cup];

        let classes = vec![
            ClassSession::new(t, "Fundamentals", &branches[0].id, &teachers[0].id, Weekday::Mon, "19:00", 60, 30),
            ClassSession::new(t, "Advanced Gi", &branches[0].id, &teachers[0].id, Weekday::Wed, "20:00", 90, 25),
            ClassSession::new(t, "No-Gi", &branches[1].id, &teachers[1].id, Weekday::Tue, "18:30", 60, 20),
            ClassSession::new(t, "Kids", &branches[1].id, &teachers[1].id, Weekday::Sat, "10:00", 45, 15),
        ];

        let payments = students
            .iter()
            .enumerate()
            .map(|(i, s)| {
                let status = match i % 3 {
                    0 => PaymentStatus::Paid,
                    1 => PaymentStatus::Pending,
                    _ => PaymentStatus::Overdue,
                };
                let due_on = match status {
                    PaymentStatus::Overdue => today - Duration::days(10),
                    _ => today + Duration::days(5),
                };
                Payment::new(t, &s.id, MONTHLY_FEE_CENTS, due_on, status)
            })
            .collect();

        Self {
            branches,
            teachers,
            students,
            championships,
            classes,
            payments,
        }
    }

    pub fn len(&self, dataset: Dataset) -> usize {
        match dataset {
            Dataset::Branches => self.branches.len(),
            Dataset::Teachers => self.teachers.len(),
            Dataset::Students => self.students.len(),
            Dataset::Championships => self.championships.len(),
            Dataset::Classes => self.classes.len(),
            Dataset::Payments => self.payments.len(),
        }
    }

    pub fn total(&self) -> usize {
        Dataset::ALL.iter().map(|d| self.len(*d)).sum()
    }

    /// Write one dataset's starter collection, replacing what is stored.
    /// Returns the number of records written.
    pub fn write_dataset(&self, store: &TenantStore, tenant: &TenantId, dataset: Dataset) -> StoreResult<usize> {
        match dataset {
            Dataset::Branches => store.write_records(tenant, &self.branches)?,
            Dataset::Teachers => store.write_records(tenant, &self.teachers)?,
            Dataset::Students => store.write_records(tenant, &self.students)?,
            Dataset::Championships => store.write_records(tenant, &self.championships)?,
            Dataset::Classes => store.write_records(tenant, &self.classes)?,
            Dataset::Payments => store.write_records(tenant, &self.payments)?,
        }
        Ok(self.len(dataset))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use oss_core::TenantRecord;
    use std::collections::HashSet;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 1).unwrap()
    }

    #[test]
    fn every_dataset_has_starter_records() {
        let set = SampleSet::build(&TenantId::new("t-1").unwrap(), today());
        for dataset in Dataset::ALL {
            assert!(set.len(dataset) > 0, "{dataset} has no sample records");
        }
        assert_eq!(set.total(), 2 + 2 + 5 + 2 + 4 + 5);
    }

    #[test]
    fn records_are_stamped_with_the_tenant() {
        let set = SampleSet::build(&TenantId::new("t-9").unwrap(), today());
        assert!(set.students.iter().all(|s| s.tenant_id() == "t-9"));
        assert!(set.branches.iter().all(|b| b.tenant_id() == "t-9"));
        assert!(set.payments.iter().all(|p| p.tenant_id() == "t-9"));
    }

    #[test]
    fn references_point_at_sample_records() {
        let set = SampleSet::build(&TenantId::new("t-1").unwrap(), today());
        let branch_ids: HashSet<_> = set.branches.iter().map(|b| b.id.as_str()).collect();
        let teacher_ids: HashSet<_> = set.teachers.iter().map(|t| t.id.as_str()).collect();
        let student_ids: HashSet<_> = set.students.iter().map(|s| s.id.as_str()).collect();

        assert!(set.students.iter().all(|s| branch_ids.contains(s.branch_id.as_str())));
        assert!(set
            .students
            .iter()
            .all(|s| s.teacher_id.as_deref().is_some_and(|id| teacher_ids.contains(id))));
        assert!(set.classes.iter().all(|c| teacher_ids.contains(c.teacher_id.as_str())));
        assert!(set.payments.iter().all(|p| student_ids.contains(p.student_id.as_str())));
        assert!(set
            .championships
            .iter()
            .flat_map(|c| c.registered_student_ids.iter())
            .all(|id| student_ids.contains(id.as_str())));
    }

    #[test]
    fn championship_registration_is_open_before_the_deadline() {
        let set = SampleSet::build(&TenantId::new("t-1").unwrap(), today());
        assert!(set.championships.iter().all(|c| c.registration_open(today())));
        assert!(!set.championships[0].registration_open(today() + Duration::days(31)));
    }
}
