use crate::constants::limits::MAX_SEARCH_RESULTS;
use crate::entities::{prelude::*, students};
use crate::models::student::StudentSnapshot;
use anyhow::Result;
use sea_orm::{ColumnTrait, Condition, DatabaseConnection, EntityTrait, QueryFilter, Set};

pub struct StudentRepository {
    conn: DatabaseConnection,
}

#[derive(Debug, Clone)]
pub struct SearchOutcome {
    /// Ranked matches, capped at `MAX_SEARCH_RESULTS`.
    pub records: Vec<students::Model>,
    /// Match count before the cap.
    pub total_matches: usize,
}

impl StudentRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Full-snapshot write: inserts the record or overwrites every tracked
    /// field in place, refreshing `last_updated`. `created_at` survives
    /// updates.
    pub async fn upsert(&self, snapshot: &StudentSnapshot) -> Result<()> {
        let now = chrono::Utc::now().to_rfc3339();

        let active_model = students::ActiveModel {
            id: Set(snapshot.id),
            name: Set(snapshot.name.clone()),
            hall_ticket: Set(snapshot.hall_ticket.clone()),
            roll_number: Set(snapshot.roll_number.clone()),
            branch_name: Set(snapshot.branch_name.clone()),
            branch_code: Set(snapshot.branch_code.clone()),
            course_name: Set(snapshot.course_name.clone()),
            section_name: Set(snapshot.section_name.clone()),
            regulation_name: Set(snapshot.regulation_name.clone()),
            year: Set(snapshot.year.clone()),
            semester: Set(snapshot.semester.clone()),
            admission_year: Set(snapshot.admission_year.clone()),
            email: Set(snapshot.email.clone()),
            phone: Set(snapshot.phone.clone()),
            date_of_birth: Set(snapshot.date_of_birth.clone()),
            father_name: Set(snapshot.father_name.clone()),
            father_mobile: Set(snapshot.father_mobile.clone()),
            gender: Set(snapshot.gender.clone()),
            qr_key: Set(snapshot.qr_key.clone()),
            student_type: Set(snapshot.student_type.clone()),
            status: Set(snapshot.status.clone()),
            created_at: Set(now.clone()),
            last_updated: Set(now),
        };

        Students::insert(active_model)
            .on_conflict(
                sea_orm::sea_query::OnConflict::column(students::Column::Id)
                    .update_columns([
                        students::Column::Name,
                        students::Column::HallTicket,
                        students::Column::RollNumber,
                        students::Column::BranchName,
                        students::Column::BranchCode,
                        students::Column::CourseName,
                        students::Column::SectionName,
                        students::Column::RegulationName,
                        students::Column::Year,
                        students::Column::Semester,
                        students::Column::AdmissionYear,
                        students::Column::Email,
                        students::Column::Phone,
                        students::Column::DateOfBirth,
                        students::Column::FatherName,
                        students::Column::FatherMobile,
                        students::Column::Gender,
                        students::Column::QrKey,
                        students::Column::StudentType,
                        students::Column::Status,
                        students::Column::LastUpdated,
                    ])
                    .to_owned(),
            )
            .exec(&self.conn)
            .await?;

        Ok(())
    }

    pub async fn get(&self, id: i64) -> Result<Option<students::Model>> {
        Ok(Students::find_by_id(id).one(&self.conn).await?)
    }

    /// Substring search over name, hall ticket, and roll number.
    ///
    /// SQLite's LIKE is case-insensitive, so the SQL pass only narrows
    /// candidates; the required case-sensitive match and the ranking happen
    /// in-process.
    pub async fn search(&self, query: &str) -> Result<SearchOutcome> {
        let candidates = Students::find()
            .filter(
                Condition::any()
                    .add(students::Column::Name.contains(query))
                    .add(students::Column::HallTicket.contains(query))
                    .add(students::Column::RollNumber.contains(query)),
            )
            .all(&self.conn)
            .await?;

        let mut matches: Vec<students::Model> = candidates
            .into_iter()
            .filter(|record| {
                contains(&record.name, query)
                    || contains(&record.hall_ticket, query)
                    || contains(&record.roll_number, query)
            })
            .collect();

        let total_matches = matches.len();

        matches.sort_by(|a, b| {
            rank(a, query)
                .cmp(&rank(b, query))
                .then_with(|| a.name.cmp(&b.name))
        });
        matches.truncate(MAX_SEARCH_RESULTS);

        Ok(SearchOutcome {
            records: matches,
            total_matches,
        })
    }
}

fn contains(field: &Option<String>, query: &str) -> bool {
    field.as_deref().is_some_and(|v| v.contains(query))
}

/// 0 = exact hall-ticket match, 1 = name substring match, 2 = everything else.
fn rank(record: &students::Model, query: &str) -> u8 {
    if record.hall_ticket.as_deref() == Some(query) {
        0
    } else if contains(&record.name, query) {
        1
    } else {
        2
    }
}
