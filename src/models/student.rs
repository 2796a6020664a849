use serde_json::Value;

/// Flat snapshot of the student identity fields the directory cache tracks,
/// mapped from the nested provider payload returned at login.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StudentSnapshot {
    pub id: i64,
    pub name: Option<String>,
    pub hall_ticket: Option<String>,
    pub roll_number: Option<String>,
    pub branch_name: Option<String>,
    pub branch_code: Option<String>,
    pub course_name: Option<String>,
    pub section_name: Option<String>,
    pub regulation_name: Option<String>,
    pub year: Option<String>,
    pub semester: Option<String>,
    pub admission_year: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub date_of_birth: Option<String>,
    pub father_name: Option<String>,
    pub father_mobile: Option<String>,
    pub gender: Option<String>,
    pub qr_key: Option<String>,
    pub student_type: Option<String>,
    pub status: Option<String>,
}

impl StudentSnapshot {
    /// Maps the `student` object of an upstream login body onto the flat
    /// record shape. The provider omits nested objects freely and mixes
    /// strings with numbers, so every field degrades to `None` instead of
    /// failing the mapping.
    #[must_use]
    pub fn from_login_body(body: &Value, subject_id: i64) -> Self {
        let student = body.get("student").unwrap_or(&Value::Null);

        Self {
            id: subject_id,
            name: field(student, "name"),
            hall_ticket: field(student, "htno"),
            roll_number: field(student, "rollno"),
            branch_name: nested(student, "branch", "name"),
            branch_code: nested(student, "branch", "code"),
            course_name: nested(student, "course", "name"),
            section_name: nested(student, "section", "name"),
            regulation_name: nested(student, "regulation", "name"),
            year: field(student, "year"),
            semester: field(student, "semester"),
            admission_year: field(student, "admission_year"),
            email: field(student, "email"),
            phone: field(student, "phone"),
            date_of_birth: field(student, "dob"),
            father_name: field(student, "father_name"),
            father_mobile: field(student, "father_mobile"),
            gender: field(student, "gender"),
            qr_key: field(student, "qr_key"),
            student_type: field(student, "student_type"),
            status: field(student, "status"),
        }
    }
}

fn text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn field(obj: &Value, key: &str) -> Option<String> {
    obj.get(key).and_then(text)
}

fn nested(obj: &Value, outer: &str, key: &str) -> Option<String> {
    obj.get(outer).and_then(|v| v.get(key)).and_then(text)
}
