//! Student endpoints.
//!
//! All of these sit behind the basic-auth layer. Reading a single student's
//! age consumes the record: the row is deleted once its age has been read.

use std::collections::BTreeMap;

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use serde_json::Value;
use tracing::instrument;

use crate::config::MAX_NAME_LENGTH;
use crate::db::{NewStudent, StoreError, Student};
use crate::error::{AppError, ResultExt};
use crate::state::AppState;

const MISSING_FIELDS: &str = "Name and age are required";

#[derive(Debug, Serialize)]
pub struct StudentAges {
    /// Name to age, ages rendered as strings
    pub student_ages: BTreeMap<String, String>,
}

#[derive(Debug, Serialize)]
pub struct StudentAge {
    pub name: String,
    pub age: i32,
}

#[derive(Debug, Serialize)]
pub struct StudentList {
    pub students: Vec<Student>,
    pub count: usize,
}

/// Parse and validate a create-student request body.
///
/// Anything that is not a JSON object with non-null `name` and `age` counts
/// as missing fields.
pub fn parse_new_student(body: &[u8]) -> Result<NewStudent, AppError> {
    let missing = || AppError::Validation(MISSING_FIELDS.to_string());

    let value: Value = serde_json::from_slice(body).map_err(|_| missing())?;
    let object = value.as_object().ok_or_else(missing)?;
    let name = object.get("name").filter(|v| !v.is_null()).ok_or_else(missing)?;
    let age = object.get("age").filter(|v| !v.is_null()).ok_or_else(missing)?;

    let name = name
        .as_str()
        .ok_or_else(|| AppError::Validation("Name must be a string".to_string()))?;
    if name.chars().count() > MAX_NAME_LENGTH {
        return Err(AppError::Validation(format!(
            "Name must be at most {} characters",
            MAX_NAME_LENGTH
        )));
    }

    let age = age
        .as_i64()
        .and_then(|a| i32::try_from(a).ok())
        .ok_or_else(|| AppError::Validation("Age must be an integer".to_string()))?;

    Ok(NewStudent {
        name: name.to_string(),
        age,
    })
}

/// GET /get_student_ages
#[instrument(skip(state))]
pub async fn list_ages(State(state): State<AppState>) -> Result<Json<StudentAges>, AppError> {
    let students = state.store.find_all().await.context("retrieving students")?;
    tracing::info!("Retrieved {} students", students.len());

    let student_ages = students
        .into_iter()
        .map(|s| (s.name, s.age.to_string()))
        .collect();
    Ok(Json(StudentAges { student_ages }))
}

/// GET /get_student_ages/{student_name}
///
/// Returns the age and deletes the record in a single store call, so each
/// record's age is handed out at most once even under concurrent requests.
#[instrument(skip(state))]
pub async fn consume_age(
    State(state): State<AppState>,
    Path(student_name): Path<String>,
) -> Result<Json<StudentAge>, AppError> {
    let student = state
        .store
        .delete_by_name(&student_name)
        .await
        .context(&format!("processing student {}", student_name))?
        .ok_or_else(|| AppError::NotFound("Student not found".to_string()))?;

    tracing::info!("Retrieved and deleted student: {}", student_name);
    Ok(Json(StudentAge {
        name: student.name,
        age: student.age,
    }))
}

/// POST /students
#[instrument(skip(state, body))]
pub async fn create(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<(StatusCode, Json<Student>), AppError> {
    let new_student = parse_new_student(&body)?;
    let conflict = || AppError::Conflict("Student already exists".to_string());

    if state
        .store
        .exists(&new_student.name)
        .await
        .context("creating student")?
    {
        return Err(conflict());
    }

    let student = match state.store.create(new_student).await {
        Ok(student) => student,
        Err(StoreError::Duplicate(_)) => return Err(conflict()),
        Err(e) => return Err(AppError::store("creating student", e)),
    };

    tracing::info!(id = student.id, "Created new student: {}", student.name);
    Ok((StatusCode::CREATED, Json(student)))
}

/// GET /students
#[instrument(skip(state))]
pub async fn list(State(state): State<AppState>) -> Result<Json<StudentList>, AppError> {
    let students = state
        .store
        .find_all()
        .await
        .context("retrieving all students")?;

    Ok(Json(StudentList {
        count: students.len(),
        students,
    }))
}
