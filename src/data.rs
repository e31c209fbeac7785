use crate::data::student::{NewStudent, Student, StudentPatch};
use crate::error::RegistrarResult;
use async_trait::async_trait;
use std::fmt::Debug;

pub mod sql_store;
pub mod student;

/// Persistence for student rows.
///
/// Lookups that miss return [`RegistrarError::MissingStudent`] or
/// [`RegistrarError::MissingTaxId`]; anything else that goes wrong in the database
/// comes back as one of the query/connection errors and is never retried here.
///
/// [`RegistrarError::MissingStudent`]: crate::error::RegistrarError::MissingStudent
/// [`RegistrarError::MissingTaxId`]: crate::error::RegistrarError::MissingTaxId
#[async_trait]
pub trait StudentStore: Debug + Send + Sync {
    async fn create(&self, student: NewStudent) -> RegistrarResult<Student>;
    /// Every student, in id order.
    async fn list_all(&self) -> RegistrarResult<Vec<Student>>;
    async fn find_by_id(&self, id: i64) -> RegistrarResult<Student>;
    /// Tax ids are not unique, so this returns the lowest id sharing `tax_id`.
    async fn find_by_tax_id(&self, tax_id: &str) -> RegistrarResult<Student>;
    /// Reads the row, merges `patch` over it and writes the whole record back atomically.
    async fn update(&self, id: i64, patch: StudentPatch) -> RegistrarResult<Student>;
    async fn delete(&self, id: i64) -> RegistrarResult<()>;
    async fn close(&self);
}
