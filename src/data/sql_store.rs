use crate::{
    data::{
        StudentStore,
        student::{NewStudent, Student, StudentPatch},
    },
    error::{
        CommitTransactionSnafu, GetDatabaseConnectionSnafu, MakeQuerySnafu, MissingStudentSnafu,
        MissingTaxIdSnafu, RegistrarResult,
    },
};
use async_trait::async_trait;
use snafu::{OptionExt, ResultExt, ensure};
use sqlx::{Pool, Postgres, Sqlite, pool::PoolConnection};

// `$n` placeholders are understood by both postgres and sqlite.
const INSERT_STUDENT: &str = "INSERT INTO students (name, tax_id, national_id) VALUES ($1, $2, $3) RETURNING id, name, tax_id, national_id";
const SELECT_ALL_STUDENTS: &str = "SELECT id, name, tax_id, national_id FROM students ORDER BY id";
const SELECT_STUDENT_BY_ID: &str = "SELECT id, name, tax_id, national_id FROM students WHERE id = $1";
const SELECT_STUDENT_BY_TAX_ID: &str =
    "SELECT id, name, tax_id, national_id FROM students WHERE tax_id = $1 ORDER BY id LIMIT 1";
const UPDATE_STUDENT: &str =
    "UPDATE students SET name = $2, tax_id = $3, national_id = $4 WHERE id = $1";
const DELETE_STUDENT: &str = "DELETE FROM students WHERE id = $1";

macro_rules! sql_student_store {
    ($(#[$meta:meta])* $name:ident, $db:ty) => {
        $(#[$meta])*
        #[derive(Clone, Debug)]
        pub struct $name {
            pool: Pool<$db>,
        }

        impl $name {
            pub const fn new(pool: Pool<$db>) -> Self {
                Self { pool }
            }

            async fn get_connection(&self) -> RegistrarResult<PoolConnection<$db>> {
                self.pool
                    .acquire()
                    .await
                    .context(GetDatabaseConnectionSnafu)
            }
        }

        #[async_trait]
        impl StudentStore for $name {
            async fn create(&self, student: NewStudent) -> RegistrarResult<Student> {
                student.validate()?;
                let NewStudent {
                    name,
                    tax_id,
                    national_id,
                } = student;

                let mut conn = self.get_connection().await?;
                let created: Student = sqlx::query_as(INSERT_STUDENT)
                    .bind(name)
                    .bind(tax_id)
                    .bind(national_id)
                    .fetch_one(&mut *conn)
                    .await
                    .context(MakeQuerySnafu)?;

                info!(id = created.id, "Created student");
                Ok(created)
            }

            async fn list_all(&self) -> RegistrarResult<Vec<Student>> {
                let mut conn = self.get_connection().await?;
                sqlx::query_as(SELECT_ALL_STUDENTS)
                    .fetch_all(&mut *conn)
                    .await
                    .context(MakeQuerySnafu)
            }

            async fn find_by_id(&self, id: i64) -> RegistrarResult<Student> {
                let mut conn = self.get_connection().await?;
                let student: Option<Student> = sqlx::query_as(SELECT_STUDENT_BY_ID)
                    .bind(id)
                    .fetch_optional(&mut *conn)
                    .await
                    .context(MakeQuerySnafu)?;

                student.context(MissingStudentSnafu { id })
            }

            async fn find_by_tax_id(&self, tax_id: &str) -> RegistrarResult<Student> {
                let mut conn = self.get_connection().await?;
                let student: Option<Student> = sqlx::query_as(SELECT_STUDENT_BY_TAX_ID)
                    .bind(tax_id)
                    .fetch_optional(&mut *conn)
                    .await
                    .context(MakeQuerySnafu)?;

                student.context(MissingTaxIdSnafu { tax_id })
            }

            async fn update(&self, id: i64, patch: StudentPatch) -> RegistrarResult<Student> {
                let mut transaction = self
                    .pool
                    .begin()
                    .await
                    .context(GetDatabaseConnectionSnafu)?;

                let current: Option<Student> = sqlx::query_as(SELECT_STUDENT_BY_ID)
                    .bind(id)
                    .fetch_optional(&mut *transaction)
                    .await
                    .context(MakeQuerySnafu)?;
                let merged = current.context(MissingStudentSnafu { id })?.merged_with(patch);
                merged.validate()?;

                sqlx::query(UPDATE_STUDENT)
                    .bind(merged.id)
                    .bind(merged.name.as_str())
                    .bind(merged.tax_id.as_str())
                    .bind(merged.national_id.as_str())
                    .execute(&mut *transaction)
                    .await
                    .context(MakeQuerySnafu)?;
                transaction.commit().await.context(CommitTransactionSnafu)?;

                info!(id, "Updated student");
                Ok(merged)
            }

            async fn delete(&self, id: i64) -> RegistrarResult<()> {
                let mut conn = self.get_connection().await?;
                let result = sqlx::query(DELETE_STUDENT)
                    .bind(id)
                    .execute(&mut *conn)
                    .await
                    .context(MakeQuerySnafu)?;

                ensure!(result.rows_affected() > 0, MissingStudentSnafu { id });
                info!(id, "Deleted student");
                Ok(())
            }

            async fn close(&self) {
                self.pool.close().await;
            }
        }
    };
}

sql_student_store!(
    /// The production store.
    PostgresStudentStore,
    Postgres
);
sql_student_store!(
    /// Backs local runs (`DB_KIND=sqlite`) and the test suite.
    SqliteStudentStore,
    Sqlite
);
