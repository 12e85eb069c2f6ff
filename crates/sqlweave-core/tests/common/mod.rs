#![allow(dead_code)]

use std::future::Future;
use std::sync::Mutex;

use sqlweave_core::{BoundArgument, Column, Executor, Join, Table};

/// The cities / users / user_data schema shared by the UPDATE tests.
pub struct Schema {
    pub cities: Table,
    pub city_id: Column,
    pub city_name: Column,
    pub users: Table,
    pub user_id: Column,
    pub user_name: Column,
    pub user_city: Column,
    pub user_flags: Column,
    pub user_data: Table,
    pub data_user: Column,
    pub data_comment: Column,
    pub data_value: Column,
}

impl Schema {
    pub fn new() -> Self {
        let mut cities = Table::new("cities");
        let city_id = cities.integer("city_id");
        let city_name = cities.varchar("name");

        let mut users = Table::new("users");
        let user_id = users.varchar("id");
        let user_name = users.varchar("name");
        let user_city = users.integer("city_id");
        let user_flags = users.integer("flags");

        let mut user_data = Table::new("user_data");
        let data_user = user_data.varchar("user_id");
        let data_comment = user_data.varchar("comment");
        let data_value = user_data.integer("value");

        Self {
            cities,
            city_id,
            city_name,
            users,
            user_id,
            user_name,
            user_city,
            user_flags,
            user_data,
            data_user,
            data_comment,
            data_value,
        }
    }

    /// `users INNER JOIN user_data ON users.id = user_data.user_id`
    pub fn users_with_data(&self) -> Join {
        self.users
            .inner_join(&self.user_data, &self.user_id, &self.data_user)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TestError {
    #[error(transparent)]
    Statement(#[from] sqlweave_core::Error),
    #[error("driver failure: {0}")]
    Driver(String),
}

/// Records every call and answers with a fixed row count.
#[derive(Debug, Default)]
pub struct RecordingExecutor {
    pub affected: u64,
    pub calls: Mutex<Vec<(String, Vec<BoundArgument>)>>,
}

impl RecordingExecutor {
    pub fn with_affected(affected: u64) -> Self {
        Self {
            affected,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<(String, Vec<BoundArgument>)> {
        self.calls.lock().unwrap().clone()
    }
}

impl Executor for RecordingExecutor {
    type Error = TestError;

    fn execute_update(
        &self,
        sql: &str,
        arguments: &[BoundArgument],
    ) -> impl Future<Output = Result<u64, Self::Error>> + Send {
        self.calls
            .lock()
            .unwrap()
            .push((sql.to_string(), arguments.to_vec()));
        let affected = self.affected;
        async move { Ok(affected) }
    }
}

/// Fails every call with a driver error.
pub struct FailingExecutor;

impl Executor for FailingExecutor {
    type Error = TestError;

    fn execute_update(
        &self,
        _sql: &str,
        _arguments: &[BoundArgument],
    ) -> impl Future<Output = Result<u64, Self::Error>> + Send {
        async { Err(TestError::Driver(String::from("unique constraint violated"))) }
    }
}

pub fn placeholder_count(sql: &str) -> usize {
    sql.matches('?').count()
}
