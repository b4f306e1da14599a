//! Unit tests for the task bounded context.

mod status_tests;
