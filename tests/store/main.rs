//! Record store integration tests.

mod support;
