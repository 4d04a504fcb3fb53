//! Unit test module
//!
//! Handler unit tests live here, separate from source files.
//! Tests run handlers against in-memory SQLite and a recording fake gateway.

mod fakes;
