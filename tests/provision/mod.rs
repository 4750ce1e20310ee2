//! Provisioning behaviour tests.

mod scenarios;
mod test_helpers;
