//! Integration test harness for agent-firewall

mod facade_tests;
mod gatekeeper_tests;
mod scrub_tests;
