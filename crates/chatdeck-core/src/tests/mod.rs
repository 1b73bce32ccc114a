//! Reconciler tests.
//!
//! - Reconcile tests: one scenario per event kind and ownership case
//! - Property tests: proptest-based checks that foreign events never leak
