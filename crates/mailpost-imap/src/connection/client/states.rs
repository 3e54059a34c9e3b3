//! Type-state markers for client connection states.
//!
//! The markers carry no data; they exist so that each connection state only
//! exposes the commands that are valid in it, checked at compile time.

/// Marker type for the not-authenticated state.
///
/// Only STARTTLS, LOGIN, and LOGOUT are valid here.
#[derive(Debug, Clone, Copy, Default)]
pub struct NotAuthenticated;

/// Marker type for the authenticated state.
///
/// Mailbox operations (SELECT, EXAMINE, APPEND) become valid.
#[derive(Debug, Clone, Copy, Default)]
pub struct Authenticated;

/// Marker type for the selected state.
///
/// Message operations (SEARCH, FETCH) become valid.
#[derive(Debug, Clone, Copy, Default)]
pub struct Selected;
