//! Core type definitions used throughout the codebase

/// Identifier of a world entity (rooms, items, actors).
///
/// The scheduler never interprets these; they are handed through to the
/// world store unchanged.
pub type EntityId = String;

/// Game turn counter (scheduler time unit)
pub type Turn = u64;

/// Execution priority. Higher values run first.
pub type Priority = i32;
