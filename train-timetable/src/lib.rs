//! Lazily completed rail timetable graph.
//!
//! Timetables publish bare "HH:MM" times with no date, and a departure
//! board row only shows part of a service. This crate models stations,
//! services and stops as a graph that completes itself on demand from two
//! collaborators, and derives elapsed times that survive any number of
//! midnight rollovers.
//!
//! - [`domain`]: clock times, rollover resolution, stations
//! - [`graph`]: the [`Timetable`](graph::Timetable) owning every entity
//! - [`board`]: departure boards across hourly windows
//! - [`identity`]: content-derived service fingerprints
//! - [`source`]: collaborator traits and a JSON fixture implementation

pub mod board;
pub mod domain;
pub mod graph;
pub mod identity;
pub mod source;

#[cfg(test)]
mod testing;
