//! High-level operations. Each builds exactly one request, sends it through the
//! client, and maps the reply to a typed result.

pub mod control;
pub mod entities;
pub mod voxels;
