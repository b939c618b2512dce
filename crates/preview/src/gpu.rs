//! GPU plumbing: surface/device setup, pipeline construction, and the
//! per-frame render path. Everything here is owned by the window runtime
//! and torn down with it.

pub(crate) mod context;
pub(crate) mod pipeline;
pub(crate) mod state;
