//! Primitives for passing control values to an audio thread.
//!
//! Control surfaces update parameters whenever the user moves something, while the audio thread wants to read those
//! parameters at well-defined points without ever blocking.  A mutex is out because the controller can be preempted
//! while holding it.  Reading two independent atomics is out too, because the audio thread can observe the first value
//! from one update and the second from another.  The types here pack related values into a single atomic word so that
//! one load always produces a consistent snapshot.
mod atomic_pair;
mod sync;

pub use atomic_pair::*;
