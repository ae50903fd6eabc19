#![no_std]

extern crate alloc;

#[cfg(any(test, feature = "std"))]
#[macro_use]
extern crate std;

#[macro_use]
extern crate log;

pub mod anim;
pub mod consts;
pub mod event;
pub mod input;
pub mod movevars;
pub mod state;
pub mod trace;
pub mod weapon;

pub use consts::{PITCH, ROLL, YAW};
pub use math;
