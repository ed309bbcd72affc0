pub mod arm7;
pub mod arm9;
pub mod bus;
pub mod dma;
mod engines_common;
mod irqs;
pub(crate) use irqs::Irqs;
pub mod interpreter;
pub mod psr;
mod schedule;
pub(crate) use schedule::Schedule;
pub mod timers;

pub use interpreter::regs::Regs;
