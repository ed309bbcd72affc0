pub mod bus;
mod irqs;
pub use irqs::{IrqFlags, Irqs};
mod schedule;
pub use schedule::{event_slots, Event, EventSlotIndex, Schedule, Timestamp};
pub mod cp15;
pub mod div_engine;
pub mod dma;
pub mod sqrt_engine;

use super::{interpreter::arm9::EngineData, psr::Cpsr, timers::Timers, Regs};
use crate::{
    cpu,
    emu::{swram::Swram, Emu, LocalExMemControl},
    utils::{Bytes, OwnedBytesCellPtr, Savestate},
};
use cp15::Cp15;
use div_engine::DivEngine;
use sqrt_engine::SqrtEngine;

proc_bitfield::bitfield! {
    #[derive(Clone, Copy, PartialEq, Eq, Savestate)]
    pub const struct PostBootFlag(pub u8): Debug {
        pub booted: bool @ 0,
        pub extra_bit: bool @ 1,
    }
}

pub const BIOS_SIZE: usize = 0x1000;
pub const BIOS_BUFFER_SIZE: usize = bus::ptrs::Ptrs::PAGE_SIZE;

#[derive(Savestate)]
#[load(in_place_only)]
pub struct Arm9 {
    #[cfg(feature = "log")]
    #[savestate(skip)]
    pub(super) logger: slog::Logger,
    pub engine_data: EngineData,
    #[savestate(skip)]
    bios: OwnedBytesCellPtr<BIOS_BUFFER_SIZE>,
    pub schedule: Schedule,
    #[savestate(skip)]
    bus_ptrs: Box<bus::ptrs::Ptrs>,
    #[savestate(skip)]
    bus_timings: Box<bus::timings::Timings>,
    pub cp15: Cp15,
    pub irqs: Irqs,
    pub timers: Timers<Schedule>,
    local_ex_mem_control: LocalExMemControl,
    post_boot_flag: PostBootFlag,
    pub dma: cpu::dma::Controller<dma::Timing, u32>,
    pub dma_fill: Bytes<16>,
    pub div_engine: DivEngine,
    pub sqrt_engine: SqrtEngine,
}

impl Arm9 {
    pub(crate) fn new(
        engine_data: EngineData,
        bios: OwnedBytesCellPtr<BIOS_BUFFER_SIZE>,
        #[cfg(feature = "log")] logger: slog::Logger,
    ) -> Self {
        let mut schedule = Schedule::new();
        let timers = Timers::new(&mut schedule);
        let div_engine = DivEngine::new(&mut schedule);
        let sqrt_engine = SqrtEngine::new(&mut schedule);
        Arm9 {
            #[cfg(feature = "log")]
            logger,
            engine_data,
            bios,
            schedule,
            bus_ptrs: bus::ptrs::Ptrs::new_boxed(),
            bus_timings: bus::timings::Timings::new_boxed(),
            cp15: Cp15::new(),
            irqs: Irqs::new(),
            timers,
            local_ex_mem_control: LocalExMemControl(0),
            post_boot_flag: PostBootFlag(0),
            dma: cpu::dma::Controller {
                channels: [
                    cpu::dma::Channel::new(
                        0x001F_FFFF,
                        0x0FFF_FFFF,
                        0x0FFF_FFFF,
                        dma::Timing::Disabled,
                        0,
                    ),
                    cpu::dma::Channel::new(
                        0x001F_FFFF,
                        0x0FFF_FFFF,
                        0x0FFF_FFFF,
                        dma::Timing::Disabled,
                        0,
                    ),
                    cpu::dma::Channel::new(
                        0x001F_FFFF,
                        0x0FFF_FFFF,
                        0x0FFF_FFFF,
                        dma::Timing::Disabled,
                        0,
                    ),
                    cpu::dma::Channel::new(
                        0x001F_FFFF,
                        0x0FFF_FFFF,
                        0x0FFF_FFFF,
                        dma::Timing::Disabled,
                        0,
                    ),
                ],
                cur_channel: None,
                running_channels: 0,
            },
            dma_fill: Bytes::new([0; 16]),
            div_engine,
            sqrt_engine,
        }
    }

    pub(crate) fn setup(emu: &mut Emu) {
        Self::setup_sys_bus_ptrs(emu);
        emu.arm9.bus_timings.setup();
        Cp15::setup(emu);
    }

    #[inline]
    pub fn jump(emu: &mut Emu, addr: u32) {
        super::interpreter::arm9::jump(emu, addr);
    }

    #[inline]
    pub fn r15(&self) -> u32 {
        self.engine_data.r15()
    }

    #[inline]
    pub fn cpsr(&self) -> Cpsr {
        self.engine_data.cpsr()
    }

    #[inline]
    pub fn set_cpsr(emu: &mut Emu, value: Cpsr) {
        super::interpreter::arm9::set_cpsr(emu, value);
    }

    #[inline]
    pub fn regs(&self) -> Regs {
        self.engine_data.regs()
    }

    #[inline]
    pub fn set_regs(&mut self, regs: &Regs) {
        self.engine_data.set_regs(regs);
    }

    #[inline]
    pub fn bios(&self) -> &Bytes<BIOS_BUFFER_SIZE> {
        unsafe { &*self.bios.as_bytes_ptr() }
    }

    #[inline]
    pub fn local_ex_mem_control(&self) -> LocalExMemControl {
        self.local_ex_mem_control
    }

    #[inline]
    pub fn write_local_ex_mem_control(&mut self, value: LocalExMemControl) {
        self.local_ex_mem_control.0 = value.0 & 0x7F;
    }

    #[inline]
    pub fn post_boot_flag(&self) -> PostBootFlag {
        self.post_boot_flag
    }

    #[inline]
    pub fn set_post_boot_flag(&mut self, value: PostBootFlag) {
        self.post_boot_flag.0 = value.0 & 3;
    }

    #[inline]
    pub fn invalidate_word_range(&mut self, bounds: (u32, u32)) {
        self.engine_data.invalidate_word_range(bounds);
    }

    #[inline]
    pub(crate) unsafe fn map_sys_bus_ptr_range(
        &mut self,
        mask: bus::ptrs::Mask,
        start_ptr: *mut u8,
        mem_size: usize,
        bounds: (u32, u32),
    ) {
        self.bus_ptrs.map_range(mask, start_ptr, mem_size, bounds);
        self.cp15
            .ptrs
            .map_sys_bus_range(start_ptr, mem_size, bounds, mask);
        self.invalidate_word_range(bounds);
    }

    #[inline]
    pub(crate) fn unmap_sys_bus_ptr_range(&mut self, bounds: (u32, u32)) {
        self.bus_ptrs.unmap_range(bounds);
        self.cp15.ptrs.unmap_sys_bus_range(bounds);
        self.invalidate_word_range(bounds);
    }

    fn setup_sys_bus_ptrs(emu: &mut Emu) {
        unsafe {
            emu.arm9.bus_ptrs.map_range(
                bus::ptrs::mask::ALL,
                emu.main_mem().as_ptr(),
                emu.main_mem_mask().get() as usize + 1,
                (0x0200_0000, 0x02FF_FFFF),
            );
            emu.gpu.vram.setup_arm9_bus_ptrs(&mut emu.arm9.bus_ptrs);
            emu.arm9.bus_ptrs.map_range(
                bus::ptrs::mask::R,
                emu.arm9.bios.as_ptr(),
                0x4000,
                (0xFFFF_0000, 0xFFFF_0000 + (emu.arm9.bios.len() - 1) as u32),
            );
        }
    }

    #[inline]
    pub(crate) fn recalc_swram(&mut self, swram: &Swram) {
        unsafe {
            match swram.control().layout() {
                0 => {
                    self.map_sys_bus_ptr_range(
                        bus::ptrs::mask::ALL,
                        swram.contents().as_ptr(),
                        0x8000,
                        (0x0300_0000, 0x03FF_FFFF),
                    );
                }
                1 => {
                    self.map_sys_bus_ptr_range(
                        bus::ptrs::mask::ALL,
                        swram.contents().as_ptr().add(0x4000),
                        0x4000,
                        (0x0300_0000, 0x03FF_FFFF),
                    );
                }
                2 => {
                    self.map_sys_bus_ptr_range(
                        bus::ptrs::mask::ALL,
                        swram.contents().as_ptr(),
                        0x4000,
                        (0x0300_0000, 0x03FF_FFFF),
                    );
                }
                _ => {
                    self.unmap_sys_bus_ptr_range((0x0300_0000, 0x03FF_FFFF));
                }
            }
        }
    }
}
