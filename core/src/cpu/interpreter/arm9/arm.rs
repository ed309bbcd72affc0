mod branch;
use branch::*;
mod data;
use data::*;
mod mem;
use mem::*;
mod other;
use other::*;

use super::super::common::{
    dispatch_bool, dispatch_dp_op_ty, dispatch_dp_operand, dispatch_misc_addressing,
    dispatch_wb_addressing, dispatch_wb_off_ty, misc_addressing, wb_addressing, DpOpTy,
    DpOperand, ShiftTy, WbOffTy,
};
use super::{add_bus_cycles, prefetch_arm};
use crate::emu::Emu;

fn dp_op_ty(bits: u32) -> DpOpTy {
    match bits {
        0x0 => DpOpTy::And,
        0x1 => DpOpTy::Eor,
        0x2 => DpOpTy::Sub,
        0x3 => DpOpTy::Rsb,
        0x4 => DpOpTy::Add,
        0x5 => DpOpTy::Adc,
        0x6 => DpOpTy::Sbc,
        0x7 => DpOpTy::Rsc,
        0x8 => DpOpTy::Tst,
        0x9 => DpOpTy::Teq,
        0xA => DpOpTy::Cmp,
        0xB => DpOpTy::Cmn,
        0xC => DpOpTy::Orr,
        0xD => DpOpTy::Mov,
        0xE => DpOpTy::Bic,
        _ => DpOpTy::Mvn,
    }
}

fn shift_ty(bits: u32) -> ShiftTy {
    match bits & 3 {
        0 => ShiftTy::Lsl,
        1 => ShiftTy::Lsr,
        2 => ShiftTy::Asr,
        _ => ShiftTy::Ror,
    }
}

fn decode_data_processing(emu: &mut Emu, instr: u32) {
    let op_ty = dp_op_ty(instr >> 21 & 0xF);
    let set_flags = instr & 1 << 20 != 0;
    if instr & 1 << 25 != 0 {
        dispatch_dp_op_ty!(op_ty, |OP_TY| {
            dispatch_bool!(set_flags, |SET_FLAGS| {
                dp_op::<OP_TY, { DpOperand::Imm }, SET_FLAGS>(emu, instr);
            })
        });
        return;
    }
    let shift_t = shift_ty(instr >> 5 & 3);
    let shift_imm = instr & 0x10 == 0;
    dispatch_dp_op_ty!(op_ty, |OP_TY| {
        dispatch_bool!(set_flags, |SET_FLAGS| {
            dispatch_dp_operand!(shift_t, shift_imm, |OPERAND| {
                dp_op::<OP_TY, OPERAND, SET_FLAGS>(emu, instr);
            })
        })
    });
}

fn decode_multiply_swap(emu: &mut Emu, instr: u32) {
    let acc = instr & 1 << 21 != 0;
    let set_flags = instr & 1 << 20 != 0;
    match instr >> 23 & 3 {
        0b00 => dispatch_bool!(acc, |ACC| {
            dispatch_bool!(set_flags, |SET_FLAGS| mul::<ACC, SET_FLAGS>(emu, instr))
        }),
        0b01 => {
            let signed = instr & 1 << 22 != 0;
            dispatch_bool!(acc, |ACC| {
                dispatch_bool!(set_flags, |SET_FLAGS| {
                    if signed {
                        smull::<ACC, SET_FLAGS>(emu, instr);
                    } else {
                        umull::<ACC, SET_FLAGS>(emu, instr);
                    }
                })
            });
        }
        _ => {
            if instr & 1 << 22 != 0 {
                swpb(emu, instr);
            } else {
                swp(emu, instr);
            }
        }
    }
}

// Signed halfword multiply extension (SMLAxy/SMLAWy/SMULWy/SMLALxy/SMULxy), selected by bits
// 22-21 once bit 7 has already picked this family out from the plain multiply/swap group.
fn decode_signed_halfword_multiply(emu: &mut Emu, instr: u32) {
    match instr >> 21 & 3 {
        0b00 => smulxy::<true>(emu, instr),
        0b01 => {
            let acc = instr & 1 << 5 == 0;
            dispatch_bool!(acc, |ACC| smulwy::<ACC>(emu, instr));
        }
        0b10 => smlalxy(emu, instr),
        _ => smulxy::<false>(emu, instr),
    }
}

fn decode_halfword_transfer(emu: &mut Emu, instr: u32) {
    let off_imm = instr & 1 << 22 != 0;
    let load = instr & 1 << 20 != 0;
    let pre = instr & 1 << 24 != 0;
    let up = instr & 1 << 23 != 0;
    let writeback = instr & 1 << 21 != 0;
    let addressing = misc_addressing(pre, writeback);
    match instr >> 5 & 3 {
        0b01 => {
            dispatch_bool!(off_imm, |OFF_IMM| {
                dispatch_bool!(up, |UPWARDS| {
                    dispatch_misc_addressing!(addressing, |ADDRESSING| {
                        if load {
                            ldrh::<OFF_IMM, UPWARDS, ADDRESSING>(emu, instr);
                        } else {
                            strh::<OFF_IMM, UPWARDS, ADDRESSING>(emu, instr);
                        }
                    })
                })
            });
        }
        0b10 => {
            dispatch_bool!(off_imm, |OFF_IMM| {
                dispatch_bool!(up, |UPWARDS| {
                    dispatch_misc_addressing!(addressing, |ADDRESSING| {
                        if load {
                            ldrsb::<OFF_IMM, UPWARDS, ADDRESSING>(emu, instr);
                        } else {
                            ldrd::<OFF_IMM, UPWARDS, ADDRESSING>(emu, instr);
                        }
                    })
                })
            });
        }
        0b11 => {
            dispatch_bool!(off_imm, |OFF_IMM| {
                dispatch_bool!(up, |UPWARDS| {
                    dispatch_misc_addressing!(addressing, |ADDRESSING| {
                        if load {
                            ldrsh::<OFF_IMM, UPWARDS, ADDRESSING>(emu, instr);
                        } else {
                            strd::<OFF_IMM, UPWARDS, ADDRESSING>(emu, instr);
                        }
                    })
                })
            });
        }
        _ => undefined(emu, instr),
    }
}

fn decode_psr_transfer(emu: &mut Emu, instr: u32) {
    let spsr = instr & 1 << 22 != 0;
    if instr & 1 << 21 == 0 {
        dispatch_bool!(spsr, |SPSR| mrs::<SPSR>(emu, instr));
    } else {
        let imm = instr & 1 << 25 != 0;
        dispatch_bool!(imm, |IMM| {
            dispatch_bool!(spsr, |SPSR| msr::<IMM, SPSR>(emu, instr))
        });
    }
}

// Everything in the "bits 24-23 == 0b10, S == 0" register-operand slot that isn't PSR transfer:
// BX, BLX(register), CLZ, BKPT and the QADD/QSUB/QDADD/QDSUB saturating-arithmetic family.
fn decode_misc(emu: &mut Emu, instr: u32) {
    if instr & 0x80 != 0 {
        decode_signed_halfword_multiply(emu, instr);
        return;
    }
    match instr >> 4 & 0xF {
        0b0000 => decode_psr_transfer(emu, instr),
        0b0001 => {
            if instr & 0x0FFF_FFF0 == 0x012F_FF10 {
                bx::<false>(emu, instr);
            } else if instr & 0x0FFF_FFF0 == 0x012F_FF30 {
                bx::<true>(emu, instr);
            } else if instr & 0x0FFF_0FF0 == 0x016F_0F10 {
                clz(emu, instr);
            } else {
                undefined(emu, instr);
            }
        }
        0b0101 => {
            let sub = instr & 1 << 21 != 0;
            let doubled = instr & 1 << 22 != 0;
            dispatch_bool!(sub, |SUB| {
                dispatch_bool!(doubled, |DOUBLED| qaddsub::<SUB, DOUBLED>(emu, instr))
            });
        }
        0b0111 => bkpt(emu, instr),
        _ => undefined(emu, instr),
    }
}

fn decode_single_data_transfer(emu: &mut Emu, instr: u32) {
    let byte = instr & 1 << 22 != 0;
    let load = instr & 1 << 20 != 0;
    let pre = instr & 1 << 24 != 0;
    let up = instr & 1 << 23 != 0;
    let writeback = instr & 1 << 21 != 0;
    let addressing = wb_addressing(pre, up, writeback);
    let off_ty = if instr & 1 << 25 == 0 {
        WbOffTy::Imm
    } else {
        WbOffTy::Reg(shift_ty(instr >> 5 & 3))
    };
    dispatch_wb_off_ty!(off_ty, |OFF_TY| {
        dispatch_bool!(up, |UPWARDS| {
            dispatch_wb_addressing!(addressing, |ADDRESSING| {
                match (byte, load) {
                    (false, false) => str::<OFF_TY, UPWARDS, ADDRESSING>(emu, instr),
                    (false, true) => ldr::<OFF_TY, UPWARDS, ADDRESSING>(emu, instr),
                    (true, false) => strb::<OFF_TY, UPWARDS, ADDRESSING>(emu, instr),
                    (true, true) => ldrb::<OFF_TY, UPWARDS, ADDRESSING>(emu, instr),
                }
            })
        })
    });
}

fn decode_block_transfer(emu: &mut Emu, instr: u32) {
    let up = instr & 1 << 23 != 0;
    let pre = instr & 1 << 24 != 0;
    let writeback = instr & 1 << 21 != 0;
    let s_bit = instr & 1 << 22 != 0;
    let load = instr & 1 << 20 != 0;
    dispatch_bool!(up, |UPWARDS| {
        dispatch_bool!(pre, |PREINC| {
            dispatch_bool!(writeback, |WRITEBACK| {
                dispatch_bool!(s_bit, |S_BIT| {
                    if load {
                        ldm::<UPWARDS, PREINC, WRITEBACK, S_BIT>(emu, instr);
                    } else {
                        stm::<UPWARDS, PREINC, WRITEBACK, S_BIT>(emu, instr);
                    }
                })
            })
        })
    });
}

fn decode_coprocessor_transfer(emu: &mut Emu, instr: u32) {
    if instr >> 21 & 7 == 0b000 {
        if instr & 1 << 20 != 0 {
            mrrc(emu, instr);
        } else {
            mcrr(emu, instr);
        }
    } else if instr & 1 << 20 != 0 {
        ldc(emu, instr);
    } else {
        stc(emu, instr);
    }
}

fn decode_coprocessor(emu: &mut Emu, instr: u32) {
    if instr & 1 << 4 != 0 {
        if instr & 1 << 20 != 0 {
            mrc(emu, instr);
        } else {
            mcr(emu, instr);
        }
    } else {
        cdp(emu, instr);
    }
}

fn decode(emu: &mut Emu, instr: u32) {
    match instr >> 25 & 0x7 {
        0b000 | 0b001 => {
            if instr >> 23 & 3 == 0b10 && instr & 1 << 20 == 0 {
                if instr & 1 << 25 != 0 {
                    decode_psr_transfer(emu, instr);
                } else {
                    decode_misc(emu, instr);
                }
            } else if instr & 1 << 25 == 0 && instr & 0x90 == 0x90 {
                if instr >> 5 & 3 == 0 {
                    decode_multiply_swap(emu, instr);
                } else {
                    decode_halfword_transfer(emu, instr);
                }
            } else {
                decode_data_processing(emu, instr);
            }
        }
        0b010 | 0b011 => {
            if instr & 1 << 25 != 0 && instr & 0x10 != 0 {
                undefined(emu, instr);
            } else {
                decode_single_data_transfer(emu, instr);
            }
        }
        0b100 => decode_block_transfer(emu, instr),
        0b101 => {
            let link = instr & 1 << 24 != 0;
            dispatch_bool!(link, |LINK| b::<LINK>(emu, instr));
        }
        0b110 => decode_coprocessor_transfer(emu, instr),
        _ => {
            if instr & 1 << 24 != 0 {
                swi(emu, instr);
            } else {
                decode_coprocessor(emu, instr);
            }
        }
    }
}

// TODO: Decode the remaining unconditional instruction space (SETEND, CPS) if a game turns out
//       to depend on it; everything but BLX(immediate) and PLD currently falls through to
//       `undefined`.
fn decode_uncond(emu: &mut Emu, instr: u32) {
    if instr >> 25 & 0x7 == 0b101 {
        blx_imm(emu, instr);
    } else if instr & 0x0D70_F000 == 0x0550_F000 {
        pld(emu, instr);
    } else {
        undefined(emu, instr);
    }
}

#[inline]
pub fn handle_instr(emu: &mut Emu, instr: u32) {
    let cond = (instr >> 28) as u8;
    if cond == 0xF {
        decode_uncond(emu, instr);
    } else if emu.arm9.engine_data.regs.cpsr.satisfies_condition(cond) {
        decode(emu, instr);
    } else {
        add_bus_cycles(emu, 1);
        prefetch_arm::<true, true>(emu);
    }
}
