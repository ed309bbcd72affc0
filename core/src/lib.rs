#![feature(
    core_intrinsics,
    generic_const_exprs,
    generic_arg_infer,
    adt_const_params,
    doc_cfg,
    maybe_uninit_uninit_array,
    maybe_uninit_slice,
    portable_simd,
    const_mut_refs,
    const_trait_impl,
    const_convert
)]
#![allow(incomplete_features)]
#![warn(clippy::pedantic)]
#![allow(
    clippy::cast_lossless,
    clippy::cast_sign_loss,
    clippy::cast_possible_wrap,
    clippy::cast_possible_truncation,
    clippy::struct_excessive_bools,
    clippy::used_underscore_binding,
    clippy::too_many_lines,
    clippy::missing_panics_doc,
    clippy::option_if_let_else,
    clippy::module_name_repetitions,
    clippy::verbose_bit_mask,
    clippy::wildcard_imports,
    clippy::must_use_candidate,
    clippy::unused_self,
    clippy::missing_errors_doc,
    clippy::inline_always
)]

pub extern crate emu_utils as utils;

pub mod audio;
pub mod cheats;
pub mod cpu;
pub mod ds_slot;
pub mod emu;
pub mod flash;
pub mod gpu;
pub mod ipc;
pub mod rtc;
pub mod spi;
pub mod wifi;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum Model {
    Ds,
    #[default]
    Lite,
    Ique,
    IqueLite,
    Dsi,
}

#[derive(Clone)]
pub enum SaveContents {
    Existing(utils::BoxedByteSlice),
    New(usize),
}

#[derive(Clone)]
pub enum SaveReloadContents {
    Existing(utils::BoxedByteSlice),
    New,
}

impl From<utils::BoxedByteSlice> for SaveContents {
    #[inline]
    fn from(other: utils::BoxedByteSlice) -> Self {
        Self::Existing(other)
    }
}

impl SaveContents {
    pub(crate) fn get_or_create(
        self,
        f: impl FnOnce(usize) -> utils::BoxedByteSlice,
    ) -> utils::BoxedByteSlice {
        match self {
            Self::Existing(data) => data,
            Self::New(len) => f(len),
        }
    }

    #[inline]
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        match self {
            Self::Existing(data) => data.len(),
            Self::New(len) => *len,
        }
    }
}

/// Errors surfaced from the `load_*` entry points (the "Loader errors" bucket of the error
/// handling design): these leave the core in its pre-load state rather than panicking.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum LoaderError {
    #[error("ROM header CRC16 mismatch (expected {expected:#06x}, got {got:#06x})")]
    HeaderCrcMismatch { expected: u16, got: u16 },
    #[error("secure area CRC16 mismatch (expected {expected:#06x}, got {got:#06x})")]
    SecureAreaCrcMismatch { expected: u16, got: u16 },
    #[error("ROM image too small to contain a valid header ({len} bytes)")]
    RomTooSmall { len: usize },
    #[error("BIOS image has the wrong size (expected {expected}, got {got})")]
    WrongBiosSize { expected: usize, got: usize },
    #[error("firmware image has an unsupported size ({len} bytes)")]
    UnsupportedFirmwareSize { len: usize },
    #[error("save file has a size that doesn't match any known backup memory type ({len} bytes)")]
    UnsupportedSaveSize { len: usize },
}
